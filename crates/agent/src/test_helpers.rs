//! Shared scripted collaborators for session and augmentation tests.

use seriloka_core::error::{LookupError, ProviderError};
use seriloka_core::lookup::{Lookup, SearchResult};
use seriloka_core::provider::{Provider, ProviderRequest, ProviderResponse, Usage};
use std::collections::VecDeque;
use std::sync::Mutex;

/// A provider that answers from a queue and records every request.
///
/// Panics if more calls are made than replies provided.
pub struct ScriptedProvider {
    replies: Mutex<VecDeque<Result<ProviderResponse, ProviderError>>>,
    requests: Mutex<Vec<ProviderRequest>>,
}

impl ScriptedProvider {
    pub fn new(replies: Vec<Result<ProviderResponse, ProviderError>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn texts(texts: &[&str]) -> Self {
        Self::new(texts.iter().map(|t| Ok(text_response(t))).collect())
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn requests(&self) -> Vec<ProviderRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn last_request(&self) -> ProviderRequest {
        self.requests.lock().unwrap().last().cloned().unwrap()
    }
}

#[async_trait::async_trait]
impl Provider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, ProviderError> {
        self.requests.lock().unwrap().push(request);
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .expect("ScriptedProvider: no more replies")
    }
}

pub fn text_response(text: &str) -> ProviderResponse {
    ProviderResponse {
        content: text.into(),
        model: "mock-model".into(),
        usage: Some(Usage {
            prompt_tokens: 10,
            completion_tokens: 5,
            total_tokens: 15,
        }),
    }
}

/// A lookup that answers from a queue and records every query.
///
/// An exhausted queue answers with no results.
pub struct ScriptedLookup {
    replies: Mutex<VecDeque<Result<Vec<SearchResult>, LookupError>>>,
    queries: Mutex<Vec<String>>,
}

impl ScriptedLookup {
    pub fn new(replies: Vec<Result<Vec<SearchResult>, LookupError>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            queries: Mutex::new(Vec::new()),
        }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl Lookup for ScriptedLookup {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn search(&self, query: &str) -> Result<Vec<SearchResult>, LookupError> {
        self.queries.lock().unwrap().push(query.to_string());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(Vec::new()))
    }
}

pub fn result(title: &str, snippet: &str) -> SearchResult {
    SearchResult {
        title: title.into(),
        link: format!("https://en.wikipedia.org/wiki/{}", title.replace(' ', "_")),
        snippet: snippet.into(),
    }
}
