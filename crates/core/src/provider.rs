//! Provider trait: the abstraction over the completion service.
//!
//! A Provider knows how to send an assembled message list to an LLM and get
//! the reply text back. The bearer credential travels with each request
//! because it lives in the user's persistent store, not in the provider.

use crate::error::ProviderError;
use crate::message::ChatMessage;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A bearer credential. Never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Wrap a raw key. Blank keys are treated as absent.
    pub fn new(raw: impl Into<String>) -> Option<Self> {
        let raw = raw.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Credential([REDACTED])")
    }
}

/// A completion request.
#[derive(Debug, Clone)]
pub struct ProviderRequest {
    /// The model to use (e.g., "google/gemini-2.0-flash-exp:free")
    pub model: String,

    /// The assembled conversation, system prompt first
    pub messages: Vec<ChatMessage>,

    /// Maximum tokens to generate
    pub max_tokens: Option<u32>,

    /// Sent only as the `Authorization: Bearer` header
    pub credential: Credential,
}

/// A complete response from a provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderResponse {
    /// The generated text
    pub content: String,

    /// Which model actually responded (may differ from requested)
    pub model: String,

    /// Token usage statistics
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<Usage>,
}

/// Token usage information.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// The core Provider trait.
///
/// The session calls `complete()` without knowing which backend answers.
#[async_trait]
pub trait Provider: Send + Sync {
    /// A human-readable name for this provider (e.g., "openrouter").
    fn name(&self) -> &str;

    /// Send a request and get a complete response.
    async fn complete(
        &self,
        request: ProviderRequest,
    ) -> std::result::Result<ProviderResponse, ProviderError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_credentials_are_absent() {
        assert!(Credential::new("").is_none());
        assert!(Credential::new("   ").is_none());
        assert_eq!(Credential::new(" sk-or-1 ").unwrap().expose(), "sk-or-1");
    }

    #[test]
    fn credential_debug_is_redacted() {
        let request = ProviderRequest {
            model: "m".into(),
            messages: vec![ChatMessage::user("hi")],
            max_tokens: Some(1000),
            credential: Credential::new("sk-or-secret").unwrap(),
        };
        let debug = format!("{request:?}");
        assert!(!debug.contains("sk-or-secret"));
        assert!(debug.contains("REDACTED"));
    }
}
