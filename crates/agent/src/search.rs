//! Search augmentation.
//!
//! Runs the lookup for a classified query, records what happened as a
//! `search` turn, and hands the raw results back for this request's context.
//! Lookup failures never escape: they are logged and treated as "no results".

use seriloka_core::error::LookupError;
use seriloka_core::lookup::{Lookup, SearchResult, flatten_results};
use seriloka_core::transcript::Transcript;
use std::sync::Arc;
use tracing::{debug, warn};

/// What a lookup produced for one query.
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    /// The normalized query that was searched.
    pub query: String,
    pub results: Vec<SearchResult>,
    /// Set when the lookup service errored rather than finding nothing.
    pub failure: Option<LookupError>,
}

impl SearchOutcome {
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Content of the `search` turn that records this outcome.
    pub fn summary(&self) -> String {
        if self.results.is_empty() {
            format!("No results found for: \"{}\"", self.query)
        } else {
            format!("Search results for: \"{}\"", self.query)
        }
    }
}

pub struct SearchAugmenter {
    lookup: Arc<dyn Lookup>,
    fallback_suffix: String,
}

impl SearchAugmenter {
    pub fn new(lookup: Arc<dyn Lookup>) -> Self {
        Self {
            lookup,
            fallback_suffix: "general information".into(),
        }
    }

    /// Words appended to the query for the single retry after an empty
    /// result set.
    pub fn with_fallback_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.fallback_suffix = suffix.into();
        self
    }

    /// Look the query up, retrying once with a broader query when the first
    /// attempt finds nothing or fails.
    ///
    /// `failure` is kept only if neither attempt produced results.
    pub async fn fetch(&self, query: &str) -> SearchOutcome {
        let outcome = |results, failure| SearchOutcome {
            query: query.to_string(),
            results,
            failure,
        };

        let first_failure = match self.lookup.search(query).await {
            Ok(results) if !results.is_empty() => return outcome(results, None),
            Ok(_) => None,
            Err(e) => {
                warn!(lookup = self.lookup.name(), query, error = %e, "Lookup failed");
                Some(e)
            }
        };

        let broader = format!("{query} {}", self.fallback_suffix);
        debug!(query = %broader, "No results, retrying with broader query");

        match self.lookup.search(&broader).await {
            Ok(results) if !results.is_empty() => outcome(results, None),
            Ok(_) => {
                warn!(lookup = self.lookup.name(), query, "Lookup found nothing");
                outcome(Vec::new(), first_failure)
            }
            Err(e) => {
                warn!(lookup = self.lookup.name(), query = %broader, error = %e, "Lookup retry failed");
                outcome(Vec::new(), Some(e))
            }
        }
    }

    /// Fetch, then append one `search` turn describing the outcome.
    ///
    /// The caller persists the transcript afterwards.
    pub async fn augment(&self, transcript: &mut Transcript, query: &str) -> SearchOutcome {
        let outcome = self.fetch(query).await;
        let payload = (!outcome.is_empty()).then(|| flatten_results(&outcome.results));
        transcript.push_search(outcome.summary(), payload);
        outcome
    }
}
