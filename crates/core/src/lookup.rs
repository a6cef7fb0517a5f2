//! Lookup trait: the abstraction over the encyclopedia search service.

use crate::error::LookupError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// One hit from the lookup service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    pub title: String,
    pub link: String,
    pub snippet: String,
}

impl SearchResult {
    /// Plain-text rendering used when a result set is flattened for storage.
    pub fn flatten(&self) -> String {
        format!("{} - {} ({})", self.title, self.snippet, self.link)
    }
}

/// Flatten a result set into one newline-joined string.
pub fn flatten_results(results: &[SearchResult]) -> String {
    results
        .iter()
        .map(SearchResult::flatten)
        .collect::<Vec<_>>()
        .join("\n")
}

/// The core Lookup trait. Ranking is the service's business; results are
/// returned in the order the service gives them.
#[async_trait]
pub trait Lookup: Send + Sync {
    /// A human-readable name for this service (e.g., "wikipedia").
    fn name(&self) -> &str;

    /// Run a free-text query. An empty vector means no hits.
    async fn search(&self, query: &str) -> std::result::Result<Vec<SearchResult>, LookupError>;
}
