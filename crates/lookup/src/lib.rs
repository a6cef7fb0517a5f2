//! Lookup service implementations for Seriloka.
//!
//! All lookups implement the `seriloka_core::Lookup` trait. The only live
//! backend is Wikipedia's search API, which needs no key.

pub mod wikipedia;

pub use wikipedia::WikipediaLookup;

use seriloka_config::AppConfig;
use seriloka_core::error::LookupError;

/// Build the configured lookup service.
pub fn build_from_config(config: &AppConfig) -> Result<WikipediaLookup, LookupError> {
    WikipediaLookup::new(
        &config.search.api_url,
        config.search.limit,
        config.search.timeout_secs,
    )
}
