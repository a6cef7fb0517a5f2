//! Wikipedia search lookup.
//!
//! Calls `api.php?action=query&list=search` and maps each hit to a
//! `{title, link, snippet}` triple. Snippets come back with `<span>`
//! highlight markup, which is stripped.

use async_trait::async_trait;
use regex_lite::Regex;
use reqwest::Url;
use seriloka_core::error::LookupError;
use seriloka_core::lookup::{Lookup, SearchResult};
use serde::Deserialize;
use std::sync::LazyLock;
use tracing::debug;

static HTML_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"</?[^>]+(>|$)").expect("tag pattern compiles"));

const EMPTY_SNIPPET: &str = "No description available";

/// A lookup backed by a MediaWiki search endpoint.
pub struct WikipediaLookup {
    api_url: Url,
    article_base: Url,
    limit: u32,
    client: reqwest::Client,
}

impl WikipediaLookup {
    /// Create a lookup against the given `api.php` endpoint.
    pub fn new(api_url: &str, limit: u32, timeout_secs: u64) -> Result<Self, LookupError> {
        let api_url = Url::parse(api_url)
            .map_err(|e| LookupError::Network(format!("Invalid lookup URL '{api_url}': {e}")))?;

        let mut article_base = api_url.clone();
        article_base.set_path("");
        article_base.set_query(None);

        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| LookupError::Network(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            api_url,
            article_base,
            limit,
            client,
        })
    }

    /// English Wikipedia with five results per query.
    pub fn english() -> Result<Self, LookupError> {
        Self::new("https://en.wikipedia.org/w/api.php", 5, 15)
    }

    /// `https://<host>/wiki/<Title_With_Underscores>`, percent-encoded.
    fn article_link(&self, title: &str) -> String {
        let mut url = self.article_base.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push("wiki").push(&title.replace(' ', "_"));
        }
        url.to_string()
    }

    fn to_results(&self, response: ApiResponse) -> Vec<SearchResult> {
        response
            .query
            .map(|q| q.search)
            .unwrap_or_default()
            .into_iter()
            .map(|hit| {
                let snippet = strip_tags(&hit.snippet);
                SearchResult {
                    link: self.article_link(&hit.title),
                    title: hit.title,
                    snippet: if snippet.is_empty() {
                        EMPTY_SNIPPET.to_string()
                    } else {
                        snippet
                    },
                }
            })
            .collect()
    }
}

/// Remove HTML tags, keeping their text content.
pub fn strip_tags(html: &str) -> String {
    HTML_TAG.replace_all(html, "").trim().to_string()
}

#[async_trait]
impl Lookup for WikipediaLookup {
    fn name(&self) -> &str {
        "wikipedia"
    }

    async fn search(&self, query: &str) -> Result<Vec<SearchResult>, LookupError> {
        debug!(query, "Sending lookup request");

        let limit = self.limit.to_string();
        let response = self
            .client
            .get(self.api_url.clone())
            .query(&[
                ("action", "query"),
                ("list", "search"),
                ("srlimit", limit.as_str()),
                ("format", "json"),
                ("origin", "*"),
                ("srsearch", query),
            ])
            .send()
            .await
            .map_err(|e| LookupError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(LookupError::Status(response.status().as_u16()));
        }

        let body: ApiResponse = response
            .json()
            .await
            .map_err(|e| LookupError::InvalidResponse(e.to_string()))?;

        let results = self.to_results(body);
        debug!(query, count = results.len(), "Lookup finished");
        Ok(results)
    }
}

// --- MediaWiki API types (internal) ---

#[derive(Debug, Deserialize)]
struct ApiResponse {
    #[serde(default)]
    query: Option<ApiQuery>,
}

#[derive(Debug, Deserialize)]
struct ApiQuery {
    #[serde(default)]
    search: Vec<ApiHit>,
}

#[derive(Debug, Deserialize)]
struct ApiHit {
    title: String,
    #[serde(default)]
    snippet: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_highlight_markup() {
        let html = r#"<span class="searchmatch">Kitchen</span> cabinets in <b>Malaysia</b>"#;
        assert_eq!(strip_tags(html), "Kitchen cabinets in Malaysia");
    }

    #[test]
    fn strips_unterminated_tag() {
        assert_eq!(strip_tags("room perfume <span class"), "room perfume");
    }

    #[test]
    fn stripped_snippet_is_trimmed() {
        assert_eq!(strip_tags("  <b>Batik</b> cloth \n"), "Batik cloth");
    }

    #[test]
    fn article_link_uses_underscores_and_encoding() {
        let lookup = WikipediaLookup::english().unwrap();
        assert_eq!(
            lookup.article_link("Interior design"),
            "https://en.wikipedia.org/wiki/Interior_design"
        );
        assert_eq!(
            lookup.article_link("AC/DC"),
            "https://en.wikipedia.org/wiki/AC%2FDC"
        );
    }

    #[test]
    fn maps_api_response_to_results() {
        let lookup = WikipediaLookup::english().unwrap();
        let data = r#"{
            "batchcomplete": "",
            "query": {
                "searchinfo": {"totalhits": 2},
                "search": [
                    {"ns": 0, "title": "Kuala Lumpur", "snippet": "<span class=\"searchmatch\">capital</span> city"},
                    {"ns": 0, "title": "Penang", "snippet": ""}
                ]
            }
        }"#;
        let parsed: ApiResponse = serde_json::from_str(data).unwrap();
        let results = lookup.to_results(parsed);
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].title, "Kuala Lumpur");
        assert_eq!(results[0].snippet, "capital city");
        assert_eq!(results[0].link, "https://en.wikipedia.org/wiki/Kuala_Lumpur");
        assert_eq!(results[1].snippet, EMPTY_SNIPPET);
    }

    #[test]
    fn missing_query_block_is_empty() {
        let lookup = WikipediaLookup::english().unwrap();
        let parsed: ApiResponse = serde_json::from_str(r#"{"batchcomplete": ""}"#).unwrap();
        assert!(lookup.to_results(parsed).is_empty());
    }

    #[test]
    fn invalid_url_is_rejected() {
        assert!(WikipediaLookup::new("not a url", 5, 5).is_err());
    }
}
