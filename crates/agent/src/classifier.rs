//! Query classification: does a message warrant a live lookup, and what
//! should be searched for?
//!
//! Pure functions of the input text. A message qualifies when it pairs a
//! time term with a topic term or a direct request, or when it is a short
//! direct request on its own.

use regex_lite::Regex;
use std::sync::LazyLock;

const TIME_TERMS: &[&str] = &[
    "current",
    "latest",
    "recent",
    "new",
    "update",
    "trend",
    "trending",
    "today",
    "this week",
    "this month",
    "this year",
    "now",
];

const TOPIC_TERMS: &[&str] = &[
    "market",
    "price",
    "statistic",
    "news",
    "event",
    "development",
    "data",
    "report",
    "study",
    "analysis",
    "popular",
    "insights",
];

/// Terms that make a query ask for something local.
const LOCAL_INTEREST_TERMS: &[&str] = &["trend", "current", "latest", "popular"];

/// Direct requests shorter than this qualify on their own.
const SHORT_REQUEST_CHARS: usize = 150;

static DIRECT_REQUEST: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"find|search|look up|tell me about|what is|what are")
        .expect("direct request pattern compiles")
});

static LEADING_PHRASE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^(what is|what are|who is|how to|can you tell me about|tell me about|search for|look up|find|what's)\b",
    )
    .expect("leading phrase pattern compiles")
});

static TRAILING_QUESTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\?+[.\s]*$").expect("trailing question pattern compiles"));

/// Decides whether to search and normalizes the search string.
#[derive(Debug, Clone)]
pub struct QueryClassifier {
    locality: Option<String>,
}

impl QueryClassifier {
    /// `locality` is appended to trend-style queries that don't already
    /// mention it. `None` disables the suffix.
    pub fn new(locality: Option<String>) -> Self {
        Self {
            locality: locality.filter(|l| !l.trim().is_empty()),
        }
    }

    /// Classify and normalize in one step.
    pub fn classify(&self, text: &str) -> Option<String> {
        should_search(text).then(|| self.clean_search_query(text))
    }

    /// Turn a message into a search string.
    ///
    /// Returns the original text if normalization would leave nothing.
    pub fn clean_search_query(&self, text: &str) -> String {
        let stripped = LEADING_PHRASE.replace(text, "");
        let stripped = TRAILING_QUESTION.replace(stripped.trim(), "");
        let mut query = stripped.trim().to_string();

        if query.is_empty() {
            return text.to_string();
        }

        if let Some(locality) = &self.locality {
            let lower = query.to_lowercase();
            let wants_local = LOCAL_INTEREST_TERMS.iter().any(|t| lower.contains(t));
            if wants_local && !lower.contains(&locality.to_lowercase()) {
                query.push_str(" in ");
                query.push_str(locality);
            }
        }

        query
    }
}

impl Default for QueryClassifier {
    fn default() -> Self {
        Self::new(Some("Malaysia".into()))
    }
}

/// Whether a message warrants a live lookup.
pub fn should_search(text: &str) -> bool {
    let lower = text.to_lowercase();

    let has_time = TIME_TERMS.iter().any(|t| lower.contains(t));
    let has_topic = TOPIC_TERMS.iter().any(|t| lower.contains(t));
    let is_direct = DIRECT_REQUEST.is_match(&lower);

    (has_time && (has_topic || is_direct))
        || (is_direct && text.chars().count() < SHORT_REQUEST_CHARS)
}
