//! The Turn: one stored unit of the conversation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier of a turn within its transcript.
///
/// Allocated from a strictly increasing per-transcript counter, so two turns
/// created in the same clock tick still get distinct ids.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TurnId(pub u64);

impl std::fmt::Display for TurnId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for TurnId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(Self)
    }
}

/// Who produced a turn. Fixed at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnRole {
    System,
    User,
    Assistant,
    /// A record of a live lookup made for the following reply.
    Search,
}

impl std::fmt::Display for TurnRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::System => "system",
            Self::User => "user",
            Self::Assistant => "assistant",
            Self::Search => "search",
        };
        f.write_str(name)
    }
}

/// A single turn in the transcript.
///
/// Older snapshots used `timestamp`, `potentiallyOutdated` and
/// `searchResults` and carried no ids; the aliases let those load, and the
/// transcript renumbers them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    #[serde(default)]
    pub id: TurnId,

    pub role: TurnRole,

    pub content: String,

    #[serde(alias = "timestamp")]
    pub created_at: DateTime<Utc>,

    /// Set on assistant turns when an earlier user turn was edited.
    #[serde(default, alias = "potentiallyOutdated", skip_serializing_if = "std::ops::Not::not")]
    pub stale: bool,

    /// Flattened lookup results, only on search turns.
    #[serde(
        default,
        alias = "searchResults",
        skip_serializing_if = "Option::is_none"
    )]
    pub search_payload: Option<String>,

    /// The model that produced an assistant turn.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

impl Turn {
    fn new(id: TurnId, role: TurnRole, content: impl Into<String>) -> Self {
        Self {
            id,
            role,
            content: content.into(),
            created_at: Utc::now(),
            stale: false,
            search_payload: None,
            model: None,
        }
    }

    pub fn user(id: TurnId, content: impl Into<String>) -> Self {
        Self::new(id, TurnRole::User, content)
    }

    pub fn assistant(id: TurnId, content: impl Into<String>, model: Option<String>) -> Self {
        Self {
            model,
            ..Self::new(id, TurnRole::Assistant, content)
        }
    }

    pub fn search(id: TurnId, content: impl Into<String>, payload: Option<String>) -> Self {
        Self {
            search_payload: payload,
            ..Self::new(id, TurnRole::Search, content)
        }
    }

    pub fn system(id: TurnId, content: impl Into<String>) -> Self {
        Self::new(id, TurnRole::System, content)
    }

    /// Whether this turn is sent to the completion service as conversation.
    pub fn is_conversational(&self) -> bool {
        matches!(self.role, TurnRole::User | TurnRole::Assistant)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_turns_are_not_stale() {
        let turn = Turn::assistant(TurnId(2), "Hello", Some("m".into()));
        assert!(!turn.stale);
        assert_eq!(turn.model.as_deref(), Some("m"));
        assert!(turn.is_conversational());
        assert!(!Turn::search(TurnId(3), "q", None).is_conversational());
    }

    #[test]
    fn legacy_entry_deserializes() {
        let json = r#"{
            "timestamp": "2025-03-01T08:00:00.000Z",
            "role": "assistant",
            "content": "Boleh!",
            "model": "google/gemini-2.0-flash-exp:free",
            "potentiallyOutdated": true
        }"#;
        let turn: Turn = serde_json::from_str(json).unwrap();
        assert_eq!(turn.id, TurnId(0));
        assert_eq!(turn.role, TurnRole::Assistant);
        assert!(turn.stale);
    }

    #[test]
    fn clean_flags_are_omitted_when_serialized() {
        let json = serde_json::to_string(&Turn::user(TurnId(1), "hi")).unwrap();
        assert!(!json.contains("stale"));
        assert!(!json.contains("search_payload"));
        assert!(json.contains(r#""id":1"#));
    }

    #[test]
    fn turn_id_parses_from_text() {
        assert_eq!(" 42 ".parse::<TurnId>().unwrap(), TurnId(42));
        assert!("abc".parse::<TurnId>().is_err());
    }
}
