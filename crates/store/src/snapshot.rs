//! Transcript snapshots.
//!
//! The snapshot is a JSON array of turns under
//! [`TRANSCRIPT_KEY`](seriloka_core::store::TRANSCRIPT_KEY), holding only the
//! most recent turns. Loading is tolerant: a blob that is not an array gives
//! an empty transcript and individual bad entries are skipped, both with a
//! warning. The next save overwrites whatever was there.

use seriloka_core::error::StoreError;
use seriloka_core::store::{KeyValueStore, TRANSCRIPT_KEY};
use seriloka_core::transcript::Transcript;
use seriloka_core::turn::Turn;
use serde_json::Value;
use tracing::{debug, warn};

/// Read the stored transcript, or an empty one if nothing usable is stored.
pub fn load(store: &dyn KeyValueStore) -> Result<Transcript, StoreError> {
    let Some(raw) = store.get(TRANSCRIPT_KEY)? else {
        return Ok(Transcript::new());
    };
    Ok(Transcript::from_turns(parse(&raw)))
}

/// Persist the latest `cap` turns.
pub fn save(store: &dyn KeyValueStore, transcript: &Transcript, cap: usize) -> Result<(), StoreError> {
    let recent = transcript.recent(cap);
    let blob = serde_json::to_string(recent).map_err(|e| StoreError::Encode(e.to_string()))?;
    store.set(TRANSCRIPT_KEY, &blob)?;
    debug!(turns = recent.len(), store = store.name(), "Transcript snapshot saved");
    Ok(())
}

/// Drop the stored snapshot. Returns whether one existed.
pub fn clear(store: &dyn KeyValueStore) -> Result<bool, StoreError> {
    store.remove(TRANSCRIPT_KEY)
}

fn parse(raw: &str) -> Vec<Turn> {
    let entries = match serde_json::from_str::<Value>(raw) {
        Ok(Value::Array(entries)) => entries,
        Ok(other) => {
            warn!(kind = value_kind(&other), "Stored transcript is not a list, starting fresh");
            return Vec::new();
        }
        Err(e) => {
            warn!(error = %e, "Stored transcript is not valid JSON, starting fresh");
            return Vec::new();
        }
    };

    entries
        .into_iter()
        .enumerate()
        .filter_map(|(index, entry)| match serde_json::from_value::<Turn>(entry) {
            Ok(turn) => Some(turn),
            Err(e) => {
                warn!(index, error = %e, "Skipping malformed transcript entry");
                None
            }
        })
        .collect()
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::InMemoryStore;
    use seriloka_core::turn::{TurnId, TurnRole};

    #[test]
    fn empty_store_loads_empty_transcript() {
        let store = InMemoryStore::new();
        assert!(load(&store).unwrap().is_empty());
    }

    #[test]
    fn snapshot_keeps_latest_fifty_in_order() {
        let store = InMemoryStore::new();
        let mut transcript = Transcript::new();
        for i in 0..60 {
            transcript.push_user(format!("message {i}"));
        }
        save(&store, &transcript, 50).unwrap();

        let restored = load(&store).unwrap();
        assert_eq!(restored.len(), 50);
        assert_eq!(restored.turns()[0].content, "message 10");
        assert_eq!(restored.turns()[49].content, "message 59");
        assert_eq!(restored.turns()[0].id, TurnId(11));
        assert!(restored.turns().windows(2).all(|w| w[0].id < w[1].id));
    }

    #[test]
    fn restored_transcript_continues_id_sequence() {
        let store = InMemoryStore::new();
        let mut transcript = Transcript::new();
        transcript.push_user("Hai");
        transcript.push_assistant("Hai! Apa yang boleh saya bantu?", Some("m".into()));
        save(&store, &transcript, 50).unwrap();

        let mut restored = load(&store).unwrap();
        let id = restored.push_user("Next").id;
        assert_eq!(id, TurnId(3));
    }

    #[test]
    fn non_array_blob_starts_fresh() {
        let store = InMemoryStore::new();
        store.set(TRANSCRIPT_KEY, r#"{"role":"user"}"#).unwrap();
        assert!(load(&store).unwrap().is_empty());

        store.set(TRANSCRIPT_KEY, "not json at all").unwrap();
        assert!(load(&store).unwrap().is_empty());
    }

    #[test]
    fn malformed_entries_are_skipped() {
        let store = InMemoryStore::new();
        let blob = r#"[
            {"id": 1, "role": "user", "content": "Hello", "created_at": "2025-03-01T08:00:00Z"},
            {"id": 2, "role": "wizard", "content": "??", "created_at": "2025-03-01T08:00:01Z"},
            42,
            {"id": 4, "role": "assistant", "content": "Hi!", "created_at": "2025-03-01T08:00:02Z"}
        ]"#;
        store.set(TRANSCRIPT_KEY, blob).unwrap();

        let restored = load(&store).unwrap();
        assert_eq!(restored.len(), 2);
        assert_eq!(restored.turns()[1].role, TurnRole::Assistant);
        assert_eq!(restored.turns()[1].id, TurnId(4));
    }

    #[test]
    fn legacy_snapshot_is_imported() {
        let store = InMemoryStore::new();
        let blob = r#"[
            {"timestamp": "2025-03-01T08:00:00.000Z", "role": "user", "content": "Trend terkini?"},
            {"timestamp": "2025-03-01T08:00:01.000Z", "role": "search", "content": "Search results for: \"trend\"",
             "searchResults": "Batik - Malaysian textile (https://en.wikipedia.org/wiki/Batik)"},
            {"timestamp": "2025-03-01T08:00:02.000Z", "role": "assistant", "content": "Ini dia...",
             "model": "google/gemini-2.0-flash-exp:free", "potentiallyOutdated": true}
        ]"#;
        store.set(TRANSCRIPT_KEY, blob).unwrap();

        let restored = load(&store).unwrap();
        let ids: Vec<u64> = restored.turns().iter().map(|t| t.id.0).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert!(restored.turns()[1].search_payload.is_some());
        assert!(restored.has_stale());
    }

    #[test]
    fn clear_removes_snapshot() {
        let store = InMemoryStore::new();
        let mut transcript = Transcript::new();
        transcript.push_user("x");
        save(&store, &transcript, 50).unwrap();

        assert!(clear(&store).unwrap());
        assert!(!clear(&store).unwrap());
        assert!(load(&store).unwrap().is_empty());
    }
}
