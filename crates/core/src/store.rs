//! KeyValueStore trait: the persistent string store.
//!
//! Holds the credential, the active model, and the transcript snapshot.
//! Every call is synchronous: a `set` has reached durable storage by the
//! time it returns.

use crate::error::StoreError;

/// Store key for the bearer credential.
pub const CREDENTIAL_KEY: &str = "seriloka_api_key";

/// Store key for the active model identifier.
pub const MODEL_KEY: &str = "seriloka_model";

/// Store key for the serialized transcript snapshot.
pub const TRANSCRIPT_KEY: &str = "seriloka_chat_history";

/// A synchronous string-valued key-value store.
///
/// Implementations: file-backed JSON, in-memory (for testing).
pub trait KeyValueStore: Send + Sync {
    /// The backend name (e.g., "file", "memory").
    fn name(&self) -> &str;

    fn get(&self, key: &str) -> std::result::Result<Option<String>, StoreError>;

    fn set(&self, key: &str, value: &str) -> std::result::Result<(), StoreError>;

    /// Remove a key. Returns whether it was present.
    fn remove(&self, key: &str) -> std::result::Result<bool, StoreError>;
}
