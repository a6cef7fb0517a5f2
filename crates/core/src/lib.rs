//! # Seriloka Core
//!
//! Domain types, traits, and error definitions for the Seriloka assistant.
//! This crate has no network or storage code; it defines the model that the
//! other crates implement against.
//!
//! Every external collaborator is a trait here:
//! - [`Provider`]: the completion service
//! - [`Lookup`]: the encyclopedia search service
//! - [`KeyValueStore`]: the persistent string store
//!
//! Implementations live in their respective crates, so tests can swap in
//! scripted mocks.

pub mod error;
pub mod event;
pub mod lookup;
pub mod message;
pub mod provider;
pub mod store;
pub mod transcript;
pub mod turn;

// Re-export key types at crate root for ergonomics
pub use error::{Error, ErrorKind, Result};
pub use event::{DomainEvent, EventBus};
pub use lookup::{Lookup, SearchResult};
pub use message::{ChatMessage, Role};
pub use provider::{Credential, Provider, ProviderRequest, ProviderResponse, Usage};
pub use store::KeyValueStore;
pub use transcript::Transcript;
pub use turn::{Turn, TurnId, TurnRole};
