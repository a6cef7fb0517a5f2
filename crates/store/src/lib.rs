//! Persistence backends for Seriloka.
//!
//! - [`FileStore`]: a JSON object on disk, rewritten on every mutation
//! - [`InMemoryStore`]: a map behind a mutex, for tests and ephemeral runs
//!
//! The [`snapshot`] module reads and writes the transcript snapshot on top of
//! any [`KeyValueStore`](seriloka_core::KeyValueStore).

pub mod file;
pub mod in_memory;
pub mod snapshot;

pub use file::FileStore;
pub use in_memory::InMemoryStore;
