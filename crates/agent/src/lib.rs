//! The conversation core of the Seriloka assistant.
//!
//! A turn flows through **Classify → Augment → Assemble → Complete →
//! Sanitize**:
//!
//! 1. **Classify** the user's message ([`classifier`])
//! 2. **Augment** it with a live lookup when it qualifies and search is on
//!    ([`search`])
//! 3. **Assemble** the exact message list for the provider ([`context`])
//! 4. **Complete** via the configured provider
//! 5. **Sanitize** the reply before it is stored ([`sanitize`])
//!
//! [`Session`] ties these together over a persisted transcript.

pub mod classifier;
pub mod context;
pub mod prompt;
pub mod sanitize;
pub mod search;
pub mod session;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use classifier::{QueryClassifier, should_search};
pub use context::{AssembledContext, AssemblyInput, AssemblyMetadata, ContextAssembler, SearchNote};
pub use sanitize::sanitize;
pub use search::{SearchAugmenter, SearchOutcome};
pub use session::{Session, SharedSession, TurnOutcome};
