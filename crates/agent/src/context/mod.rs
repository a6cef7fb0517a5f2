//! Context assembly: the exact message list sent to the completion service.
//!
//! # Message order
//!
//! | Position | Source | Present when |
//! |----------|--------|--------------|
//! | 1. System prompt | Persona | Always |
//! | 2. History | `user` and `assistant` turns, verbatim | Always (may be empty) |
//! | 3. Staleness notice | Edit propagation | Any assistant turn is stale |
//! | 4. Search note | This turn's lookup | Search ran for this turn |
//! | 5. User message | Current input | Always |

pub mod assembler;

pub use assembler::{AssembledContext, AssemblyInput, AssemblyMetadata, ContextAssembler, SearchNote};
