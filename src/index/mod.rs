//! Full-text index over corpus lines: tantivy wrapper and the textual
//! query syntax the search stages emit.

pub mod engine;
pub(crate) mod syntax;

pub use engine::{LineIndex, ScratchIndex};
pub use syntax::{fuzzy_distance, fuzzy_similarity};
