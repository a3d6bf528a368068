//! Corpus line records
//!
//! One record per corpus line. `line_number` is the identity key within the
//! persistent index; `score` is assigned by a search and is meaningless
//! outside the result set it came from.

use serde::{Deserialize, Serialize};

/// One line of the indexed corpus, optionally carrying a relevance score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineRecord {
    /// Positive, unique within the persistent index. Assigned by the caller
    /// (ingestion or append); never generated by the search core.
    pub line_number: u64,
    /// Raw line text. Mutable only through rebuild or re-index operations.
    pub line_text: String,
    /// Relevance score from the most recent search, 0.0 otherwise.
    #[serde(default)]
    pub score: f32,
}

impl LineRecord {
    /// Creates an unscored record.
    pub fn new(line_number: u64, line_text: impl Into<String>) -> Self {
        Self {
            line_number,
            line_text: line_text.into(),
            score: 0.0,
        }
    }
}
