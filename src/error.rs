//! Error types for the lineseek search core
//!
//! Empty and unsearchable queries are not errors: both produce an empty
//! result set so callers can tell "nothing to search" apart from a search
//! that ran and found nothing. The variants here cover genuine failures.

use std::path::PathBuf;
use thiserror::Error;

/// Failures surfaced by the index engine and the staged orchestrator.
#[derive(Debug, Error)]
pub enum SearchError {
    /// The constructed query string was rejected by the index engine.
    ///
    /// The orchestrator escapes the query and retries once; a second
    /// rejection propagates this variant to the caller since it indicates a
    /// query-construction bug rather than bad user input.
    #[error("query syntax error: {0}")]
    QuerySyntax(String),

    /// The persistent index is missing, locked, or corrupt. Fatal, never
    /// retried by this crate.
    #[error("index unavailable at {path}: {message}")]
    IndexUnavailable { path: PathBuf, message: String },

    /// Append was requested against an index that contains no documents.
    #[error("cannot append to an empty index; build it first")]
    EmptyIndexAppend,

    /// Wrapped index engine failure (commit, reader, collector).
    #[error("index engine error: {0}")]
    Index(#[from] tantivy::TantivyError),

    /// I/O failure while reading corpus files or index directories.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

impl SearchError {
    /// Stable error code for CLI output and logs.
    pub fn code(&self) -> &'static str {
        match self {
            SearchError::QuerySyntax(_) => "query_syntax",
            SearchError::IndexUnavailable { .. } => "index_unavailable",
            SearchError::EmptyIndexAppend => "empty_index_append",
            SearchError::Index(_) => "index_error",
            SearchError::Io(_) => "io_error",
        }
    }
}
