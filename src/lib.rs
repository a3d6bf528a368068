//! lineseek: staged query refinement over a line-oriented full-text index
//!
//! Answers free-text queries against a corpus of catalog-style text lines.
//! The value is not the indexing itself but the refinement around it: a
//! weak, punctuation-naive query is normalized, its terms classified by
//! shape, weighted per stage, and the candidate set iteratively narrowed
//! by re-indexing prior results into a scratch index and re-searching
//! within them.
//!
//! Entry points: [`LineSearcher::search_multi_stage`] for the staged
//! pipeline, [`LineSearcher::search_short`] for the single-pass variant,
//! and [`ingest::read_lines`] plus [`LineIndex::build`] for corpus
//! maintenance.

pub mod cli;
pub mod config;
pub mod error;
pub mod index;
pub mod ingest;
pub mod query;
pub mod record;
pub mod search;

pub use config::SearchConfig;
pub use error::SearchError;
pub use index::{LineIndex, ScratchIndex};
pub use record::LineRecord;
pub use search::LineSearcher;
