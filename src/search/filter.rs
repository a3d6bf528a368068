//! Result filter
//!
//! Re-validates a candidate set against a punctuation-truncation rule.
//! Catalog lines often carry a long tail of attributes after the first
//! clause separator; a candidate that only matched inside that tail is a
//! weak hit. The filter clips each candidate at its first clause separator
//! and re-runs the stage's query against the clipped copy alone: a
//! candidate survives only if its clause head still matches.
//!
//! The re-search mode is sticky per invocation: the first clipped candidate
//! switches it on for every candidate after it, clipped or not. Until then
//! the filter is a no-op.

use tracing::debug;

use crate::config::SearchConfig;
use crate::error::SearchError;
use crate::index::ScratchIndex;
use crate::record::LineRecord;
use crate::search::retry_on_syntax;

/// Clause separators at or before this char position never clip.
const CLIP_MIN_POSITION: usize = 10;

/// Filters `candidates` by the clip-and-re-search rule.
///
/// The re-search mode flag lives entirely inside this call; two
/// invocations never influence each other.
pub(crate) fn exclude_bad_results(
    candidates: Vec<LineRecord>,
    query: &str,
    precision: u32,
    scratch: &mut ScratchIndex,
    config: &SearchConfig,
) -> Result<Vec<LineRecord>, SearchError> {
    let mut research_mode = false;
    let mut kept = Vec::with_capacity(candidates.len());

    for candidate in candidates {
        let clipped = clip_at_clause(&candidate.line_text, &config.clause_punctuation);
        if clipped.is_some() {
            research_mode = true;
        }
        if !research_mode {
            kept.push(candidate);
            continue;
        }

        let probe = LineRecord::new(
            candidate.line_number,
            clipped.unwrap_or_else(|| candidate.line_text.clone()),
        );
        scratch.rebuild(std::slice::from_ref(&probe))?;
        let hits = retry_on_syntax(query, |q| scratch.search(q, precision))?;
        if hits.is_empty() {
            debug!(line = candidate.line_number, "dropped by clause re-search");
        } else {
            kept.push(candidate);
        }
    }

    Ok(kept)
}

/// Clips `text` before its first clause separator, provided that separator
/// sits beyond the minimum position. A separator inside the head is part of
/// the product designation (dimensions, grades) and never clips.
fn clip_at_clause(text: &str, punctuation: &[char]) -> Option<String> {
    let pos = text.chars().position(|c| punctuation.contains(&c))?;
    if pos > CLIP_MIN_POSITION {
        Some(text.chars().take(pos).collect())
    } else {
        None
    }
}
