//! Staged search orchestrator
//!
//! Drives the multi-stage refinement over a durable [`LineIndex`]:
//! clause splitting, anchor search, keyword narrowing over a scratch
//! index, a full weighted pass, and the anchorless fallback path. Each
//! stage runs synchronously; one request owns one scratch index for its
//! whole lifetime, so rebuild-then-read ordering always holds.

use std::path::Path;

use tracing::debug;

use crate::config::SearchConfig;
use crate::error::SearchError;
use crate::index::{LineIndex, ScratchIndex};
use crate::ingest;
use crate::query::classify::{char_len, is_all_alphabetic, is_all_alphanumeric, select_anchor};
use crate::query::normalize::{normalize, strip_leading, strip_trailing};
use crate::query::term::{QueryTerm, TermSet};
use crate::query::weight::{weigh, Stage, WeightState};
use crate::record::LineRecord;
use crate::search::{filter::exclude_bad_results, retry_on_syntax};

/// Queries at or below this char length are never clause-split.
const SPLIT_MIN_QUERY_CHARS: usize = 6;
/// The clause scan ignores this many trailing characters.
const SPLIT_TAIL_EXCLUDE: usize = 3;
/// A clause separator at or before this char position never splits.
const SPLIT_MIN_POSITION: usize = 10;
/// Hard cap on weighted terms accumulated by the narrowing stage.
const NARROW_TERM_CAP: usize = 4;
/// Hard cap on weighted terms accumulated by the fallback stage.
const FALLBACK_TERM_CAP: usize = 4;
/// Last term position the fallback stages scan when no head is protected.
const FALLBACK_POSITION_BOUND: usize = 5;
/// Hard cap on terms accumulated by the unweighted simple fallback.
const SIMPLE_TERM_CAP: usize = 2;
/// Cap on weighted terms in the single-pass short search.
const SHORT_TERM_CAP: usize = 5;

/// Normalized term sequence plus the protected-head boundary, when the
/// query was clause-split.
struct SplitQuery {
    terms: Vec<String>,
    protected: Option<usize>,
}

/// Search front end over one durable index.
#[derive(Debug)]
pub struct LineSearcher {
    index: LineIndex,
    config: SearchConfig,
}

impl LineSearcher {
    pub fn new(index: LineIndex, config: SearchConfig) -> Self {
        Self { index, config }
    }

    /// Opens a searcher over an existing durable index.
    pub fn open(path: &Path, config: SearchConfig) -> Result<Self, SearchError> {
        let index = LineIndex::open(path, &config)?;
        Ok(Self::new(index, config))
    }

    /// The staged multi-pass search.
    ///
    /// An empty query, and a query from which no term survives any rule,
    /// both return an empty result set rather than an error.
    pub fn search_multi_stage(
        &self,
        query: &str,
        precision: u32,
    ) -> Result<Vec<LineRecord>, SearchError> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }

        let split = self.split_on_punctuation(query);
        if split.terms.is_empty() {
            debug!(%query, "no term survived normalization");
            return Ok(Vec::new());
        }

        let mut scratch = ScratchIndex::new(&self.config);
        match select_anchor(&split.terms, &self.config) {
            Some(anchor) => self.anchored_search(split, anchor, precision, &mut scratch),
            None => self.fallback_search(split, precision, &mut scratch),
        }
    }

    /// Single-pass variant for short, code-heavy queries: split on hyphen
    /// and space, weigh with the short table, one direct index query.
    pub fn search_short(&self, query: &str, precision: u32) -> Result<Vec<LineRecord>, SearchError> {
        let mut set = TermSet::new();
        let mut state = WeightState::default();
        for token in query.split(['-', ' ']).filter(|t| !t.is_empty()) {
            if set.len() >= SHORT_TERM_CAP {
                break;
            }
            if let Some(term) = weigh(token, Stage::Short, &mut state, &self.config) {
                set.push(term);
            }
        }
        if set.is_empty() {
            return Ok(Vec::new());
        }
        let short_query = set.join();
        debug!(query = %short_query, "short search");
        self.search_durable(&short_query, precision)
    }

    /// Appends every line of `path` to the index, numbering from the
    /// current document count. Fails on an empty index.
    pub fn append_file(&self, path: &Path) -> Result<u64, SearchError> {
        let start = self.index.doc_count()?;
        let records = ingest::read_lines_from(path, start)?;
        self.index.build(&records, false)?;
        Ok(start + records.len() as u64)
    }

    /// Appends a single line to the index. Fails on an empty index.
    pub fn append_line(&self, text: &str) -> Result<u64, SearchError> {
        let start = self.index.doc_count()?;
        let record = LineRecord::new(start + 1, text);
        self.index.build(std::slice::from_ref(&record), false)?;
        Ok(start + 1)
    }

    fn search_durable(&self, query: &str, precision: u32) -> Result<Vec<LineRecord>, SearchError> {
        retry_on_syntax(query, |q| self.index.search(q, precision))
    }

    /// Splits a long query at its first clause separator: the head is
    /// normalized with its leading term protected from exclusion pruning,
    /// and its length bounds term consumption in later stages.
    fn split_on_punctuation(&self, query: &str) -> SplitQuery {
        let chars: Vec<char> = query.chars().collect();
        if chars.len() > SPLIT_MIN_QUERY_CHARS {
            let window = chars.len() - SPLIT_TAIL_EXCLUDE;
            let first = chars[..window]
                .iter()
                .position(|c| self.config.clause_punctuation.contains(c));
            if let Some(idx) = first {
                if idx > SPLIT_MIN_POSITION {
                    let head: String = chars[..idx].iter().collect();
                    let tail: String = chars[idx + 1..].iter().collect();
                    let mut terms = normalize(&head, 1, &self.config);
                    // A head that normalizes away entirely protects nothing
                    // and must not bound later stages.
                    let protected = (!terms.is_empty()).then(|| terms.len());
                    terms.extend(normalize(&tail, 0, &self.config));
                    debug!(%head, %tail, ?protected, "clause split");
                    return SplitQuery { terms, protected };
                }
            }
        }
        SplitQuery {
            terms: normalize(query, 1, &self.config),
            protected: None,
        }
    }

    /// Anchor search plus the narrowing and full passes.
    fn anchored_search(
        &self,
        mut split: SplitQuery,
        anchor: String,
        precision: u32,
        scratch: &mut ScratchIndex,
    ) -> Result<Vec<LineRecord>, SearchError> {
        // Quotes have served their purpose in anchor selection.
        strip_leading(&mut split.terms, '"');
        strip_trailing(&mut split.terms, '"');

        let anchor_query = QueryTerm::fuzzy(&anchor).to_syntax();
        let anchor_hits = self.search_durable(&anchor_query, precision)?;
        debug!(%anchor, hits = anchor_hits.len(), "anchor search");

        // A single hit cannot be narrowed further, and a single-term query
        // has nothing to narrow with.
        if anchor_hits.len() <= 1 || split.terms.len() == 1 {
            return Ok(anchor_hits);
        }

        // NARROW: weigh terms in order up to the cap, never crossing the
        // protected-head boundary.
        let boundary = split.protected.unwrap_or(split.terms.len());
        let mut set = TermSet::new();
        let mut state = WeightState::default();
        let mut consumed = 0;
        for (i, term) in split.terms.iter().enumerate() {
            if i >= boundary || set.len() >= NARROW_TERM_CAP {
                break;
            }
            consumed = i + 1;
            if let Some(weighted) = weigh(term, Stage::Narrow, &mut state, &self.config) {
                set.push(weighted);
            }
        }

        // Narrowing only helps when weighting produced something beyond the
        // bare anchor term; a lone fuzzy anchor still counts as new signal,
        // since the scoped re-search feeds the clause filter.
        let narrow_query = set.join();
        let mut candidates = anchor_hits;
        if narrow_query != anchor {
            scratch.rebuild(&candidates)?;
            let narrow_hits = retry_on_syntax(&narrow_query, |q| scratch.search(q, precision))?;
            debug!(query = %narrow_query, hits = narrow_hits.len(), "narrow search");
            if !narrow_hits.is_empty() {
                let filtered = exclude_bad_results(
                    narrow_hits.clone(),
                    &narrow_query,
                    precision,
                    scratch,
                    &self.config,
                )?;
                candidates = if filtered.is_empty() { narrow_hits } else { filtered };
            }
        }

        // FULL: only worthwhile while more than one candidate remains and
        // unconsumed terms can still discriminate.
        if candidates.len() > 1 && split.terms.len() > consumed {
            strip_leading(&mut split.terms, '(');
            strip_trailing(&mut split.terms, ')');

            let mut set = TermSet::new();
            let mut state = WeightState::default();
            for term in &split.terms {
                if let Some(weighted) = weigh(term, Stage::Full, &mut state, &self.config) {
                    set.push(weighted);
                }
            }
            let full_query = set.join();
            scratch.rebuild(&candidates)?;
            let final_hits = retry_on_syntax(&full_query, |q| scratch.search(q, precision))?;
            debug!(query = %full_query, hits = final_hits.len(), "full search");
            return Ok(final_hits);
        }

        Ok(candidates)
    }

    /// Anchorless path: a prioritized weighted query, then an unweighted
    /// simple query, then give up.
    fn fallback_search(
        &self,
        mut split: SplitQuery,
        precision: u32,
        scratch: &mut ScratchIndex,
    ) -> Result<Vec<LineRecord>, SearchError> {
        // Quoted tokens that did not win the anchor rules weigh like any
        // other term here, not as phrases.
        strip_leading(&mut split.terms, '"');
        strip_trailing(&mut split.terms, '"');

        let bound = match split.protected {
            Some(protected) => FALLBACK_POSITION_BOUND.min(protected.saturating_sub(1)),
            None => FALLBACK_POSITION_BOUND,
        };

        let mut set = TermSet::new();
        let mut state = WeightState::default();
        let mut consumed = 0;
        for (i, term) in split.terms.iter().enumerate() {
            if i > bound || set.len() >= FALLBACK_TERM_CAP {
                break;
            }
            consumed = i + 1;
            if let Some(weighted) = weigh(term, Stage::FallbackPrioritize, &mut state, &self.config)
            {
                set.push(weighted);
            }
        }

        if set.is_empty() {
            // Simple fallback: any plausible word or code, unweighted.
            for (i, term) in split.terms.iter().enumerate() {
                if i > bound || set.len() >= SIMPLE_TERM_CAP {
                    break;
                }
                consumed = consumed.max(i + 1);
                if (is_all_alphabetic(term) && char_len(term) > 2)
                    || (is_all_alphanumeric(term) && char_len(term) > 4)
                {
                    set.push(QueryTerm::raw(term));
                }
            }
        }

        if set.is_empty() {
            debug!("query is unsearchable");
            return Ok(Vec::new());
        }

        let fallback_query = set.join();
        let hits = self.search_durable(&fallback_query, precision)?;
        debug!(query = %fallback_query, hits = hits.len(), "fallback search");
        if hits.is_empty() {
            return Ok(hits);
        }

        let filtered = exclude_bad_results(
            hits.clone(),
            &fallback_query,
            precision,
            scratch,
            &self.config,
        )?;
        let mut candidates = if filtered.is_empty() { hits } else { filtered };

        if candidates.len() > 1 && split.terms.len() > consumed {
            strip_leading(&mut split.terms, '(');
            strip_trailing(&mut split.terms, ')');

            let mut set = TermSet::new();
            let mut state = WeightState::default();
            for term in &split.terms {
                if let Some(weighted) =
                    weigh(term, Stage::FallbackFinal, &mut state, &self.config)
                {
                    set.push(weighted);
                }
            }
            let final_query = set.join();
            scratch.rebuild(&candidates)?;
            candidates = retry_on_syntax(&final_query, |q| scratch.search(q, precision))?;
            debug!(query = %final_query, hits = candidates.len(), "fallback full search");
        }

        Ok(candidates)
    }
}
