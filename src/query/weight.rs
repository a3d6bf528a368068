//! Weight assignment
//!
//! Maps a classified token to a boost expression for the current search
//! stage. The same token may be weighted differently at different stages,
//! so the tables are applied per stage rather than once per query.
//!
//! The length thresholds deliberately differ between tables (the uppercase
//! rule gates on 2, 3 or 4 depending on the stage); unifying them would
//! change observable ranking, so each stage keeps its own gate.

use crate::config::SearchConfig;
use crate::query::classify::{
    char_len, ends_with_adjective_suffix, is_all_alphanumeric, is_all_uppercase,
    is_paren_wrapped, is_proper_noun_like,
};
use crate::query::term::QueryTerm;

/// Boost applied to adjective-suffixed tokens in refinement stages.
const ADJECTIVE_BOOST: f32 = 1.2;
/// Boost applied to all-uppercase code tokens in refinement stages.
const CODE_BOOST: f32 = 1.4;
/// Boost applied to the single main (proper-noun-like) term of a stage.
const MAIN_BOOST: f32 = 2.0;
/// Default boost of the full-stage catch-all rule.
const FULL_DEFAULT_BOOST: f32 = 1.1;
/// Maximum adjective-boosted terms per fallback or short query.
const ADJECTIVE_CAP: usize = 3;

/// Which rule table to apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Keyword narrowing over the anchor result set.
    Narrow,
    /// Final full-term pass over the narrowed candidates.
    Full,
    /// First fallback pass when no anchor exists.
    FallbackPrioritize,
    /// Full-term pass at the end of the fallback path.
    FallbackFinal,
    /// Single-pass short search.
    Short,
}

/// Per-stage accumulator state.
///
/// `main_assigned` enforces the single 2.0-boost slot per stage;
/// `adjective_count` enforces the adjective cap in the capped tables.
#[derive(Debug, Default)]
pub struct WeightState {
    pub main_assigned: bool,
    pub adjective_count: usize,
}

/// Applies the stage's rule table to one token.
///
/// Returns `None` when the stage's table drops the token. Total over any
/// string input: unmatched shapes either fall through to the catch-all rule
/// or are skipped, never rejected with an error.
pub fn weigh(
    term: &str,
    stage: Stage,
    state: &mut WeightState,
    config: &SearchConfig,
) -> Option<QueryTerm> {
    match stage {
        Stage::Narrow => weigh_narrow(term, state, config),
        Stage::Full => weigh_full(term, state, config),
        Stage::FallbackPrioritize => weigh_fallback_prioritize(term, state, config),
        Stage::FallbackFinal => weigh_fallback_final(term, config),
        Stage::Short => weigh_short(term, state, config),
    }
}

fn weigh_narrow(
    term: &str,
    state: &mut WeightState,
    config: &SearchConfig,
) -> Option<QueryTerm> {
    if ends_with_adjective_suffix(term, config) {
        Some(QueryTerm::boosted(term, ADJECTIVE_BOOST))
    } else if is_all_uppercase(term) && is_all_alphanumeric(term) && char_len(term) > 3 {
        Some(QueryTerm::boosted(term, CODE_BOOST))
    } else if is_proper_noun_like(term, config) && !state.main_assigned {
        state.main_assigned = true;
        Some(QueryTerm::boosted(term, MAIN_BOOST))
    } else if char_len(term) > 3 && !is_paren_wrapped(term) {
        Some(QueryTerm::fuzzy(term))
    } else {
        Some(QueryTerm::raw(term))
    }
}

fn weigh_full(
    term: &str,
    state: &mut WeightState,
    config: &SearchConfig,
) -> Option<QueryTerm> {
    if ends_with_adjective_suffix(term, config) {
        Some(QueryTerm::boosted(term, ADJECTIVE_BOOST))
    } else if is_proper_noun_like(term, config) && !state.main_assigned {
        state.main_assigned = true;
        Some(QueryTerm::boosted(term, MAIN_BOOST))
    } else if char_len(term) > 3 {
        Some(QueryTerm::boosted(term, FULL_DEFAULT_BOOST))
    } else {
        Some(QueryTerm::raw(term))
    }
}

fn weigh_fallback_prioritize(
    term: &str,
    state: &mut WeightState,
    config: &SearchConfig,
) -> Option<QueryTerm> {
    if ends_with_adjective_suffix(term, config) && state.adjective_count < ADJECTIVE_CAP {
        state.adjective_count += 1;
        Some(QueryTerm::boosted(term, ADJECTIVE_BOOST))
    } else if char_len(term) > 2 && is_all_uppercase(term) {
        Some(QueryTerm::boosted(term, CODE_BOOST))
    } else if char_len(term) > 3 && !is_paren_wrapped(term) {
        Some(QueryTerm::fuzzy(term))
    } else {
        None
    }
}

fn weigh_fallback_final(term: &str, config: &SearchConfig) -> Option<QueryTerm> {
    if ends_with_adjective_suffix(term, config) {
        Some(QueryTerm::boosted(term, ADJECTIVE_BOOST))
    } else if char_len(term) > 3 && is_all_uppercase(term) {
        Some(QueryTerm::boosted(term, CODE_BOOST))
    } else if char_len(term) > 4 {
        Some(QueryTerm::fuzzy(term))
    } else {
        Some(QueryTerm::raw(term))
    }
}

fn weigh_short(
    term: &str,
    state: &mut WeightState,
    config: &SearchConfig,
) -> Option<QueryTerm> {
    if ends_with_adjective_suffix(term, config) && state.adjective_count < ADJECTIVE_CAP {
        state.adjective_count += 1;
        Some(QueryTerm::boosted(term, 0.8))
    } else if char_len(term) > 3 && is_all_uppercase(term) {
        Some(QueryTerm::boosted(term, 1.2))
    } else if char_len(term) > 3 {
        Some(QueryTerm::fuzzy(term))
    } else {
        None
    }
}
