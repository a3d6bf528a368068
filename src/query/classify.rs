//! Term classification and anchor selection
//!
//! Shape predicates over normalized tokens (no morphological analysis, just
//! fixed suffix and character-class tables) and the precedence rules that
//! pick the anchor term driving the coarse first-pass search.

use crate::config::SearchConfig;

/// Size of the leading window scanned by the quoted-token rule and the
/// fallback rules.
const ANCHOR_WINDOW: usize = 3;

/// Token length in characters.
pub fn char_len(term: &str) -> usize {
    term.chars().count()
}

/// True when the token ends in one of the configured adjective suffixes.
pub fn ends_with_adjective_suffix(term: &str, config: &SearchConfig) -> bool {
    config
        .adjective_suffixes
        .iter()
        .any(|suffix| term.ends_with(suffix.as_str()))
}

/// Noun-like shape: uppercase non-digit first character, lowercase non-digit
/// last character, and no adjective suffix.
pub fn is_proper_noun_like(term: &str, config: &SearchConfig) -> bool {
    let mut chars = term.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    let last = chars.next_back().unwrap_or(first);
    first.is_uppercase()
        && !first.is_numeric()
        && last.is_lowercase()
        && !last.is_numeric()
        && !ends_with_adjective_suffix(term, config)
}

/// A long numeric article code: more than 4 characters, all digits.
pub fn is_digit_code(term: &str) -> bool {
    char_len(term) > 4 && !term.is_empty() && term.chars().all(|c| c.is_numeric())
}

/// All characters are uppercase letters.
pub fn is_all_uppercase(term: &str) -> bool {
    !term.is_empty() && term.chars().all(|c| c.is_uppercase())
}

/// All characters are letters.
pub fn is_all_alphabetic(term: &str) -> bool {
    !term.is_empty() && term.chars().all(|c| c.is_alphabetic())
}

/// All characters are letters or digits.
pub fn is_all_alphanumeric(term: &str) -> bool {
    !term.is_empty() && term.chars().all(|c| c.is_alphanumeric())
}

/// Token wrapped (or half-wrapped) in parentheses.
pub fn is_paren_wrapped(term: &str) -> bool {
    term.starts_with('(') || term.ends_with(')')
}

/// Selects the anchor term for the first-pass search.
///
/// Precedence: quoted token inside the leading window (unwrapped), then a
/// proper-noun-like token at any position, then a digit code at any
/// position, then the windowed fallbacks (all-letter token longer than 2
/// chars without an adjective suffix, else all-uppercase token longer than
/// 1 char). Returns `None` when nothing qualifies; the orchestrator then
/// switches to the fallback strategy.
pub fn select_anchor(terms: &[String], config: &SearchConfig) -> Option<String> {
    let window = terms.len().min(ANCHOR_WINDOW);

    for term in &terms[..window] {
        if char_len(term) >= 2 && term.starts_with('"') && term.ends_with('"') {
            let unwrapped = term.trim_matches('"');
            if !unwrapped.is_empty() {
                return Some(unwrapped.to_string());
            }
        }
    }

    for term in terms {
        if is_proper_noun_like(term, config) {
            return Some(term.clone());
        }
    }

    for term in terms {
        if is_digit_code(term) {
            return Some(term.clone());
        }
    }

    for term in &terms[..window] {
        if is_all_alphabetic(term)
            && char_len(term) > 2
            && !ends_with_adjective_suffix(term, config)
        {
            return Some(term.clone());
        }
    }

    for term in &terms[..window] {
        if is_all_uppercase(term) && char_len(term) > 1 {
            return Some(term.clone());
        }
    }

    None
}
