//! Term normalizer
//!
//! Turns a raw, punctuation-naive query string into an ordered token
//! sequence: strips characters that are significant to the engine's query
//! syntax, collapses whitespace, trims trailing punctuation, drops
//! single-character noise and configured excluded terms, and splits
//! compound hyphenated words so each half can be classified on its own.

use unicode_normalization::UnicodeNormalization;

use crate::config::SearchConfig;

/// Minimum token length (in chars) for the compound-hyphen split.
const HYPHEN_MIN_LEN: usize = 10;
/// The hyphen must sit outside the first and last 4 characters.
const HYPHEN_EDGE: usize = 4;

/// Normalizes `raw` into an ordered token sequence.
///
/// Tokens at positions below `skip_count` are protected from excluded-term
/// pruning; callers pass a non-zero `skip_count` when the head of the query
/// has already been isolated and must survive intact.
pub fn normalize(raw: &str, skip_count: usize, config: &SearchConfig) -> Vec<String> {
    let raw: String = raw.nfkc().collect();

    // Query-syntax characters: `*` and `+` act as separators, the rest
    // vanish without creating a token boundary.
    let mut cleaned = String::with_capacity(raw.len());
    for ch in raw.trim().chars() {
        match ch {
            '*' | '+' => cleaned.push(' '),
            '?' | '!' | '&' | '^' | '~' => {}
            ':' | ';' | '{' | '}' | '[' | ']' | '|' | '\\' => {}
            other => cleaned.push(other),
        }
    }

    let mut terms: Vec<String> = cleaned
        .split_whitespace()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect();

    for term in &mut terms {
        strip_one_trailing(term, ',');
        strip_one_trailing(term, '.');
    }

    terms.retain(|t| {
        let mut chars = t.chars();
        match (chars.next(), chars.next()) {
            (None, _) => false,
            // Single-character tokens survive only if alphanumeric.
            (Some(c), None) => c.is_alphanumeric(),
            _ => true,
        }
    });

    for term in &mut terms {
        *term = split_compound_hyphen(term);
    }

    let mut position = 0usize;
    terms.retain(|t| {
        let keep =
            position < skip_count || !config.excluded_terms.contains(&t.to_lowercase());
        position += 1;
        keep
    });

    terms
}

/// Removes a single `ch` from the end of `term`, if present.
fn strip_one_trailing(term: &mut String, ch: char) {
    if term.ends_with(ch) {
        term.pop();
    }
}

/// Removes a single leading `ch` from every term.
pub fn strip_leading(terms: &mut [String], ch: char) {
    for term in terms.iter_mut() {
        if term.starts_with(ch) {
            term.remove(0);
        }
    }
}

/// Removes a single trailing `ch` from every term.
pub fn strip_trailing(terms: &mut [String], ch: char) {
    for term in terms.iter_mut() {
        strip_one_trailing(term, ch);
    }
}

/// Converts a compound hyphenated word into a space-separated pair.
///
/// Applies only when the first hyphen sits at an interior position (outside
/// the first and last 4 characters of a token at least 10 chars long) with
/// letters on both flanks. Hyphens failing the test are part of a code-like
/// token and stay put.
fn split_compound_hyphen(term: &str) -> String {
    let chars: Vec<char> = term.chars().collect();
    if let Some(idx) = chars.iter().position(|&c| c == '-') {
        if idx > HYPHEN_EDGE
            && chars.len() >= HYPHEN_MIN_LEN
            && idx < chars.len() - HYPHEN_EDGE
            && chars[idx - 2].is_alphabetic()
            && chars[idx + 2].is_alphabetic()
        {
            return chars
                .iter()
                .map(|&c| if c == '-' { ' ' } else { c })
                .collect();
        }
    }
    term.to_string()
}
