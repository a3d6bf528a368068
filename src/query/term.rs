//! Typed query terms
//!
//! Classification never manipulates query-syntax strings directly: it emits
//! [`QueryTerm`] values, and a single formatter serializes them to the index
//! engine's textual syntax (`term`, `term~`, `term^1.4~`, `"a phrase"`).

use std::collections::HashSet;

/// One term of a constructed query, before serialization.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryTerm {
    /// Raw term text, without any syntax markers.
    pub text: String,
    /// Numeric boost weight, if any.
    pub boost: Option<f32>,
    /// Whether approximate (edit-distance) matching is requested.
    pub fuzzy: bool,
    /// Whether the term is an exact phrase.
    pub phrase: bool,
}

impl QueryTerm {
    /// A bare term with no markers.
    pub fn raw(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            boost: None,
            fuzzy: false,
            phrase: false,
        }
    }

    /// A fuzzy term with no boost.
    pub fn fuzzy(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            boost: None,
            fuzzy: true,
            phrase: false,
        }
    }

    /// A fuzzy term with a numeric boost.
    pub fn boosted(text: impl Into<String>, boost: f32) -> Self {
        Self {
            text: text.into(),
            boost: Some(boost),
            fuzzy: true,
            phrase: false,
        }
    }

    /// Serializes the term to the engine's query syntax.
    pub fn to_syntax(&self) -> String {
        let mut out = if self.phrase {
            format!("\"{}\"", self.text)
        } else {
            self.text.clone()
        };
        if let Some(boost) = self.boost {
            out.push('^');
            out.push_str(&boost.to_string());
        }
        if self.fuzzy {
            out.push('~');
        }
        out
    }
}

/// Ordered set of query terms.
///
/// Duplicate serialized forms collapse; insertion order of first occurrence
/// is preserved when the final query string is joined.
#[derive(Debug, Default)]
pub struct TermSet {
    terms: Vec<QueryTerm>,
    seen: HashSet<String>,
}

impl TermSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a term unless an identical serialized form is already present.
    pub fn push(&mut self, term: QueryTerm) {
        if self.seen.insert(term.to_syntax()) {
            self.terms.push(term);
        }
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Space-joined query string in first-occurrence order.
    pub fn join(&self) -> String {
        self.terms
            .iter()
            .map(QueryTerm::to_syntax)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Literalizes a query string that the engine rejected: syntax-significant
/// characters become spaces and whitespace runs collapse, so the retry is
/// interpreted as plain terms.
pub fn escape(query: &str) -> String {
    let replaced: String = query
        .chars()
        .map(|c| match c {
            '~' | '^' | '"' | '(' | ')' => ' ',
            other => other,
        })
        .collect();
    replaced.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_every_shape() {
        assert_eq!(QueryTerm::raw("гост").to_syntax(), "гост");
        assert_eq!(QueryTerm::fuzzy("кабель").to_syntax(), "кабель~");
        assert_eq!(QueryTerm::boosted("ВВГ", 1.4).to_syntax(), "ВВГ^1.4~");
        assert_eq!(QueryTerm::boosted("Кабель", 2.0).to_syntax(), "Кабель^2~");

        let phrase = QueryTerm {
            text: "медный кабель".to_string(),
            boost: None,
            fuzzy: false,
            phrase: true,
        };
        assert_eq!(phrase.to_syntax(), "\"медный кабель\"");
    }

    #[test]
    fn set_collapses_duplicate_forms() {
        let mut set = TermSet::new();
        set.push(QueryTerm::fuzzy("кабель"));
        set.push(QueryTerm::boosted("гост", 1.2));
        set.push(QueryTerm::fuzzy("кабель"));
        assert_eq!(set.len(), 2);
        assert_eq!(set.join(), "кабель~ гост^1.2~");
    }

    #[test]
    fn escape_strips_syntax_characters() {
        assert_eq!(escape("кабель^2~ (ГОСТ)"), "кабель 2 ГОСТ");
        assert_eq!(escape("\"профиль\""), "профиль");
    }
}
