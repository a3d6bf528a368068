//! Search configuration: the fixed language tables that drive term
//! classification and weighting, plus engine limits.
//!
//! The defaults are tuned to Russian product-catalog lines. All tables are
//! plain data so callers can swap them for another corpus without touching
//! the classification code.

use std::collections::HashSet;

/// Default cap on hits returned by a single engine search.
pub const DEFAULT_MAX_RESULTS: usize = 1000;

/// Configuration shared by the normalizer, classifier, weight tables and
/// the index engine's analyzer.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Words removed by the index analyzer on both the index and query side.
    /// Mostly prepositions; they carry no ranking signal.
    pub stop_words: Vec<String>,
    /// Terms the normalizer prunes from a query (units of measure, legal
    /// entity forms, filler attributes). Compared case-insensitively, and
    /// only at token positions at or after the caller's `skip_count`.
    pub excluded_terms: HashSet<String>,
    /// Adjective endings. A token ending in any of these is classified as
    /// adjective-like and never selected as an anchor.
    pub adjective_suffixes: Vec<String>,
    /// Clause-separating punctuation: used to split a long query into a
    /// protected head and a tail, and by the result filter's truncation rule.
    pub clause_punctuation: Vec<char>,
    /// Cap on hits per engine search.
    pub max_results: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        let stop_words = [
            "в", "без", "до", "из", "к", "на", "не", "по", "о", "от", "перед",
            "при", "через", "с", "у", "за", "над", "об", "под", "про", "для",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();

        let excluded_terms = [
            "шт", "упак", "арт", "штука", "упаковок", "штук", "рул", "кг",
            "см", "м2", "т", "литров", "диаметр", "упаковка", "рулон", "литр",
            "зао", "ооо", "оао", "производитель", "страна", "китай", "россия",
            "казахстан", "неизвестен", "%", "№",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();

        let adjective_suffixes = [
            "ее", "ые", "ое", "ей", "ий", "ый", "ой", "ем", "им", "ым", "ом",
            "их", "ых", "ую", "юю", "ая", "яя", "ою", "ею", "ими", "ыми",
            "его", "ого", "ему", "ому",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();

        Self {
            stop_words,
            excluded_terms,
            adjective_suffixes,
            clause_punctuation: vec![',', '.', ':', '('],
            max_results: DEFAULT_MAX_RESULTS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_tables_are_populated() {
        let config = SearchConfig::default();
        assert!(config.stop_words.iter().any(|w| w == "для"));
        assert!(config.excluded_terms.contains("штук"));
        assert!(config.adjective_suffixes.iter().any(|s| s == "ый"));
        assert_eq!(config.clause_punctuation, vec![',', '.', ':', '(']);
    }
}
