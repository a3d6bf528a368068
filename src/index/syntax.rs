//! Textual query syntax for the index engine
//!
//! The engine accepts a small query language: space-separated terms with an
//! optional numeric boost suffix (`term^1.4`), an optional fuzzy marker
//! (`term~`, after the boost), phrase quoting (`"a b"`) and tolerated
//! parenthesized grouping. Malformed input yields
//! [`SearchError::QuerySyntax`] so the caller can literalize and retry.

use tantivy::query::{
    BooleanQuery, BoostQuery, FuzzyTermQuery, Occur, PhraseQuery, Query, TermQuery,
};
use tantivy::schema::{Field, IndexRecordOption};
use tantivy::tokenizer::TextAnalyzer;
use tantivy::{Index, Term};

use crate::error::SearchError;

/// Fuzzy similarity threshold derived from a 0-100 precision input.
///
/// 0 or anything above 100 falls back to the 0.8 default; exactly 100 asks
/// for near-exact matching.
pub fn fuzzy_similarity(precision: u32) -> f32 {
    match precision {
        100 => 0.99,
        1..=99 => precision as f32 / 100.0,
        _ => 0.8,
    }
}

/// Levenshtein budget for one token under the given similarity threshold.
///
/// Longer tokens may drift further under the same threshold. Capped at 2,
/// the largest automaton tantivy builds.
pub fn fuzzy_distance(similarity: f32, token_chars: usize) -> u8 {
    let edits = ((1.0 - similarity) * token_chars as f32).floor();
    edits.clamp(0.0, 2.0) as u8
}

/// One parsed clause of the query string.
#[derive(Debug, PartialEq)]
struct RawClause {
    text: String,
    boost: Option<f32>,
    fuzzy: bool,
    phrase: bool,
}

/// Builds a tantivy query from the engine's textual syntax.
///
/// Returns `Ok(None)` when no clause survives analysis (for example a query
/// made only of stop words), which the engine treats as an empty result.
pub(crate) fn build_query(
    index: &Index,
    field: Field,
    tokenizer_name: &str,
    query: &str,
    similarity: f32,
) -> Result<Option<Box<dyn Query>>, SearchError> {
    let clauses = parse_clauses(query)?;

    let mut analyzer = index.tokenizers().get(tokenizer_name).ok_or_else(|| {
        SearchError::Index(tantivy::TantivyError::SchemaError(format!(
            "tokenizer {tokenizer_name} is not registered"
        )))
    })?;

    let mut subqueries: Vec<(Occur, Box<dyn Query>)> = Vec::new();
    for clause in clauses {
        let tokens = analyze(&mut analyzer, &clause.text);
        if tokens.is_empty() {
            continue;
        }

        let base: Box<dyn Query> = if tokens.len() > 1 {
            // Multi-token text (explicit phrase, or a term the analyzer
            // splits) matches as a positional phrase.
            let terms = tokens
                .iter()
                .map(|t| Term::from_field_text(field, t))
                .collect::<Vec<_>>();
            Box::new(PhraseQuery::new(terms))
        } else {
            let token = &tokens[0];
            let distance = fuzzy_distance(similarity, token.chars().count());
            if clause.fuzzy && !clause.phrase && distance > 0 {
                Box::new(FuzzyTermQuery::new(
                    Term::from_field_text(field, token),
                    distance,
                    true,
                ))
            } else {
                Box::new(TermQuery::new(
                    Term::from_field_text(field, token),
                    IndexRecordOption::WithFreqsAndPositions,
                ))
            }
        };

        let query: Box<dyn Query> = match clause.boost {
            Some(boost) => Box::new(BoostQuery::new(base, boost)),
            None => base,
        };
        subqueries.push((Occur::Should, query));
    }

    if subqueries.is_empty() {
        return Ok(None);
    }
    if subqueries.len() == 1 {
        if let Some((_, only)) = subqueries.pop() {
            return Ok(Some(only));
        }
    }
    Ok(Some(Box::new(BooleanQuery::new(subqueries))))
}

fn analyze(analyzer: &mut TextAnalyzer, text: &str) -> Vec<String> {
    let mut stream = analyzer.token_stream(text);
    let mut tokens = Vec::new();
    while let Some(token) = stream.next() {
        tokens.push(token.text.clone());
    }
    tokens
}

fn parse_clauses(query: &str) -> Result<Vec<RawClause>, SearchError> {
    let mut clauses = Vec::new();
    let mut chars = query.chars().peekable();

    while let Some(&c) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
            continue;
        }

        if c == '"' {
            chars.next();
            let mut text = String::new();
            let mut closed = false;
            for ch in chars.by_ref() {
                if ch == '"' {
                    closed = true;
                    break;
                }
                text.push(ch);
            }
            if !closed {
                return Err(SearchError::QuerySyntax(
                    "unterminated phrase quote".to_string(),
                ));
            }

            let mut suffix = String::new();
            while let Some(&ch) = chars.peek() {
                if ch.is_whitespace() {
                    break;
                }
                suffix.push(ch);
                chars.next();
            }
            let (rest, boost, fuzzy) = split_suffixes(&suffix)?;
            if !rest.is_empty() {
                return Err(SearchError::QuerySyntax(format!(
                    "unexpected trailing characters '{rest}' after phrase"
                )));
            }
            if !text.trim().is_empty() {
                clauses.push(RawClause {
                    text: text.trim().to_string(),
                    boost,
                    fuzzy,
                    phrase: true,
                });
            }
        } else {
            let mut token = String::new();
            while let Some(&ch) = chars.peek() {
                if ch.is_whitespace() {
                    break;
                }
                token.push(ch);
                chars.next();
            }
            // Grouping parentheses are tolerated, not interpreted.
            let token = token.trim_matches(|c| c == '(' || c == ')');
            if token.contains('"') {
                return Err(SearchError::QuerySyntax(format!(
                    "stray quote in term '{token}'"
                )));
            }
            let (text, boost, fuzzy) = split_suffixes(token)?;
            if !text.is_empty() {
                clauses.push(RawClause {
                    text,
                    boost,
                    fuzzy,
                    phrase: false,
                });
            }
        }
    }

    Ok(clauses)
}

/// Splits `term^boost~` into its parts. The fuzzy marker must be last.
fn split_suffixes(token: &str) -> Result<(String, Option<f32>, bool), SearchError> {
    let mut rest = token;

    let fuzzy = rest.ends_with('~');
    if fuzzy {
        rest = &rest[..rest.len() - 1];
    }

    let boost = match rest.rfind('^') {
        Some(pos) => {
            let value = &rest[pos + 1..];
            let parsed: f32 = value.parse().map_err(|_| {
                SearchError::QuerySyntax(format!("invalid boost value '{value}'"))
            })?;
            rest = &rest[..pos];
            Some(parsed)
        }
        None => None,
    };

    if rest.contains('~') || rest.contains('^') {
        return Err(SearchError::QuerySyntax(format!(
            "misplaced operator in '{token}'"
        )));
    }

    Ok((rest.to_string(), boost, fuzzy))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn precision_maps_to_similarity() {
        assert_eq!(fuzzy_similarity(0), 0.8);
        assert_eq!(fuzzy_similarity(101), 0.8);
        assert_eq!(fuzzy_similarity(100), 0.99);
        assert!((fuzzy_similarity(85) - 0.85).abs() < 1e-6);
    }

    #[test]
    fn distance_grows_with_token_length() {
        assert_eq!(fuzzy_distance(0.99, 6), 0);
        assert_eq!(fuzzy_distance(0.8, 4), 0);
        assert_eq!(fuzzy_distance(0.8, 6), 1);
        // Long tokens are capped at tantivy's automaton limit.
        assert_eq!(fuzzy_distance(0.5, 20), 2);
    }

    #[test]
    fn parses_boost_and_fuzzy_suffixes() {
        let clauses = parse_clauses("Кабель^2~ 100м~ гост").unwrap();
        assert_eq!(clauses.len(), 3);
        assert_eq!(clauses[0].text, "Кабель");
        assert_eq!(clauses[0].boost, Some(2.0));
        assert!(clauses[0].fuzzy);
        assert_eq!(clauses[1].text, "100м");
        assert_eq!(clauses[1].boost, None);
        assert!(clauses[1].fuzzy);
        assert!(!clauses[2].fuzzy);
    }

    #[test]
    fn parses_phrases_and_tolerates_parens() {
        let clauses = parse_clauses("\"медный кабель\"^1.5 (ГОСТ)").unwrap();
        assert_eq!(clauses[0].text, "медный кабель");
        assert!(clauses[0].phrase);
        assert_eq!(clauses[0].boost, Some(1.5));
        assert_eq!(clauses[1].text, "ГОСТ");
    }

    #[test]
    fn malformed_input_is_a_syntax_error() {
        assert!(matches!(
            parse_clauses("кабель^~"),
            Err(SearchError::QuerySyntax(_))
        ));
        assert!(matches!(
            parse_clauses("\"незакрытая фраза"),
            Err(SearchError::QuerySyntax(_))
        ));
        assert!(matches!(
            parse_clauses("ка~бель"),
            Err(SearchError::QuerySyntax(_))
        ));
    }

    #[test]
    fn orphan_suffixes_are_dropped_not_fatal() {
        let clauses = parse_clauses("^1.2~ кабель").unwrap();
        assert_eq!(clauses.len(), 1);
        assert_eq!(clauses[0].text, "кабель");
    }
}
