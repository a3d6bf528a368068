//! Staged search: orchestrator and result filter
//!
//! The orchestrator drives the multi-stage refinement over the durable
//! index; the filter re-validates candidate sets through a scratch index.

pub mod filter;
pub mod stages;

pub use stages::LineSearcher;

use tracing::debug;

use crate::error::SearchError;
use crate::query::term::escape;
use crate::record::LineRecord;

/// Runs `attempt` with `query`; on a syntax rejection, literalizes the
/// query and retries exactly once. A second rejection propagates, since it
/// indicates a query-construction bug rather than bad user input.
pub(crate) fn retry_on_syntax<F>(query: &str, mut attempt: F) -> Result<Vec<LineRecord>, SearchError>
where
    F: FnMut(&str) -> Result<Vec<LineRecord>, SearchError>,
{
    match attempt(query) {
        Err(SearchError::QuerySyntax(reason)) => {
            let literal = escape(query);
            debug!(%query, %literal, %reason, "query rejected, retrying literalized");
            attempt(&literal)
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retry_literalizes_exactly_once() {
        let mut queries_seen = Vec::new();
        let result = retry_on_syntax("кабель^~", |q| {
            queries_seen.push(q.to_string());
            Err(SearchError::QuerySyntax("bad".to_string()))
        });
        assert!(matches!(result, Err(SearchError::QuerySyntax(_))));
        assert_eq!(queries_seen, vec!["кабель^~", "кабель"]);
    }

    #[test]
    fn success_passes_through_untouched() {
        let result = retry_on_syntax("кабель~", |_| Ok(vec![LineRecord::new(1, "кабель")]));
        assert_eq!(result.unwrap().len(), 1);
    }
}
