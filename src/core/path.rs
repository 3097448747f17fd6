use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value as Json;
use serde_json_path::JsonPath;

/// Error raised by a structured-query engine.
///
/// Query errors never cross the evaluation boundary: a bad path expression
/// must not abort evaluation of its sibling alternatives, so callers absorb
/// this error into a "no match" result (see [PathEvaluator::evaluate]).
#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    /// The path expression could not be parsed.
    #[error("invalid path expression `{expression}`: {reason}")]
    InvalidExpression { expression: String, reason: String },
}

/// Generic structured-query engine.
///
/// A trait is used here so the engine behind path resolution (regex-based,
/// recursive-descent, or a full JSONPath library) is swappable without
/// touching the matching logic.
pub trait PathQuery: Send + Sync {
    /// Apply `expression` to `document`, returning every located value in
    /// query order.
    fn query(&self, document: &Json, expression: &str) -> Result<Vec<Json>, QueryError>;
}

/// The default query engine, backed by `serde_json_path` (RFC 9535 JSONPath
/// semantics: wildcards, filters, recursive descent).
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonPathQuery;

impl PathQuery for JsonPathQuery {
    fn query(&self, document: &Json, expression: &str) -> Result<Vec<Json>, QueryError> {
        let path = JsonPath::parse(expression).map_err(|e| QueryError::InvalidExpression {
            expression: expression.to_string(),
            reason: e.to_string(),
        })?;

        Ok(path.query(document).all().into_iter().cloned().collect())
    }
}

/// The outcome of applying one path expression to one candidate document.
///
/// One of these is produced per path attempt and retained for audit even on
/// failure. A `matched: false` evaluation with a value present means the
/// path resolved but the resolved value was rejected by the field's filter.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct PathEvaluation {
    path: String,
    #[serde(rename = "match")]
    matched: bool,
    value: Option<Json>,
}

impl PathEvaluation {
    /// A path that resolved to a satisfying value.
    pub fn matched(path: impl Into<String>, value: Json) -> Self {
        Self {
            path: path.into(),
            matched: true,
            value: Some(value),
        }
    }

    /// A path that resolved to nothing (or whose query failed).
    pub fn unmatched(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            matched: false,
            value: None,
        }
    }

    /// Demote this evaluation to a non-match, keeping the resolved value for
    /// the audit trail.
    pub fn reject(self) -> Self {
        Self {
            matched: false,
            ..self
        }
    }

    /// Return the path expression that was evaluated.
    pub fn path(&self) -> &str {
        self.path.as_str()
    }

    /// Return whether the path resolved to a satisfying value.
    pub fn is_match(&self) -> bool {
        self.matched
    }

    /// Return the resolved value, if the path resolved at all.
    pub fn value(&self) -> Option<&Json> {
        self.value.as_ref()
    }
}

/// Evaluates a single path expression against a candidate document,
/// returning the first matched value or "no match".
///
/// A malformed path expression or a query engine failure is logged and
/// treated as "no match"; it never propagates upward.
#[derive(Clone)]
pub struct PathEvaluator {
    query: Arc<dyn PathQuery>,
}

impl Default for PathEvaluator {
    fn default() -> Self {
        Self::new(Arc::new(JsonPathQuery))
    }
}

impl PathEvaluator {
    /// Create a new path evaluator over the given query engine.
    pub fn new(query: Arc<dyn PathQuery>) -> Self {
        Self { query }
    }

    /// Apply `expression` to `document` and record the outcome.
    pub fn evaluate(&self, document: &Json, expression: &str) -> PathEvaluation {
        match self.query.query(document, expression) {
            Ok(values) => match values.into_iter().next() {
                Some(value) => PathEvaluation::matched(expression, value),
                None => PathEvaluation::unmatched(expression),
            },
            Err(error) => {
                tracing::debug!(%expression, %error, "path query failed, treating as no match");
                PathEvaluation::unmatched(expression)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn first_result_wins() {
        let document = json!({ "a": [1, 2, 3] });
        let evaluation = PathEvaluator::default().evaluate(&document, "$.a[*]");
        assert!(evaluation.is_match());
        assert_eq!(evaluation.value(), Some(&json!(1)));
    }

    #[test]
    fn missing_value_is_no_match() {
        let document = json!({ "a": 1 });
        let evaluation = PathEvaluator::default().evaluate(&document, "$.b");
        assert!(!evaluation.is_match());
        assert_eq!(evaluation.value(), None);
    }

    #[test]
    fn malformed_expression_is_absorbed_as_no_match() {
        let document = json!({ "a": 1 });
        let evaluation = PathEvaluator::default().evaluate(&document, "not a path");
        assert!(!evaluation.is_match());
        assert_eq!(evaluation.path(), "not a path");
    }

    #[test]
    fn rejecting_keeps_the_resolved_value() {
        let evaluation = PathEvaluation::matched("$.age", json!(15)).reject();
        assert!(!evaluation.is_match());
        assert_eq!(evaluation.value(), Some(&json!(15)));
    }

    #[test]
    fn serializes_with_a_match_flag() {
        let evaluation = PathEvaluation::matched("$.age", json!(25));
        assert_eq!(
            serde_json::to_value(&evaluation).unwrap(),
            json!({ "path": "$.age", "match": true, "value": 25 })
        );
    }
}
