//! Memory query values

use serde::{Deserialize, Serialize};

use crate::expression::QueryExpression;

/// A filter plus a result bound, built per request and never persisted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MemoryQuery {
    pub expression: QueryExpression,
    /// Maximum number of candidates to return; `0` means unbounded at the
    /// store contract level (callers are expected to pass a positive bound).
    pub limit: usize,
}

impl MemoryQuery {
    /// Create a new query with the given expression and limit.
    pub fn new(expression: QueryExpression, limit: usize) -> Self {
        Self { expression, limit }
    }

    /// Query that matches everything up to `limit` candidates.
    pub fn all(limit: usize) -> Self {
        Self::new(QueryExpression::AlwaysTrue, limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_construction() {
        let query = MemoryQuery::new(QueryExpression::field_equals("conversation_id", "c"), 5);
        assert_eq!(query.limit, 5);

        let all = MemoryQuery::all(10);
        assert_eq!(all.expression, QueryExpression::AlwaysTrue);
    }
}
