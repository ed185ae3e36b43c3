//! Query expression algebra
//!
//! A `QueryExpression` is a composable predicate tree evaluated against a
//! stored [`Message`]. Evaluation is purely structural: it never mutates the
//! message or any external state, and a fixed message always yields the same
//! result. `And`/`Or` short-circuit left to right.
//!
//! The `Vector` variant is a placeholder for future nearest-neighbor
//! filtering and currently matches every message. Keep that semantic; the
//! real backend is not specified yet.

use std::hash::{Hash, Hasher};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::message::Message;

/// Composable predicate over stored messages.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum QueryExpression {
    /// Matches every message.
    AlwaysTrue,
    /// String equality on a named field.
    FieldEquals { field: String, value: String },
    /// Case-preserving substring containment on a string-like field.
    Contains { field: String, value: String },
    /// Strictly-greater comparison on an instant field.
    After {
        field: String,
        instant: DateTime<Utc>,
    },
    /// Strictly-less comparison on an instant field.
    Before {
        field: String,
        instant: DateTime<Utc>,
    },
    /// Equality on a metadata entry; an absent key never matches.
    Metadata { key: String, value: Value },
    /// Nearest-neighbor placeholder; always matches.
    Vector { embedding: Vec<f32>, k: usize },
    And(Vec<QueryExpression>),
    Or(Vec<QueryExpression>),
    Not(Box<QueryExpression>),
}

impl QueryExpression {
    pub fn field_equals(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::FieldEquals {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn contains(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Contains {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn after(field: impl Into<String>, instant: DateTime<Utc>) -> Self {
        Self::After {
            field: field.into(),
            instant,
        }
    }

    pub fn before(field: impl Into<String>, instant: DateTime<Utc>) -> Self {
        Self::Before {
            field: field.into(),
            instant,
        }
    }

    pub fn metadata(key: impl Into<String>, value: Value) -> Self {
        Self::Metadata {
            key: key.into(),
            value,
        }
    }

    pub fn vector(embedding: Vec<f32>, k: usize) -> Self {
        Self::Vector { embedding, k }
    }

    pub fn and(children: Vec<QueryExpression>) -> Self {
        Self::And(children)
    }

    pub fn or(children: Vec<QueryExpression>) -> Self {
        Self::Or(children)
    }

    #[allow(clippy::should_implement_trait)]
    pub fn not(inner: QueryExpression) -> Self {
        Self::Not(Box::new(inner))
    }

    /// Evaluate this expression against one message.
    pub fn evaluate(&self, message: &Message) -> bool {
        match self {
            QueryExpression::AlwaysTrue => true,
            QueryExpression::FieldEquals { field, value } => {
                message.string_field(field) == Some(value.as_str())
            }
            QueryExpression::Contains { field, value } => message
                .string_field(field)
                .is_some_and(|text| text.contains(value.as_str())),
            QueryExpression::After { field, instant } => message
                .instant_field(field)
                .is_some_and(|ts| ts > *instant),
            QueryExpression::Before { field, instant } => message
                .instant_field(field)
                .is_some_and(|ts| ts < *instant),
            QueryExpression::Metadata { key, value } => {
                message.metadata.get(key) == Some(value)
            }
            // Placeholder semantics: every candidate passes until a real
            // nearest-neighbor backend exists.
            QueryExpression::Vector { .. } => true,
            QueryExpression::And(children) => children.iter().all(|c| c.evaluate(message)),
            QueryExpression::Or(children) => children.iter().any(|c| c.evaluate(message)),
            QueryExpression::Not(inner) => !inner.evaluate(message),
        }
    }
}

// Structural equality is derived; Eq and Hash need manual impls because the
// Vector variant carries f32 embeddings. Hashing uses the float bit pattern,
// which matches the derived PartialEq for any non-NaN embedding.
impl Eq for QueryExpression {}

impl Hash for QueryExpression {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            QueryExpression::AlwaysTrue => {}
            QueryExpression::FieldEquals { field, value }
            | QueryExpression::Contains { field, value } => {
                field.hash(state);
                value.hash(state);
            }
            QueryExpression::After { field, instant }
            | QueryExpression::Before { field, instant } => {
                field.hash(state);
                instant.hash(state);
            }
            QueryExpression::Metadata { key, value } => {
                key.hash(state);
                value.to_string().hash(state);
            }
            QueryExpression::Vector { embedding, k } => {
                for dim in embedding {
                    dim.to_bits().hash(state);
                }
                k.hash(state);
            }
            QueryExpression::And(children) | QueryExpression::Or(children) => {
                children.hash(state);
            }
            QueryExpression::Not(inner) => inner.hash(state),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::Role;
    use chrono::Duration;
    use serde_json::json;
    use std::collections::hash_map::DefaultHasher;

    fn sample() -> Message {
        Message::builder("conv-1")
            .id("m-1")
            .role(Role::User)
            .content("Hello world")
            .metadata("entityType", json!("testEntity"))
            .build()
    }

    fn hash_of(expr: &QueryExpression) -> u64 {
        let mut hasher = DefaultHasher::new();
        expr.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn test_field_equals() {
        let msg = sample();
        assert!(QueryExpression::field_equals("conversation_id", "conv-1").evaluate(&msg));
        assert!(QueryExpression::field_equals("role", "user").evaluate(&msg));
        assert!(!QueryExpression::field_equals("content", "Hello").evaluate(&msg));
        assert!(!QueryExpression::field_equals("unknown", "x").evaluate(&msg));
    }

    #[test]
    fn test_contains_is_case_preserving() {
        let msg = sample();
        assert!(QueryExpression::contains("content", "Hello").evaluate(&msg));
        assert!(!QueryExpression::contains("content", "hello").evaluate(&msg));
        // timestamp is not string-like
        assert!(!QueryExpression::contains("timestamp", "20").evaluate(&msg));
    }

    #[test]
    fn test_after_before_are_strict() {
        let msg = sample();
        let earlier = msg.timestamp - Duration::seconds(10);
        let later = msg.timestamp + Duration::seconds(10);

        assert!(QueryExpression::after("timestamp", earlier).evaluate(&msg));
        assert!(!QueryExpression::after("timestamp", msg.timestamp).evaluate(&msg));
        assert!(QueryExpression::before("timestamp", later).evaluate(&msg));
        assert!(!QueryExpression::before("timestamp", msg.timestamp).evaluate(&msg));
        // non-instant field never matches
        assert!(!QueryExpression::after("content", earlier).evaluate(&msg));
    }

    #[test]
    fn test_metadata_absent_key_is_false() {
        let msg = sample();
        assert!(QueryExpression::metadata("entityType", json!("testEntity")).evaluate(&msg));
        assert!(!QueryExpression::metadata("entityType", json!("other")).evaluate(&msg));
        assert!(!QueryExpression::metadata("missing", json!("testEntity")).evaluate(&msg));
    }

    #[test]
    fn test_vector_placeholder_always_matches() {
        let msg = sample();
        assert!(QueryExpression::vector(vec![0.1, 0.2], 5).evaluate(&msg));
    }

    #[test]
    fn test_boolean_composition() {
        let msg = sample();
        let yes = QueryExpression::contains("content", "Hello");
        let no = QueryExpression::contains("content", "Goodbye");

        assert!(QueryExpression::and(vec![yes.clone(), QueryExpression::AlwaysTrue]).evaluate(&msg));
        assert!(!QueryExpression::and(vec![yes.clone(), no.clone()]).evaluate(&msg));
        assert!(QueryExpression::or(vec![no.clone(), yes.clone()]).evaluate(&msg));
        assert!(!QueryExpression::or(vec![no.clone(), no.clone()]).evaluate(&msg));
        assert!(QueryExpression::not(no).evaluate(&msg));
        assert!(!QueryExpression::not(yes).evaluate(&msg));
        // empty conjunction is vacuously true, empty disjunction is false
        assert!(QueryExpression::and(vec![]).evaluate(&msg));
        assert!(!QueryExpression::or(vec![]).evaluate(&msg));
    }

    #[test]
    fn test_structural_equality_and_hash() {
        let a = QueryExpression::and(vec![
            QueryExpression::field_equals("a", "1"),
            QueryExpression::field_equals("b", "2"),
        ]);
        let b = QueryExpression::and(vec![
            QueryExpression::field_equals("a", "1"),
            QueryExpression::field_equals("b", "2"),
        ]);
        assert_eq!(a, b);
        assert_eq!(hash_of(&a), hash_of(&b));

        // order matters structurally
        let c = QueryExpression::and(vec![
            QueryExpression::field_equals("b", "2"),
            QueryExpression::field_equals("a", "1"),
        ]);
        assert_ne!(a, c);
    }

    #[test]
    fn test_vector_equality_over_bits() {
        let a = QueryExpression::vector(vec![0.5, 1.5], 3);
        let b = QueryExpression::vector(vec![0.5, 1.5], 3);
        let c = QueryExpression::vector(vec![0.5, 1.5], 4);
        assert_eq!(a, b);
        assert_eq!(hash_of(&a), hash_of(&b));
        assert_ne!(a, c);
    }
}
