//! Query strategies
//!
//! A query strategy turns a process context into a `MemoryQuery` for the
//! subsystems it serves. Strategies declare which context shapes they
//! accept and which subsystems they support; the manager iterates its
//! registry in registration order and the first match wins. This replaces
//! the original reflective/annotation-driven dispatch with an explicit
//! table.
//!
//! Vector and episodic partitions deliberately have no strategy here: they
//! are unresolved placeholders, and an unserved subsystem must degrade to
//! an empty result rather than block the pipeline.

use serde_json::json;

use engram_traits::expression::QueryExpression;
use engram_traits::query::MemoryQuery;

use crate::context::ProcessContext;
use crate::memory::subsystem::MemorySubsystem;

/// Maps a process context to a subsystem-specific memory query.
pub trait QueryStrategy: Send + Sync {
    /// Stable strategy name for diagnostics.
    fn name(&self) -> &str;

    /// Whether this strategy knows how to serve the given context shape.
    fn accepts(&self, context: &ProcessContext) -> bool;

    /// Subsystems this strategy can build queries for.
    fn subsystems(&self) -> &[MemorySubsystem];

    /// Build the query, or decline with `None` (treated as an empty result).
    fn build_query(
        &self,
        context: &ProcessContext,
        subsystem: MemorySubsystem,
    ) -> Option<MemoryQuery>;
}

/// Conversation-history queries for agent-level contexts.
///
/// Long-term retrieval widens to globally scoped items so an agent sees
/// shared knowledge alongside its own conversation.
pub struct AgentQueryStrategy;

impl QueryStrategy for AgentQueryStrategy {
    fn name(&self) -> &str {
        "agent"
    }

    fn accepts(&self, context: &ProcessContext) -> bool {
        context.is_agent()
    }

    fn subsystems(&self) -> &[MemorySubsystem] {
        &[MemorySubsystem::ShortTerm, MemorySubsystem::LongTerm]
    }

    fn build_query(
        &self,
        context: &ProcessContext,
        subsystem: MemorySubsystem,
    ) -> Option<MemoryQuery> {
        let conversation =
            QueryExpression::field_equals("conversation_id", context.conversation_id());
        let limit = context.settings().query_limit;
        match subsystem {
            MemorySubsystem::ShortTerm => Some(MemoryQuery::new(conversation, limit)),
            MemorySubsystem::LongTerm => Some(MemoryQuery::new(
                QueryExpression::or(vec![
                    conversation,
                    QueryExpression::field_equals("scope", "global"),
                ]),
                limit,
            )),
            _ => None,
        }
    }
}

/// Conversation-history queries for step-level contexts.
///
/// Steps stay strictly inside their own conversation.
pub struct StepQueryStrategy;

impl QueryStrategy for StepQueryStrategy {
    fn name(&self) -> &str {
        "step"
    }

    fn accepts(&self, context: &ProcessContext) -> bool {
        context.is_step()
    }

    fn subsystems(&self) -> &[MemorySubsystem] {
        &[MemorySubsystem::ShortTerm, MemorySubsystem::LongTerm]
    }

    fn build_query(
        &self,
        context: &ProcessContext,
        subsystem: MemorySubsystem,
    ) -> Option<MemoryQuery> {
        match subsystem {
            MemorySubsystem::ShortTerm | MemorySubsystem::LongTerm => Some(MemoryQuery::new(
                QueryExpression::field_equals("conversation_id", context.conversation_id()),
                context.settings().query_limit,
            )),
            _ => None,
        }
    }
}

/// Entity-partition queries for either context shape.
///
/// Entity records are stamped with a `tenantId` metadata entry when stored;
/// retrieval filters on the context's tenant.
pub struct EntityQueryStrategy;

impl QueryStrategy for EntityQueryStrategy {
    fn name(&self) -> &str {
        "entity"
    }

    fn accepts(&self, _context: &ProcessContext) -> bool {
        true
    }

    fn subsystems(&self) -> &[MemorySubsystem] {
        &[MemorySubsystem::Entity]
    }

    fn build_query(
        &self,
        context: &ProcessContext,
        subsystem: MemorySubsystem,
    ) -> Option<MemoryQuery> {
        if subsystem != MemorySubsystem::Entity {
            return None;
        }
        Some(MemoryQuery::new(
            QueryExpression::metadata("tenantId", json!(context.tenant_id())),
            context.settings().query_limit,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RunSettings;
    use crate::context::{AgentContext, StepContext};

    fn agent_context() -> ProcessContext {
        AgentContext::new("conv-1", "tenant-1")
            .with_settings(RunSettings::default().with_query_limit(7))
            .into()
    }

    #[test]
    fn test_agent_strategy_accepts_only_agent_contexts() {
        let strategy = AgentQueryStrategy;
        assert!(strategy.accepts(&agent_context()));
        assert!(!strategy.accepts(&StepContext::new("c", "t", "s").into()));
    }

    #[test]
    fn test_agent_short_term_query() {
        let query = AgentQueryStrategy
            .build_query(&agent_context(), MemorySubsystem::ShortTerm)
            .unwrap();
        assert_eq!(
            query.expression,
            QueryExpression::field_equals("conversation_id", "conv-1")
        );
        assert_eq!(query.limit, 7);
    }

    #[test]
    fn test_agent_long_term_query_includes_global_scope() {
        let query = AgentQueryStrategy
            .build_query(&agent_context(), MemorySubsystem::LongTerm)
            .unwrap();
        assert_eq!(
            query.expression,
            QueryExpression::or(vec![
                QueryExpression::field_equals("conversation_id", "conv-1"),
                QueryExpression::field_equals("scope", "global"),
            ])
        );
    }

    #[test]
    fn test_strategies_decline_unserved_subsystems() {
        assert!(
            AgentQueryStrategy
                .build_query(&agent_context(), MemorySubsystem::Vector)
                .is_none()
        );
        assert!(
            StepQueryStrategy
                .build_query(&StepContext::new("c", "t", "s").into(), MemorySubsystem::Entity)
                .is_none()
        );
    }

    #[test]
    fn test_entity_strategy_filters_by_tenant() {
        let query = EntityQueryStrategy
            .build_query(&agent_context(), MemorySubsystem::Entity)
            .unwrap();
        assert_eq!(
            query.expression,
            QueryExpression::metadata("tenantId", json!("tenant-1"))
        );
    }
}
