//! Step completion strategies
//!
//! A step is an iterative call/response loop; completion strategies decide
//! when it should stop. A strategy signals completion by depositing a
//! non-empty result into the context's results collection and returning
//! `true`; declining leaves the results untouched.

use std::sync::Arc;

use tracing::debug;

use crate::call::{CallStatus, ModelCall};

/// One recorded call in a step's history.
#[derive(Debug, Clone)]
pub struct CallRecord {
    pub call_id: String,
    pub status: CallStatus,
}

/// Termination signal deposited by a completion strategy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionSignal {
    /// Name of the strategy that signalled.
    pub strategy: String,
    pub reason: String,
}

/// Accumulated call history plus the output results collection.
#[derive(Debug, Default)]
pub struct StepCompletionContext {
    pub model_calls: Vec<CallRecord>,
    pub results: Vec<CompletionSignal>,
}

impl StepCompletionContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one model call into the step history.
    pub fn record_model_call(&mut self, call: &ModelCall) {
        self.model_calls.push(CallRecord {
            call_id: call.id.clone(),
            status: call.status(),
        });
    }
}

/// Decides whether an iterative step should terminate.
pub trait StepCompletionStrategy: Send + Sync {
    /// Stable strategy name for diagnostics and signals.
    fn name(&self) -> &str;

    /// Inspect the step history; deposit a signal and return `true` to
    /// terminate the step.
    fn is_complete(&self, context: &mut StepCompletionContext) -> bool;
}

/// Default bound on model calls per step
pub const DEFAULT_CALL_LIMIT: usize = 10;

/// Terminates a step once its recorded model-call count exceeds a limit.
pub struct CallCountLimit {
    limit: usize,
}

impl Default for CallCountLimit {
    fn default() -> Self {
        Self::new(DEFAULT_CALL_LIMIT)
    }
}

impl CallCountLimit {
    pub fn new(limit: usize) -> Self {
        Self { limit }
    }
}

impl StepCompletionStrategy for CallCountLimit {
    fn name(&self) -> &str {
        "call_count_limit"
    }

    fn is_complete(&self, context: &mut StepCompletionContext) -> bool {
        let count = context.model_calls.len();
        if count <= self.limit {
            return false;
        }
        debug!(count, limit = self.limit, "Step exceeded model call limit");
        context.results.push(CompletionSignal {
            strategy: self.name().to_string(),
            reason: format!("model call count {count} exceeds limit {}", self.limit),
        });
        true
    }
}

/// Wraps child strategies; the first one that signals wins.
#[derive(Default)]
pub struct CompositeCompletion {
    strategies: Vec<Arc<dyn StepCompletionStrategy>>,
}

impl CompositeCompletion {
    pub fn new(strategies: Vec<Arc<dyn StepCompletionStrategy>>) -> Self {
        Self { strategies }
    }

    pub fn push(&mut self, strategy: Arc<dyn StepCompletionStrategy>) {
        self.strategies.push(strategy);
    }
}

impl StepCompletionStrategy for CompositeCompletion {
    fn name(&self) -> &str {
        "composite"
    }

    fn is_complete(&self, context: &mut StepCompletionContext) -> bool {
        self.strategies
            .iter()
            .any(|strategy| strategy.is_complete(context))
    }
}

/// Always declines. Extension point for open-ended workflows whose
/// termination rules are not written yet.
pub struct NeverComplete;

impl StepCompletionStrategy for NeverComplete {
    fn name(&self) -> &str {
        "never"
    }

    fn is_complete(&self, _context: &mut StepCompletionContext) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use engram_traits::message::Message;

    fn context_with_calls(n: usize) -> StepCompletionContext {
        let mut context = StepCompletionContext::new();
        for _ in 0..n {
            context.record_model_call(&ModelCall::new(vec![Message::user("conv-1", "q")]));
        }
        context
    }

    #[test]
    fn test_over_limit_signals_completion() {
        let strategy = CallCountLimit::new(10);
        let mut context = context_with_calls(12);

        assert!(strategy.is_complete(&mut context));
        assert!(!context.results.is_empty());
        assert_eq!(context.results[0].strategy, "call_count_limit");
    }

    #[test]
    fn test_under_limit_declines() {
        let strategy = CallCountLimit::new(10);
        let mut context = context_with_calls(8);

        assert!(!strategy.is_complete(&mut context));
        assert!(context.results.is_empty());
    }

    #[test]
    fn test_limit_boundary_is_strictly_greater() {
        let strategy = CallCountLimit::new(10);
        let mut context = context_with_calls(10);
        assert!(!strategy.is_complete(&mut context));

        context.record_model_call(&ModelCall::new(vec![]));
        assert!(strategy.is_complete(&mut context));
    }

    #[test]
    fn test_composite_signals_when_any_child_does() {
        let composite = CompositeCompletion::new(vec![
            Arc::new(NeverComplete),
            Arc::new(CallCountLimit::new(1)),
        ]);
        let mut context = context_with_calls(2);

        assert!(composite.is_complete(&mut context));
        assert_eq!(context.results.len(), 1);
    }

    #[test]
    fn test_composite_of_decliners_declines() {
        let composite =
            CompositeCompletion::new(vec![Arc::new(NeverComplete), Arc::new(NeverComplete)]);
        let mut context = context_with_calls(5);

        assert!(!composite.is_complete(&mut context));
        assert!(context.results.is_empty());
    }
}
