//! Processor chains
//!
//! An ordered, mutable pipeline of processors sharing one context type.
//! Processors run strictly in sequence: each receives the context produced
//! by its predecessor and returns the context for its successor. The first
//! error aborts the remaining chain and propagates to the caller - there is
//! no partial-success continuation.
//!
//! Insertion targets are addressed by processor name. `add_before` falls
//! back to the start when the target is absent; `add_after` falls back to
//! the end when the target is absent or already last. For rearrangements
//! the API does not cover, `customize` hands callers the live ordered list.

use std::fmt;
use std::sync::Arc;

use crate::error::Result;

/// One step in a processor chain.
pub trait Processor<C>: Send + Sync {
    /// Stable processor name, used for insertion targeting and diagnostics.
    fn name(&self) -> &str;

    /// Transform the context for the next processor.
    fn process(&self, context: C) -> Result<C>;
}

/// Ordered chain of processors over a context type `C`.
#[derive(Clone)]
pub struct ProcessorChain<C> {
    processors: Vec<Arc<dyn Processor<C>>>,
}

impl<C> Default for ProcessorChain<C> {
    fn default() -> Self {
        Self {
            processors: Vec::new(),
        }
    }
}

impl<C> ProcessorChain<C> {
    /// Create an empty chain.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.processors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.processors.is_empty()
    }

    /// Processor names in execution order.
    pub fn names(&self) -> Vec<String> {
        self.processors.iter().map(|p| p.name().to_string()).collect()
    }

    /// Insert at the front of the chain.
    pub fn add_to_start(&mut self, processor: Arc<dyn Processor<C>>) {
        self.processors.insert(0, processor);
    }

    /// Append at the end of the chain.
    pub fn add_to_end(&mut self, processor: Arc<dyn Processor<C>>) {
        self.processors.push(processor);
    }

    /// Insert immediately before the named target; absent target ⇒ start.
    pub fn add_before(&mut self, target: &str, processor: Arc<dyn Processor<C>>) {
        let position = self.position_of(target).unwrap_or(0);
        self.processors.insert(position, processor);
    }

    /// Insert immediately after the named target; absent or last ⇒ end.
    pub fn add_after(&mut self, target: &str, processor: Arc<dyn Processor<C>>) {
        match self.position_of(target) {
            Some(position) if position + 1 < self.processors.len() => {
                self.processors.insert(position + 1, processor);
            }
            _ => self.processors.push(processor),
        }
    }

    /// Rearrange the live ordered list without new API surface.
    pub fn customize(&mut self, mutator: impl FnOnce(&mut Vec<Arc<dyn Processor<C>>>)) {
        mutator(&mut self.processors);
    }

    /// Run every processor in order; the first error aborts the chain.
    pub fn run(&self, context: C) -> Result<C> {
        self.processors
            .iter()
            .try_fold(context, |ctx, processor| processor.process(ctx))
    }

    fn position_of(&self, target: &str) -> Option<usize> {
        self.processors.iter().position(|p| p.name() == target)
    }
}

impl<C> fmt::Debug for ProcessorChain<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.processors.iter().map(|p| p.name()).collect();
        f.debug_struct("ProcessorChain")
            .field("processors", &names)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;

    /// Appends its own name to the context, so order is observable.
    struct Tag(&'static str);

    impl Processor<Vec<&'static str>> for Tag {
        fn name(&self) -> &str {
            self.0
        }

        fn process(&self, mut context: Vec<&'static str>) -> Result<Vec<&'static str>> {
            context.push(self.0);
            Ok(context)
        }
    }

    struct Failing;

    impl Processor<Vec<&'static str>> for Failing {
        fn name(&self) -> &str {
            "failing"
        }

        fn process(&self, _context: Vec<&'static str>) -> Result<Vec<&'static str>> {
            Err(CoreError::Processor("boom".to_string()))
        }
    }

    #[test]
    fn test_insert_ordering() {
        let mut chain = ProcessorChain::new();
        chain.add_to_end(Arc::new(Tag("A")));
        chain.add_to_end(Arc::new(Tag("B")));
        chain.add_before("B", Arc::new(Tag("C")));
        assert_eq!(chain.names(), vec!["A", "C", "B"]);

        chain.add_after("A", Arc::new(Tag("D")));
        assert_eq!(chain.names(), vec!["A", "D", "C", "B"]);
    }

    #[test]
    fn test_absent_target_fallbacks() {
        let mut chain = ProcessorChain::new();
        chain.add_to_end(Arc::new(Tag("A")));

        chain.add_before("missing", Arc::new(Tag("P")));
        assert_eq!(chain.names(), vec!["P", "A"]);

        chain.add_after("missing", Arc::new(Tag("Q")));
        assert_eq!(chain.names(), vec!["P", "A", "Q"]);

        // target present but last ⇒ same as append
        chain.add_after("Q", Arc::new(Tag("R")));
        assert_eq!(chain.names(), vec!["P", "A", "Q", "R"]);
    }

    #[test]
    fn test_run_in_strict_sequence() {
        let mut chain = ProcessorChain::new();
        chain.add_to_end(Arc::new(Tag("first")));
        chain.add_to_end(Arc::new(Tag("second")));

        let order = chain.run(Vec::new()).unwrap();
        assert_eq!(order, vec!["first", "second"]);
    }

    #[test]
    fn test_error_aborts_remaining_chain() {
        let mut chain = ProcessorChain::new();
        chain.add_to_end(Arc::new(Tag("before")));
        chain.add_to_end(Arc::new(Failing));
        chain.add_to_end(Arc::new(Tag("after")));

        let err = chain.run(Vec::new()).unwrap_err();
        assert!(matches!(err, CoreError::Processor(_)));
    }

    #[test]
    fn test_customize_rearranges_live_list() {
        let mut chain = ProcessorChain::new();
        chain.add_to_end(Arc::new(Tag("A")));
        chain.add_to_end(Arc::new(Tag("B")));

        chain.customize(|processors| processors.reverse());
        assert_eq!(chain.names(), vec!["B", "A"]);

        chain.customize(|processors| processors.clear());
        assert!(chain.is_empty());
    }
}
