//! Memory manager - routes store and query calls across subsystems.
//!
//! Routing policy:
//! - A store to a subsystem with no registered persistence strategy is a
//!   configuration error, surfaced immediately and never retried.
//! - A query for a subsystem no registered query strategy serves returns an
//!   empty result. Some partitions (vector, episodic) have no
//!   implementation yet and must degrade gracefully instead of blocking
//!   the pipeline.
//! - Store-level failures pass through uncaught; the manager adds no
//!   locking and no error handling of its own on top of the individually
//!   thread-safe stores.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use engram_traits::message::Message;
use engram_traits::query::MemoryQuery;
use engram_traits::store::MessageStore;

use crate::context::ProcessContext;
use crate::error::{CoreError, Result};
use crate::memory::strategy::QueryStrategy;
use crate::memory::subsystem::MemorySubsystem;

/// Routes store/query calls to the right partition and merges results.
#[derive(Default)]
pub struct MemoryManager {
    stores: HashMap<MemorySubsystem, Arc<dyn MessageStore>>,
    strategies: Vec<Arc<dyn QueryStrategy>>,
}

impl MemoryManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a persistence strategy to a subsystem.
    pub fn register_store(&mut self, subsystem: MemorySubsystem, store: Arc<dyn MessageStore>) {
        self.stores.insert(subsystem, store);
    }

    /// Append a query strategy; registration order is match order.
    pub fn register_strategy(&mut self, strategy: Arc<dyn QueryStrategy>) {
        self.strategies.push(strategy);
    }

    pub fn with_store(
        mut self,
        subsystem: MemorySubsystem,
        store: Arc<dyn MessageStore>,
    ) -> Self {
        self.register_store(subsystem, store);
        self
    }

    pub fn with_strategy(mut self, strategy: Arc<dyn QueryStrategy>) -> Self {
        self.register_strategy(strategy);
        self
    }

    /// Direct access to one partition's store, if registered.
    pub fn store_for(&self, subsystem: MemorySubsystem) -> Option<Arc<dyn MessageStore>> {
        self.stores.get(&subsystem).cloned()
    }

    /// Persist one message into the given subsystem.
    pub fn store(&self, message: Message, subsystem: MemorySubsystem) -> Result<Message> {
        let store = self.require_store(subsystem)?;
        Ok(store.save(message)?)
    }

    /// Persist a batch into the given subsystem.
    pub fn store_all(
        &self,
        messages: Vec<Message>,
        subsystem: MemorySubsystem,
    ) -> Result<Vec<Message>> {
        let store = self.require_store(subsystem)?;
        Ok(store.save_all(messages)?)
    }

    /// Build a query from the context and fetch candidates from the target
    /// subsystem. The `MemoryManager` tag fans out across every registered
    /// partition and merges the results.
    pub fn query(
        &self,
        context: &ProcessContext,
        subsystem: MemorySubsystem,
    ) -> Result<Vec<Message>> {
        if subsystem == MemorySubsystem::MemoryManager {
            let mut merged = Vec::new();
            for partition in MemorySubsystem::PARTITIONS {
                if self.stores.contains_key(&partition) {
                    merged.extend(self.query(context, partition)?);
                }
            }
            return Ok(merged);
        }

        let store = self.require_store(subsystem)?;
        let strategy = self
            .strategies
            .iter()
            .find(|s| s.accepts(context) && s.subsystems().contains(&subsystem));

        let Some(strategy) = strategy else {
            debug!(
                subsystem = %subsystem,
                conversation_id = context.conversation_id(),
                "No query strategy accepts this context; returning empty result"
            );
            return Ok(Vec::new());
        };

        let Some(query) = strategy.build_query(context, subsystem) else {
            debug!(
                subsystem = %subsystem,
                strategy = strategy.name(),
                "Strategy declined to build a query; returning empty result"
            );
            return Ok(Vec::new());
        };

        Ok(store.fetch_candidates(&query)?)
    }

    /// Fetch candidates for an already-built query.
    pub fn query_with(
        &self,
        query: &MemoryQuery,
        subsystem: MemorySubsystem,
    ) -> Result<Vec<Message>> {
        let store = self.require_store(subsystem)?;
        Ok(store.fetch_candidates(query)?)
    }

    fn require_store(&self, subsystem: MemorySubsystem) -> Result<&Arc<dyn MessageStore>> {
        self.stores.get(&subsystem).ok_or_else(|| {
            CoreError::Configuration(format!(
                "no persistence strategy registered for subsystem {subsystem}"
            ))
        })
    }
}
