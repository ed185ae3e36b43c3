//! Memory subsystems and the routing manager
//!
//! Memory is partitioned into named subsystems, each bound to one
//! persistence strategy and served by query strategies selected on the
//! runtime shape of the incoming process context.

mod manager;
mod strategy;
mod subsystem;

pub use manager::MemoryManager;
pub use strategy::{
    AgentQueryStrategy, EntityQueryStrategy, QueryStrategy, StepQueryStrategy,
};
pub use subsystem::MemorySubsystem;

use std::sync::Arc;

use engram_storage::{InMemoryMessageStore, LongTermMessageStore, ShortTermConfig, ShortTermStore};

/// Manager wired with the reference in-process partitions and the default
/// query strategies. Vector and episodic partitions get stores but no
/// strategies, so they degrade to empty results by design.
pub fn default_manager(short_term: ShortTermConfig) -> MemoryManager {
    MemoryManager::new()
        .with_store(
            MemorySubsystem::ShortTerm,
            Arc::new(ShortTermStore::new(short_term)),
        )
        .with_store(MemorySubsystem::LongTerm, Arc::new(LongTermMessageStore::new()))
        .with_store(MemorySubsystem::Entity, Arc::new(InMemoryMessageStore::new()))
        .with_store(MemorySubsystem::Vector, Arc::new(InMemoryMessageStore::new()))
        .with_store(MemorySubsystem::Episodic, Arc::new(InMemoryMessageStore::new()))
        .with_strategy(Arc::new(AgentQueryStrategy))
        .with_strategy(Arc::new(StepQueryStrategy))
        .with_strategy(Arc::new(EntityQueryStrategy))
}
