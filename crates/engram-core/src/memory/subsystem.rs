//! Memory subsystem tags

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifies which memory partition a store or query targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemorySubsystem {
    ShortTerm,
    LongTerm,
    Vector,
    Entity,
    Episodic,
    /// The aggregate view: queries fan out across every registered
    /// partition and merge the results.
    MemoryManager,
}

impl MemorySubsystem {
    /// Every concrete partition, in routing order. Excludes the aggregate
    /// `MemoryManager` tag.
    pub const PARTITIONS: [MemorySubsystem; 5] = [
        MemorySubsystem::ShortTerm,
        MemorySubsystem::LongTerm,
        MemorySubsystem::Vector,
        MemorySubsystem::Entity,
        MemorySubsystem::Episodic,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MemorySubsystem::ShortTerm => "short_term",
            MemorySubsystem::LongTerm => "long_term",
            MemorySubsystem::Vector => "vector",
            MemorySubsystem::Entity => "entity",
            MemorySubsystem::Episodic => "episodic",
            MemorySubsystem::MemoryManager => "memory_manager",
        }
    }
}

impl fmt::Display for MemorySubsystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
