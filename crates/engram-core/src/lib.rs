//! Engram Core - Memory orchestration and call execution for AI agents
//!
//! This crate provides:
//! - Named memory partitions routed through one `MemoryManager`
//! - Query strategies dispatched on the runtime process-context shape
//! - Generic, mutable processor chains
//! - An asynchronous, status-tracked call executor with fail-soft tool
//!   calls and fail-loud model calls
//! - Pluggable step completion strategies
//!
//! Storage contracts and the query-expression algebra live in
//! `engram-traits`; reference backends live in `engram-storage`.

pub mod call;
pub mod chain;
pub mod completion;
pub mod config;
pub mod context;
pub mod error;
pub mod memory;
pub mod provider;
pub mod tool;

// Re-export commonly used types
pub use call::{
    CallExecutor, CallStatus, ModelCall, ModelCallResponse, StatusCell, ToolCall,
    ToolCallResponse,
};
pub use chain::{Processor, ProcessorChain};
pub use completion::{
    CallCountLimit, CallRecord, CompletionSignal, CompositeCompletion, NeverComplete,
    StepCompletionContext, StepCompletionStrategy,
};
pub use config::RunSettings;
pub use context::{AgentContext, ProcessContext, StepContext};
pub use error::{CoreError, Result};
pub use memory::{
    AgentQueryStrategy, EntityQueryStrategy, MemoryManager, MemorySubsystem, QueryStrategy,
    StepQueryStrategy, default_manager,
};
pub use provider::{MockModelProvider, MockReply, ModelProvider, ModelRequest, ModelResponse, TokenUsage};
pub use tool::{EchoTool, Tool, ToolRegistry};

// Re-export the shared data model so downstream callers need one import.
pub use engram_traits::expression::QueryExpression;
pub use engram_traits::message::{Message, MessageBuilder, MessageScope, Role};
pub use engram_traits::query::MemoryQuery;
pub use engram_traits::store::MessageStore;
