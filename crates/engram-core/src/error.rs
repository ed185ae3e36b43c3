//! Error types for the orchestration layer

use thiserror::Error;

use engram_traits::error::StoreError;

/// Orchestration error taxonomy.
///
/// `Configuration` is fatal and never retried; `Validation` and
/// `ToolNotFound` are contained to failed tool responses at the executor
/// boundary; `Provider` failures on the model path propagate and abort the
/// enclosing step; `Store` failures pass through the memory manager uncaught.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("provider error: {0}")]
    Provider(String),

    #[error("Tool not found: {0}")]
    ToolNotFound(String),

    #[error("processor error: {0}")]
    Processor(String),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for orchestration operations
pub type Result<T> = std::result::Result<T, CoreError>;
