//! Error types for store contracts

use thiserror::Error;

/// Failures raised by `MessageStore` implementations.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("store error: {0}")]
    Store(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias for store operations
pub type Result<T> = std::result::Result<T, StoreError>;
