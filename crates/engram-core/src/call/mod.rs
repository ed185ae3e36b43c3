//! Call executor framework
//!
//! A call is one invocation of a model or tool provider, tracked through a
//! monotonic status lifecycle and executed asynchronously on the shared
//! worker pool. The call value is owned by the invoking workflow step for
//! its lifetime and discarded once the step has consumed its response.

mod executor;
mod status;

pub use executor::CallExecutor;
pub use status::{CallStatus, StatusCell};

use serde_json::Value;
use uuid::Uuid;

use engram_traits::message::Message;

use crate::provider::TokenUsage;

/// One pending invocation of the model provider.
#[derive(Debug, Clone)]
pub struct ModelCall {
    pub id: String,
    /// Prompt messages; model configuration comes from the owning context.
    pub messages: Vec<Message>,
    status: StatusCell,
}

impl ModelCall {
    pub fn new(messages: Vec<Message>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            messages,
            status: StatusCell::new(),
        }
    }

    pub fn status(&self) -> CallStatus {
        self.status.get()
    }

    pub(crate) fn status_cell(&self) -> StatusCell {
        self.status.clone()
    }
}

/// One pending invocation of a named tool callback.
#[derive(Debug, Clone)]
pub struct ToolCall {
    pub id: String,
    pub name: String,
    pub request: Option<Value>,
    status: StatusCell,
}

impl ToolCall {
    pub fn new(name: impl Into<String>, request: Value) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            request: Some(request),
            status: StatusCell::new(),
        }
    }

    /// A call with no request payload; fails validation at execution time.
    pub fn without_request(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            request: None,
            status: StatusCell::new(),
        }
    }

    pub fn status(&self) -> CallStatus {
        self.status.get()
    }

    pub(crate) fn status_cell(&self) -> StatusCell {
        self.status.clone()
    }
}

/// Normalized outcome of a model call.
#[derive(Debug, Clone)]
pub struct ModelCallResponse {
    /// The assistant message persisted into short-term memory.
    pub message: Message,
    pub usage: Option<TokenUsage>,
}

/// Normalized outcome of a tool call. Failures are data, not errors: a
/// failed tool call reports `result: null` plus an error message and the
/// pipeline continues.
#[derive(Debug, Clone)]
pub struct ToolCallResponse {
    pub result: Value,
    pub error: Option<String>,
}

impl ToolCallResponse {
    pub fn success(result: Value) -> Self {
        Self {
            result,
            error: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            result: Value::Null,
            error: Some(message.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}
