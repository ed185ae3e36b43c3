//! Asynchronous call execution
//!
//! `CallExecutor` submits each call to the shared tokio worker pool and
//! hands the caller a `JoinHandle` future. The two call kinds carry
//! different failure policies on purpose:
//!
//! - **Tool calls fail soft.** Validation problems, unknown tools and
//!   callback failures are caught, the call is marked `Failed`, and a
//!   structured `{result: null, error}` response comes back through the
//!   same future. The pipeline continues.
//! - **Model calls fail loud.** A provider failure propagates as an error
//!   out of the future and is expected to abort the enclosing step; a
//!   broken model backend is not partial progress.
//!
//! Both paths record their terminal status before returning. No timeout or
//! cancellation is wired onto the returned futures; an abandoned handle
//! leaves the call `Executing` from the caller's perspective.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{debug, error, warn};

use engram_traits::message::Message;

use crate::call::{CallStatus, ModelCall, ModelCallResponse, ToolCall, ToolCallResponse};
use crate::chain::ProcessorChain;
use crate::context::ProcessContext;
use crate::error::{CoreError, Result};
use crate::memory::{MemoryManager, MemorySubsystem};
use crate::provider::{ModelProvider, ModelRequest};
use crate::tool::ToolRegistry;

/// Executes model and tool calls against the wired providers, persisting
/// outcomes into memory.
pub struct CallExecutor {
    provider: Arc<dyn ModelProvider>,
    tools: Arc<ToolRegistry>,
    memory: Arc<MemoryManager>,
    request_chain: ProcessorChain<ModelRequest>,
    persist_tool_results: bool,
}

impl CallExecutor {
    pub fn new(
        provider: Arc<dyn ModelProvider>,
        tools: Arc<ToolRegistry>,
        memory: Arc<MemoryManager>,
    ) -> Self {
        Self {
            provider,
            tools,
            memory,
            request_chain: ProcessorChain::new(),
            persist_tool_results: false,
        }
    }

    /// Replace the request-processor chain run before provider invocation.
    pub fn with_request_chain(mut self, chain: ProcessorChain<ModelRequest>) -> Self {
        self.request_chain = chain;
        self
    }

    /// Also write tool results into short-term memory (off by default;
    /// tool outcomes are otherwise only logged).
    pub fn with_persist_tool_results(mut self, persist: bool) -> Self {
        self.persist_tool_results = persist;
        self
    }

    /// Mutable access to the request chain for callers that want to insert
    /// lifecycle hooks.
    pub fn request_chain_mut(&mut self) -> &mut ProcessorChain<ModelRequest> {
        &mut self.request_chain
    }

    /// Submit a model call for asynchronous execution.
    pub fn submit_model_call(
        &self,
        call: ModelCall,
        context: ProcessContext,
    ) -> JoinHandle<Result<ModelCallResponse>> {
        let provider = Arc::clone(&self.provider);
        let memory = Arc::clone(&self.memory);
        let chain = self.request_chain.clone();
        tokio::spawn(async move { run_model_call(provider, memory, chain, call, context).await })
    }

    /// Submit a tool call for asynchronous execution.
    pub fn submit_tool_call(
        &self,
        call: ToolCall,
        context: ProcessContext,
    ) -> JoinHandle<ToolCallResponse> {
        let tools = Arc::clone(&self.tools);
        let memory = Arc::clone(&self.memory);
        let persist = self.persist_tool_results;
        tokio::spawn(async move { run_tool_call(tools, memory, persist, call, context).await })
    }
}

async fn run_model_call(
    provider: Arc<dyn ModelProvider>,
    memory: Arc<MemoryManager>,
    chain: ProcessorChain<ModelRequest>,
    call: ModelCall,
    context: ProcessContext,
) -> Result<ModelCallResponse> {
    let status = call.status_cell();
    status.advance(CallStatus::Executing);

    let settings = context.settings();
    let mut request = ModelRequest::new(call.messages.clone(), settings.model.clone());
    request.max_tokens = settings.max_tokens;
    request.temperature = settings.temperature;
    request.top_p = settings.top_p;

    let outcome = async {
        let request = chain.run(request)?;
        let response = provider.complete(request).await?;
        let message = Message::assistant(context.conversation_id(), &response.content);
        memory.store(message.clone(), MemorySubsystem::ShortTerm)?;
        Ok(ModelCallResponse {
            message,
            usage: response.usage,
        })
    }
    .await;

    match outcome {
        Ok(response) => {
            status.advance(CallStatus::Completed);
            debug!(call_id = call.id, "Model call completed");
            Ok(response)
        }
        Err(e) => {
            status.advance(CallStatus::Failed);
            error!(call_id = call.id, error = %e, "Model call failed");
            Err(e)
        }
    }
}

async fn run_tool_call(
    tools: Arc<ToolRegistry>,
    memory: Arc<MemoryManager>,
    persist: bool,
    call: ToolCall,
    context: ProcessContext,
) -> ToolCallResponse {
    let status = call.status_cell();
    status.advance(CallStatus::Executing);

    let outcome: Result<serde_json::Value> = async {
        if call.name.trim().is_empty() {
            return Err(CoreError::Validation("tool call has no name".to_string()));
        }
        let Some(params) = call.request.clone() else {
            return Err(CoreError::Validation(
                "tool call has no request".to_string(),
            ));
        };
        tools.execute(&call.name, params).await
    }
    .await;

    match outcome {
        Ok(result) => {
            if persist {
                let message = Message::builder(context.conversation_id())
                    .role(engram_traits::message::Role::Tool)
                    .content(result.to_string())
                    .metadata("tool", serde_json::json!(call.name))
                    .build();
                // best-effort logging of tool outcomes; a store failure
                // does not fail the call
                if let Err(e) = memory.store(message, MemorySubsystem::ShortTerm) {
                    warn!(call_id = call.id, error = %e, "Failed to persist tool result");
                }
            }
            status.advance(CallStatus::Completed);
            debug!(call_id = call.id, tool = call.name, "Tool call completed");
            ToolCallResponse::success(result)
        }
        Err(e) => {
            status.advance(CallStatus::Failed);
            warn!(call_id = call.id, tool = call.name, error = %e, "Tool call failed");
            ToolCallResponse::failure(e.to_string())
        }
    }
}
