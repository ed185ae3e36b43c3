//! Process contexts
//!
//! A `ProcessContext` carries everything the memory and call layers need to
//! act on behalf of one request: conversation id, tenant id and run
//! settings. It is threaded explicitly through every call - there is no
//! ambient (thread-local) state - and the orchestrator owns it for the
//! duration of one request; no component keeps a long-lived back-reference.
//!
//! The two concrete shapes are a tagged enum so query strategies can
//! dispatch on the runtime variant without downcasting.

use serde::{Deserialize, Serialize};

use crate::config::RunSettings;

/// Agent-level context: one whole conversation turn.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentContext {
    pub conversation_id: String,
    pub tenant_id: String,
    pub settings: RunSettings,
}

impl AgentContext {
    pub fn new(conversation_id: impl Into<String>, tenant_id: impl Into<String>) -> Self {
        Self {
            conversation_id: conversation_id.into(),
            tenant_id: tenant_id.into(),
            settings: RunSettings::default(),
        }
    }

    pub fn with_settings(mut self, settings: RunSettings) -> Self {
        self.settings = settings;
        self
    }
}

/// Step-level context: one iteration of a call/response loop.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepContext {
    pub conversation_id: String,
    pub tenant_id: String,
    pub step_id: String,
    pub settings: RunSettings,
}

impl StepContext {
    pub fn new(
        conversation_id: impl Into<String>,
        tenant_id: impl Into<String>,
        step_id: impl Into<String>,
    ) -> Self {
        Self {
            conversation_id: conversation_id.into(),
            tenant_id: tenant_id.into(),
            step_id: step_id.into(),
            settings: RunSettings::default(),
        }
    }

    pub fn with_settings(mut self, settings: RunSettings) -> Self {
        self.settings = settings;
        self
    }
}

/// Context passed to memory queries and call submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ProcessContext {
    Agent(AgentContext),
    Step(StepContext),
}

impl ProcessContext {
    pub fn conversation_id(&self) -> &str {
        match self {
            ProcessContext::Agent(ctx) => &ctx.conversation_id,
            ProcessContext::Step(ctx) => &ctx.conversation_id,
        }
    }

    pub fn tenant_id(&self) -> &str {
        match self {
            ProcessContext::Agent(ctx) => &ctx.tenant_id,
            ProcessContext::Step(ctx) => &ctx.tenant_id,
        }
    }

    pub fn settings(&self) -> &RunSettings {
        match self {
            ProcessContext::Agent(ctx) => &ctx.settings,
            ProcessContext::Step(ctx) => &ctx.settings,
        }
    }

    pub fn is_agent(&self) -> bool {
        matches!(self, ProcessContext::Agent(_))
    }

    pub fn is_step(&self) -> bool {
        matches!(self, ProcessContext::Step(_))
    }
}

impl From<AgentContext> for ProcessContext {
    fn from(ctx: AgentContext) -> Self {
        ProcessContext::Agent(ctx)
    }
}

impl From<StepContext> for ProcessContext {
    fn from(ctx: StepContext) -> Self {
        ProcessContext::Step(ctx)
    }
}
