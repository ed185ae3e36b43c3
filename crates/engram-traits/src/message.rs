//! Conversational message values
//!
//! A `Message` is the unit every memory partition stores. Messages are
//! immutable once built: construction goes through `MessageBuilder`, which
//! fills in an id, a timestamp and a token estimate when the caller does not
//! provide them. Equality is by value over all fields.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Chat message role
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
    Tool,
    Error,
    Goal,
}

impl Role {
    /// Stable lowercase name, matching the serialized form.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
            Role::Tool => "tool",
            Role::Error => "error",
            Role::Goal => "goal",
        }
    }
}

/// Visibility scope of a stored message
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum MessageScope {
    #[default]
    Conversation,
    Tenant,
    Global,
}

impl MessageScope {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageScope::Conversation => "conversation",
            MessageScope::Tenant => "tenant",
            MessageScope::Global => "global",
        }
    }
}

/// A single conversational item as held by the memory partitions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Message {
    /// Unique within one persistence store
    pub id: String,
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    /// Free-form annotations; ordering is irrelevant
    #[serde(default)]
    pub metadata: HashMap<String, Value>,
    pub token_count: u32,
    pub conversation_id: String,
    #[serde(default)]
    pub scope: MessageScope,
}

impl Message {
    /// Start building a message for the given conversation.
    pub fn builder(conversation_id: impl Into<String>) -> MessageBuilder {
        MessageBuilder::new(conversation_id)
    }

    /// Create a system message
    pub fn system(conversation_id: impl Into<String>, content: impl Into<String>) -> Self {
        MessageBuilder::new(conversation_id)
            .role(Role::System)
            .content(content)
            .build()
    }

    /// Create a user message
    pub fn user(conversation_id: impl Into<String>, content: impl Into<String>) -> Self {
        MessageBuilder::new(conversation_id)
            .role(Role::User)
            .content(content)
            .build()
    }

    /// Create an assistant message
    pub fn assistant(conversation_id: impl Into<String>, content: impl Into<String>) -> Self {
        MessageBuilder::new(conversation_id)
            .role(Role::Assistant)
            .content(content)
            .build()
    }

    /// Create a tool result message
    pub fn tool(conversation_id: impl Into<String>, content: impl Into<String>) -> Self {
        MessageBuilder::new(conversation_id)
            .role(Role::Tool)
            .content(content)
            .build()
    }

    /// Resolve a named string-like field for expression evaluation.
    ///
    /// Returns `None` for unknown fields and for `timestamp`, which is not
    /// string-like (see [`Message::instant_field`]).
    pub fn string_field(&self, field: &str) -> Option<&str> {
        match field {
            "id" => Some(&self.id),
            "role" => Some(self.role.as_str()),
            "content" => Some(&self.content),
            "conversation_id" => Some(&self.conversation_id),
            "scope" => Some(self.scope.as_str()),
            _ => None,
        }
    }

    /// Resolve a named field interpreted as an instant.
    pub fn instant_field(&self, field: &str) -> Option<DateTime<Utc>> {
        match field {
            "timestamp" => Some(self.timestamp),
            _ => None,
        }
    }
}

/// Builder producing finished, immutable `Message` values.
#[derive(Debug, Clone)]
pub struct MessageBuilder {
    id: Option<String>,
    role: Role,
    content: String,
    timestamp: Option<DateTime<Utc>>,
    metadata: HashMap<String, Value>,
    token_count: Option<u32>,
    conversation_id: String,
    scope: MessageScope,
}

impl MessageBuilder {
    pub fn new(conversation_id: impl Into<String>) -> Self {
        Self {
            id: None,
            role: Role::User,
            content: String::new(),
            timestamp: None,
            metadata: HashMap::new(),
            token_count: None,
            conversation_id: conversation_id.into(),
            scope: MessageScope::Conversation,
        }
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn role(mut self, role: Role) -> Self {
        self.role = role;
        self
    }

    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    pub fn timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// Attach one metadata entry.
    pub fn metadata(mut self, key: impl Into<String>, value: Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }

    pub fn token_count(mut self, count: u32) -> Self {
        self.token_count = Some(count);
        self
    }

    pub fn scope(mut self, scope: MessageScope) -> Self {
        self.scope = scope;
        self
    }

    /// Finish the message, filling defaults for id, timestamp and tokens.
    pub fn build(self) -> Message {
        let token_count = self
            .token_count
            .unwrap_or_else(|| estimate_tokens(&self.content));
        Message {
            id: self.id.unwrap_or_else(|| Uuid::new_v4().to_string()),
            role: self.role,
            content: self.content,
            timestamp: self.timestamp.unwrap_or_else(Utc::now),
            metadata: self.metadata,
            token_count,
            conversation_id: self.conversation_id,
            scope: self.scope,
        }
    }
}

/// Estimate token count for a content string.
///
/// Uses a simple heuristic: 1 token ≈ 4 characters.
fn estimate_tokens(content: &str) -> u32 {
    (content.len() / 4 + 1) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_builder_fills_defaults() {
        let msg = Message::builder("conv-1")
            .role(Role::User)
            .content("Hello")
            .build();

        assert!(!msg.id.is_empty());
        assert_eq!(msg.conversation_id, "conv-1");
        assert_eq!(msg.scope, MessageScope::Conversation);
        // "Hello" = 5 chars ≈ 2 tokens (5/4 + 1)
        assert_eq!(msg.token_count, 2);
    }

    #[test]
    fn test_value_equality() {
        let ts = Utc::now();
        let a = Message::builder("conv-1")
            .id("m-1")
            .content("same")
            .timestamp(ts)
            .token_count(3)
            .build();
        let b = Message::builder("conv-1")
            .id("m-1")
            .content("same")
            .timestamp(ts)
            .token_count(3)
            .build();

        assert_eq!(a, b);

        let c = Message::builder("conv-1")
            .id("m-1")
            .content("different")
            .timestamp(ts)
            .token_count(3)
            .build();
        assert_ne!(a, c);
    }

    #[test]
    fn test_string_field_resolution() {
        let msg = Message::builder("conv-9")
            .id("m-9")
            .role(Role::Assistant)
            .content("answer")
            .scope(MessageScope::Global)
            .build();

        assert_eq!(msg.string_field("id"), Some("m-9"));
        assert_eq!(msg.string_field("role"), Some("assistant"));
        assert_eq!(msg.string_field("content"), Some("answer"));
        assert_eq!(msg.string_field("conversation_id"), Some("conv-9"));
        assert_eq!(msg.string_field("scope"), Some("global"));
        assert_eq!(msg.string_field("timestamp"), None);
        assert_eq!(msg.string_field("unknown"), None);
    }

    #[test]
    fn test_metadata_entries() {
        let msg = Message::builder("conv-1")
            .metadata("entityType", json!("testEntity"))
            .metadata("confidence", json!(0.9))
            .build();

        assert_eq!(msg.metadata.get("entityType"), Some(&json!("testEntity")));
        assert_eq!(msg.metadata.get("missing"), None);
    }
}
