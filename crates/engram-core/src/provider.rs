//! Model provider abstraction
//!
//! The core never talks a concrete wire protocol; it hands a normalized
//! `ModelRequest` to whatever `ModelProvider` the caller wired in and gets a
//! normalized `ModelResponse` back. Provider failures surface as errors -
//! the call executor decides what that means for the enclosing step.

use std::collections::VecDeque;

use async_trait::async_trait;
use tokio::sync::Mutex;

use engram_traits::message::Message;

use crate::error::{CoreError, Result};

/// Normalized request handed to a model provider.
#[derive(Debug, Clone)]
pub struct ModelRequest {
    pub messages: Vec<Message>,
    pub model: String,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
    pub top_p: Option<f32>,
}

impl ModelRequest {
    pub fn new(messages: Vec<Message>, model: impl Into<String>) -> Self {
        Self {
            messages,
            model: model.into(),
            max_tokens: None,
            temperature: None,
            top_p: None,
        }
    }
}

/// Token usage statistics reported by a provider.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// Normalized completion returned by a model provider.
#[derive(Debug, Clone)]
pub struct ModelResponse {
    pub content: String,
    pub usage: Option<TokenUsage>,
}

/// Chat/completion backend contract.
#[async_trait]
pub trait ModelProvider: Send + Sync {
    /// Get provider name
    fn provider(&self) -> &str;

    /// Get model name
    fn model(&self) -> &str;

    /// Complete a chat request
    async fn complete(&self, request: ModelRequest) -> Result<ModelResponse>;
}

/// Scripted reply for the mock provider.
#[derive(Debug, Clone)]
pub enum MockReply {
    /// Return a plain assistant completion.
    Text(String),
    /// Return a provider error.
    Error(String),
}

/// Deterministic mock model provider for tests.
///
/// Replies are consumed in order; running past the script is a provider
/// error, which keeps tests honest about how many calls they make.
pub struct MockModelProvider {
    replies: Mutex<VecDeque<MockReply>>,
}

impl MockModelProvider {
    pub fn new(replies: Vec<MockReply>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
        }
    }

    /// Provider scripted with a single text reply.
    pub fn text(content: impl Into<String>) -> Self {
        Self::new(vec![MockReply::Text(content.into())])
    }

    /// Provider whose first call fails with the given message.
    pub fn failing(message: impl Into<String>) -> Self {
        Self::new(vec![MockReply::Error(message.into())])
    }
}

#[async_trait]
impl ModelProvider for MockModelProvider {
    fn provider(&self) -> &str {
        "mock"
    }

    fn model(&self) -> &str {
        "mock-model"
    }

    async fn complete(&self, _request: ModelRequest) -> Result<ModelResponse> {
        let reply = self.replies.lock().await.pop_front();
        match reply {
            Some(MockReply::Text(content)) => Ok(ModelResponse {
                content,
                usage: Some(TokenUsage::default()),
            }),
            Some(MockReply::Error(message)) => Err(CoreError::Provider(message)),
            None => Err(CoreError::Provider(
                "mock provider has no scripted replies left".to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_replies_in_order() {
        let provider = MockModelProvider::new(vec![
            MockReply::Text("one".to_string()),
            MockReply::Error("backend down".to_string()),
        ]);
        let request = ModelRequest::new(vec![], "mock-model");

        let first = provider.complete(request.clone()).await.unwrap();
        assert_eq!(first.content, "one");

        let second = provider.complete(request.clone()).await;
        assert!(matches!(second, Err(CoreError::Provider(_))));

        // script exhausted
        let third = provider.complete(request).await;
        assert!(third.is_err());
    }
}
