//! Runtime settings threaded through process contexts
//!
//! The core trusts these values; resolving them (per tenant, per agent) is
//! the caller's job. Only the options named here are recognized - there is
//! no dynamic key space.

use serde::{Deserialize, Serialize};

/// Default bound on memory query results
pub const DEFAULT_QUERY_LIMIT: usize = 20;

/// Model and retrieval settings for one agent or step run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSettings {
    /// Provider name (e.g. "openai", "anthropic")
    #[serde(default)]
    pub provider: String,
    /// Model identifier passed through to the provider
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub max_tokens: Option<u32>,
    #[serde(default)]
    pub temperature: Option<f32>,
    #[serde(default)]
    pub top_p: Option<f32>,
    /// Bound applied to memory queries built from this context
    #[serde(default = "default_query_limit")]
    pub query_limit: usize,
}

fn default_query_limit() -> usize {
    DEFAULT_QUERY_LIMIT
}

impl Default for RunSettings {
    fn default() -> Self {
        Self {
            provider: String::new(),
            model: String::new(),
            max_tokens: None,
            temperature: None,
            top_p: None,
            query_limit: DEFAULT_QUERY_LIMIT,
        }
    }
}

impl RunSettings {
    pub fn new(provider: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
            model: model.into(),
            ..Default::default()
        }
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_top_p(mut self, top_p: f32) -> Self {
        self.top_p = Some(top_p);
        self
    }

    pub fn with_query_limit(mut self, query_limit: usize) -> Self {
        self.query_limit = query_limit;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = RunSettings::default();
        assert_eq!(settings.query_limit, DEFAULT_QUERY_LIMIT);
        assert!(settings.max_tokens.is_none());
    }

    #[test]
    fn test_builders() {
        let settings = RunSettings::new("openai", "gpt-4o")
            .with_max_tokens(512)
            .with_temperature(0.2)
            .with_query_limit(5);
        assert_eq!(settings.provider, "openai");
        assert_eq!(settings.model, "gpt-4o");
        assert_eq!(settings.max_tokens, Some(512));
        assert_eq!(settings.query_limit, 5);
    }

    #[test]
    fn test_deserialize_with_defaults() {
        let settings: RunSettings = serde_json::from_str(r#"{"model":"gpt-4o"}"#).unwrap();
        assert_eq!(settings.model, "gpt-4o");
        assert_eq!(settings.query_limit, DEFAULT_QUERY_LIMIT);
    }
}
