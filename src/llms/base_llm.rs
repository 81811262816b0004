//! Base LLM trait for the crew engine.
//!
//! Provides the async trait every LLM implementation follows, the message
//! and response types that cross it, and the shared state concrete providers
//! embed.

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::types::usage_metrics::UsageMetrics;
use crate::utilities::errors::LlmError;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Default model used when none is configured.
pub const DEFAULT_MODEL: &str = "openai/gpt-4o-mini";

// ---------------------------------------------------------------------------
// Messages
// ---------------------------------------------------------------------------

/// A single message in an LLM conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LLMMessage {
    /// Role of the message sender ("system", "user", "assistant").
    pub role: String,
    /// Content of the message.
    pub content: String,
}

impl LLMMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: "assistant".to_string(),
            content: content.into(),
        }
    }
}

/// The text produced by one LLM call plus the tokens it consumed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LLMResponse {
    /// Generated text.
    pub content: String,
    /// Token usage reported by the provider, if any.
    pub usage: Option<UsageMetrics>,
}

impl LLMResponse {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            usage: None,
        }
    }
}

// ---------------------------------------------------------------------------
// BaseLLM trait
// ---------------------------------------------------------------------------

/// Interface all LLM implementations follow.
///
/// Implementations must be shareable across tasks: a single instance is
/// handed to every agent of every crew the service builds.
#[async_trait]
pub trait BaseLLM: Send + Sync + fmt::Debug {
    /// Model identifier/name.
    fn model(&self) -> &str;

    /// Provider name.
    fn provider(&self) -> &str {
        "openai"
    }

    /// Call the LLM with the given conversation.
    async fn call(&self, messages: Vec<LLMMessage>) -> Result<LLMResponse, LlmError>;
}

// ---------------------------------------------------------------------------
// BaseLLMState - shared state for LLM implementations
// ---------------------------------------------------------------------------

/// Shared state concrete providers embed and delegate to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BaseLLMState {
    /// The model identifier/name.
    pub model: String,
    /// Optional temperature setting for response generation.
    pub temperature: Option<f64>,
    /// Optional API key.
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    /// Optional base URL for the API.
    pub base_url: Option<String>,
    /// Provider name (e.g., "openai").
    pub provider: String,
}

impl BaseLLMState {
    /// Create a new `BaseLLMState` with the given model name.
    ///
    /// # Errors
    ///
    /// Returns `LlmError::Configuration` if `model` is empty.
    pub fn new(model: impl Into<String>) -> Result<Self, LlmError> {
        let model = model.into();
        if model.trim().is_empty() {
            return Err(LlmError::Configuration(
                "Model name is required and cannot be empty".to_string(),
            ));
        }

        Ok(Self {
            model,
            temperature: None,
            api_key: None,
            base_url: None,
            provider: "openai".to_string(),
        })
    }

    /// Extract token usage from a provider `usage` object.
    ///
    /// Accepts OpenAI and Anthropic field names.
    pub fn parse_usage(usage: &Value) -> UsageMetrics {
        let field = |names: &[&str]| {
            names
                .iter()
                .find_map(|n| usage.get(*n).and_then(Value::as_i64))
                .unwrap_or(0)
        };

        let prompt_tokens = field(&["prompt_tokens", "input_tokens"]);
        let completion_tokens = field(&["completion_tokens", "output_tokens"]);
        let cached_prompt_tokens = usage
            .get("prompt_tokens_details")
            .and_then(|d| d.get("cached_tokens"))
            .and_then(Value::as_i64)
            .unwrap_or(0);
        let total_tokens = match field(&["total_tokens"]) {
            0 => prompt_tokens + completion_tokens,
            n => n,
        };

        UsageMetrics {
            total_tokens,
            prompt_tokens,
            cached_prompt_tokens,
            completion_tokens,
            successful_requests: 1,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_llm_state_new() {
        let state = BaseLLMState::new("gpt-4o").unwrap();
        assert_eq!(state.model, "gpt-4o");
        assert_eq!(state.provider, "openai");
        assert!(state.temperature.is_none());
    }

    #[test]
    fn test_base_llm_state_empty_model() {
        let err = BaseLLMState::new("  ").unwrap_err();
        assert!(err.to_string().contains("Model name is required"));
    }

    #[test]
    fn test_parse_usage_openai() {
        let usage = serde_json::json!({
            "prompt_tokens": 12,
            "completion_tokens": 30,
            "total_tokens": 42,
            "prompt_tokens_details": {"cached_tokens": 4}
        });
        let metrics = BaseLLMState::parse_usage(&usage);
        assert_eq!(metrics.prompt_tokens, 12);
        assert_eq!(metrics.completion_tokens, 30);
        assert_eq!(metrics.total_tokens, 42);
        assert_eq!(metrics.cached_prompt_tokens, 4);
        assert_eq!(metrics.successful_requests, 1);
    }

    #[test]
    fn test_parse_usage_without_total() {
        let usage = serde_json::json!({"input_tokens": 5, "output_tokens": 7});
        let metrics = BaseLLMState::parse_usage(&usage);
        assert_eq!(metrics.total_tokens, 12);
    }

    #[test]
    fn test_message_constructors() {
        assert_eq!(LLMMessage::system("s").role, "system");
        assert_eq!(LLMMessage::user("u").role, "user");
        assert_eq!(LLMMessage::assistant("a").content, "a");
    }
}
