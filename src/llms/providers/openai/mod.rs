//! OpenAI native completion provider.
//!
//! Talks to the Chat Completions API (or any OpenAI-compatible server) via
//! `reqwest`. Transport errors, rate limiting (429) and server errors (5xx)
//! are retried with exponential backoff; other 4xx responses fail at once.
//! A `retry-after` header on a 429 replaces the next backoff delay.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use crate::llms::base_llm::{BaseLLM, BaseLLMState, LLMMessage, LLMResponse};
use crate::utilities::errors::LlmError;

/// Default OpenAI API base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// Default number of retries after the first attempt.
pub const DEFAULT_MAX_RETRIES: u32 = 2;

const PROVIDER: &str = "OpenAI";

/// OpenAI Chat Completions implementation.
///
/// # Example
///
/// ```ignore
/// let provider = OpenAICompletion::new("gpt-4o", Some(api_key), None)?;
/// let response = provider.call(vec![LLMMessage::user("Hello")]).await?;
/// ```
#[derive(Debug, Clone)]
pub struct OpenAICompletion {
    /// Shared base LLM state.
    pub state: BaseLLMState,
    /// Organization ID for multi-tenant access.
    pub organization: Option<String>,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Maximum number of retries after the first attempt.
    pub max_retries: u32,
    /// Delay before the first retry; doubled on every further retry.
    pub retry_base_delay: Duration,
    /// Maximum tokens in response.
    pub max_tokens: Option<u32>,
    client: reqwest::Client,
}

impl OpenAICompletion {
    /// Create a new OpenAI completion provider.
    ///
    /// # Arguments
    ///
    /// * `model` - OpenAI model name (e.g., "gpt-4o", "o3-mini").
    /// * `api_key` - API key; calls fail with `MissingApiKey` without one.
    /// * `base_url` - Optional custom base URL for OpenAI-compatible servers.
    pub fn new(
        model: impl Into<String>,
        api_key: Option<String>,
        base_url: Option<String>,
    ) -> Result<Self, LlmError> {
        let mut state = BaseLLMState::new(model)?;
        state.api_key = api_key.filter(|k| !k.is_empty());
        state.base_url = base_url;
        state.provider = "openai".to_string();

        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| LlmError::Configuration(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            state,
            organization: None,
            timeout: DEFAULT_TIMEOUT,
            max_retries: DEFAULT_MAX_RETRIES,
            retry_base_delay: Duration::from_secs(1),
            max_tokens: None,
            client,
        })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_retry_base_delay(mut self, delay: Duration) -> Self {
        self.retry_base_delay = delay;
        self
    }

    pub fn with_temperature(mut self, temperature: Option<f64>) -> Self {
        self.state.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: Option<u32>) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_organization(mut self, organization: Option<String>) -> Self {
        self.organization = organization;
        self
    }

    /// Get the API base URL.
    pub fn api_base_url(&self) -> &str {
        self.state
            .base_url
            .as_deref()
            .unwrap_or(DEFAULT_BASE_URL)
            .trim_end_matches('/')
    }

    /// Build the request body for the Chat Completions API.
    pub fn build_request_body(&self, messages: &[LLMMessage]) -> Value {
        let mut body = serde_json::json!({
            "model": self.state.model,
            "messages": messages,
        });

        if let Some(temp) = self.state.temperature {
            body["temperature"] = serde_json::json!(temp);
        }
        if let Some(max_tokens) = self.max_tokens {
            body["max_tokens"] = serde_json::json!(max_tokens);
        }

        body
    }

    /// Parse a Chat Completions API response.
    fn parse_completions_response(&self, response: &Value) -> Result<LLMResponse, LlmError> {
        let message = response
            .get("choices")
            .and_then(|c| c.get(0))
            .and_then(|choice| choice.get("message"))
            .ok_or_else(|| LlmError::InvalidResponse("No message in OpenAI response".to_string()))?;

        // `content` is null when the model refuses or only emits tool calls.
        let content = message
            .get("content")
            .and_then(Value::as_str)
            .unwrap_or("");

        let usage = response.get("usage").map(BaseLLMState::parse_usage);
        if let Some(ref usage) = usage {
            log::debug!(
                "OpenAI token usage: prompt={}, completion={}, total={}",
                usage.prompt_tokens,
                usage.completion_tokens,
                usage.total_tokens,
            );
        }

        Ok(LLMResponse {
            content: content.to_string(),
            usage,
        })
    }
}

#[async_trait]
impl BaseLLM for OpenAICompletion {
    fn model(&self) -> &str {
        &self.state.model
    }

    fn provider(&self) -> &str {
        &self.state.provider
    }

    async fn call(&self, messages: Vec<LLMMessage>) -> Result<LLMResponse, LlmError> {
        log::debug!(
            "OpenAICompletion.call: model={}, messages={}",
            self.state.model,
            messages.len(),
        );

        let api_key = self.state.api_key.as_deref().ok_or(LlmError::MissingApiKey {
            provider: PROVIDER,
            env_var: "OPENAI_API_KEY",
        })?;

        let body = self.build_request_body(&messages);
        let endpoint = format!("{}/chat/completions", self.api_base_url());

        let mut last_error = String::from("no attempt made");
        let mut retry_delay = self.retry_base_delay;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                log::warn!(
                    "OpenAI API retry attempt {} after {:?}: {}",
                    attempt,
                    retry_delay,
                    last_error
                );
                tokio::time::sleep(retry_delay).await;
                retry_delay *= 2;
            }

            let mut request = self
                .client
                .post(&endpoint)
                .timeout(self.timeout)
                .bearer_auth(api_key)
                .json(&body);
            if let Some(ref org) = self.organization {
                request = request.header("OpenAI-Organization", org);
            }

            let response = match request.send().await {
                Ok(resp) => resp,
                Err(e) => {
                    last_error = e.to_string();
                    continue;
                }
            };

            let status = response.status();

            if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                if let Some(delay) = retry_after(response.headers()) {
                    retry_delay = delay;
                }
                last_error = "Rate limited by OpenAI API (429)".to_string();
                continue;
            }

            if status.is_server_error() {
                last_error = format!("OpenAI API server error: {}", status);
                continue;
            }

            let response_text = match response.text().await {
                Ok(text) => text,
                Err(e) => {
                    last_error = e.to_string();
                    continue;
                }
            };

            if !status.is_success() {
                return Err(LlmError::Api {
                    provider: PROVIDER,
                    status: status.as_u16(),
                    body: response_text,
                });
            }

            let response_json: Value = serde_json::from_str(&response_text).map_err(|e| {
                let preview: String = response_text.chars().take(500).collect();
                LlmError::InvalidResponse(format!(
                    "Failed to parse OpenAI response: {} - Body: {}",
                    e, preview
                ))
            })?;

            return self.parse_completions_response(&response_json);
        }

        Err(LlmError::RetriesExhausted {
            provider: PROVIDER,
            attempts: self.max_retries + 1,
            last_error,
        })
    }
}

/// Delay requested by a `retry-after` header given in seconds.
fn retry_after(headers: &reqwest::header::HeaderMap) -> Option<Duration> {
    headers
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok())
        .map(Duration::from_secs)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
