//! Scripted LLM used by unit tests across the crate.

use std::collections::VecDeque;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::llms::base_llm::{BaseLLM, LLMMessage, LLMResponse};
use crate::types::usage_metrics::UsageMetrics;
use crate::utilities::errors::LlmError;

/// Replays queued replies in order and records every conversation it saw.
///
/// Once the queue is drained it keeps answering with `fallback`.
#[derive(Debug)]
pub(crate) struct ScriptedLLM {
    replies: Mutex<VecDeque<Result<String, String>>>,
    fallback: String,
    calls: Mutex<Vec<Vec<LLMMessage>>>,
}

impl ScriptedLLM {
    pub(crate) fn new(replies: Vec<Result<String, String>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            fallback: "Final Answer: done".to_string(),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Always answers with `reply`.
    pub(crate) fn constant(reply: &str) -> Self {
        Self {
            fallback: reply.to_string(),
            ..Self::new(Vec::new())
        }
    }

    pub(crate) fn calls(&self) -> Vec<Vec<LLMMessage>> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl BaseLLM for ScriptedLLM {
    fn model(&self) -> &str {
        "scripted"
    }

    fn provider(&self) -> &str {
        "test"
    }

    async fn call(&self, messages: Vec<LLMMessage>) -> Result<LLMResponse, LlmError> {
        self.calls.lock().push(messages);
        let next = self.replies.lock().pop_front();
        match next.unwrap_or_else(|| Ok(self.fallback.clone())) {
            Ok(content) => Ok(LLMResponse {
                content,
                usage: Some(UsageMetrics {
                    total_tokens: 10,
                    prompt_tokens: 7,
                    cached_prompt_tokens: 0,
                    completion_tokens: 3,
                    successful_requests: 1,
                }),
            }),
            Err(message) => Err(LlmError::InvalidResponse(message)),
        }
    }
}
