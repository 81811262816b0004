//! Task output representation.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::llms::base_llm::LLMMessage;

/// The result of a task.
///
/// # Fields
///
/// * `description` - Description of the task
/// * `expected_output` - Expected output of the task
/// * `summary` - First ten words of the description
/// * `raw` - Raw output of the task
/// * `agent` - Role of the agent that executed the task
/// * `messages` - Conversation exchanged with the LLM
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskOutput {
    pub description: String,
    pub expected_output: String,
    pub summary: String,
    pub raw: String,
    pub agent: String,
    #[serde(default)]
    pub messages: Vec<LLMMessage>,
}

impl TaskOutput {
    /// Create a new TaskOutput with summary generated from description.
    pub fn new(
        description: impl Into<String>,
        expected_output: impl Into<String>,
        agent: impl Into<String>,
        raw: impl Into<String>,
    ) -> Self {
        let description = description.into();
        let summary = Self::generate_summary(&description);
        Self {
            description,
            expected_output: expected_output.into(),
            summary,
            raw: raw.into(),
            agent: agent.into(),
            messages: Vec::new(),
        }
    }

    /// Generate a summary from the description (first 10 words + "...").
    fn generate_summary(description: &str) -> String {
        let excerpt = description
            .split_whitespace()
            .take(10)
            .collect::<Vec<&str>>()
            .join(" ");
        format!("{}...", excerpt)
    }
}

impl fmt::Display for TaskOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}
