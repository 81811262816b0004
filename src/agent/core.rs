//! Core Agent struct.
//!
//! An agent is a role/goal/backstory triple bound to an LLM. It turns a task
//! prompt into a conversation, runs it, and extracts the final answer.

use std::collections::HashMap;
use std::sync::Arc;

use log::Level;
use uuid::Uuid;

use super::parser::extract_final_answer;
use crate::llms::base_llm::{BaseLLM, LLMMessage};
use crate::types::usage_metrics::UsageMetrics;
use crate::utilities::errors::CrewError;
use crate::utilities::prompts::{self, AgentInfo};
use crate::utilities::string_utils::interpolate_only;

/// Default number of LLM calls an agent may spend on one task.
pub const DEFAULT_MAX_ITER: u32 = 3;

/// What an agent produced for one task.
#[derive(Debug, Clone)]
pub struct AgentExecution {
    /// The extracted final answer.
    pub output: String,
    /// The full conversation, including the assistant replies.
    pub messages: Vec<LLMMessage>,
    /// Tokens consumed by every call made for this task.
    pub usage: UsageMetrics,
}

/// Represents an agent in a crew.
///
/// # Fields
///
/// * `role` - Role of the agent; tasks name their agent by it
/// * `goal` - Objective of the agent
/// * `backstory` - Backstory of the agent
/// * `verbose` - Log prompts and answers at info level
/// * `max_iter` - LLM calls allowed before giving up on an empty answer
/// * `llm` - Language model that runs the agent
#[derive(Debug, Clone)]
pub struct Agent {
    pub id: Uuid,
    pub role: String,
    pub goal: String,
    pub backstory: String,
    pub verbose: bool,
    pub max_iter: u32,
    pub llm: Arc<dyn BaseLLM>,
}

impl Agent {
    /// Create a new Agent with the required fields and defaults for the rest.
    pub fn new(
        role: impl Into<String>,
        goal: impl Into<String>,
        backstory: impl Into<String>,
        llm: Arc<dyn BaseLLM>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            role: role.into(),
            goal: goal.into(),
            backstory: backstory.into(),
            verbose: false,
            max_iter: DEFAULT_MAX_ITER,
            llm,
        }
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    fn log_level(&self) -> Level {
        if self.verbose {
            Level::Info
        } else {
            Level::Debug
        }
    }

    /// Execute a task and return the agent's final answer.
    ///
    /// # Arguments
    ///
    /// * `task_prompt` - Description plus expected output of the task.
    /// * `context` - Outputs of earlier tasks, if any.
    ///
    /// # Errors
    ///
    /// Fails when the LLM call fails, or when `max_iter` calls all came back
    /// without an answer.
    pub async fn execute_task(
        &self,
        task_prompt: &str,
        context: Option<&str>,
    ) -> Result<AgentExecution, CrewError> {
        let level = self.log_level();
        log::log!(level, "Agent '{}' starting task: {}", self.role, task_prompt);

        let info = AgentInfo {
            role: &self.role,
            goal: &self.goal,
            backstory: &self.backstory,
        };
        let mut messages = vec![
            LLMMessage::system(prompts::system_prompt(&info)),
            LLMMessage::user(prompts::user_prompt(task_prompt, context)),
        ];
        let mut usage = UsageMetrics::new();
        let attempts = self.max_iter.max(1);

        for attempt in 1..=attempts {
            let response = self.llm.call(messages.clone()).await?;
            if let Some(ref call_usage) = response.usage {
                usage.add_usage_metrics(call_usage);
            }

            let answer = extract_final_answer(&response.content);
            messages.push(LLMMessage::assistant(response.content));

            if !answer.is_empty() {
                log::log!(level, "Agent '{}' final answer: {}", self.role, answer);
                return Ok(AgentExecution {
                    output: answer,
                    messages,
                    usage,
                });
            }

            log::warn!(
                "Agent '{}' returned an empty answer (attempt {}/{})",
                self.role,
                attempt,
                attempts
            );
            messages.push(LLMMessage::user(prompts::force_final_answer()));
        }

        Err(CrewError::EmptyAnswer {
            role: self.role.clone(),
            attempts,
        })
    }

    /// Interpolate `{placeholder}` inputs into role, goal and backstory.
    pub fn interpolate_inputs(&mut self, inputs: &HashMap<String, String>) -> Result<(), CrewError> {
        self.role = interpolate_only(&self.role, inputs)?;
        self.goal = interpolate_only(&self.goal, inputs)?;
        self.backstory = interpolate_only(&self.backstory, inputs)?;
        Ok(())
    }
}

impl std::fmt::Display for Agent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Agent(role={}, goal={})", self.role, self.goal)
    }
}
