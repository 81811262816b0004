//! Main Task struct.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

use crate::agent::Agent;
use crate::tasks::task_output::TaskOutput;
use crate::types::usage_metrics::UsageMetrics;
use crate::utilities::errors::CrewError;
use crate::utilities::prompts;
use crate::utilities::string_utils::interpolate_only;

/// Represents a task to be executed.
///
/// Each task has a description, an expected output, and the role of the
/// agent responsible for executing it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    /// Unique identifier for the task.
    pub id: Uuid,
    /// Descriptive text detailing the task's purpose and execution.
    pub description: String,
    /// Clear definition of expected task outcome.
    pub expected_output: String,
    /// Role of the agent responsible for execution.
    pub agent: String,
    /// Task output, the final result after being executed.
    pub output: Option<TaskOutput>,
    /// Start time of the last execution.
    pub start_time: Option<DateTime<Utc>>,
    /// End time of the last execution.
    pub end_time: Option<DateTime<Utc>>,
}

impl Task {
    /// Create a new Task bound to the agent with `agent_role`.
    pub fn new(
        description: impl Into<String>,
        expected_output: impl Into<String>,
        agent_role: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            description: description.into(),
            expected_output: expected_output.into(),
            agent: agent_role.into(),
            output: None,
            start_time: None,
            end_time: None,
        }
    }

    /// The prompt handed to the agent: description plus expected output.
    pub fn prompt(&self) -> String {
        prompts::task_prompt(&self.description, &self.expected_output)
    }

    /// Execute the task with `agent`, given the outputs of earlier tasks.
    ///
    /// Records timing and stores the output on the task.
    pub async fn execute(
        &mut self,
        agent: &Agent,
        context: Option<&str>,
    ) -> Result<(TaskOutput, UsageMetrics), CrewError> {
        self.start_time = Some(Utc::now());

        let execution = agent.execute_task(&self.prompt(), context).await;
        self.end_time = Some(Utc::now());
        let execution = execution?;

        let mut output = TaskOutput::new(
            self.description.clone(),
            self.expected_output.clone(),
            agent.role.clone(),
            execution.output,
        );
        output.messages = execution.messages;
        self.output = Some(output.clone());

        log::debug!(
            "Task '{}' completed by '{}' in {:?}s",
            output.summary,
            agent.role,
            self.execution_duration()
        );

        Ok((output, execution.usage))
    }

    /// Get the execution duration in seconds, if both start and end times are set.
    pub fn execution_duration(&self) -> Option<f64> {
        match (self.start_time, self.end_time) {
            (Some(start), Some(end)) => Some((end - start).num_milliseconds() as f64 / 1000.0),
            _ => None,
        }
    }

    /// Interpolate `{placeholder}` inputs into description and expected output.
    pub fn interpolate_inputs(&mut self, inputs: &HashMap<String, String>) -> Result<(), CrewError> {
        self.description = interpolate_only(&self.description, inputs)?;
        self.expected_output = interpolate_only(&self.expected_output, inputs)?;
        self.agent = interpolate_only(&self.agent, inputs)?;
        Ok(())
    }
}

impl std::fmt::Display for Task {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Task(description={}, expected_output={})", self.description, self.expected_output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llms::testing::ScriptedLLM;
    use std::sync::Arc;

    #[test]
    fn test_prompt_combines_description_and_expected_output() {
        let task = Task::new("Research Rust", "A short summary", "Researcher");
        let prompt = task.prompt();
        assert!(prompt.starts_with("Research Rust"));
        assert!(prompt.contains("A short summary"));
    }

    #[tokio::test]
    async fn test_execute_records_output_and_timing() {
        let llm = Arc::new(ScriptedLLM::constant("Final Answer: Rust is a systems language."));
        let agent = Agent::new("Researcher", "Find facts", "Analyst.", llm);
        let mut task = Task::new("Research Rust", "A short summary", "Researcher");

        let (output, usage) = task.execute(&agent, None).await.unwrap();

        assert_eq!(output.raw, "Rust is a systems language.");
        assert_eq!(output.agent, "Researcher");
        assert_eq!(output.expected_output, "A short summary");
        assert_eq!(output.messages.len(), 3);
        assert_eq!(usage.successful_requests, 1);
        assert!(task.output.is_some());
        assert!(task.execution_duration().is_some());
    }

    #[tokio::test]
    async fn test_execute_failure_still_records_end_time() {
        let llm = Arc::new(ScriptedLLM::new(vec![Err("boom".to_string())]));
        let agent = Agent::new("Researcher", "Find facts", "Analyst.", llm);
        let mut task = Task::new("Research Rust", "A short summary", "Researcher");

        assert!(task.execute(&agent, None).await.is_err());
        assert!(task.output.is_none());
        assert!(task.end_time.is_some());
    }

    #[test]
    fn test_interpolate_inputs() {
        let mut task = Task::new("Research {topic}", "A summary of {topic}", "{topic} Researcher");
        let inputs = HashMap::from([("topic".to_string(), "Rust".to_string())]);

        task.interpolate_inputs(&inputs).unwrap();

        assert_eq!(task.description, "Research Rust");
        assert_eq!(task.expected_output, "A summary of Rust");
        assert_eq!(task.agent, "Rust Researcher");
    }
}
