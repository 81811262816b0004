//! Main Crew struct.
//!
//! A crew owns a set of agents and an ordered list of tasks. Kickoff runs the
//! tasks one after another, each through the agent whose role the task names,
//! and hands every task the outputs of the tasks before it.

use std::collections::{HashMap, HashSet};

use log::Level;
use uuid::Uuid;

use crate::agent::Agent;
use crate::crews::crew_output::CrewOutput;
use crate::process::Process;
use crate::task::Task;
use crate::tasks::task_output::TaskOutput;
use crate::types::usage_metrics::UsageMetrics;
use crate::utilities::errors::CrewError;

/// Separator placed between earlier task outputs in a task's context.
pub const CONTEXT_SEPARATOR: &str = "\n\n---\n\n";

/// Represents a group of agents and the tasks they should perform.
#[derive(Debug)]
pub struct Crew {
    /// Unique identifier for the crew instance.
    pub id: Uuid,
    /// Agents part of this crew. A repeated role resolves to the last agent.
    pub agents: Vec<Agent>,
    /// Tasks in execution order.
    pub tasks: Vec<Task>,
    /// The process flow that the crew follows.
    pub process: Process,
    /// Log task progress at info level.
    pub verbose: bool,
    /// Token usage of the last kickoff.
    pub usage_metrics: Option<UsageMetrics>,
}

impl Crew {
    /// Create a new Crew.
    ///
    /// # Errors
    ///
    /// Fails when there are no tasks, or when a task names a role no agent
    /// has.
    pub fn new(agents: Vec<Agent>, tasks: Vec<Task>) -> Result<Self, CrewError> {
        Self::with_inputs(agents, tasks, &HashMap::new())
    }

    /// Create a new Crew, interpolating `inputs` before roles are bound.
    ///
    /// A task may then name a templated role (`"{topic} Analyst"`) by its
    /// interpolated value.
    pub fn with_inputs(
        agents: Vec<Agent>,
        tasks: Vec<Task>,
        inputs: &HashMap<String, String>,
    ) -> Result<Self, CrewError> {
        let mut crew = Self {
            id: Uuid::new_v4(),
            agents,
            tasks,
            process: Process::default(),
            verbose: false,
            usage_metrics: None,
        };
        if !inputs.is_empty() {
            crew.interpolate_inputs(inputs)?;
        }
        crew.validate()?;
        Ok(crew)
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    fn validate(&self) -> Result<(), CrewError> {
        if self.tasks.is_empty() {
            return Err(CrewError::NoTasks);
        }

        let mut roles = HashSet::new();
        for agent in &self.agents {
            if !roles.insert(agent.role.as_str()) {
                log::warn!(
                    "Agent role '{}' is defined more than once; the last definition is used",
                    agent.role
                );
            }
        }

        if let Some(task) = self.tasks.iter().find(|t| !roles.contains(t.agent.as_str())) {
            return Err(CrewError::AgentNotFound {
                role: task.agent.clone(),
            });
        }

        Ok(())
    }

    fn log_level(&self) -> Level {
        if self.verbose {
            Level::Info
        } else {
            Level::Debug
        }
    }

    /// Execute the crew's workflow.
    ///
    /// # Arguments
    ///
    /// * `inputs` - Values for `{placeholder}`s in agents and tasks. Nothing
    ///   is interpolated when empty.
    ///
    /// # Errors
    ///
    /// Stops at the first task that fails and returns its error.
    pub async fn kickoff(&mut self, inputs: &HashMap<String, String>) -> Result<CrewOutput, CrewError> {
        if !inputs.is_empty() {
            self.interpolate_inputs(inputs)?;
            self.validate()?;
        }

        let level = self.log_level();
        log::log!(level, "Crew {} kickoff: {}", self.id, self);

        let result = match self.process {
            Process::Sequential => self.run_sequential_process().await,
        };

        match result {
            Ok((task_outputs, usage)) => {
                self.usage_metrics = Some(usage.clone());
                let output = Self::create_crew_output(task_outputs, usage)?;
                log::log!(level, "Crew {} finished", self.id);
                Ok(output)
            }
            Err(e) => {
                log::error!("Crew {} failed: {}", self.id, e);
                Err(e)
            }
        }
    }

    /// Interpolate inputs into tasks and agents.
    fn interpolate_inputs(&mut self, inputs: &HashMap<String, String>) -> Result<(), CrewError> {
        for task in &mut self.tasks {
            task.interpolate_inputs(inputs)?;
        }
        for agent in &mut self.agents {
            agent.interpolate_inputs(inputs)?;
        }
        Ok(())
    }

    /// Execute tasks in order, feeding earlier outputs forward as context.
    async fn run_sequential_process(&mut self) -> Result<(Vec<TaskOutput>, UsageMetrics), CrewError> {
        let level = self.log_level();
        // Later agents overwrite earlier ones with the same role.
        let agents: HashMap<&str, &Agent> =
            self.agents.iter().map(|a| (a.role.as_str(), a)).collect();

        let mut task_outputs: Vec<TaskOutput> = Vec::with_capacity(self.tasks.len());
        let mut usage = UsageMetrics::new();
        let total = self.tasks.len();

        for (index, task) in self.tasks.iter_mut().enumerate() {
            let agent = agents
                .get(task.agent.as_str())
                .copied()
                .ok_or_else(|| CrewError::AgentNotFound {
                    role: task.agent.clone(),
                })?;

            let context = if task_outputs.is_empty() {
                None
            } else {
                Some(
                    task_outputs
                        .iter()
                        .map(|o| o.raw.as_str())
                        .collect::<Vec<_>>()
                        .join(CONTEXT_SEPARATOR),
                )
            };

            log::log!(
                level,
                "Task {}/{} started by '{}': {}",
                index + 1,
                total,
                agent.role,
                task.description
            );

            let (output, task_usage) = task.execute(agent, context.as_deref()).await?;
            usage.add_usage_metrics(&task_usage);
            task_outputs.push(output);
        }

        Ok((task_outputs, usage))
    }

    /// Create CrewOutput from task outputs.
    fn create_crew_output(
        task_outputs: Vec<TaskOutput>,
        token_usage: UsageMetrics,
    ) -> Result<CrewOutput, CrewError> {
        let raw = task_outputs
            .iter()
            .rev()
            .find(|t| !t.raw.is_empty())
            .map(|t| t.raw.clone())
            .ok_or(CrewError::NoOutput)?;

        Ok(CrewOutput::new(raw, task_outputs, token_usage))
    }
}

impl std::fmt::Display for Crew {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Crew(id={}, process={}, number_of_agents={}, number_of_tasks={})",
            self.id,
            self.process,
            self.agents.len(),
            self.tasks.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llms::testing::ScriptedLLM;
    use std::sync::Arc;

    fn agent(role: &str, llm: &Arc<ScriptedLLM>) -> Agent {
        Agent::new(role, format!("Be a good {role}"), "Experienced.", llm.clone())
    }

    #[test]
    fn test_new_rejects_empty_tasks() {
        let llm = Arc::new(ScriptedLLM::constant("Final Answer: x"));
        let err = Crew::new(vec![agent("Writer", &llm)], vec![]).unwrap_err();
        assert!(matches!(err, CrewError::NoTasks));
    }

    #[test]
    fn test_new_rejects_unknown_role() {
        let llm = Arc::new(ScriptedLLM::constant("Final Answer: x"));
        let err = Crew::new(
            vec![agent("Writer", &llm)],
            vec![Task::new("Edit", "Edited text", "Editor")],
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "Agent role 'Editor' not found");
    }

    #[tokio::test]
    async fn test_duplicate_roles_bind_to_last_agent() {
        let llm = Arc::new(ScriptedLLM::constant("Final Answer: x"));
        let first = Agent::new("Writer", "Write poems", "Poet.", llm.clone());
        let second = Agent::new("Writer", "Write news", "Reporter.", llm.clone());
        let mut crew = Crew::new(vec![first, second], vec![Task::new("Write", "Text", "Writer")]).unwrap();

        crew.kickoff(&HashMap::new()).await.unwrap();

        let system = &llm.calls()[0][0].content;
        assert!(system.contains("Reporter."));
        assert!(!system.contains("Poet."));
    }

    #[test]
    fn test_with_inputs_binds_interpolated_roles() {
        let llm = Arc::new(ScriptedLLM::constant("Final Answer: x"));
        let inputs = HashMap::from([("topic".to_string(), "Markets".to_string())]);

        let crew = Crew::with_inputs(
            vec![agent("{topic} Analyst", &llm)],
            vec![Task::new("Analyze", "Findings", "Markets Analyst")],
            &inputs,
        )
        .unwrap();

        assert_eq!(crew.agents[0].role, "Markets Analyst");
        assert!(Crew::new(
            vec![agent("{topic} Analyst", &llm)],
            vec![Task::new("Analyze", "Findings", "Markets Analyst")],
        )
        .is_err());
    }

    #[tokio::test]
    async fn test_kickoff_runs_tasks_in_order_with_context() {
        let llm = Arc::new(ScriptedLLM::new(vec![
            Ok("Final Answer: research notes".to_string()),
            Ok("Final Answer: draft article".to_string()),
            Ok("Final Answer: polished article".to_string()),
        ]));
        let mut crew = Crew::new(
            vec![agent("Researcher", &llm), agent("Writer", &llm)],
            vec![
                Task::new("Research", "Notes", "Researcher"),
                Task::new("Write", "Draft", "Writer"),
                Task::new("Polish", "Final", "Writer"),
            ],
        )
        .unwrap();

        let output = crew.kickoff(&HashMap::new()).await.unwrap();

        assert_eq!(output.raw, "polished article");
        assert_eq!(output.to_string(), "polished article");
        assert_eq!(output.tasks_output.len(), 3);
        assert_eq!(output.tasks_output[0].agent, "Researcher");
        assert_eq!(output.tasks_output[1].agent, "Writer");
        assert_eq!(output.token_usage.successful_requests, 3);
        assert_eq!(crew.usage_metrics.as_ref().unwrap().total_tokens, 30);

        let calls = llm.calls();
        assert!(!calls[0][1].content.contains("context you're working with"));
        assert!(calls[1][1].content.contains("research notes"));
        assert!(calls[2][1]
            .content
            .contains("research notes\n\n---\n\ndraft article"));
        assert!(calls[1][0].content.starts_with("You are Writer."));
    }

    #[tokio::test]
    async fn test_kickoff_stops_at_first_failure() {
        let llm = Arc::new(ScriptedLLM::new(vec![Err("rate limited".to_string())]));
        let mut crew = Crew::new(
            vec![agent("Researcher", &llm)],
            vec![
                Task::new("Research", "Notes", "Researcher"),
                Task::new("Research more", "More notes", "Researcher"),
            ],
        )
        .unwrap();

        let err = crew.kickoff(&HashMap::new()).await.unwrap_err();

        assert!(err.to_string().contains("rate limited"));
        assert_eq!(llm.calls().len(), 1);
        assert!(crew.tasks[1].start_time.is_none());
    }

    #[tokio::test]
    async fn test_kickoff_interpolates_inputs() {
        let llm = Arc::new(ScriptedLLM::constant("Final Answer: ok"));
        let mut crew = Crew::new(
            vec![agent("{topic} Analyst", &llm)],
            vec![Task::new("Analyze {topic}", "Findings on {topic}", "{topic} Analyst")],
        )
        .unwrap();
        let inputs = HashMap::from([("topic".to_string(), "Markets".to_string())]);

        crew.kickoff(&inputs).await.unwrap();

        assert_eq!(crew.agents[0].role, "Markets Analyst");
        assert_eq!(crew.tasks[0].description, "Analyze Markets");
        assert!(llm.calls()[0][1].content.contains("Analyze Markets"));
    }

    #[tokio::test]
    async fn test_kickoff_missing_input_fails_before_execution() {
        let llm = Arc::new(ScriptedLLM::constant("Final Answer: ok"));
        let mut crew = Crew::new(
            vec![agent("Analyst", &llm)],
            vec![Task::new("Analyze {topic} in {region}", "Findings", "Analyst")],
        )
        .unwrap();
        let inputs = HashMap::from([("topic".to_string(), "Markets".to_string())]);

        let err = crew.kickoff(&inputs).await.unwrap_err();

        assert!(matches!(err, CrewError::MissingInput { ref key } if key == "region"));
        assert!(llm.calls().is_empty());
    }

    #[test]
    fn test_display() {
        let llm = Arc::new(ScriptedLLM::constant("Final Answer: x"));
        let crew = Crew::new(
            vec![agent("Writer", &llm)],
            vec![Task::new("Write", "Text", "Writer")],
        )
        .unwrap();
        let text = crew.to_string();
        assert!(text.contains("process=sequential"));
        assert!(text.contains("number_of_agents=1"));
        assert!(text.contains("number_of_tasks=1"));
    }
}
