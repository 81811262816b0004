//! Request and response bodies of the HTTP API.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

fn default_verbose() -> bool {
    true
}

/// One agent of a crew request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    pub role: String,
    pub goal: String,
    pub backstory: String,
    #[serde(default = "default_verbose")]
    pub verbose: bool,
}

/// One task of a crew request, bound to an agent by role.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskConfig {
    pub description: String,
    pub expected_output: String,
    pub agent_role: String,
}

/// Body of `POST /api/crew/run`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrewRequest {
    pub agents: Vec<AgentConfig>,
    pub tasks: Vec<TaskConfig>,
    #[serde(default = "default_verbose")]
    pub verbose: bool,
    /// Values for `{placeholder}`s in agents and tasks.
    #[serde(default)]
    pub inputs: HashMap<String, String>,
}

/// Successful response of the crew endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrewResponse {
    pub result: String,
    pub status: String,
}

impl CrewResponse {
    pub fn success(result: impl Into<String>) -> Self {
        Self {
            result: result.into(),
            status: "success".to_string(),
        }
    }
}

/// Query parameters of `POST /api/agent/simple`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimpleAgentQuery {
    pub role: String,
    pub goal: String,
    pub task_description: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crew_request_defaults() {
        let request: CrewRequest = serde_json::from_value(serde_json::json!({
            "agents": [{"role": "Writer", "goal": "Write", "backstory": "Novelist"}],
            "tasks": [{"description": "Write a poem", "expected_output": "A poem", "agent_role": "Writer"}]
        }))
        .unwrap();

        assert!(request.verbose);
        assert!(request.agents[0].verbose);
        assert!(request.inputs.is_empty());
        assert_eq!(request.tasks[0].agent_role, "Writer");
    }

    #[test]
    fn test_crew_request_explicit_flags() {
        let request: CrewRequest = serde_json::from_value(serde_json::json!({
            "agents": [{"role": "Writer", "goal": "Write", "backstory": "Novelist", "verbose": false}],
            "tasks": [],
            "verbose": false,
            "inputs": {"topic": "rain"}
        }))
        .unwrap();

        assert!(!request.verbose);
        assert!(!request.agents[0].verbose);
        assert_eq!(request.inputs["topic"], "rain");
    }

    #[test]
    fn test_agent_config_requires_backstory() {
        let result: Result<AgentConfig, _> =
            serde_json::from_value(serde_json::json!({"role": "Writer", "goal": "Write"}));
        assert!(result.unwrap_err().to_string().contains("backstory"));
    }

    #[test]
    fn test_crew_response_success() {
        let value = serde_json::to_value(CrewResponse::success("done")).unwrap();
        assert_eq!(value, serde_json::json!({"result": "done", "status": "success"}));
    }
}
