//! Error types for the crew engine and service configuration.

use thiserror::Error;

/// Errors raised by LLM providers.
#[derive(Debug, Error)]
pub enum LlmError {
    /// The provider was constructed with invalid settings.
    #[error("LLM configuration error: {0}")]
    Configuration(String),

    /// No API key was supplied or found in the environment.
    #[error("{provider} API key not set. Set {env_var} environment variable.")]
    MissingApiKey {
        provider: &'static str,
        env_var: &'static str,
    },

    /// The provider answered with a non-retryable error status.
    #[error("{provider} API error ({status}): {body}")]
    Api {
        provider: &'static str,
        status: u16,
        body: String,
    },

    /// Every attempt failed with a retryable error.
    #[error("{provider} API call failed after {attempts} attempts: {last_error}")]
    RetriesExhausted {
        provider: &'static str,
        attempts: u32,
        last_error: String,
    },

    /// The provider answered 2xx with a body we could not interpret.
    #[error("Invalid LLM response: {0}")]
    InvalidResponse(String),
}

/// Errors raised while building or running a crew.
#[derive(Debug, Error)]
pub enum CrewError {
    /// A crew was built without tasks.
    #[error("Crew must have at least one task")]
    NoTasks,

    /// A task references a role no agent has.
    #[error("Agent role '{role}' not found")]
    AgentNotFound { role: String },

    /// A `{placeholder}` has no value in the kickoff inputs.
    #[error("Template variable '{key}' not found in inputs")]
    MissingInput { key: String },

    /// The agent produced no usable answer within its iteration budget.
    #[error("Agent '{role}' produced no final answer after {attempts} attempts")]
    EmptyAnswer { role: String, attempts: u32 },

    /// Kickoff finished without any non-empty task output.
    #[error("No valid task outputs available to create crew output.")]
    NoOutput,

    /// The underlying LLM call failed.
    #[error(transparent)]
    Llm(#[from] LlmError),
}

impl CrewError {
    /// Whether the error stems from the request that built the crew rather
    /// than from executing it.
    pub fn is_invalid_request(&self) -> bool {
        matches!(
            self,
            Self::NoTasks | Self::AgentNotFound { .. } | Self::MissingInput { .. }
        )
    }
}

/// Errors raised while loading the service configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An environment variable holds a value that cannot be parsed.
    #[error("Invalid value '{value}' for {key}: {reason}")]
    InvalidValue {
        key: &'static str,
        value: String,
        reason: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_agent_not_found_message() {
        let err = CrewError::AgentNotFound {
            role: "Writer".to_string(),
        };
        assert_eq!(err.to_string(), "Agent role 'Writer' not found");
        assert!(err.is_invalid_request());
    }

    #[test]
    fn test_llm_errors_are_not_request_errors() {
        let err = CrewError::from(LlmError::InvalidResponse("empty".to_string()));
        assert!(!err.is_invalid_request());
        assert_eq!(err.to_string(), "Invalid LLM response: empty");
    }

    #[test]
    fn test_missing_api_key_message() {
        let err = LlmError::MissingApiKey {
            provider: "OpenAI",
            env_var: "OPENAI_API_KEY",
        };
        assert!(err.to_string().contains("OPENAI_API_KEY"));
    }
}
