//! # crewai-service
//!
//! An HTTP façade over a small crew engine. Requests describe agents and
//! tasks; the service builds a crew from them, runs it, and returns the
//! final result as JSON.
//!
//! The engine itself follows the crewAI model: an [`Agent`] is a
//! role/goal/backstory bound to an LLM, a [`Task`] is bound to one agent by
//! role, and a [`Crew`] runs its tasks sequentially, passing every earlier
//! output to the next task as context.

pub mod agent;
pub mod config;
pub mod crew;
pub mod crews;
pub mod llms;
pub mod process;
pub mod server;
pub mod task;
pub mod tasks;
pub mod types;
pub mod utilities;

pub use agent::Agent;
pub use config::ServiceConfig;
pub use crew::Crew;
pub use crews::crew_output::CrewOutput;
pub use llms::base_llm::BaseLLM;
pub use process::Process;
pub use task::Task;
pub use tasks::task_output::TaskOutput;
pub use utilities::errors::{ConfigError, CrewError, LlmError};

/// Service version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
