//! Agent module.
//!
//! Contains the [`Agent`] struct and the parser that pulls the final answer
//! out of an LLM response.

pub mod core;
pub mod parser;

pub use self::core::{Agent, AgentExecution};
