//! Crew output representation.
//!
//! The result of a crew execution: the final raw text, the output of every
//! task in execution order, and the token usage across all of them.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::tasks::task_output::TaskOutput;
use crate::types::usage_metrics::UsageMetrics;

/// The result of a crew.
///
/// # Fields
///
/// * `raw` - Raw output of crew (the final task's raw text).
/// * `tasks_output` - Output of each task in execution order.
/// * `token_usage` - Token summary across all tasks.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CrewOutput {
    pub raw: String,
    pub tasks_output: Vec<TaskOutput>,
    pub token_usage: UsageMetrics,
}

impl CrewOutput {
    /// Create a new CrewOutput.
    pub fn new(raw: String, tasks_output: Vec<TaskOutput>, token_usage: UsageMetrics) -> Self {
        Self {
            raw,
            tasks_output,
            token_usage,
        }
    }
}

impl fmt::Display for CrewOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_is_raw() {
        let output = CrewOutput::new(
            "final report".to_string(),
            vec![TaskOutput::new("Write", "Report", "Writer", "final report")],
            UsageMetrics::new(),
        );
        assert_eq!(output.to_string(), "final report");
    }
}
