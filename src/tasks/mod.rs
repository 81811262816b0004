//! Task sub-modules.

pub mod task_output;
