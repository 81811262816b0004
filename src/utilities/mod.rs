//! Utility modules.

pub mod errors;
pub mod prompts;
pub mod string_utils;
