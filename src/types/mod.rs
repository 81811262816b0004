//! Shared type definitions.

pub mod usage_metrics;
