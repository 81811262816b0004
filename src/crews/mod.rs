//! Crew sub-modules.

pub mod crew_output;

pub use crew_output::CrewOutput;
