//! HTTP server for the crew service.
//!
//! Exposes crew execution over JSON-over-HTTP.
//!
//! # Endpoints
//!
//! - `GET  /`                 - Service banner
//! - `GET  /health`           - Liveness probe
//! - `POST /api/crew/run`     - Run a crew of agents
//! - `POST /api/agent/simple` - Run a single agent on a single task

pub mod error;
pub mod models;
pub mod routes;

pub use error::ApiError;
pub use models::{AgentConfig, CrewRequest, CrewResponse, SimpleAgentQuery, TaskConfig};
pub use routes::{app_router, AppState};
