//! Axum route handlers for the crew service.
//!
//! # Routes
//!
//! - `GET  /`                  - Service banner
//! - `GET  /health`            - Returns `{"status": "healthy"}`
//! - `POST /api/crew/run`      - Accepts `CrewRequest`, runs the crew
//! - `POST /api/agent/simple`  - Runs one agent on one task from query params
//!
//! Anything else falls through to a JSON 404.

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    http::HeaderValue,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use super::error::ApiError;
use super::models::{AgentConfig, CrewRequest, CrewResponse, SimpleAgentQuery, TaskConfig};
use crate::agent::Agent;
use crate::config::ServiceConfig;
use crate::crew::Crew;
use crate::llms::{self, BaseLLM};
use crate::task::Task;
use crate::utilities::errors::{CrewError, LlmError};

/// Name reported by `GET /`.
pub const SERVICE_NAME: &str = "CrewAI Service";

/// Expected output used by the single-agent endpoint.
const SIMPLE_EXPECTED_OUTPUT: &str = "A detailed response to the task";

/// Shared application state for the HTTP server.
#[derive(Clone)]
pub struct AppState {
    /// LLM shared by every agent the service builds.
    pub llm: Arc<dyn BaseLLM>,
    /// Origins allowed by the CORS layer.
    pub cors_origins: Arc<Vec<String>>,
}

impl AppState {
    pub fn new(llm: Arc<dyn BaseLLM>) -> Self {
        Self {
            llm,
            cors_origins: Arc::new(vec![crate::config::DEFAULT_CORS_ORIGIN.to_string()]),
        }
    }

    /// Build the state from the service configuration.
    pub fn from_config(config: &ServiceConfig) -> Result<Self, LlmError> {
        let llm = llms::create_llm(&config.llm)?;
        Ok(Self {
            llm,
            cors_origins: Arc::new(config.cors_origins.clone()),
        })
    }
}

/// Build the axum router with all routes.
pub fn app_router(state: AppState) -> Router {
    let cors = cors_layer(&state.cors_origins);

    Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
        .route("/api/crew/run", post(run_crew_handler))
        .route("/api/agent/simple", post(run_simple_agent_handler))
        .fallback(fallback_handler)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// CORS with credentials for the configured origins.
///
/// Credentials forbid wildcard methods and headers, so the request's own
/// values are mirrored instead; a `*` origin is mirrored the same way.
fn cors_layer(origins: &[String]) -> CorsLayer {
    let allow_origin = if origins.iter().any(|o| o == "*") {
        AllowOrigin::mirror_request()
    } else {
        let values: Vec<HeaderValue> = origins
            .iter()
            .filter_map(|origin| match HeaderValue::from_str(origin) {
                Ok(value) => Some(value),
                Err(_) => {
                    tracing::warn!("Ignoring invalid CORS origin '{}'", origin);
                    None
                }
            })
            .collect();
        AllowOrigin::list(values)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_credentials(true)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
}

/// GET / - service banner.
async fn root_handler() -> impl IntoResponse {
    Json(serde_json::json!({
        "service": SERVICE_NAME,
        "status": "running",
        "version": crate::VERSION,
    }))
}

/// GET /health - liveness probe.
async fn health_handler() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "healthy" }))
}

async fn fallback_handler() -> ApiError {
    ApiError::not_found()
}

/// Build agents keyed by role and tasks bound to them.
///
/// `inputs` are interpolated before tasks are bound, so a task may name a
/// templated role by its interpolated value.
fn build_crew(
    llm: &Arc<dyn BaseLLM>,
    agents: Vec<AgentConfig>,
    tasks: Vec<TaskConfig>,
    verbose: bool,
    inputs: &HashMap<String, String>,
) -> Result<Crew, CrewError> {
    let agents = agents
        .into_iter()
        .map(|cfg| Agent::new(cfg.role, cfg.goal, cfg.backstory, llm.clone()).with_verbose(cfg.verbose))
        .collect();
    let tasks = tasks
        .into_iter()
        .map(|cfg| Task::new(cfg.description, cfg.expected_output, cfg.agent_role))
        .collect();

    Ok(Crew::with_inputs(agents, tasks, inputs)?.with_verbose(verbose))
}

/// Run `crew`, logging and mapping any failure.
async fn kickoff(mut crew: Crew) -> Result<Json<CrewResponse>, ApiError> {
    tracing::info!("Starting crew execution...");
    match crew.kickoff(&HashMap::new()).await {
        Ok(result) => {
            tracing::info!("Crew execution completed");
            Ok(Json(CrewResponse::success(result.to_string())))
        }
        Err(e) => {
            tracing::error!("Error running crew: {}", e);
            Err(ApiError::from(e))
        }
    }
}

/// POST /api/crew/run - run a crew of agents with the specified tasks.
///
/// Request:  `CrewRequest` = `{ "agents": [...], "tasks": [...], "verbose": bool, "inputs": {...} }`
/// Response: `CrewResponse` = `{ "result": "...", "status": "success" }`
async fn run_crew_handler(
    State(state): State<AppState>,
    payload: Result<Json<CrewRequest>, JsonRejection>,
) -> Result<Json<CrewResponse>, ApiError> {
    let Json(request) = payload?;

    tracing::info!(
        "Received crew request with {} agents and {} tasks",
        request.agents.len(),
        request.tasks.len()
    );

    let crew = build_crew(
        &state.llm,
        request.agents,
        request.tasks,
        request.verbose,
        &request.inputs,
    )
    .map_err(|e| {
        tracing::warn!("Rejected crew request: {}", e);
        ApiError::from(e)
    })?;

    kickoff(crew).await
}

/// POST /api/agent/simple - run a single-agent task.
///
/// Query: `role`, `goal`, `task_description`.
async fn run_simple_agent_handler(
    State(state): State<AppState>,
    query: Result<Query<SimpleAgentQuery>, QueryRejection>,
) -> Result<Json<CrewResponse>, ApiError> {
    let Query(query) = query?;

    let agent = AgentConfig {
        backstory: format!("An AI assistant specialized in {}", query.role),
        role: query.role.clone(),
        goal: query.goal,
        verbose: true,
    };
    let task = TaskConfig {
        description: query.task_description,
        expected_output: SIMPLE_EXPECTED_OUTPUT.to_string(),
        agent_role: query.role,
    };

    let crew = build_crew(&state.llm, vec![agent], vec![task], true, &HashMap::new())?;
    kickoff(crew).await
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
