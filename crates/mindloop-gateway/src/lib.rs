//! HTTP surface for submitting, observing, and cancelling agent runs.
//!
//! Thin layer over the orchestrator: `POST /agent/run` accepts a goal and
//! spawns the job, `GET /agent/status/{job_id}` reads a snapshot from the
//! job store, `POST /agent/cancel/{job_id}` fires the job's cancellation
//! token.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use mindloop_orchestrator::Orchestrator;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

const DEFAULT_ITERATIONS: u32 = 3;

/// Shared application state.
pub struct AppState {
    /// The loop engine all routes operate through.
    pub engine: Arc<Orchestrator>,
}

/// The gateway server.
pub struct GatewayServer;

impl GatewayServer {
    /// Builds the route tree over the given engine.
    pub fn build(engine: Arc<Orchestrator>) -> Router {
        let state = Arc::new(AppState { engine });
        Router::new()
            .route("/agent/run", post(run_handler))
            .route("/agent/status/{job_id}", get(status_handler))
            .route("/agent/cancel/{job_id}", post(cancel_handler))
            .route("/health", get(health_handler))
            .with_state(state)
    }
}

#[derive(Debug, Deserialize)]
struct RunRequest {
    goal: String,
    #[serde(default = "default_iterations")]
    iterations: u32,
}

fn default_iterations() -> u32 {
    DEFAULT_ITERATIONS
}

async fn run_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RunRequest>,
) -> (StatusCode, Json<serde_json::Value>) {
    if req.goal.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({"error": "goal must not be empty"})),
        );
    }

    let job_id = state.engine.start(req.goal.clone(), req.iterations).await;
    info!(job_id = %job_id, iterations = req.iterations, "Run accepted");

    (
        StatusCode::ACCEPTED,
        Json(serde_json::json!({
            "job_id": job_id,
            "status": "pending",
            "message": format!("Job accepted for goal: {}", req.goal),
        })),
    )
}

async fn status_handler(
    State(state): State<Arc<AppState>>,
    Path(job_id): Path<Uuid>,
) -> (StatusCode, Json<serde_json::Value>) {
    match state.engine.jobs().get(job_id).await {
        Some(job) => (
            StatusCode::OK,
            Json(serde_json::json!({
                "job_id": job.id,
                "status": job.status,
                "progress": job.progress,
                "goal": job.goal,
                "error": job.error,
                "cycles": job.cycles,
            })),
        ),
        None => {
            warn!(job_id = %job_id, "Status request for unknown job");
            (
                StatusCode::NOT_FOUND,
                Json(serde_json::json!({"error": "unknown job id"})),
            )
        }
    }
}

async fn cancel_handler(
    State(state): State<Arc<AppState>>,
    Path(job_id): Path<Uuid>,
) -> (StatusCode, Json<serde_json::Value>) {
    if state.engine.jobs().cancel(job_id).await {
        info!(job_id = %job_id, "Cancellation requested");
        (
            StatusCode::ACCEPTED,
            Json(serde_json::json!({"job_id": job_id, "status": "cancelling"})),
        )
    } else {
        (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({"error": "unknown job id"})),
        )
    }
}

async fn health_handler() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok", "service": "mindloop"}))
}
