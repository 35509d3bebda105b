use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use common::{
    Assignment, CompletedTaskRequest, CompletedTaskResponse, GetTaskRequest, JobStatusReport,
};
use tokio::time::Instant;
use tower_http::trace::TraceLayer;
use tracing::{debug, info, warn};

use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/rpc/get-task", post(get_task))
        .route("/rpc/completed-task", post(completed_task))
        .route("/api/v1/status", get(status))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/* ---------------- handlers HTTP ---------------- */

async fn health() -> &'static str {
    "ok"
}

// GetTask: toda la decisión ocurre con el lock tomado, así dos workers
// nunca reciben la misma tarea.
async fn get_task(
    State(state): State<AppState>,
    Json(req): Json<GetTaskRequest>,
) -> Json<Assignment> {
    let assignment = state.lock().assign(req.worker_id, Instant::now());

    match &assignment {
        Assignment::Map { task_id, split, .. } => {
            info!("asignando map {} ({}) al worker {}", task_id, split, req.worker_id);
        }
        Assignment::Reduce {
            task_id, pattern, ..
        } => {
            info!(
                "asignando reduce {} ({}) al worker {}",
                task_id, pattern, req.worker_id
            );
        }
        Assignment::Wait => debug!("worker {} pidió tarea: wait", req.worker_id),
        Assignment::Terminate => debug!("worker {} pidió tarea: terminate", req.worker_id),
    }

    Json(assignment)
}

// CompletedTask. Un task_kind que no sea map/reduce no deserializa: se
// responde 400 sin tocar la tabla.
async fn completed_task(
    State(state): State<AppState>,
    payload: Result<Json<CompletedTaskRequest>, JsonRejection>,
) -> Result<Json<CompletedTaskResponse>, (StatusCode, String)> {
    let Json(req) = payload.map_err(|rejection| {
        warn!("CompletedTask inválido: {}", rejection.body_text());
        (StatusCode::BAD_REQUEST, rejection.body_text())
    })?;

    let directive = state
        .lock()
        .complete(req.task_kind, req.task_id, req.worker_id);

    info!(
        "worker {} completó {} {} -> {:?}",
        req.worker_id, req.task_kind, req.task_id, directive
    );

    Ok(Json(CompletedTaskResponse { directive }))
}

async fn status(State(state): State<AppState>) -> Json<JobStatusReport> {
    Json(state.report())
}
