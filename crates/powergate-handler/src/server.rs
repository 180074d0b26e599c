use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::features::lifecycle_gate::controller::GateController;
use crate::features::observability::controller::ObservabilityController;

#[derive(Clone)]
pub struct AppState {
    pub gate: Arc<GateController>,
    pub observability: Arc<ObservabilityController>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/invoke", post(invoke))
        .route("/healthz", get(healthz))
        .route("/metrics", get(metrics))
        .with_state(state)
}

/// Invocation endpoint. The request body is the trigger payload; its
/// content is irrelevant to the gate and is never read.
async fn invoke(State(state): State<AppState>) -> Response {
    let body = state.gate.invoke().await;
    let status =
        StatusCode::from_u16(body.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(body)).into_response()
}

async fn healthz() -> &'static str {
    "ok"
}

async fn metrics(State(state): State<AppState>) -> Response {
    match state.observability.render_metrics() {
        Ok(text) => (StatusCode::OK, text).into_response(),
        Err(error) => (StatusCode::INTERNAL_SERVER_ERROR, error).into_response(),
    }
}
