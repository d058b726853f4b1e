//! Health check endpoint.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use serde::Serialize;

use super::catalog::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub views: Vec<ViewHealth>,
}

#[derive(Serialize)]
pub struct ViewHealth {
    pub name: &'static str,
    pub count: usize,
}

/// GET /health: returns system health status and the size of every view.
pub async fn check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let views = state
        .read_models()
        .into_iter()
        .map(|model| ViewHealth {
            name: model.name(),
            count: model.count(),
        })
        .collect();
    Json(HealthResponse {
        status: "ok",
        views,
    })
}
