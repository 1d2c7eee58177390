//! Download progress polling.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::sync::Arc;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ProgressErrorResponse {
    pub error: String,
}

/// Most recently updated download, or `{}` when there is none.
pub async fn latest(State(state): State<Arc<AppState>>) -> Response {
    match state.progress().latest() {
        Some(progress) => Json(progress).into_response(),
        None => Json(serde_json::json!({})).into_response(),
    }
}

/// Progress of one download.
pub async fn get_progress(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Response {
    match state.progress().get(&id) {
        Some(progress) => Json(progress).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(ProgressErrorResponse {
                error: format!("Download not found: {}", id),
            }),
        )
            .into_response(),
    }
}
