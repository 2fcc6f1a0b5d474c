//! Service-level route handlers: health, fallback, index lifecycle.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use vlist_storage::{ListStore, StoreError};

use super::state::AppState;
use super::{error_response, store_error_response};

/// Fallback handler for unmatched routes.
pub(crate) async fn handle_not_found() -> impl IntoResponse {
    error_response(StatusCode::NOT_FOUND, "not found")
}

/// GET /health
pub(crate) async fn handle_health() -> impl IntoResponse {
    let response = serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    });
    (StatusCode::OK, Json(response))
}

/// GET /api/lists/index
pub(crate) async fn handle_index_status(State(state): State<Arc<AppState>>) -> Response {
    match state.store.index_exists().await {
        Ok(true) => {
            let response = serde_json::json!({
                "list_index": true,
                "list_item_index": true,
            });
            (StatusCode::OK, Json(response)).into_response()
        }
        Ok(false) => error_response(
            StatusCode::NOT_FOUND,
            &StoreError::IndexMissing.to_string(),
        )
        .into_response(),
        Err(e) => store_error_response(&e),
    }
}

/// POST /api/lists/index
pub(crate) async fn handle_create_index(State(state): State<Arc<AppState>>) -> Response {
    match state.store.create_index().await {
        Ok(()) => acknowledged(),
        Err(e @ StoreError::IndexExists) => {
            error_response(StatusCode::CONFLICT, &e.to_string()).into_response()
        }
        Err(e) => store_error_response(&e),
    }
}

/// DELETE /api/lists/index
pub(crate) async fn handle_delete_index(State(state): State<Arc<AppState>>) -> Response {
    match state.store.delete_index().await {
        Ok(()) => acknowledged(),
        Err(e @ StoreError::IndexMissing) => {
            error_response(StatusCode::NOT_FOUND, &e.to_string()).into_response()
        }
        Err(e) => store_error_response(&e),
    }
}

fn acknowledged() -> Response {
    (StatusCode::OK, Json(serde_json::json!({"acknowledged": true}))).into_response()
}
