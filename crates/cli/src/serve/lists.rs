//! Route handlers for `/api/lists`.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use serde::Deserialize;
use vlist_core::{CreateListRequest, UpdateListRequest};
use vlist_storage::ListStore;

use super::state::AppState;
use super::store_error_response;

/// `?id=` query for read and delete.
#[derive(Deserialize)]
pub(crate) struct IdQuery {
    pub(crate) id: String,
}

/// POST /api/lists
pub(crate) async fn handle_create_list(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateListRequest>,
) -> Response {
    match state.store.create_list(req).await {
        Ok(record) => (StatusCode::OK, Json(record)).into_response(),
        Err(e) => store_error_response(&e),
    }
}

/// GET /api/lists?id=
pub(crate) async fn handle_read_list(
    State(state): State<Arc<AppState>>,
    Query(query): Query<IdQuery>,
) -> Response {
    match state.store.get_list(&query.id).await {
        Ok(record) => (StatusCode::OK, Json(record)).into_response(),
        Err(e) => store_error_response(&e),
    }
}

/// PUT /api/lists
pub(crate) async fn handle_update_list(
    State(state): State<Arc<AppState>>,
    Json(req): Json<UpdateListRequest>,
) -> Response {
    match state.store.update_list(req).await {
        Ok(record) => (StatusCode::OK, Json(record)).into_response(),
        Err(e) => store_error_response(&e),
    }
}

/// DELETE /api/lists?id=
pub(crate) async fn handle_delete_list(
    State(state): State<Arc<AppState>>,
    Query(query): Query<IdQuery>,
) -> Response {
    match state.store.delete_list(&query.id).await {
        Ok(record) => (StatusCode::OK, Json(record)).into_response(),
        Err(e) => store_error_response(&e),
    }
}
