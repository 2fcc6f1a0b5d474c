//! Route handlers for `/api/lists/items`.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use vlist_core::{CreateListItemRequest, UpdateListItemRequest};
use vlist_storage::ListStore;

use super::lists::IdQuery;
use super::state::AppState;
use super::store_error_response;

/// POST /api/lists/items
pub(crate) async fn handle_create_list_item(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateListItemRequest>,
) -> Response {
    match state.store.create_list_item(req).await {
        Ok(record) => (StatusCode::OK, Json(record)).into_response(),
        Err(e) => store_error_response(&e),
    }
}

/// GET /api/lists/items?id=
pub(crate) async fn handle_read_list_item(
    State(state): State<Arc<AppState>>,
    Query(query): Query<IdQuery>,
) -> Response {
    match state.store.get_list_item(&query.id).await {
        Ok(record) => (StatusCode::OK, Json(record)).into_response(),
        Err(e) => store_error_response(&e),
    }
}

/// PUT /api/lists/items
///
/// `value` is the only mutable field; membership (`list_id`) and creation
/// metadata are preserved. Unknown ids yield the deterministic 404:
/// `list item id: "<id>" not found`.
pub(crate) async fn handle_update_list_item(
    State(state): State<Arc<AppState>>,
    Json(req): Json<UpdateListItemRequest>,
) -> Response {
    match state.store.update_list_item(req).await {
        Ok(record) => (StatusCode::OK, Json(record)).into_response(),
        Err(e) => store_error_response(&e),
    }
}

/// DELETE /api/lists/items?id=
pub(crate) async fn handle_delete_list_item(
    State(state): State<Arc<AppState>>,
    Query(query): Query<IdQuery>,
) -> Response {
    match state.store.delete_list_item(&query.id).await {
        Ok(record) => (StatusCode::OK, Json(record)).into_response(),
        Err(e) => store_error_response(&e),
    }
}
