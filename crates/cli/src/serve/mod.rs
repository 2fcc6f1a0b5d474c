//! `vlist serve` -- HTTP JSON API server for value lists.
//!
//! Exposes the list item store as an async HTTP service using `axum` +
//! `tokio`. Supports concurrent request handling over a shared store.
//!
//! Security features:
//! - Anti-CSRF header check on all mutating calls (`kbn-xsrf`)
//! - CORS headers on all responses (permissive for local dev)
//! - Per-IP rate limiting (default: 60 req/min, configurable)
//! - Optional API key authentication via VLIST_API_KEY env var
//!
//! Endpoints:
//! - GET    /health              - Server status (exempt from auth)
//! - GET    /api/lists/index     - Index status
//! - POST   /api/lists/index     - Provision the lists index
//! - DELETE /api/lists/index     - Drop the index and all data
//! - POST   /api/lists           - Create a list
//! - GET    /api/lists?id=       - Read a list
//! - PUT    /api/lists           - Update a list
//! - DELETE /api/lists?id=       - Delete a list (and its items)
//! - POST   /api/lists/items     - Create a list item
//! - GET    /api/lists/items?id= - Read a list item
//! - PUT    /api/lists/items     - Update a list item's value
//! - DELETE /api/lists/items?id= - Delete a list item
//!
//! All responses use Content-Type: application/json. Errors have the shape
//! `{ "status_code": <u16>, "message": <string> }`.

mod handlers;
mod items;
mod lists;
mod middleware;
mod state;

use std::path::PathBuf;
use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::http::{Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{middleware as axum_middleware, Json, Router};
use tower_http::cors::{Any, CorsLayer};

use vlist_storage::{ListStore, MemoryStore, StoreError};

use self::handlers::{
    handle_create_index, handle_delete_index, handle_health, handle_index_status, handle_not_found,
};
use self::items::{
    handle_create_list_item, handle_delete_list_item, handle_read_list_item,
    handle_update_list_item,
};
use self::lists::{handle_create_list, handle_delete_list, handle_read_list, handle_update_list};
use self::middleware::{auth_middleware, rate_limit_middleware, xsrf_middleware};
use self::state::{AppState, RateLimiter};

/// Maximum request body size: 10 MB.
const MAX_BODY_SIZE: usize = 10 * 1024 * 1024;

/// Default rate limit: 60 requests per minute per IP.
const DEFAULT_RATE_LIMIT: u64 = 60;

/// Rate limit window duration in seconds (1 minute).
const RATE_LIMIT_WINDOW_SECS: u64 = 60;

/// Construct the service's structured JSON error response.
fn error_response(status: StatusCode, message: &str) -> impl IntoResponse {
    (
        status,
        Json(serde_json::json!({
            "status_code": status.as_u16(),
            "message": message,
        })),
    )
}

/// Map a storage error to the HTTP response clients see.
///
/// `IndexMissing` is a 400 here: list and item operations reject requests
/// until the index is provisioned. The index handlers map their own
/// lifecycle errors (404/409) before falling through to this.
fn store_error_response(err: &StoreError) -> Response {
    let status = match err {
        StoreError::IndexMissing => StatusCode::BAD_REQUEST,
        StoreError::IndexExists
        | StoreError::ListExists { .. }
        | StoreError::ListItemExists { .. } => StatusCode::CONFLICT,
        StoreError::ListNotFound { .. }
        | StoreError::ListMissing { .. }
        | StoreError::ListItemNotFound { .. } => StatusCode::NOT_FOUND,
        StoreError::Backend(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    error_response(status, &err.to_string()).into_response()
}

/// Start the HTTP server on the given port.
///
/// When `create_index` is set, the lists index is provisioned at startup;
/// otherwise callers provision it via POST /api/lists/index.
///
/// When TLS cert/key paths are provided, the server listens over HTTPS
/// using `axum-server` with rustls. Otherwise it uses plain HTTP.
///
/// Security:
/// - CORS: Permissive (`Any` origin) for local dev; tighten for production.
/// - Rate limit: Per-IP, configurable via VLIST_RATE_LIMIT (default 60 req/min).
/// - API key: If VLIST_API_KEY is set, all endpoints except /health require auth.
pub async fn start_server(
    port: u16,
    create_index: bool,
    _tls_cert: Option<PathBuf>,
    _tls_key: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let store = MemoryStore::new();
    if create_index {
        store.create_index().await?;
        eprintln!("Lists index provisioned at startup");
    }

    // Rate limit: from VLIST_RATE_LIMIT env var, or default
    let rate_limit = std::env::var("VLIST_RATE_LIMIT")
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(DEFAULT_RATE_LIMIT);

    // API key: from VLIST_API_KEY env var (None = no auth)
    let api_key = std::env::var("VLIST_API_KEY")
        .ok()
        .filter(|k| !k.is_empty());

    if api_key.is_some() {
        eprintln!("API key authentication enabled");
    }
    eprintln!("Rate limit: {} requests per minute per IP", rate_limit);

    let state = Arc::new(AppState {
        store,
        rate_limiter: RateLimiter::new(rate_limit),
        api_key,
    });

    // CORS: permissive for local dev
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any);

    let app = Router::new()
        .route("/health", get(handle_health))
        .route(
            "/api/lists/index",
            get(handle_index_status)
                .post(handle_create_index)
                .delete(handle_delete_index),
        )
        .route(
            "/api/lists",
            get(handle_read_list)
                .post(handle_create_list)
                .put(handle_update_list)
                .delete(handle_delete_list),
        )
        .route(
            "/api/lists/items",
            get(handle_read_list_item)
                .post(handle_create_list_item)
                .put(handle_update_list_item)
                .delete(handle_delete_list_item),
        )
        .fallback(handle_not_found)
        .layer(axum_middleware::from_fn(xsrf_middleware))
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ))
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            rate_limit_middleware,
        ))
        .layer(cors)
        .layer(DefaultBodyLimit::max(MAX_BODY_SIZE))
        .with_state(state);

    let addr = format!("0.0.0.0:{}", port);

    // TLS support via axum-server + rustls (requires `tls` feature)
    #[cfg(feature = "tls")]
    if let (Some(cert_path), Some(key_path)) = (&_tls_cert, &_tls_key) {
        let config =
            axum_server::tls_rustls::RustlsConfig::from_pem_file(cert_path, key_path).await?;
        let socket_addr: std::net::SocketAddr = addr.parse()?;
        eprintln!("vlist listening on https://0.0.0.0:{}", port);
        axum_server::bind_rustls(socket_addr, config)
            .serve(app.into_make_service_with_connect_info::<std::net::SocketAddr>())
            .await?;
        return Ok(());
    }

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    eprintln!("vlist listening on http://0.0.0.0:{}", port);
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<std::net::SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    eprintln!("\nServer shut down.");
    Ok(())
}

/// Wait for a shutdown signal (Ctrl+C).
async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("failed to install Ctrl+C handler");
    eprintln!("\nReceived shutdown signal...");
}
