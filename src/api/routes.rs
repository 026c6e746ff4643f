//! API Routes
//!
//! Configures the Axum router with all cache server endpoints.

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    cas_handler, clear_handler, get_handler, health_handler, metrics_handler, remove_handler,
    set_handler, size_handler, stats_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET /get/:key` - Retrieve an item by key
/// - `PUT /set` - Store an item
/// - `POST /cas` - Compare-and-swap an item
/// - `DELETE /remove/:key` - Remove a key
/// - `POST /clear` - Drop every entry in every shard
/// - `GET /size` - Total entry count
/// - `GET /stats` - Cache statistics, aggregate and per shard
/// - `GET /metrics` - Prometheus text exposition
/// - `GET /health` - Health check endpoint
///
/// # Middleware
/// - CORS: Allows any origin (configurable for production)
/// - Tracing: Logs all requests for debugging
pub fn create_router(state: AppState) -> Router {
    // Configure CORS middleware
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Build router with all endpoints
    Router::new()
        .route("/get/:key", get(get_handler))
        .route("/set", put(set_handler))
        .route("/cas", post(cas_handler))
        .route("/remove/:key", delete(remove_handler))
        .route("/clear", post(clear_handler))
        .route("/size", get(size_handler))
        .route("/stats", get(stats_handler))
        .route("/metrics", get(metrics_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
