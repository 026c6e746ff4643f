//! API Module
//!
//! HTTP handlers and routing for the cache server API.
//!
//! # Endpoints
//! - `GET /get/:key` - Retrieve an item by key
//! - `PUT /set` - Store an item
//! - `POST /cas` - Compare-and-swap an item
//! - `DELETE /remove/:key` - Remove a key
//! - `POST /clear` - Drop every entry in every shard
//! - `GET /size` - Total entry count
//! - `GET /stats` - Cache statistics
//! - `GET /metrics` - Prometheus text exposition
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
