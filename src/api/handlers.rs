//! API Handlers
//!
//! HTTP request handlers for each cache server endpoint. This is the
//! facade between the wire and the shard array: it resolves the target
//! shard per key, performs the operation, and maps the outcome onto the
//! response or an error status.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use tokio::sync::RwLock;
use tracing::debug;

use crate::cache::{LruShard, ShardArray, ShardArrayConfig};
use crate::config::Config;
use crate::error::{CacheError, Result};
use crate::metrics;
use crate::models::{
    CasRequest, HealthResponse, ItemPayload, ItemResponse, SetRequest, SizeResponse,
    StatsResponse,
};

// == App State ==
/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// The shard array holding all cached data
    pub shards: Arc<ShardArray>,
}

impl AppState {
    /// Creates a new AppState around an existing shard array.
    pub fn new(shards: ShardArray) -> Self {
        Self {
            shards: Arc::new(shards),
        }
    }

    /// Creates a new AppState from configuration.
    pub fn from_config(config: &Config) -> Self {
        Self::new(ShardArray::new(ShardArrayConfig {
            shard_count: config.shard_count,
            replicas: config.replicas,
            capacity_total: config.capacity_total,
        }))
    }

    /// Resolves the shard for a key, surfacing the empty-ring case as an
    /// internal error.
    async fn pick(&self, key: &str) -> Result<Arc<RwLock<LruShard>>> {
        self.shards
            .shard_for_key(key)
            .await
            .ok_or_else(|| CacheError::NoShardForKey(key.to_string()))
    }
}

// == Get ==
/// Handler for GET /get/:key
///
/// An absent key answers 200 with `item: null`.
pub async fn get_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<ItemResponse>> {
    debug!(%key, "get");

    let shard = state.pick(&key).await?;
    // exclusive: a hit moves the entry to most recently used
    let item = shard.write().await.get(&key);

    Ok(Json(ItemResponse::new(item.map(ItemPayload::from_item))))
}

// == Set ==
/// Handler for PUT /set
///
/// Stores the item unconditionally and echoes its key and value back.
pub async fn set_handler(
    State(state): State<AppState>,
    Json(req): Json<SetRequest>,
) -> Result<Json<ItemResponse>> {
    debug!(key = %req.item.key, "set");

    if let Some(message) = req.item.validate() {
        return Err(CacheError::InvalidRequest(message));
    }

    let shard = state.pick(&req.item.key).await?;
    shard.write().await.set(req.item.clone().into_item());

    Ok(Json(ItemResponse::echo(req.item)))
}

// == Compare And Swap ==
/// Handler for POST /cas
///
/// Stores the item only when its `cas_id` matches the stored version; a
/// lost race answers 409 so clients can retry with a fresh read.
pub async fn cas_handler(
    State(state): State<AppState>,
    Json(req): Json<CasRequest>,
) -> Result<Json<ItemResponse>> {
    debug!(key = %req.item.key, cas_id = req.item.cas_id, "compare-and-swap");

    if let Some(message) = req.item.validate() {
        return Err(CacheError::InvalidRequest(message));
    }

    let shard = state.pick(&req.item.key).await?;
    let swapped = shard
        .write()
        .await
        .compare_and_swap(req.item.clone().into_item());
    if !swapped {
        return Err(CacheError::CasConflict);
    }

    Ok(Json(ItemResponse::echo(req.item)))
}

// == Remove ==
/// Handler for DELETE /remove/:key
///
/// Returns the removed item, or `item: null` when the key was absent.
pub async fn remove_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<ItemResponse>> {
    debug!(%key, "remove");

    let shard = state.pick(&key).await?;
    let item = shard.write().await.remove(&key);

    Ok(Json(ItemResponse::new(item.map(ItemPayload::from_item))))
}

// == Clear ==
/// Handler for POST /clear
pub async fn clear_handler(State(state): State<AppState>) -> Json<serde_json::Value> {
    debug!("clear");

    state.shards.clear().await;
    Json(serde_json::json!({}))
}

// == Size ==
/// Handler for GET /size
pub async fn size_handler(State(state): State<AppState>) -> Json<SizeResponse> {
    debug!("size");

    let size = state.shards.size().await;
    Json(SizeResponse { size })
}

// == Stats ==
/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let stats = state.shards.stats().await;
    Json(StatsResponse::from(stats))
}

// == Metrics ==
/// Handler for GET /metrics
///
/// Prometheus text exposition of the per-shard counters and gauges.
pub async fn metrics_handler(State(state): State<AppState>) -> String {
    let stats = state.shards.stats().await;
    metrics::render(&stats)
}

// == Health ==
/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
