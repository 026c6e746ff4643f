//! Response DTOs for the cache server API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;

use crate::cache::{ArrayStats, ShardStats};
use crate::models::requests::ItemPayload;

// == Item Response ==
/// Response body for GET, SET, CAS and REMOVE.
///
/// A lookup of an absent key answers with `item: null`, not an error.
#[derive(Debug, Clone, Serialize)]
pub struct ItemResponse {
    /// The item, or null when the key was absent
    pub item: Option<ItemPayload>,
}

impl ItemResponse {
    /// Creates a response around an optional item payload.
    pub fn new(item: Option<ItemPayload>) -> Self {
        Self { item }
    }

    /// Echoes a stored item's key and value, with `cas_id` zeroed.
    pub fn echo(mut item: ItemPayload) -> Self {
        item.cas_id = 0;
        Self { item: Some(item) }
    }
}

// == Size Response ==
/// Response body for the size endpoint (GET /size)
#[derive(Debug, Clone, Serialize)]
pub struct SizeResponse {
    /// Total number of entries across all shards
    pub size: u64,
}

// == Stats Response ==
/// Response body for the stats endpoint (GET /stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    /// Aggregate eviction count
    pub evicts: u64,
    /// Aggregate remove count
    pub removes: u64,
    /// Aggregate clear count
    pub clears: u64,
    /// Aggregate set count
    pub sets: u64,
    /// Aggregate hit count
    pub hits: u64,
    /// Aggregate miss count
    pub misses: u64,
    /// Aggregate stored bytes
    pub capacity_cur: u64,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
    /// Per-shard snapshots, in shard-id order
    pub shards: Vec<ShardStats>,
}

impl From<ArrayStats> for StatsResponse {
    fn from(stats: ArrayStats) -> Self {
        let total_requests = stats.hits + stats.misses;
        let hit_rate = if total_requests > 0 {
            stats.hits as f64 / total_requests as f64
        } else {
            0.0
        };
        Self {
            evicts: stats.evicts,
            removes: stats.removes,
            clears: stats.clears,
            sets: stats.sets,
            hits: stats.hits,
            misses: stats.misses,
            capacity_cur: stats.capacity_cur,
            hit_rate,
            shards: stats.shards,
        }
    }
}

// == Health Response ==
/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

// == Error Response ==
/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error message describing what went wrong
    pub error: String,
}

impl ErrorResponse {
    /// Creates a new ErrorResponse
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
