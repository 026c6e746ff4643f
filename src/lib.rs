//! Shardcache - A sharded in-memory LRU cache server
//!
//! Stores opaque byte values under string keys across a fixed set of
//! byte-bounded LRU shards, routed by a consistent-hash ring, with
//! per-entry version counters for compare-and-swap.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod metrics;
pub mod models;
pub mod ring;

pub use api::AppState;
pub use config::Config;
