//! Cache Statistics Module
//!
//! Counter snapshots for a single shard and aggregated across the shard
//! array. Counters are monotonic; `capacity_cur` is a gauge.

use serde::Serialize;

// == Shard Stats ==
/// Snapshot of one shard's counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ShardStats {
    /// Number of entries evicted to restore the byte budget
    pub evicts: u64,
    /// Number of successful remove operations
    pub removes: u64,
    /// Number of clear operations
    pub clears: u64,
    /// Number of set operations, including successful compare-and-swaps
    pub sets: u64,
    /// Number of successful lookups
    pub hits: u64,
    /// Number of failed lookups
    pub misses: u64,
    /// Current sum of entry sizes, in bytes
    pub capacity_cur: u64,
}

// == Array Stats ==
/// Statistics aggregated over every shard in the array.
///
/// The aggregate fields are sums of the per-shard snapshots in `shards`.
/// Different shards may be sampled at different points in real time; only
/// each individual snapshot is internally consistent.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ArrayStats {
    pub evicts: u64,
    pub removes: u64,
    pub clears: u64,
    pub sets: u64,
    pub hits: u64,
    pub misses: u64,
    pub capacity_cur: u64,
    /// Per-shard snapshots, in shard-id order
    pub shards: Vec<ShardStats>,
}

impl ArrayStats {
    // == Accumulate ==
    /// Folds one shard snapshot into the aggregate and records it.
    pub fn add(&mut self, stats: ShardStats) {
        self.evicts += stats.evicts;
        self.removes += stats.removes;
        self.clears += stats.clears;
        self.sets += stats.sets;
        self.hits += stats.hits;
        self.misses += stats.misses;
        self.capacity_cur += stats.capacity_cur;
        self.shards.push(stats);
    }
}
