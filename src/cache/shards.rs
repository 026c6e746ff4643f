//! Shard Array Module
//!
//! Owns the fixed set of LRU shards and the consistent-hash ring that
//! routes keys to them. Per-key operations lock only the chosen shard, so
//! requests for keys on different shards run in parallel; bulk operations
//! visit every shard in id order.
//!
//! Lock order is strict: the array lock is released before any shard lock
//! is taken, and no task ever holds two shard locks at once.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::cache::{ArrayStats, LruShard};
use crate::ring::HashRing;

// == Config ==
/// Construction parameters for the shard array.
#[derive(Debug, Clone)]
pub struct ShardArrayConfig {
    /// Number of shards
    pub shard_count: usize,
    /// Replica points per shard on the ring
    pub replicas: usize,
    /// Total byte budget, split evenly across shards
    pub capacity_total: u64,
}

// == Shard Array ==
/// Fan-out router over `N` byte-bounded LRU shards.
#[derive(Debug)]
pub struct ShardArray {
    inner: RwLock<ArrayInner>,
}

#[derive(Debug)]
struct ArrayInner {
    ring: HashRing,
    shard_ids: Vec<String>,
    shards: HashMap<String, Arc<RwLock<LruShard>>>,
}

impl ShardArray {
    // == Constructor ==
    /// Creates the shards `shard-0 … shard-(N-1)`, each with
    /// `capacity_total / N` bytes, and builds the ring over them.
    ///
    /// Any remainder of the integer division goes unused.
    pub fn new(config: ShardArrayConfig) -> Self {
        let shard_capacity = config
            .capacity_total
            .checked_div(config.shard_count as u64)
            .unwrap_or(0);

        let mut shard_ids = Vec::with_capacity(config.shard_count);
        let mut shards = HashMap::with_capacity(config.shard_count);

        for i in 0..config.shard_count {
            let shard_id = format!("shard-{i}");
            shards.insert(
                shard_id.clone(),
                Arc::new(RwLock::new(LruShard::new(shard_capacity))),
            );
            shard_ids.push(shard_id);
        }

        let ring = HashRing::new(&shard_ids, config.replicas);

        Self {
            inner: RwLock::new(ArrayInner {
                ring,
                shard_ids,
                shards,
            }),
        }
    }

    // == Shard For Key ==
    /// Resolves the shard owning a key.
    ///
    /// Returns `None` when the ring is empty or names an unknown shard;
    /// callers surface that as "no shard available". The returned handle
    /// is locked by the caller after the array lock is released.
    pub async fn shard_for_key(&self, key: &str) -> Option<Arc<RwLock<LruShard>>> {
        let inner = self.inner.read().await;
        let shard_id = inner.ring.shard_for(key)?;
        inner.shards.get(shard_id).cloned()
    }

    // == Clear ==
    /// Clears every shard.
    ///
    /// Each shard counts its own clear, so the aggregate `clears` delta of
    /// one call equals the shard count.
    pub async fn clear(&self) {
        for shard in self.shards_in_order().await {
            shard.write().await.clear();
        }
    }

    // == Size ==
    /// Total number of stored entries across all shards.
    pub async fn size(&self) -> u64 {
        let mut total = 0;
        for shard in self.shards_in_order().await {
            total += shard.read().await.size();
        }
        total
    }

    // == Stats ==
    /// Aggregate statistics plus the per-shard snapshots in id order.
    ///
    /// Each shard's snapshot is taken atomically under its lock, but
    /// shards are sampled one after another; the combined view is not a
    /// single point in time.
    pub async fn stats(&self) -> ArrayStats {
        let mut stats = ArrayStats::default();
        for shard in self.shards_in_order().await {
            stats.add(shard.read().await.stats());
        }
        stats
    }

    // == Internals ==

    /// Clones the shard handles in id order, releasing the array lock
    /// before any of them is touched.
    async fn shards_in_order(&self) -> Vec<Arc<RwLock<LruShard>>> {
        let inner = self.inner.read().await;
        inner
            .shard_ids
            .iter()
            .filter_map(|id| inner.shards.get(id).cloned())
            .collect()
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::Item;

    const KV_SIZE: u64 = 4 + 5;

    fn array(shard_count: usize, capacity_total: u64) -> ShardArray {
        ShardArray::new(ShardArrayConfig {
            shard_count,
            replicas: 160,
            capacity_total,
        })
    }

    async fn set(shards: &ShardArray, key: &str, value: &[u8]) {
        let shard = shards.shard_for_key(key).await.expect("no shard for key");
        shard.write().await.set(Item::new(key, value.to_vec(), 0));
    }

    async fn check_hit(shards: &ShardArray, key: &str, value: &[u8]) {
        let shard = shards.shard_for_key(key).await.expect("no shard for key");
        let item = shard.write().await.get(key);
        let item = item.unwrap_or_else(|| panic!("expected hit for {key}"));
        assert_eq!(item.value, value);
    }

    async fn check_miss(shards: &ShardArray, key: &str) {
        let shard = shards.shard_for_key(key).await.expect("no shard for key");
        assert!(shard.write().await.get(key).is_none());
    }

    #[tokio::test]
    async fn test_set_get() {
        let shards = array(5, 100_000);
        set(&shards, "key1", b"value").await;
        check_hit(&shards, "key1", b"value").await;

        let stats = shards.stats().await;
        assert_eq!(stats.sets, 1);
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 0);
        assert_eq!(stats.capacity_cur, KV_SIZE);
        assert_eq!(shards.size().await, 1);
    }

    #[tokio::test]
    async fn test_get_miss() {
        let shards = array(5, 100_000);
        set(&shards, "key1", b"value").await;
        check_miss(&shards, "key2").await;

        let stats = shards.stats().await;
        assert_eq!(stats.sets, 1);
        assert_eq!(stats.hits, 0);
        assert_eq!(stats.misses, 1);
    }

    #[tokio::test]
    async fn test_routing_is_stable_per_key() {
        let shards = array(5, 100_000);

        for i in 0..50 {
            let key = format!("key-{i}");
            let first = shards.shard_for_key(&key).await.unwrap();
            let second = shards.shard_for_key(&key).await.unwrap();
            assert!(Arc::ptr_eq(&first, &second), "routing moved for {key}");
        }
    }

    #[tokio::test]
    async fn test_remove() {
        let shards = array(5, 100_000);
        set(&shards, "key", b"value").await;

        let shard = shards.shard_for_key("key").await.unwrap();
        let removed = shard.write().await.remove("key");
        assert_eq!(removed.unwrap().value, b"value");

        check_miss(&shards, "key").await;
        let stats = shards.stats().await;
        assert_eq!(stats.removes, 1);
        assert_eq!(stats.capacity_cur, 0);
        assert_eq!(shards.size().await, 0);
    }

    #[tokio::test]
    async fn test_clear_counts_once_per_shard() {
        let shards = array(5, 100_000);
        set(&shards, "key", b"value").await;
        assert_eq!(shards.size().await, 1);
        assert_eq!(shards.stats().await.clears, 0);

        shards.clear().await;

        let stats = shards.stats().await;
        assert_eq!(stats.clears, 5);
        assert_eq!(stats.capacity_cur, 0);
        assert_eq!(stats.sets, 1);
        assert_eq!(stats.hits, 0);
        assert_eq!(shards.size().await, 0);
    }

    #[tokio::test]
    async fn test_per_shard_capacity_is_integer_division() {
        // 10 shards over 1005 bytes: each shard gets 100, 5 go unused
        let shards = array(10, 1005);
        let inner = shards.inner.read().await;
        assert_eq!(inner.shard_ids.len(), 10);

        // a 100-byte entry fills one shard exactly
        drop(inner);
        let key = "0123456789";
        let value = vec![b'x'; 90];
        let shard = shards.shard_for_key(key).await.unwrap();
        shard.write().await.set(Item::new(key, value, 0));
        assert_eq!(shards.stats().await.capacity_cur, 100);
        assert_eq!(shards.stats().await.evicts, 0);
    }

    #[tokio::test]
    async fn test_empty_array_has_no_shard_for_key() {
        let shards = array(0, 100_000);
        assert!(shards.shard_for_key("key").await.is_none());
    }

    #[tokio::test]
    async fn test_lru_within_single_shard_array() {
        let shards = array(1, KV_SIZE);
        set(&shards, "key1", b"value").await;
        set(&shards, "key2", b"value").await;

        check_miss(&shards, "key1").await;
        check_hit(&shards, "key2", b"value").await;

        let stats = shards.stats().await;
        assert_eq!(stats.evicts, 1);
        assert_eq!(stats.capacity_cur, KV_SIZE);
    }

    #[tokio::test]
    async fn test_concurrent_workers_private_and_shared_keys() {
        let shards = Arc::new(array(10, 1_000_000));
        let mut handles = Vec::new();

        for worker in 0..8 {
            let shards = Arc::clone(&shards);
            handles.push(tokio::spawn(async move {
                let namespace = format!("worker{worker:02}");
                for round in 0..4 {
                    for i in 0..50 {
                        let key = format!("{namespace}:key:{i:04}");
                        set(&shards, &key, namespace.as_bytes()).await;
                        check_hit(&shards, &key, namespace.as_bytes()).await;
                    }
                    for i in 0..25 {
                        let key = format!("shared:key:{i:04}");
                        set(&shards, &key, namespace.as_bytes()).await;
                    }
                    let _ = round;
                }
            }));
        }

        for handle in handles {
            handle.await.expect("worker panicked");
        }

        // every private key survives; shared keys hold one of the
        // workers' values
        for worker in 0..8 {
            let namespace = format!("worker{worker:02}");
            for i in 0..50 {
                let key = format!("{namespace}:key:{i:04}");
                check_hit(&shards, &key, namespace.as_bytes()).await;
            }
        }
        for i in 0..25 {
            let key = format!("shared:key:{i:04}");
            let shard = shards.shard_for_key(&key).await.unwrap();
            let item = shard.write().await.get(&key).expect("shared key lost");
            let value = String::from_utf8(item.value).unwrap();
            assert!(value.starts_with("worker"), "corrupt value {value}");
        }
    }
}
