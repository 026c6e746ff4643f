//! Consistent Hash Ring Module
//!
//! Maps keys to shard ids with minimal remapping when the shard set
//! changes. Each shard contributes a fixed number of replica points keyed
//! `<shard_id>:replica-<i>`; points are MD5-hashed and kept sorted by
//! their lowercase hexadecimal digest.
//!
//! The digest encoding is a compatibility contract: clients computing
//! placement on their side must order points by the same 32-character hex
//! string, or their placement diverges from the server's.

use std::collections::HashMap;

use md5::{Digest, Md5};

// == Constants ==
/// Replica points each shard contributes when none are configured.
pub const DEFAULT_REPLICAS: usize = 160;

// == Hash Ring ==
/// Sorted sequence of hashed replica points.
#[derive(Debug, Clone)]
pub struct HashRing {
    /// Replica point digests, sorted lexicographically
    points: Vec<String>,
    /// Digest to owning shard id
    ring: HashMap<String, String>,
    /// Shard ids in insertion order
    shard_ids: Vec<String>,
    /// Replica points per shard
    replicas: usize,
}

impl HashRing {
    // == Constructor ==
    /// Builds a ring over the given shard ids.
    ///
    /// A `replicas` of 0 falls back to [`DEFAULT_REPLICAS`].
    pub fn new(shard_ids: &[String], replicas: usize) -> Self {
        let replicas = if replicas == 0 {
            DEFAULT_REPLICAS
        } else {
            replicas
        };

        let mut hash_ring = Self {
            points: Vec::new(),
            ring: HashMap::new(),
            shard_ids: Vec::new(),
            replicas,
        };

        for shard_id in shard_ids {
            hash_ring.add(shard_id);
        }

        hash_ring
    }

    // == Add ==
    /// Inserts a shard's replica points and re-sorts the point list.
    ///
    /// The ring itself does not reject duplicate ids; callers that need
    /// unique membership enforce it above this layer.
    pub fn add(&mut self, shard_id: &str) {
        self.shard_ids.push(shard_id.to_string());

        for i in 0..self.replicas {
            let digest = hash_point(&replica_key(shard_id, i));
            self.points.push(digest.clone());
            self.ring.insert(digest, shard_id.to_string());
        }

        self.points.sort();
    }

    // == Remove ==
    /// Erases a shard's replica points from the point list and the
    /// digest map.
    #[allow(dead_code)]
    pub fn remove(&mut self, shard_id: &str) {
        self.shard_ids.retain(|id| id != shard_id);

        for i in 0..self.replicas {
            let digest = hash_point(&replica_key(shard_id, i));
            self.ring.remove(&digest);
            if let Ok(pos) = self.points.binary_search(&digest) {
                self.points.remove(pos);
            }
        }
    }

    // == Lookup ==
    /// Resolves the shard owning a key, or `None` on an empty ring.
    ///
    /// The key's digest is binary-searched in the sorted point list; an
    /// exact match wins, otherwise the nearest preceding point does,
    /// wrapping to the last point when the digest sorts before them all.
    pub fn shard_for(&self, key: &str) -> Option<&str> {
        if self.points.is_empty() {
            return None;
        }

        let digest = hash_point(key);
        let pos = match self.points.binary_search(&digest) {
            Ok(pos) => pos,
            Err(0) => self.points.len() - 1,
            Err(ins) => ins - 1,
        };

        self.ring.get(&self.points[pos]).map(String::as_str)
    }

    // == Length ==
    /// Number of replica points on the ring.
    #[allow(dead_code)]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

// == Hashing ==
/// Lowercase hex MD5 digest of a point key.
fn hash_point(key: &str) -> String {
    format!("{:x}", Md5::digest(key.as_bytes()))
}

fn replica_key(shard_id: &str, replica: usize) -> String {
    format!("{shard_id}:replica-{replica}")
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    fn ids(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_hash_point_is_lowercase_hex_md5() {
        // well-known md5 test vector
        assert_eq!(hash_point(""), "d41d8cd98f00b204e9800998ecf8427e");
        assert_eq!(hash_point("abc"), "900150983cd24fb0d6963f7d28e17f72");
    }

    #[test]
    fn test_ring_length_counts_replica_points() {
        let ring = HashRing::new(&ids(&["shard-0", "shard-1", "shard-2"]), 1);
        assert_eq!(ring.len(), 3);

        let ring = HashRing::new(&ids(&["shard-0", "shard-1", "shard-2"]), 160);
        assert_eq!(ring.len(), 480);
    }

    #[test]
    fn test_lookup_is_total_over_nonempty_ring() {
        let ring = HashRing::new(&ids(&["shard-0", "shard-1", "shard-2"]), 4);

        for i in 0..200 {
            let key = format!("key-{i}");
            let shard = ring.shard_for(&key);
            assert!(shard.is_some(), "no shard for {key}");
        }
    }

    #[test]
    fn test_lookup_empty_ring() {
        let ring = HashRing::new(&[], 160);
        assert!(ring.is_empty());
        assert!(ring.shard_for("anything").is_none());
    }

    #[test]
    fn test_lookup_single_point_wraps() {
        let ring = HashRing::new(&ids(&["shard-0"]), 1);
        // every key lands on the only shard, whichever side of its
        // point the digest falls
        for key in ["a", "zzz", "", "0123"] {
            assert_eq!(ring.shard_for(key), Some("shard-0"));
        }
    }

    #[test]
    fn test_independent_rings_agree() {
        let shards = ids(&["shard-0", "shard-1", "shard-2"]);
        let ring1 = HashRing::new(&shards, 1);
        let ring2 = HashRing::new(&shards, 1);

        for i in 0..100 {
            let key = format!("key-{i}");
            assert_eq!(ring1.shard_for(&key), ring2.shard_for(&key));
        }
    }

    #[test]
    fn test_add_only_remaps_a_minority_of_keys() {
        let mut ring = HashRing::new(&ids(&["shard-0", "shard-1", "shard-2"]), 160);

        let keys: Vec<String> = (0..500).map(|i| format!("key-{i}")).collect();
        let before: Vec<String> = keys
            .iter()
            .map(|k| ring.shard_for(k).unwrap().to_string())
            .collect();

        ring.add("shard-3");

        let moved = keys
            .iter()
            .zip(&before)
            .filter(|(k, owner)| ring.shard_for(k) != Some(owner.as_str()))
            .count();

        assert!(moved > 0, "a new shard should take over some keys");
        assert!(
            moved < keys.len() / 2,
            "adding one shard remapped {moved} of {} keys",
            keys.len()
        );

        // keys that moved all moved to the new shard
        for (key, owner) in keys.iter().zip(&before) {
            let now = ring.shard_for(key).unwrap();
            assert!(now == owner || now == "shard-3");
        }
    }

    #[test]
    fn test_remove_erases_every_replica_point() {
        let mut ring = HashRing::new(&ids(&["shard-0", "shard-1", "shard-2"]), 160);
        assert_eq!(ring.len(), 480);

        ring.remove("shard-1");

        assert_eq!(ring.len(), 320);
        for i in 0..500 {
            let key = format!("key-{i}");
            assert_ne!(ring.shard_for(&key), Some("shard-1"));
        }
    }

    #[test]
    fn test_remove_leaves_other_placements_alone() {
        let mut ring = HashRing::new(&ids(&["shard-0", "shard-1", "shard-2"]), 160);

        let keys: Vec<String> = (0..500).map(|i| format!("key-{i}")).collect();
        let before: Vec<String> = keys
            .iter()
            .map(|k| ring.shard_for(k).unwrap().to_string())
            .collect();

        ring.remove("shard-2");

        for (key, owner) in keys.iter().zip(&before) {
            if owner != "shard-2" {
                assert_eq!(ring.shard_for(key), Some(owner.as_str()));
            }
        }
    }

    #[test]
    fn test_zero_replicas_falls_back_to_default() {
        let ring = HashRing::new(&ids(&["shard-0"]), 0);
        assert_eq!(ring.len(), DEFAULT_REPLICAS);
    }
}
