//! LRU Shard Module
//!
//! A byte-bounded key-value store with least-recently-used eviction and
//! per-entry version counters for optimistic concurrency.
//!
//! The shard pairs a `HashMap` from key to node index with a doubly linked
//! list threaded through an arena of nodes. The list holds recency order:
//! head is the least recently used entry, tail the most recently used.
//! Every operation that touches an entry (`get`, `set`, successful
//! `compare_and_swap`) promotes it to the tail. All list links are arena
//! indices rather than pointers, so removal is O(1) without unsafe code;
//! freed slots are recycled through a free list.

use std::collections::HashMap;

use crate::cache::{Item, ShardStats};

// == Node ==
/// One arena slot: the stored item plus its recency-list links.
#[derive(Debug)]
struct Node {
    item: Item,
    prev: Option<usize>,
    next: Option<usize>,
}

// == LRU Shard ==
/// Byte-bounded LRU store.
///
/// `capacity_cur` tracks the sum of `len(key) + len(value)` over stored
/// entries and never exceeds `capacity_max` at rest, with one exception:
/// a single entry larger than the whole budget is kept rather than
/// rejected or self-evicted.
#[derive(Debug)]
pub struct LruShard {
    /// Key to arena index
    index: HashMap<String, usize>,
    /// Node arena; `None` marks a free slot
    nodes: Vec<Option<Node>>,
    /// Recycled arena slots
    free: Vec<usize>,
    /// Least recently used entry
    head: Option<usize>,
    /// Most recently used entry
    tail: Option<usize>,

    /// Immutable byte budget
    capacity_max: u64,
    /// Current sum of entry sizes, in bytes
    capacity_cur: u64,

    // stats
    evicts: u64,
    removes: u64,
    clears: u64,
    sets: u64,
    hits: u64,
    misses: u64,
}

impl LruShard {
    // == Constructor ==
    /// Creates an empty shard with the given byte budget.
    pub fn new(capacity_max: u64) -> Self {
        Self {
            index: HashMap::new(),
            nodes: Vec::new(),
            free: Vec::new(),
            head: None,
            tail: None,
            capacity_max,
            capacity_cur: 0,
            evicts: 0,
            removes: 0,
            clears: 0,
            sets: 0,
            hits: 0,
            misses: 0,
        }
    }

    // == Get ==
    /// Looks up a key, promoting it to most recently used on a hit.
    ///
    /// Returns an owned copy of the stored item; no reference into the
    /// shard escapes.
    pub fn get(&mut self, key: &str) -> Option<Item> {
        let idx = match self.index.get(key) {
            Some(&idx) => idx,
            None => {
                self.misses += 1;
                return None;
            }
        };

        self.hits += 1;
        self.promote(idx);
        Some(self.node(idx).item.clone())
    }

    // == Set ==
    /// Stores an item unconditionally.
    ///
    /// Overwriting replaces the value and promotes the entry; inserting
    /// appends at the tail. The stored version advances by exactly one per
    /// mutation, starting at 1 on insert. Evicts from the head afterwards
    /// until the byte budget holds again.
    pub fn set(&mut self, item: Item) {
        self.apply_set(item);
    }

    // == Compare And Swap ==
    /// Stores an item only if the caller-supplied version matches the
    /// stored one.
    ///
    /// A missing key always swaps: the write becomes an insert that later
    /// calls can gate against. On a version mismatch nothing changes, not
    /// even the counters.
    pub fn compare_and_swap(&mut self, item: Item) -> bool {
        if let Some(&idx) = self.index.get(&item.key) {
            if self.node(idx).item.version != item.version {
                return false;
            }
        }

        self.apply_set(item);
        true
    }

    // == Remove ==
    /// Removes a key, returning the owned item if it was present.
    ///
    /// The `removes` counter only moves on a hit.
    pub fn remove(&mut self, key: &str) -> Option<Item> {
        let idx = self.index.remove(key)?;
        self.unlink(idx);
        let node = self.release(idx);

        self.capacity_cur -= node.item.size();
        self.removes += 1;
        Some(node.item)
    }

    // == Clear ==
    /// Drops every entry and zeroes `capacity_cur`.
    ///
    /// Only the `clears` counter moves; the other counters keep their
    /// lifetime totals.
    pub fn clear(&mut self) {
        self.index.clear();
        self.nodes.clear();
        self.free.clear();
        self.head = None;
        self.tail = None;
        self.capacity_cur = 0;

        self.clears += 1;
    }

    // == Size ==
    /// Number of currently stored entries.
    pub fn size(&self) -> u64 {
        self.index.len() as u64
    }

    // == Stats ==
    /// Snapshot of the shard's counters and current capacity.
    pub fn stats(&self) -> ShardStats {
        ShardStats {
            evicts: self.evicts,
            removes: self.removes,
            clears: self.clears,
            sets: self.sets,
            hits: self.hits,
            misses: self.misses,
            capacity_cur: self.capacity_cur,
        }
    }

    // == Internals ==

    /// Shared body of `set` and a successful `compare_and_swap`.
    fn apply_set(&mut self, item: Item) {
        let new_size = item.size();

        match self.index.get(&item.key).copied() {
            Some(idx) => {
                let node = self.node_mut(idx);
                let old_size = node.item.size();
                let version = node.item.version + 1;
                node.item = Item { version, ..item };

                self.promote(idx);
                self.capacity_cur = self.capacity_cur - old_size + new_size;
            }
            None => {
                let key = item.key.clone();
                let idx = self.alloc(Node {
                    item: Item { version: 1, ..item },
                    prev: None,
                    next: None,
                });

                self.push_tail(idx);
                self.index.insert(key, idx);
                self.capacity_cur += new_size;
            }
        }

        self.sets += 1;

        // Evict the least recently used until the budget holds. A lone
        // entry larger than the whole budget stays put.
        while self.capacity_cur > self.capacity_max && self.index.len() > 1 {
            self.evict_head();
        }
    }

    /// Removes the head node and drops its entry.
    fn evict_head(&mut self) {
        let idx = match self.head {
            Some(idx) => idx,
            None => return,
        };

        self.unlink(idx);
        let node = self.release(idx);

        self.index.remove(&node.item.key);
        self.capacity_cur -= node.item.size();
        self.evicts += 1;
    }

    /// Moves a node to the tail. No-op when it already is the tail.
    fn promote(&mut self, idx: usize) {
        if self.tail == Some(idx) {
            return;
        }
        self.unlink(idx);
        self.push_tail(idx);
    }

    /// Detaches a node from the recency list, fixing up its neighbours.
    fn unlink(&mut self, idx: usize) {
        let prev = self.node(idx).prev;
        let next = self.node(idx).next;

        match prev {
            Some(p) => self.node_mut(p).next = next,
            None => self.head = next,
        }
        match next {
            Some(n) => self.node_mut(n).prev = prev,
            None => self.tail = prev,
        }

        let node = self.node_mut(idx);
        node.prev = None;
        node.next = None;
    }

    /// Appends a detached node at the tail.
    fn push_tail(&mut self, idx: usize) {
        match self.tail {
            Some(t) => {
                self.node_mut(t).next = Some(idx);
                self.node_mut(idx).prev = Some(t);
            }
            None => self.head = Some(idx),
        }
        self.tail = Some(idx);
    }

    /// Places a node in the arena, reusing a freed slot when available.
    fn alloc(&mut self, node: Node) -> usize {
        match self.free.pop() {
            Some(idx) => {
                self.nodes[idx] = Some(node);
                idx
            }
            None => {
                self.nodes.push(Some(node));
                self.nodes.len() - 1
            }
        }
    }

    /// Takes a node out of the arena and recycles its slot.
    fn release(&mut self, idx: usize) -> Node {
        let node = self.nodes[idx].take().expect("lru arena slot already free");
        self.free.push(idx);
        node
    }

    fn node(&self, idx: usize) -> &Node {
        self.nodes[idx].as_ref().expect("lru list points at a free slot")
    }

    fn node_mut(&mut self, idx: usize) -> &mut Node {
        self.nodes[idx].as_mut().expect("lru list points at a free slot")
    }
}

// == Test Support ==
#[cfg(test)]
impl LruShard {
    /// Asserts the structural invariants: index and list agree, the list is
    /// well formed in both directions, and the byte accounting matches the
    /// stored entries.
    pub fn assert_invariants(&self) {
        let mut seen = 0usize;
        let mut bytes = 0u64;
        let mut prev: Option<usize> = None;
        let mut cursor = self.head;

        while let Some(idx) = cursor {
            let node = self.node(idx);
            assert_eq!(node.prev, prev, "broken prev link at {}", node.item.key);
            assert_eq!(
                self.index.get(&node.item.key),
                Some(&idx),
                "index does not point at list node for {}",
                node.item.key
            );
            seen += 1;
            bytes += node.item.size();
            prev = cursor;
            cursor = node.next;
        }

        assert_eq!(self.tail, prev, "tail does not terminate the list");
        assert_eq!(seen, self.index.len(), "index and list disagree on length");
        assert_eq!(bytes, self.capacity_cur, "byte accounting drifted");
    }

    /// Keys in recency order, least recently used first.
    pub fn keys_lru_order(&self) -> Vec<String> {
        let mut keys = Vec::new();
        let mut cursor = self.head;
        while let Some(idx) = cursor {
            let node = self.node(idx);
            keys.push(node.item.key.clone());
            cursor = node.next;
        }
        keys
    }
}
