//! Cache Item Module
//!
//! Defines the unit of storage: a key, an opaque byte value, and the
//! monotonic version counter used for compare-and-swap.

// == Item ==
/// A single cache entry.
///
/// The version starts at 1 when a key is first stored and advances by
/// exactly one on every successful `set` or `compare_and_swap`. Callers
/// hand the version back to gate optimistic updates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    /// The cache key
    pub key: String,
    /// The stored value, opaque to the cache
    pub value: Vec<u8>,
    /// Monotonic version counter for this key's current lifetime
    pub version: u64,
}

impl Item {
    // == Constructor ==
    /// Creates a new item with the given key, value and version.
    pub fn new(key: impl Into<String>, value: Vec<u8>, version: u64) -> Self {
        Self {
            key: key.into(),
            value,
            version,
        }
    }

    // == Size ==
    /// Size of the item in bytes, as counted against shard capacity.
    ///
    /// Only the key and value bytes count; the version and any node
    /// bookkeeping are excluded.
    pub fn size(&self) -> u64 {
        (self.key.len() + self.value.len()) as u64
    }
}
