//! Request DTOs for the cache server API
//!
//! Defines the structure of incoming HTTP request bodies and the wire
//! representation of a cache item.

use serde::{Deserialize, Serialize};

use crate::cache::Item;

// == Item Payload ==
/// Wire representation of a cache item.
///
/// `cas_id` carries the shard-side version as a signed 64-bit field and is
/// copied bit-for-bit in both directions; zero is the usual value on a
/// first write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemPayload {
    /// The cache key
    pub key: String,
    /// The value bytes
    pub value: Vec<u8>,
    /// Version token for compare-and-swap
    #[serde(default)]
    pub cas_id: i64,
}

impl ItemPayload {
    /// Validates the payload, returning an error message when it is not
    /// storable.
    pub fn validate(&self) -> Option<String> {
        if self.key.is_empty() {
            return Some("key cannot be empty".to_string());
        }
        None
    }

    /// Converts into the cache-side item, reinterpreting `cas_id` as the
    /// unsigned version.
    pub fn into_item(self) -> Item {
        Item::new(self.key, self.value, self.cas_id as u64)
    }

    /// Builds the wire payload for a cache-side item.
    pub fn from_item(item: Item) -> Self {
        Self {
            key: item.key,
            value: item.value,
            cas_id: item.version as i64,
        }
    }
}

// == Set Request ==
/// Request body for the SET operation (PUT /set)
#[derive(Debug, Clone, Deserialize)]
pub struct SetRequest {
    /// The item to store
    pub item: ItemPayload,
}

// == Cas Request ==
/// Request body for the compare-and-swap operation (POST /cas)
#[derive(Debug, Clone, Deserialize)]
pub struct CasRequest {
    /// The item to store, gated on its `cas_id`
    pub item: ItemPayload,
}
