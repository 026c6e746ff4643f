//! Configuration Module
//!
//! Handles loading and managing server configuration from environment
//! variables. All values are fixed at process start.

use std::env;

// == Defaults ==
const DEFAULT_CAPACITY: &str = "128m";
const DEFAULT_SHARD_COUNT: usize = 20;
const DEFAULT_REPLICAS: usize = 160;
const DEFAULT_SERVER_PORT: u16 = 8080;

// == Config ==
/// Server configuration parameters.
#[derive(Debug, Clone)]
pub struct Config {
    /// Total cache capacity in bytes, split evenly across shards
    pub capacity_total: u64,
    /// Number of LRU shards
    pub shard_count: usize,
    /// Replica points per shard on the hash ring
    pub replicas: usize,
    /// HTTP server port
    pub server_port: u16,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CAPACITY` - Total cache size, with optional `k`/`m`/`g` suffix
    ///   (default: "128m")
    /// - `NUM_SHARDS` - Number of shards, at least 1 (default: 20)
    /// - `NUM_REPLICAS` - Ring replica points per shard (default: 160)
    /// - `SERVER_PORT` - HTTP server port (default: 8080)
    ///
    /// # Errors
    /// Returns an error message when `CAPACITY` does not parse; a silently
    /// wrong byte budget is worse than refusing to start. The other
    /// variables fall back to their defaults when absent or unparseable.
    pub fn from_env() -> Result<Self, String> {
        let capacity = env::var("CAPACITY").unwrap_or_else(|_| DEFAULT_CAPACITY.to_string());
        let capacity_total = parse_capacity(&capacity)
            .ok_or_else(|| format!("invalid CAPACITY: {capacity:?}"))?;

        let shard_count = env::var("NUM_SHARDS")
            .ok()
            .and_then(|v| v.parse().ok())
            .filter(|&n| n >= 1)
            .unwrap_or(DEFAULT_SHARD_COUNT);

        let replicas = env::var("NUM_REPLICAS")
            .ok()
            .and_then(|v| v.parse().ok())
            .filter(|&n| n >= 1)
            .unwrap_or(DEFAULT_REPLICAS);

        let server_port = env::var("SERVER_PORT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_SERVER_PORT);

        Ok(Self {
            capacity_total,
            shard_count,
            replicas,
            server_port,
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            capacity_total: 128 * 1024 * 1024,
            shard_count: DEFAULT_SHARD_COUNT,
            replicas: DEFAULT_REPLICAS,
            server_port: DEFAULT_SERVER_PORT,
        }
    }
}

// == Capacity Parsing ==
/// Parses a human-readable byte size with optional suffix.
///
/// Supports plain bytes and `k`/`kb`, `m`/`mb`, `g`/`gb` (1024-based,
/// case-insensitive). Returns `None` for anything else.
pub fn parse_capacity(s: &str) -> Option<u64> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    let boundary = s
        .find(|c: char| !c.is_ascii_digit() && c != '.')
        .unwrap_or(s.len());
    let (num_str, suffix) = s.split_at(boundary);

    let num: f64 = num_str.parse().ok()?;
    let multiplier: u64 = match suffix.to_ascii_lowercase().as_str() {
        "" | "b" => 1,
        "k" | "kb" => 1024,
        "m" | "mb" => 1024 * 1024,
        "g" | "gb" => 1024 * 1024 * 1024,
        _ => return None,
    };

    Some((num * multiplier as f64) as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.capacity_total, 128 * 1024 * 1024);
        assert_eq!(config.shard_count, 20);
        assert_eq!(config.replicas, 160);
        assert_eq!(config.server_port, 8080);
    }

    #[test]
    fn test_parse_capacity_plain_bytes() {
        assert_eq!(parse_capacity("1024"), Some(1024));
        assert_eq!(parse_capacity("0"), Some(0));
        assert_eq!(parse_capacity("512b"), Some(512));
    }

    #[test]
    fn test_parse_capacity_suffixes() {
        assert_eq!(parse_capacity("1k"), Some(1024));
        assert_eq!(parse_capacity("128m"), Some(128 * 1024 * 1024));
        assert_eq!(parse_capacity("2G"), Some(2 * 1024 * 1024 * 1024));
        assert_eq!(parse_capacity("16KB"), Some(16 * 1024));
    }

    #[test]
    fn test_parse_capacity_fractional() {
        assert_eq!(parse_capacity("1.5k"), Some(1536));
        assert_eq!(parse_capacity("0.5m"), Some(512 * 1024));
    }

    #[test]
    fn test_parse_capacity_rejects_garbage() {
        assert_eq!(parse_capacity(""), None);
        assert_eq!(parse_capacity("lots"), None);
        assert_eq!(parse_capacity("12q"), None);
        assert_eq!(parse_capacity("m"), None);
    }
}
