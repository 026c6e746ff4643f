//! Metrics Module
//!
//! Renders the shard-array statistics snapshot in the Prometheus text
//! exposition format. Counters are exported per shard under the label
//! `shard="<index>"`; current capacity is a gauge.

use std::fmt::Write;

use crate::cache::{ArrayStats, ShardStats};

const NAMESPACE: &str = "shardcache_cache";

// == Render ==
/// Renders a stats snapshot as Prometheus text exposition (version 0.0.4).
pub fn render(stats: &ArrayStats) -> String {
    let mut out = String::new();

    counter(&mut out, "evicts_total", "Number of cache evictions", stats, |s| s.evicts);
    counter(
        &mut out,
        "removes_total",
        "Number of cache remove operations",
        stats,
        |s| s.removes,
    );
    counter(
        &mut out,
        "clears_total",
        "Number of cache clear operations",
        stats,
        |s| s.clears,
    );
    counter(
        &mut out,
        "sets_total",
        "Number of cache set operations",
        stats,
        |s| s.sets,
    );
    counter(&mut out, "hits_total", "Number of cache hits", stats, |s| s.hits);
    counter(&mut out, "misses_total", "Number of cache misses", stats, |s| s.misses);
    gauge(
        &mut out,
        "current_capacity",
        "The current cache capacity, in bytes",
        stats,
        |s| s.capacity_cur,
    );

    out
}

fn counter(
    out: &mut String,
    name: &str,
    help: &str,
    stats: &ArrayStats,
    field: impl Fn(&ShardStats) -> u64,
) {
    family(out, name, help, "counter", stats, field);
}

fn gauge(
    out: &mut String,
    name: &str,
    help: &str,
    stats: &ArrayStats,
    field: impl Fn(&ShardStats) -> u64,
) {
    family(out, name, help, "gauge", stats, field);
}

fn family(
    out: &mut String,
    name: &str,
    help: &str,
    kind: &str,
    stats: &ArrayStats,
    field: impl Fn(&ShardStats) -> u64,
) {
    let _ = writeln!(out, "# HELP {NAMESPACE}_{name} {help}");
    let _ = writeln!(out, "# TYPE {NAMESPACE}_{name} {kind}");
    for (i, shard) in stats.shards.iter().enumerate() {
        let _ = writeln!(out, "{NAMESPACE}_{name}{{shard=\"{i}\"}} {}", field(shard));
    }
}
