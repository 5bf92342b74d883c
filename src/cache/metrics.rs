//! Cache Metrics Collection
//!
//! Per-level operation counters and serializable statistics snapshots.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// Per-level operation counters
#[derive(Debug, Default)]
pub struct LevelMetrics {
    hits: AtomicU64,
    misses: AtomicU64,
    insertions: AtomicU64,
    rejections: AtomicU64,
    evictions: AtomicU64,
    promotions: AtomicU64,
    updates: AtomicU64,
}

impl LevelMetrics {
    /// Create a new metrics collector
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_insertion(&self) {
        self.insertions.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_rejection(&self) {
        self.rejections.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_eviction(&self) {
        self.evictions.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_promotion(&self) {
        self.promotions.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_update(&self) {
        self.updates.fetch_add(1, Ordering::Relaxed);
    }

    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    pub fn misses(&self) -> u64 {
        self.misses.load(Ordering::Relaxed)
    }

    pub fn insertions(&self) -> u64 {
        self.insertions.load(Ordering::Relaxed)
    }

    pub fn rejections(&self) -> u64 {
        self.rejections.load(Ordering::Relaxed)
    }

    pub fn evictions(&self) -> u64 {
        self.evictions.load(Ordering::Relaxed)
    }

    pub fn promotions(&self) -> u64 {
        self.promotions.load(Ordering::Relaxed)
    }

    pub fn updates(&self) -> u64 {
        self.updates.load(Ordering::Relaxed)
    }

    pub fn hit_ratio(&self) -> f64 {
        let hits = self.hits() as f64;
        let total = hits + self.misses() as f64;
        if total == 0.0 {
            0.0
        } else {
            hits / total
        }
    }

    /// Reset all counters
    pub fn reset(&self) {
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
        self.insertions.store(0, Ordering::Relaxed);
        self.rejections.store(0, Ordering::Relaxed);
        self.evictions.store(0, Ordering::Relaxed);
        self.promotions.store(0, Ordering::Relaxed);
        self.updates.store(0, Ordering::Relaxed);
    }
}

/// Level statistics snapshot
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LevelStats {
    /// Maximum capacity
    pub capacity: u64,
    /// Remaining capacity
    pub remaining: u64,
    /// Number of items held
    pub entries: usize,
    pub hits: u64,
    pub misses: u64,
    /// Hit ratio (0.0 - 1.0)
    pub hit_ratio: f64,
    pub insertions: u64,
    pub rejections: u64,
    pub evictions: u64,
    pub promotions: u64,
    pub updates: u64,
    /// Utilization (0.0 - 1.0)
    pub utilization: f64,
}

/// Hierarchy statistics snapshot
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CacheStats {
    /// One snapshot per level, in hierarchy order
    pub levels: Vec<LevelStats>,
}

impl CacheStats {
    /// Total items held across the hierarchy
    pub fn total_entries(&self) -> usize {
        self.levels.iter().map(|l| l.entries).sum()
    }

    /// Total capacity consumed across the hierarchy
    pub fn total_used(&self) -> u64 {
        self.levels.iter().map(|l| l.capacity - l.remaining).sum()
    }

    /// Total evictions across the hierarchy
    pub fn total_evictions(&self) -> u64 {
        self.levels.iter().map(|l| l.evictions).sum()
    }

    /// Hit ratio across all levels
    pub fn hit_ratio(&self) -> f64 {
        let hits: u64 = self.levels.iter().map(|l| l.hits).sum();
        let misses: u64 = self.levels.iter().map(|l| l.misses).sum();
        let total = (hits + misses) as f64;
        if total == 0.0 {
            0.0
        } else {
            hits as f64 / total
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_counters() {
        let metrics = LevelMetrics::new();
        metrics.record_hit();
        metrics.record_hit();
        metrics.record_miss();
        metrics.record_eviction();
        metrics.record_insertion();

        assert_eq!(metrics.hits(), 2);
        assert_eq!(metrics.misses(), 1);
        assert_eq!(metrics.evictions(), 1);
        assert_eq!(metrics.insertions(), 1);
        assert!((metrics.hit_ratio() - 2.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_hit_ratio_without_lookups() {
        let metrics = LevelMetrics::new();
        assert_eq!(metrics.hit_ratio(), 0.0);
    }

    #[test]
    fn test_metrics_reset() {
        let metrics = LevelMetrics::new();
        metrics.record_promotion();
        metrics.record_update();
        metrics.record_rejection();
        metrics.reset();

        assert_eq!(metrics.promotions(), 0);
        assert_eq!(metrics.updates(), 0);
        assert_eq!(metrics.rejections(), 0);
    }

    fn level(capacity: u64, remaining: u64, hits: u64, misses: u64) -> LevelStats {
        LevelStats {
            capacity,
            remaining,
            entries: 1,
            hits,
            misses,
            hit_ratio: 0.0,
            insertions: 0,
            rejections: 0,
            evictions: 2,
            promotions: 0,
            updates: 0,
            utilization: 0.0,
        }
    }

    #[test]
    fn test_cache_stats_aggregation() {
        let stats = CacheStats {
            levels: vec![level(10, 4, 1, 1), level(10, 10, 0, 0), level(10, 7, 2, 0)],
        };

        assert_eq!(stats.total_entries(), 3);
        assert_eq!(stats.total_used(), 9);
        assert_eq!(stats.total_evictions(), 6);
        assert!((stats.hit_ratio() - 0.75).abs() < 1e-9);
    }

    #[test]
    fn test_stats_serialize() {
        let stats = CacheStats {
            levels: vec![level(10, 4, 1, 1)],
        };
        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["levels"][0]["capacity"], 10);
        assert_eq!(json["levels"][0]["remaining"], 4);
    }
}
