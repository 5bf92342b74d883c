//! Cache Manager - Three-Level Hierarchy
//!
//! Owns exactly three independent levels and routes every operation to one of
//! them by the item's routing hash.

use std::fmt;

use tracing::debug;

use super::entry::{ContentId, ContentItem};
use super::level::CacheLevel;
use super::metrics::CacheStats;
use super::LEVEL_COUNT;
use crate::config::CacheConfig;
use crate::error::{Error, Result};

/// Multi-level content cache
#[derive(Debug)]
pub struct Cache {
    levels: [CacheLevel; LEVEL_COUNT],
}

impl Cache {
    /// Create a hierarchy of three levels, each with `level_capacity`
    pub fn new(level_capacity: u64) -> Self {
        Self {
            levels: std::array::from_fn(|_| CacheLevel::new(level_capacity)),
        }
    }

    /// Create a hierarchy from configuration
    pub fn with_config(config: &CacheConfig) -> Self {
        Self::new(config.level_capacity)
    }

    /// Level index an item is routed to
    #[inline]
    pub fn route(&self, item: &ContentItem) -> usize {
        (item.routing_hash() % LEVEL_COUNT as u64) as usize
    }

    /// Insert an item into its routed level
    pub fn insert<P: AsRef<str>>(&mut self, item: ContentItem, policy: P) -> Result<()> {
        let level = self.route(&item);
        debug!(id = item.id(), level, "Insert");
        self.levels[level].put(item, policy)
    }

    /// Look up an item in its routed level by identifier.
    ///
    /// Reading does not change recency order.
    pub fn get(&self, item: &ContentItem) -> Option<&ContentItem> {
        let level = self.route(item);
        self.levels[level].find(item.id())
    }

    /// Replace the item held under `id` in the level `item` routes to.
    ///
    /// Routing uses the replacement's header, not the stored item's. If the
    /// two headers route to different levels the lookup misses, even though
    /// `id` is held elsewhere.
    pub fn set(&mut self, id: ContentId, item: ContentItem) -> Result<()> {
        let level = self.route(&item);
        debug!(id, level, "Set");
        self.levels[level].update(id, item)
    }

    /// Clear every level
    pub fn clear(&mut self) {
        for level in &mut self.levels {
            level.clear();
        }
        debug!("Cache cleared");
    }

    /// Get a level by index
    pub fn level(&self, index: usize) -> Result<&CacheLevel> {
        self.levels.get(index).ok_or(Error::LevelOutOfRange {
            index,
            count: LEVEL_COUNT,
        })
    }

    /// Get a level by index, mutably
    pub fn level_mut(&mut self, index: usize) -> Result<&mut CacheLevel> {
        self.levels.get_mut(index).ok_or(Error::LevelOutOfRange {
            index,
            count: LEVEL_COUNT,
        })
    }

    /// All levels, in hierarchy order
    pub fn levels(&self) -> &[CacheLevel] {
        &self.levels
    }

    /// Total items held across all levels
    pub fn len(&self) -> usize {
        self.levels.iter().map(CacheLevel::len).sum()
    }

    /// Check if every level is empty
    pub fn is_empty(&self) -> bool {
        self.levels.iter().all(CacheLevel::is_empty)
    }

    /// Get statistics for every level
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            levels: self.levels.iter().map(CacheLevel::stats).collect(),
        }
    }
}

impl fmt::Display for Cache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, level) in self.levels.iter().enumerate() {
            writeln!(f, "L{} CACHE:", i + 1)?;
            writeln!(f, "{}", level)?;
        }
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::EvictionPolicy;
    use assert_matches::assert_matches;

    // 'a' = 97 -> level 1, "ab" = 195 -> level 0, 'e' = 101 -> level 2
    const L0: &str = "ab";
    const L1: &str = "a";
    const L2: &str = "e";

    fn item(id: ContentId, size: u64, header: &str) -> ContentItem {
        ContentItem::new(id, size, header, format!("body-{}", id))
    }

    #[test]
    fn test_cache_creation() {
        let cache = Cache::new(10);
        assert_eq!(cache.levels().len(), 3);
        assert!(cache.is_empty());
        for level in cache.levels() {
            assert_eq!(level.max_capacity(), 10);
            assert_eq!(level.remaining_capacity(), 10);
        }
    }

    #[test]
    fn test_cache_with_config() {
        let config = CacheConfig {
            level_capacity: 64,
            ..Default::default()
        };
        let cache = Cache::with_config(&config);
        assert!(cache.levels().iter().all(|l| l.max_capacity() == 64));
    }

    #[test]
    fn test_routing() {
        let cache = Cache::new(10);
        assert_eq!(cache.route(&item(1, 1, L0)), 0);
        assert_eq!(cache.route(&item(1, 1, L1)), 1);
        assert_eq!(cache.route(&item(1, 1, L2)), 2);
    }

    #[test]
    fn test_insert_goes_to_routed_level() {
        let mut cache = Cache::new(10);
        cache.insert(item(1, 3, L0), "lru").unwrap();
        cache.insert(item(2, 3, L1), "lru").unwrap();
        cache.insert(item(3, 3, L2), "lru").unwrap();

        for (index, id) in [(0, 1), (1, 2), (2, 3)] {
            let level = cache.level(index).unwrap();
            assert_eq!(level.len(), 1);
            assert!(level.exists(id));
        }
        assert_eq!(cache.len(), 3);
    }

    #[test]
    fn test_insert_returns_level_outcome() {
        let mut cache = Cache::new(10);
        cache.insert(item(1, 3, L0), "lru").unwrap();
        assert_matches!(
            cache.insert(item(1, 3, L0), "lru"),
            Err(Error::AlreadyPresent { id: 1 })
        );
        assert_matches!(
            cache.insert(item(2, 11, L0), "lru"),
            Err(Error::InsertionNotAllowed { .. })
        );
    }

    #[test]
    fn test_same_id_in_different_levels() {
        let mut cache = Cache::new(10);
        cache.insert(item(1, 3, L0), "lru").unwrap();
        cache.insert(item(1, 3, L1), "lru").unwrap();
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_levels_are_independent() {
        let mut cache = Cache::new(10);
        cache.insert(item(1, 8, L0), "lru").unwrap();
        cache.insert(item(2, 8, L1), "lru").unwrap();
        cache.insert(item(3, 8, L0), EvictionPolicy::Lru).unwrap();

        // Only level 0 evicted
        assert!(!cache.level(0).unwrap().exists(1));
        assert!(cache.level(1).unwrap().exists(2));
    }

    #[test]
    fn test_get_hit_and_miss() {
        let mut cache = Cache::new(10);
        let stored = item(1, 3, L1);
        cache.insert(stored.clone(), "lru").unwrap();

        // Lookup matches by id within the routed level
        let probe = ContentItem::new(1, 0, L1, "");
        assert_eq!(cache.get(&probe), Some(&stored));

        assert!(cache.get(&item(2, 3, L1)).is_none());
        // Same id but header routes elsewhere
        assert!(cache.get(&item(1, 3, L2)).is_none());
    }

    #[test]
    fn test_get_does_not_promote() {
        let mut cache = Cache::new(10);
        cache.insert(item(1, 1, L0), "lru").unwrap();
        cache.insert(item(2, 1, L0), "lru").unwrap();

        cache.get(&item(1, 1, L0));
        let level = cache.level(0).unwrap();
        assert_eq!(level.head().unwrap().id(), 2);
        assert_eq!(level.tail().unwrap().id(), 1);
    }

    #[test]
    fn test_set_updates_routed_level() {
        let mut cache = Cache::new(10);
        cache.insert(item(1, 4, L2), "lru").unwrap();

        cache.set(1, item(1, 9, L2)).unwrap();
        let level = cache.level(2).unwrap();
        assert_eq!(level.remaining_capacity(), 1);
        assert_eq!(level.head().unwrap().size(), 9);
    }

    #[test]
    fn test_set_routes_by_new_header() {
        let mut cache = Cache::new(10);
        cache.insert(item(1, 4, L0), "lru").unwrap();

        // Replacement header routes to level 2, which does not hold id 1
        let result = cache.set(1, item(1, 4, L2));
        assert_matches!(result, Err(Error::CacheMiss { id: 1 }));
        assert!(cache.level(0).unwrap().exists(1));
        assert_eq!(cache.level(0).unwrap().head().unwrap().header(), L0);
    }

    #[test]
    fn test_set_not_enough_space() {
        let mut cache = Cache::new(10);
        cache.insert(item(1, 4, L1), "lru").unwrap();
        cache.insert(item(2, 5, L1), "lru").unwrap();

        assert_matches!(
            cache.set(1, item(1, 6, L1)),
            Err(Error::NotEnoughSpace { .. })
        );
    }

    #[test]
    fn test_clear() {
        let mut cache = Cache::new(10);
        cache.insert(item(1, 4, L0), "lru").unwrap();
        cache.insert(item(2, 4, L1), "lru").unwrap();
        cache.insert(item(3, 4, L2), "lru").unwrap();

        cache.clear();
        assert!(cache.is_empty());
        assert!(cache
            .levels()
            .iter()
            .all(|l| l.remaining_capacity() == l.max_capacity()));

        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_level_out_of_range() {
        let mut cache = Cache::new(10);
        assert_matches!(
            cache.level(3),
            Err(Error::LevelOutOfRange { index: 3, count: 3 })
        );
        assert!(cache.level_mut(2).is_ok());
    }

    #[test]
    fn test_stats() {
        let mut cache = Cache::new(10);
        cache.insert(item(1, 6, L0), "lru").unwrap();
        cache.insert(item(2, 6, L0), "lru").unwrap();
        cache.get(&item(2, 6, L0));
        cache.get(&item(3, 6, L1));

        let stats = cache.stats();
        assert_eq!(stats.levels.len(), 3);
        assert_eq!(stats.levels[0].evictions, 1);
        assert_eq!(stats.levels[0].hits, 1);
        assert_eq!(stats.levels[1].misses, 1);
        assert_eq!(stats.total_entries(), 1);
        assert_eq!(stats.total_used(), 6);
    }

    #[test]
    fn test_display() {
        let mut cache = Cache::new(5);
        cache.insert(ContentItem::new(1, 2, L1, "x"), "lru").unwrap();

        let out = cache.to_string();
        assert!(out.starts_with("L1 CACHE:\nREMAINING SPACE:5\nITEMS:0\n"));
        assert!(out.contains("L2 CACHE:\nREMAINING SPACE:3\nITEMS:1\n"));
        assert!(out.contains("[CONTENT ID: 1 SIZE: 2 HEADER: a CONTENT: x]"));
        assert!(out.contains("L3 CACHE:\n"));
    }
}
