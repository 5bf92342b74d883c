//! Multi-Level Content Cache
//!
//! Three fixed-capacity levels, each an ordered recency list with LRU or MRU
//! eviction. Items are routed to a level by a hash of their header.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────────────┐
//! │                                Cache                                      │
//! │              route(item) = sum(header chars) % 3                          │
//! ├──────────────────────────────────────────────────────────────────────────┤
//! │  L1 (level 0)           │ L2 (level 1)           │ L3 (level 2)           │
//! │  ┌──────────────────┐   │ ┌──────────────────┐   │ ┌──────────────────┐   │
//! │  │ head ◄──► ... ◄──│   │ │ head ◄──► ... ◄──│   │ │ head ◄──► ... ◄──│   │
//! │  │ ──► tail         │   │ │ ──► tail         │   │ │ ──► tail         │   │
//! │  │ (MRU)     (LRU)  │   │ │ (MRU)     (LRU)  │   │ │ (MRU)     (LRU)  │   │
//! │  └──────────────────┘   │ └──────────────────┘   │ └──────────────────┘   │
//! └──────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Recency
//!
//! - Inserts land at the head
//! - `Cache::set` promotes the target to the head before replacing it
//! - `Cache::get` is read-only and leaves the order untouched
//!
//! Not thread-safe: every mutating call takes `&mut self`.

mod entry;
mod level;
mod manager;
mod metrics;
mod policy;
mod proptest;

pub use entry::{ContentId, ContentItem};
pub use level::{CacheLevel, Iter};
pub use manager::Cache;
pub use metrics::{CacheStats, LevelMetrics, LevelStats};
pub use policy::EvictionPolicy;

/// Number of levels in the hierarchy
pub const LEVEL_COUNT: usize = 3;

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_count() {
        assert_eq!(LEVEL_COUNT, 3);
        assert_eq!(Cache::new(1).levels().len(), LEVEL_COUNT);
    }
}
