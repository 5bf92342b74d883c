//! Property-Based Tests for the Cache Engine
//!
//! Drives levels and the hierarchy with random operation sequences and checks
//! the structural invariants after every step.
//!
//! # Test Properties
//!
//! 1. **Capacity Accounting**: remaining + held sizes == capacity
//! 2. **Unique Identifiers**: no identifier appears twice in a level
//! 3. **Chain Integrity**: links agree in both directions, count matches
//! 4. **Eviction Order**: LRU drains tail-first, MRU head-first

#![cfg(test)]

use proptest::prelude::*;

use super::entry::ContentItem;
use super::level::CacheLevel;
use super::manager::Cache;
use super::policy::EvictionPolicy;

// =============================================================================
// Property Strategies
// =============================================================================

#[derive(Debug, Clone)]
enum LevelOp {
    Put { id: u64, size: u64, policy: &'static str },
    Promote { id: u64 },
    Update { id: u64, new_id: u64, size: u64 },
    LruEvict,
    MruEvict,
    Clear,
}

fn policy_strategy() -> impl Strategy<Value = &'static str> {
    prop_oneof![
        4 => Just("lru"),
        4 => Just("mru"),
        1 => Just("bogus"),
    ]
}

/// Small id space so duplicates and hits are common.
fn level_op_strategy() -> impl Strategy<Value = LevelOp> {
    prop_oneof![
        6 => (0u64..12, 0u64..=24, policy_strategy())
            .prop_map(|(id, size, policy)| LevelOp::Put { id, size, policy }),
        3 => (0u64..12).prop_map(|id| LevelOp::Promote { id }),
        3 => (0u64..12, 0u64..12, 0u64..=24)
            .prop_map(|(id, new_id, size)| LevelOp::Update { id, new_id, size }),
        1 => Just(LevelOp::LruEvict),
        1 => Just(LevelOp::MruEvict),
        1 => Just(LevelOp::Clear),
    ]
}

fn header_strategy() -> impl Strategy<Value = String> {
    "[a-z]{0,6}"
}

fn apply(level: &mut CacheLevel, op: &LevelOp) {
    match *op {
        LevelOp::Put { id, size, policy } => {
            let _ = level.put(ContentItem::new(id, size, "h", ""), policy);
        }
        LevelOp::Promote { id } => {
            level.promote(id);
        }
        LevelOp::Update { id, new_id, size } => {
            let _ = level.update(id, ContentItem::new(new_id, size, "h", ""));
        }
        LevelOp::LruEvict => {
            level.lru_evict();
        }
        LevelOp::MruEvict => {
            level.mru_evict();
        }
        LevelOp::Clear => level.clear(),
    }
}

// =============================================================================
// Invariant Properties
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Property: every structural invariant holds after every operation.
    #[test]
    fn prop_level_invariants_hold(
        capacity in 1u64..=20,
        ops in prop::collection::vec(level_op_strategy(), 1..80),
    ) {
        let mut level = CacheLevel::new(capacity);
        for op in &ops {
            apply(&mut level, op);
            level.assert_invariants();
        }
    }

    /// Property: a successful put leaves the new item at the head.
    #[test]
    fn prop_put_success_lands_at_head(
        capacity in 1u64..=20,
        sizes in prop::collection::vec(0u64..=20, 1..30),
    ) {
        let mut level = CacheLevel::new(capacity);
        for (id, size) in sizes.into_iter().enumerate() {
            let id = id as u64;
            if level.put(ContentItem::new(id, size, "h", ""), EvictionPolicy::Lru).is_ok() {
                prop_assert_eq!(level.head().map(|i| i.id()), Some(id));
            } else {
                prop_assert!(size > capacity);
            }
        }
    }

    /// Property: promotion moves the id to the head and is idempotent.
    #[test]
    fn prop_promotion_law(
        count in 1u64..10,
        target in 0u64..10,
    ) {
        let mut level = CacheLevel::new(100);
        for id in 0..count {
            level.put(ContentItem::new(id, 1, "h", ""), "lru").unwrap();
        }

        let found = level.promote(target);
        prop_assert_eq!(found, target < count);
        if found {
            prop_assert_eq!(level.head().map(|i| i.id()), Some(target));
            let order: Vec<u64> = level.iter().map(|i| i.id()).collect();
            prop_assert!(level.promote(target));
            let again: Vec<u64> = level.iter().map(|i| i.id()).collect();
            prop_assert_eq!(order, again);
        }
        level.assert_invariants();
    }

    /// Property: forced LRU eviction drains the stalest items first.
    #[test]
    fn prop_lru_evicts_tail_first(count in 2u64..10, extra in 1u64..5) {
        let mut level = CacheLevel::new(count);
        for id in 0..count + extra {
            level.put(ContentItem::new(id, 1, "h", ""), "lru").unwrap();
        }
        let held: Vec<u64> = level.iter().map(|i| i.id()).collect();
        let expected: Vec<u64> = (extra..count + extra).rev().collect();
        prop_assert_eq!(held, expected);
    }

    /// Property: forced MRU eviction replaces the most recent item each time.
    #[test]
    fn prop_mru_evicts_head_first(count in 2u64..10, extra in 1u64..5) {
        let mut level = CacheLevel::new(count);
        for id in 0..count + extra {
            level.put(ContentItem::new(id, 1, "h", ""), "mru").unwrap();
        }
        let held: Vec<u64> = level.iter().map(|i| i.id()).collect();
        let mut expected: Vec<u64> = (0..count - 1).rev().collect();
        expected.insert(0, count + extra - 1);
        prop_assert_eq!(held, expected);
    }

    /// Property: the hierarchy keeps every level consistent and routes
    /// deterministically by header.
    #[test]
    fn prop_hierarchy_invariants_hold(
        capacity in 1u64..=16,
        ops in prop::collection::vec(
            (0u64..10, 0u64..=16, header_strategy(), any::<bool>()),
            1..60,
        ),
    ) {
        let mut cache = Cache::new(capacity);
        for (id, size, header, is_set) in ops {
            let item = ContentItem::new(id, size, header, "");
            let level = cache.route(&item);
            prop_assert!(level < 3);
            prop_assert_eq!(level as u64, item.routing_hash());

            if is_set {
                let _ = cache.set(id, item);
            } else if cache.insert(item.clone(), "lru").is_ok() {
                prop_assert!(cache.get(&item).is_some());
            }
            for level in cache.levels() {
                level.assert_invariants();
            }
        }

        cache.clear();
        prop_assert!(cache.is_empty());
    }
}
