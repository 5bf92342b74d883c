//! Cache Level - Capacity-Bounded Recency List
//!
//! One level of the hierarchy: items ordered from most recently touched (head)
//! to least recently touched (tail), with a fixed capacity budget.
//!
//! # Design
//!
//! - Nodes live in an index arena; `prev`/`next` are slot handles, so promotion
//!   and eviction are O(1) splices without shared ownership of nodes
//! - Freed slots are recycled through a free list
//! - Lookups scan head to tail by identifier
//! - `remaining + sum(item sizes) == max_capacity` between public calls

use std::fmt;

use tracing::{debug, trace};

use super::entry::{ContentId, ContentItem};
use super::metrics::{LevelMetrics, LevelStats};
use super::policy::EvictionPolicy;
use crate::error::{Error, Result};

/// Arena slot handle
type Handle = usize;

#[derive(Debug)]
struct Node {
    item: ContentItem,
    prev: Option<Handle>,
    next: Option<Handle>,
}

/// A single capacity-bounded cache level
#[derive(Debug)]
pub struct CacheLevel {
    /// Node arena; `None` marks a free slot
    slots: Vec<Option<Node>>,
    /// Free slot handles available for reuse
    free: Vec<Handle>,
    /// Most recently touched node
    head: Option<Handle>,
    /// Least recently touched node
    tail: Option<Handle>,
    max_capacity: u64,
    remaining: u64,
    len: usize,
    metrics: LevelMetrics,
}

impl CacheLevel {
    /// Create an empty level with a fixed capacity
    pub fn new(max_capacity: u64) -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            head: None,
            tail: None,
            max_capacity,
            remaining: max_capacity,
            len: 0,
            metrics: LevelMetrics::new(),
        }
    }

    /// Insert an item at the head, evicting per `policy` until it fits.
    ///
    /// The policy name is only resolved when an eviction is actually needed,
    /// so an unrecognised name is accepted as long as the item fits.
    pub fn put<P: AsRef<str>>(&mut self, item: ContentItem, policy: P) -> Result<()> {
        if self.exists(item.id()) {
            self.metrics.record_rejection();
            debug!(id = item.id(), "Rejected insert: identifier already present");
            return Err(Error::AlreadyPresent { id: item.id() });
        }

        if item.size() > self.max_capacity {
            self.metrics.record_rejection();
            debug!(
                id = item.id(),
                size = item.size(),
                capacity = self.max_capacity,
                "Rejected insert: item larger than level"
            );
            return Err(Error::InsertionNotAllowed {
                id: item.id(),
                size: item.size(),
                capacity: self.max_capacity,
            });
        }

        if self.remaining < item.size() {
            let policy = match policy.as_ref().parse::<EvictionPolicy>() {
                Ok(policy) => policy,
                Err(e) => {
                    self.metrics.record_rejection();
                    debug!(id = item.id(), "Rejected insert: {}", e);
                    return Err(e);
                }
            };

            while self.remaining < item.size() {
                if self.evict(policy).is_none() {
                    break;
                }
            }
        }

        let size = item.size();
        let handle = self.allocate(item);
        self.push_front(handle);
        self.len += 1;
        self.remaining -= size;
        self.metrics.record_insertion();

        Ok(())
    }

    /// Check whether an identifier is held, without touching recency
    pub fn exists(&self, id: ContentId) -> bool {
        self.position(id).is_some()
    }

    /// Look up an item by identifier without promoting it
    pub fn find(&self, id: ContentId) -> Option<&ContentItem> {
        match self.position(id) {
            Some(handle) => {
                self.metrics.record_hit();
                Some(&self.node(handle).item)
            }
            None => {
                self.metrics.record_miss();
                None
            }
        }
    }

    /// Move the item with `id` to the head. Returns false on a miss.
    ///
    /// This is the only operation that changes recency order for an item
    /// already in the level.
    pub fn promote(&mut self, id: ContentId) -> bool {
        match self.position(id) {
            Some(handle) => {
                self.move_to_front(handle);
                true
            }
            None => false,
        }
    }

    /// Replace the item held under `id` with `new_item`.
    ///
    /// The held item is promoted to the head first; the promotion stands even
    /// if the replacement is then rejected for lack of space. `new_item` may
    /// carry a different identifier as long as that identifier is not held by
    /// another item in this level.
    pub fn update(&mut self, id: ContentId, new_item: ContentItem) -> Result<()> {
        let Some(handle) = self.position(id) else {
            debug!(id, "Update missed");
            return Err(Error::CacheMiss { id });
        };

        if new_item.id() != id && self.exists(new_item.id()) {
            self.metrics.record_rejection();
            debug!(
                id,
                replacement = new_item.id(),
                "Rejected update: replacement identifier already present"
            );
            return Err(Error::AlreadyPresent { id: new_item.id() });
        }

        self.move_to_front(handle);

        let available = self.remaining + self.node(handle).item.size();
        if available < new_item.size() {
            self.metrics.record_rejection();
            debug!(
                id,
                required = new_item.size(),
                available,
                "Rejected update: not enough space"
            );
            return Err(Error::NotEnoughSpace {
                id,
                required: new_item.size(),
                available,
            });
        }

        self.remaining = available - new_item.size();
        self.node_mut(handle).item = new_item;
        self.metrics.record_update();

        Ok(())
    }

    /// Evict one item from the end selected by `policy`
    pub fn evict(&mut self, policy: EvictionPolicy) -> Option<ContentItem> {
        match policy {
            EvictionPolicy::Lru => self.lru_evict(),
            EvictionPolicy::Mru => self.mru_evict(),
        }
    }

    /// Evict the most recently touched item (head)
    pub fn mru_evict(&mut self) -> Option<ContentItem> {
        let handle = self.head?;
        Some(self.remove_node(handle))
    }

    /// Evict the least recently touched item (tail)
    pub fn lru_evict(&mut self) -> Option<ContentItem> {
        let handle = self.tail?;
        Some(self.remove_node(handle))
    }

    /// Drop every item and restore the full capacity
    pub fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
        self.head = None;
        self.tail = None;
        self.remaining = self.max_capacity;
        self.len = 0;
    }

    /// Number of items held
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check if the level is empty
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Fixed capacity of the level
    pub fn max_capacity(&self) -> u64 {
        self.max_capacity
    }

    /// Capacity not yet consumed
    pub fn remaining_capacity(&self) -> u64 {
        self.remaining
    }

    /// Capacity consumed by held items
    pub fn used_capacity(&self) -> u64 {
        self.max_capacity - self.remaining
    }

    /// Utilization (0.0 - 1.0)
    pub fn utilization(&self) -> f64 {
        if self.max_capacity == 0 {
            return 0.0;
        }
        self.used_capacity() as f64 / self.max_capacity as f64
    }

    /// Most recently touched item
    pub fn head(&self) -> Option<&ContentItem> {
        self.head.map(|handle| &self.node(handle).item)
    }

    /// Least recently touched item
    pub fn tail(&self) -> Option<&ContentItem> {
        self.tail.map(|handle| &self.node(handle).item)
    }

    /// Iterate items from most to least recently touched
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            level: self,
            cursor: self.head,
            remaining: self.len,
        }
    }

    /// Get the level's counters
    pub fn metrics(&self) -> &LevelMetrics {
        &self.metrics
    }

    /// Get level statistics
    pub fn stats(&self) -> LevelStats {
        LevelStats {
            capacity: self.max_capacity,
            remaining: self.remaining,
            entries: self.len,
            hits: self.metrics.hits(),
            misses: self.metrics.misses(),
            hit_ratio: self.metrics.hit_ratio(),
            insertions: self.metrics.insertions(),
            rejections: self.metrics.rejections(),
            evictions: self.metrics.evictions(),
            promotions: self.metrics.promotions(),
            updates: self.metrics.updates(),
            utilization: self.utilization(),
        }
    }

    // -------------------------------------------------------------------------
    // Arena and link maintenance
    // -------------------------------------------------------------------------

    fn node(&self, handle: Handle) -> &Node {
        match self.slots[handle].as_ref() {
            Some(node) => node,
            None => unreachable!("dangling handle {handle}"),
        }
    }

    fn node_mut(&mut self, handle: Handle) -> &mut Node {
        match self.slots[handle].as_mut() {
            Some(node) => node,
            None => unreachable!("dangling handle {handle}"),
        }
    }

    fn position(&self, id: ContentId) -> Option<Handle> {
        let mut cursor = self.head;
        while let Some(handle) = cursor {
            let node = self.node(handle);
            if node.item.id() == id {
                return Some(handle);
            }
            cursor = node.next;
        }
        None
    }

    fn allocate(&mut self, item: ContentItem) -> Handle {
        let node = Node {
            item,
            prev: None,
            next: None,
        };
        match self.free.pop() {
            Some(handle) => {
                self.slots[handle] = Some(node);
                handle
            }
            None => {
                self.slots.push(Some(node));
                self.slots.len() - 1
            }
        }
    }

    fn unlink(&mut self, handle: Handle) {
        let (prev, next) = {
            let node = self.node(handle);
            (node.prev, node.next)
        };

        match prev {
            Some(p) => self.node_mut(p).next = next,
            None => self.head = next,
        }
        match next {
            Some(n) => self.node_mut(n).prev = prev,
            None => self.tail = prev,
        }

        let node = self.node_mut(handle);
        node.prev = None;
        node.next = None;
    }

    fn push_front(&mut self, handle: Handle) {
        let old_head = self.head;
        {
            let node = self.node_mut(handle);
            node.prev = None;
            node.next = old_head;
        }
        match old_head {
            Some(h) => self.node_mut(h).prev = Some(handle),
            None => self.tail = Some(handle),
        }
        self.head = Some(handle);
    }

    fn move_to_front(&mut self, handle: Handle) {
        if self.head == Some(handle) {
            return;
        }
        self.unlink(handle);
        self.push_front(handle);
        self.metrics.record_promotion();
        trace!(id = self.node(handle).item.id(), "Promoted to head");
    }

    fn remove_node(&mut self, handle: Handle) -> ContentItem {
        self.unlink(handle);
        let item = match self.slots[handle].take() {
            Some(node) => node.item,
            None => unreachable!("dangling handle {handle}"),
        };
        self.free.push(handle);
        self.len -= 1;
        self.remaining += item.size();
        self.metrics.record_eviction();
        debug!(id = item.id(), size = item.size(), "Evicted");
        item
    }

    /// Check every structural invariant, panicking on the first violation
    #[cfg(test)]
    pub(crate) fn assert_invariants(&self) {
        let used: u64 = self.iter().map(|item| item.size()).sum();
        assert_eq!(self.remaining + used, self.max_capacity, "capacity accounting");

        let mut ids: Vec<ContentId> = self.iter().map(|item| item.id()).collect();
        let count = ids.len();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), count, "duplicate identifiers");
        assert_eq!(count, self.len, "item count");

        match self.head {
            Some(h) => assert!(self.node(h).prev.is_none(), "head has prev"),
            None => assert!(self.tail.is_none(), "tail without head"),
        }
        if let Some(t) = self.tail {
            assert!(self.node(t).next.is_none(), "tail has next");
        }

        let mut cursor = self.head;
        let mut last = None;
        while let Some(handle) = cursor {
            assert_eq!(self.node(handle).prev, last, "backward link");
            last = Some(handle);
            cursor = self.node(handle).next;
        }
        assert_eq!(last, self.tail, "chain does not end at tail");
    }
}

impl fmt::Display for CacheLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "REMAINING SPACE:{}", self.remaining)?;
        writeln!(f, "ITEMS:{}", self.len)?;
        writeln!(f, "LIST:")?;
        for item in self.iter() {
            writeln!(f, "[{}]", item)?;
        }
        Ok(())
    }
}

/// Iterator over a level's items, head to tail
pub struct Iter<'a> {
    level: &'a CacheLevel,
    cursor: Option<Handle>,
    remaining: usize,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a ContentItem;

    fn next(&mut self) -> Option<Self::Item> {
        let handle = self.cursor?;
        let node = self.level.node(handle);
        self.cursor = node.next;
        self.remaining -= 1;
        Some(&node.item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Iter<'_> {}

impl<'a> IntoIterator for &'a CacheLevel {
    type Item = &'a ContentItem;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

// =============================================================================
// Tests
// =============================================================================
