//! Cache Entry Types
//!
//! The content item stored by every level, and the routing hash that picks
//! its level.

use std::fmt;

use bytes::Bytes;

use super::LEVEL_COUNT;

/// Content identifier, unique within a level
pub type ContentId = u64;

/// A cached payload with its declared size and routing header
///
/// Items are treated as immutable once built; an update replaces the whole
/// item rather than editing it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContentItem {
    id: ContentId,
    size: u64,
    header: String,
    payload: Bytes,
}

impl ContentItem {
    /// Create a new content item
    pub fn new(
        id: ContentId,
        size: u64,
        header: impl Into<String>,
        payload: impl Into<Bytes>,
    ) -> Self {
        Self {
            id,
            size,
            header: header.into(),
            payload: payload.into(),
        }
    }

    /// Get the identifier
    #[inline]
    pub fn id(&self) -> ContentId {
        self.id
    }

    /// Get the declared size in capacity units
    #[inline]
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Get the header
    #[inline]
    pub fn header(&self) -> &str {
        &self.header
    }

    /// Get the payload (zero-copy)
    #[inline]
    pub fn payload(&self) -> &Bytes {
        &self.payload
    }

    /// Routing hash: sum of the header's character codes modulo the level count.
    ///
    /// Only ever three distinct values. Two items with different content may
    /// share a routing hash; identity is decided by `id` alone.
    #[inline]
    pub fn routing_hash(&self) -> u64 {
        let sum: u64 = self.header.chars().map(u64::from).sum();
        sum % LEVEL_COUNT as u64
    }
}

impl fmt::Display for ContentItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "CONTENT ID: {} SIZE: {} HEADER: {} CONTENT: {}",
            self.id,
            self.size,
            self.header,
            String::from_utf8_lossy(&self.payload)
        )
    }
}

// =============================================================================
// Tests
// =============================================================================
