//! Error types for the content cache

use thiserror::Error;

use crate::cache::ContentId;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in the content cache
///
/// Cache operation outcomes are ordinary values: a rejected insert or a missed
/// update leaves the cache usable and is reported through one of these
/// variants rather than a panic.
#[derive(Error, Debug)]
pub enum Error {
    // =========================================================================
    // Cache Operation Errors
    // =========================================================================
    /// An item with the same identifier is already held by the level
    #[error("Content {id} already in cache, insertion not allowed")]
    AlreadyPresent { id: ContentId },

    /// The item can never fit in the level
    #[error("Insertion not allowed: content {id} of size {size} exceeds level capacity {capacity}")]
    InsertionNotAllowed {
        id: ContentId,
        size: u64,
        capacity: u64,
    },

    /// Eviction was required but the policy name is not recognised
    #[error("Invalid eviction policy: {0}")]
    InvalidEvictionPolicy(String),

    /// The identifier is not held by the level that was searched
    #[error("Cache miss for content {id}")]
    CacheMiss { id: ContentId },

    /// Replacing the item would exceed the level capacity
    #[error("Not enough space to update content {id}: need {required}, available {available}")]
    NotEnoughSpace {
        id: ContentId,
        required: u64,
        available: u64,
    },

    /// Level index outside the hierarchy
    #[error("Level {index} out of range (hierarchy has {count} levels)")]
    LevelOutOfRange { index: usize, count: usize },

    // =========================================================================
    // Configuration Errors
    // =========================================================================
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parse error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON encode error
    #[error("Failed to encode JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Returns true if this error describes a cache operation outcome rather
    /// than a configuration or I/O failure
    pub fn is_cache_outcome(&self) -> bool {
        matches!(
            self,
            Error::AlreadyPresent { .. }
                | Error::InsertionNotAllowed { .. }
                | Error::InvalidEvictionPolicy(_)
                | Error::CacheMiss { .. }
                | Error::NotEnoughSpace { .. }
        )
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = Error::AlreadyPresent { id: 7 };
        assert_eq!(err.to_string(), "Content 7 already in cache, insertion not allowed");

        let err = Error::InvalidEvictionPolicy("fifo".to_string());
        assert_eq!(err.to_string(), "Invalid eviction policy: fifo");

        let err = Error::CacheMiss { id: 3 };
        assert_eq!(err.to_string(), "Cache miss for content 3");
    }

    #[test]
    fn test_cache_outcome_classification() {
        assert!(Error::CacheMiss { id: 1 }.is_cache_outcome());
        assert!(Error::NotEnoughSpace {
            id: 1,
            required: 9,
            available: 4
        }
        .is_cache_outcome());
        assert!(!Error::Config("bad".to_string()).is_cache_outcome());
        assert!(!Error::LevelOutOfRange { index: 5, count: 3 }.is_cache_outcome());
    }
}
