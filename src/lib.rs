//! hiercache - Multi-Level In-Memory Content Cache
//!
//! Three fixed-capacity levels, each enforcing a capacity budget with LRU or
//! MRU eviction. Items are routed to a level by a hash of their header.
//!
//! # Architecture
//!
//! ```text
//! Cache::insert/get/set/clear → route(header) → CacheLevel (put/find/update)
//! ```
//!
//! # Modules
//!
//! - [`cache`] - Content items, levels, eviction policies and the hierarchy
//! - [`config`] - YAML configuration
//! - [`error`] - Error types
//! - [`workload`] - Scripted operation replay

pub mod cache;
pub mod config;
pub mod error;
pub mod workload;

// Re-export commonly used types
pub use cache::{Cache, CacheLevel, ContentId, ContentItem, EvictionPolicy};
pub use config::CacheConfig;
pub use error::{Error, Result};
pub use workload::Workload;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
