//! Cache Configuration
//!
//! YAML-backed settings for building a [`Cache`](crate::cache::Cache).
//!
//! ```yaml
//! level_capacity: 1024
//! default_policy: lru
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::cache::EvictionPolicy;
use crate::error::{Error, Result};

/// Default per-level capacity
pub const DEFAULT_LEVEL_CAPACITY: u64 = 1024;

/// Cache configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Capacity of each of the three levels
    pub level_capacity: u64,
    /// Policy used when a caller does not name one
    pub default_policy: EvictionPolicy,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            level_capacity: DEFAULT_LEVEL_CAPACITY,
            default_policy: EvictionPolicy::Lru,
        }
    }
}

impl CacheConfig {
    /// Parse and validate a YAML document
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a YAML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.level_capacity == 0 {
            return Err(Error::Config(
                "level_capacity must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================
