//! Workload Replay
//!
//! A YAML script of cache operations, replayed against a [`Cache`] with one
//! report per operation.
//!
//! ```yaml
//! operations:
//!   - op: insert
//!     item: { id: 1, size: 6, header: "text/html", payload: "<p>hi</p>" }
//!     policy: mru
//!   - op: get
//!     id: 1
//!     header: "text/html"
//!   - op: set
//!     id: 1
//!     item: { id: 1, size: 2, header: "text/html", payload: "ok" }
//!   - op: evict
//!     level: 0
//!     end: lru
//!   - op: clear
//! ```

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::cache::{Cache, ContentId, ContentItem, EvictionPolicy};
use crate::error::{Error, Result};

/// Item description in a workload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemSpec {
    pub id: ContentId,
    /// Declared size; defaults to the payload length
    #[serde(default)]
    pub size: Option<u64>,
    #[serde(default)]
    pub header: String,
    #[serde(default)]
    pub payload: String,
}

impl ItemSpec {
    /// Build the content item
    pub fn to_item(&self) -> ContentItem {
        let size = self.size.unwrap_or(self.payload.len() as u64);
        ContentItem::new(self.id, size, self.header.clone(), self.payload.clone())
    }
}

/// A single scripted operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum Operation {
    /// Insert an item; `policy` is passed through unparsed
    Insert {
        item: ItemSpec,
        #[serde(default)]
        policy: Option<String>,
    },
    /// Read-only lookup by id in the level `header` routes to
    Get {
        id: ContentId,
        #[serde(default)]
        header: String,
    },
    /// Replace the item held under `id`
    Set { id: ContentId, item: ItemSpec },
    /// Evict one item from a level
    Evict { level: usize, end: EvictionPolicy },
    /// Clear every level
    Clear,
}

impl Operation {
    /// Short operation label
    pub fn name(&self) -> &'static str {
        match self {
            Operation::Insert { .. } => "insert",
            Operation::Get { .. } => "get",
            Operation::Set { .. } => "set",
            Operation::Evict { .. } => "evict",
            Operation::Clear => "clear",
        }
    }
}

/// Result of replaying one operation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OpReport {
    /// Position in the workload
    pub index: usize,
    pub op: &'static str,
    /// Level the operation touched, if a single one
    pub level: Option<usize>,
    pub success: bool,
    pub message: String,
}

impl fmt::Display for OpReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.level {
            Some(level) => write!(
                f,
                "#{} {} [L{}]: {}",
                self.index,
                self.op,
                level + 1,
                self.message
            ),
            None => write!(f, "#{} {}: {}", self.index, self.op, self.message),
        }
    }
}

/// A scripted sequence of operations
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Workload {
    #[serde(default)]
    pub operations: Vec<Operation>,
}

impl Workload {
    /// Parse a YAML document
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Load a YAML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    /// Replay every operation in order.
    ///
    /// Failed operations are reported and replay continues.
    pub fn replay(&self, cache: &mut Cache, default_policy: EvictionPolicy) -> Vec<OpReport> {
        info!(operations = self.operations.len(), "Replaying workload");

        self.operations
            .iter()
            .enumerate()
            .map(|(index, op)| {
                let report = Self::apply(index, op, cache, default_policy);
                debug!(index, op = report.op, success = report.success, "{}", report.message);
                report
            })
            .collect()
    }

    fn apply(
        index: usize,
        op: &Operation,
        cache: &mut Cache,
        default_policy: EvictionPolicy,
    ) -> OpReport {
        let (level, outcome) = match op {
            Operation::Insert { item, policy } => {
                let item = item.to_item();
                let level = cache.route(&item);
                let summary = format!("INSERTED: {}", item);
                let policy = policy.as_deref().unwrap_or(default_policy.as_str());
                (Some(level), cache.insert(item, policy).map(|_| summary))
            }
            Operation::Get { id, header } => {
                let probe = ContentItem::new(*id, 0, header.clone(), "");
                let level = cache.route(&probe);
                let outcome = match cache.get(&probe) {
                    Some(found) => Ok(format!("FOUND: {}", found)),
                    None => Err(Error::CacheMiss { id: *id }),
                };
                (Some(level), outcome)
            }
            Operation::Set { id, item } => {
                let item = item.to_item();
                let level = cache.route(&item);
                let summary = format!("UPDATED: {}", item);
                (Some(level), cache.set(*id, item).map(|_| summary))
            }
            Operation::Evict { level, end } => {
                let outcome = cache.level_mut(*level).map(|l| match l.evict(*end) {
                    Some(item) => format!("EVICTED: {}", item),
                    None => "Level empty, nothing evicted".to_string(),
                });
                (Some(*level), outcome)
            }
            Operation::Clear => {
                cache.clear();
                (None, Ok("Cache cleared!".to_string()))
            }
        };

        let (success, message) = match outcome {
            Ok(message) => (true, message),
            Err(e) => (false, e.to_string()),
        };

        OpReport {
            index,
            op: op.name(),
            level,
            success,
            message,
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
