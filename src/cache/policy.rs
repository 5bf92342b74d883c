//! Cache Eviction Policies
//!
//! Which end of a level's recency order gives up an item when space runs out.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Eviction policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EvictionPolicy {
    /// Evict the least recently touched item (tail)
    #[default]
    Lru,
    /// Evict the most recently touched item (head)
    Mru,
}

impl EvictionPolicy {
    /// Policy name as accepted by [`FromStr`]
    pub fn as_str(&self) -> &'static str {
        match self {
            EvictionPolicy::Lru => "lru",
            EvictionPolicy::Mru => "mru",
        }
    }
}

impl FromStr for EvictionPolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "lru" => Ok(EvictionPolicy::Lru),
            "mru" => Ok(EvictionPolicy::Mru),
            other => Err(Error::InvalidEvictionPolicy(other.to_string())),
        }
    }
}

impl AsRef<str> for EvictionPolicy {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for EvictionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_policy_parse() {
        assert_eq!("lru".parse::<EvictionPolicy>().unwrap(), EvictionPolicy::Lru);
        assert_eq!("mru".parse::<EvictionPolicy>().unwrap(), EvictionPolicy::Mru);
    }

    #[test]
    fn test_policy_parse_is_case_sensitive() {
        assert_matches!(
            "LRU".parse::<EvictionPolicy>(),
            Err(Error::InvalidEvictionPolicy(name)) if name == "LRU"
        );
        assert_matches!(
            "fifo".parse::<EvictionPolicy>(),
            Err(Error::InvalidEvictionPolicy(_))
        );
    }

    #[test]
    fn test_policy_display_roundtrips_through_parse() {
        for policy in [EvictionPolicy::Lru, EvictionPolicy::Mru] {
            assert_eq!(policy.to_string().parse::<EvictionPolicy>().unwrap(), policy);
            assert_eq!(policy.as_ref(), policy.as_str());
        }
    }

    #[test]
    fn test_policy_default() {
        assert_eq!(EvictionPolicy::default(), EvictionPolicy::Lru);
    }

    #[test]
    fn test_policy_serde_names() {
        let policy: EvictionPolicy = serde_yaml::from_str("mru").unwrap();
        assert_eq!(policy, EvictionPolicy::Mru);
        assert_eq!(serde_json::to_string(&EvictionPolicy::Lru).unwrap(), "\"lru\"");
    }
}
