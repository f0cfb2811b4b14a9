//! Cache value objects

use crate::constants::NEGATIVE_CACHE_MARKER;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Result of reading a cache key
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheLookup<T> {
    /// A materialized record is cached
    Hit(T),
    /// The backing store is known not to have the record
    NegativeHit,
    /// Nothing cached under the key
    Miss,
}

impl<T: DeserializeOwned> CacheLookup<T> {
    /// Interpret a raw stored value
    pub fn decode(raw: Option<&str>) -> Result<Self, serde_json::Error> {
        match raw {
            None => Ok(Self::Miss),
            Some(NEGATIVE_CACHE_MARKER) => Ok(Self::NegativeHit),
            Some(json) => serde_json::from_str(json).map(Self::Hit),
        }
    }
}

impl<T> CacheLookup<T> {
    /// Collapse into the caller-facing answer; `Miss` has none
    pub fn into_resolved(self) -> Option<Option<T>> {
        match self {
            Self::Hit(value) => Some(Some(value)),
            Self::NegativeHit => Some(None),
            Self::Miss => None,
        }
    }
}

/// How a read-through accessor treats misses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProtectionMode {
    /// Cache hits only; absent records always reach the backing store
    Unprotected,
    /// Cache absent records under a short-lived negative marker
    #[default]
    NullMarker,
    /// Negative markers plus a per-key lock around population
    Locked,
}

impl ProtectionMode {
    /// All modes, in increasing order of protection
    pub const ALL: [ProtectionMode; 3] = [Self::Unprotected, Self::NullMarker, Self::Locked];

    /// Configuration name of the mode
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unprotected => "unprotected",
            Self::NullMarker => "null_marker",
            Self::Locked => "locked",
        }
    }
}

impl fmt::Display for ProtectionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProtectionMode {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "unprotected" => Ok(Self::Unprotected),
            "null_marker" | "protected" => Ok(Self::NullMarker),
            "locked" => Ok(Self::Locked),
            other => Err(crate::Error::invalid_argument(format!(
                "Unknown protection mode '{other}'. Use unprotected, null_marker or locked"
            ))),
        }
    }
}

/// Cache Operation Statistics
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CacheStats {
    /// Reads answered with a cached record
    pub hits: u64,
    /// Reads answered with a negative marker
    pub negative_hits: u64,
    /// Reads that found nothing cached
    pub misses: u64,
    /// Backing-store loads performed
    pub loads: u64,
}

impl CacheStats {
    /// Fraction of reads answered from the cache (0.0 to 1.0)
    pub fn hit_rate(&self) -> f64 {
        let resolved = self.hits + self.negative_hits;
        let total = resolved + self.misses;
        if total > 0 {
            resolved as f64 / total as f64
        } else {
            0.0
        }
    }
}
