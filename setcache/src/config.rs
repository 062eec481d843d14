use serde::Deserialize;
use crate::cache::CacheGeometry;
use crate::error::ConfigError;
use crate::replacement_policies::{RandomVictims, ReplacementPolicy};

/// A configuration for a single cache
#[derive(Debug, Deserialize)]
pub struct CacheConfig {
    #[serde(default = "CacheConfig::default_name")]
    pub name: String,
    pub way_count: usize,
    pub set_count: u32,
    pub block_size_in_bytes: u32,
    #[serde(default = "ReplacementPolicyConfig::default")]
    pub replacement_policy: ReplacementPolicyConfig,
    /// Seed for random replacement. Without one, victims are seeded from the OS
    #[serde(default)]
    pub seed: Option<u64>,
}

impl CacheConfig {
    fn default_name() -> String {
        String::from("cache")
    }

    pub fn geometry(&self) -> Result<CacheGeometry, ConfigError> {
        CacheGeometry::new(self.way_count, self.set_count, self.block_size_in_bytes)
    }

    pub fn victims(&self) -> RandomVictims {
        match self.seed {
            Some(seed) => RandomVictims::seeded(seed),
            None => RandomVictims::from_entropy(),
        }
    }
}

/// The replacement policy - lru or random. Defaults to lru.
#[derive(Debug, Copy, Clone, Deserialize)]
pub enum ReplacementPolicyConfig {
    #[serde(alias = "lru")]
    LeastRecentlyUsed,
    #[serde(alias = "random")]
    Random,
}

impl Default for ReplacementPolicyConfig {
    fn default() -> Self {
        ReplacementPolicyConfig::LeastRecentlyUsed
    }
}

impl From<ReplacementPolicyConfig> for ReplacementPolicy {
    fn from(value: ReplacementPolicyConfig) -> Self {
        match value {
            ReplacementPolicyConfig::LeastRecentlyUsed => ReplacementPolicy::LeastRecentlyUsed,
            ReplacementPolicyConfig::Random => ReplacementPolicy::Random,
        }
    }
}
