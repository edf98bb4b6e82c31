//! Harness configuration.
//!
//! Layering, lowest to highest precedence:
//! 1. built-in defaults (every field has one),
//! 2. a JSON config file,
//! 3. `RECONSCORE_*` environment variables.
//!
//! The result is validated once before use. The kernel takes no
//! configuration at all: everything a scoring call needs is in the artifact.

use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use reconscore_kernel::artifact::Model;
use reconscore_kernel::proof::canon::canonical_json_bytes;
use reconscore_kernel::proof::hash::{canonical_hash, ContentHash, HashDomain};

use crate::generate::{FeatureRange, SeedSpec};
use crate::verify::{Tolerance, DEFAULT_RESIDUAL_TOLERANCE};

/// Domain prefix for configuration digests.
pub const DOMAIN_HARNESS_CONFIG: HashDomain = HashDomain::HarnessConfig;

pub const ENV_SEED: &str = "RECONSCORE_SEED";
pub const ENV_SAMPLES: &str = "RECONSCORE_SAMPLES";
pub const ENV_TOLERANCE: &str = "RECONSCORE_TOLERANCE";

const DEFAULT_SEED: u64 = 12345;
const DEFAULT_SAMPLES: usize = 50;
const DEFAULT_CACHE_MAX_ENTRIES: usize = 100;
const DEFAULT_CACHE_MAX_BYTES: usize = 500 * 1024 * 1024;
const DEFAULT_CACHE_TTL_SECS: u64 = 3600;

/// Limits for [`crate::cache::ModelCache`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CacheConfig {
    pub max_entries: usize,
    pub max_bytes: usize,
    pub ttl_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_entries: DEFAULT_CACHE_MAX_ENTRIES,
            max_bytes: DEFAULT_CACHE_MAX_BYTES,
            ttl_secs: DEFAULT_CACHE_TTL_SECS,
        }
    }
}

impl CacheConfig {
    #[must_use]
    pub const fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}

/// Everything the fixture tooling can be told.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HarnessConfig {
    /// Generator seed.
    pub seed: u64,
    /// Samples per generated fixture set.
    pub samples: usize,
    /// Absolute residual tolerance for verification.
    pub residual_tolerance: f64,
    /// Per-feature sampling ranges, keyed by feature name.
    pub feature_ranges: BTreeMap<String, FeatureRange>,
    pub cache: CacheConfig,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            samples: DEFAULT_SAMPLES,
            residual_tolerance: DEFAULT_RESIDUAL_TOLERANCE,
            feature_ranges: BTreeMap::new(),
            cache: CacheConfig::default(),
        }
    }
}

/// Configuration could not be read, parsed or validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    Io { detail: String },
    Parse { detail: String },
    /// An environment override did not parse.
    Env { var: &'static str, value: String },
    /// A value is out of range.
    Invalid { field: String, detail: String },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { detail } => write!(f, "I/O error: {detail}"),
            Self::Parse { detail } => write!(f, "config parse error: {detail}"),
            Self::Env { var, value } => write!(f, "{var}={value:?} is not a valid value"),
            Self::Invalid { field, detail } => write!(f, "invalid {field}: {detail}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl HarnessConfig {
    /// Parse a JSON config. Missing fields take their defaults; unknown
    /// fields are rejected.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Parse`] on malformed JSON or unknown fields.
    pub fn from_json_bytes(bytes: &[u8]) -> Result<Self, ConfigError> {
        serde_json::from_slice(bytes).map_err(|e| ConfigError::Parse {
            detail: e.to_string(),
        })
    }

    /// Read and parse a JSON config file.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Io`] if unreadable, otherwise as [`from_json_bytes`](Self::from_json_bytes).
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let bytes = std::fs::read(path).map_err(|e| ConfigError::Io {
            detail: format!("read {}: {e}", path.display()),
        })?;
        Self::from_json_bytes(&bytes)
    }

    /// Apply `RECONSCORE_*` overrides from the process environment.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Env`] if a set variable does not parse.
    pub fn apply_env(self) -> Result<Self, ConfigError> {
        self.apply_env_overrides(|name| std::env::var(name).ok())
    }

    /// Apply overrides from an arbitrary lookup. Empty values are ignored.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Env`] if a present variable does not parse.
    pub fn apply_env_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = env_non_empty(&lookup, ENV_SEED) {
            self.seed = parse_env(ENV_SEED, &v)?;
        }
        if let Some(v) = env_non_empty(&lookup, ENV_SAMPLES) {
            self.samples = parse_env(ENV_SAMPLES, &v)?;
        }
        if let Some(v) = env_non_empty(&lookup, ENV_TOLERANCE) {
            self.residual_tolerance = parse_env(ENV_TOLERANCE, &v)?;
        }
        Ok(self)
    }

    /// Check every value is usable.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Invalid`] naming the first bad field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.residual_tolerance.is_finite() || self.residual_tolerance < 0.0 {
            return Err(ConfigError::Invalid {
                field: "residual_tolerance".into(),
                detail: format!("{} is not a finite non-negative number", self.residual_tolerance),
            });
        }
        for (name, r) in &self.feature_ranges {
            if !r.is_valid() {
                return Err(ConfigError::Invalid {
                    field: format!("feature_ranges.{name}"),
                    detail: format!("[{}, {}] is not a finite samplable interval", r.low, r.high),
                });
            }
        }
        if self.cache.max_entries == 0 {
            return Err(ConfigError::Invalid {
                field: "cache.max_entries".into(),
                detail: "must be at least 1".into(),
            });
        }
        Ok(())
    }

    /// Generator parameters for `model`: default ranges, then configured overrides.
    #[must_use]
    pub fn seed_spec(&self, model: &Model) -> SeedSpec {
        SeedSpec::for_model(model, self.seed).with_overrides(model, &self.feature_ranges)
    }

    #[must_use]
    pub const fn tolerance(&self) -> Tolerance {
        Tolerance {
            residual_abs: self.residual_tolerance,
        }
    }

    /// Digest of the effective configuration, for logging alongside results.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Invalid`] if a value cannot be canonicalized (non-finite).
    pub fn digest(&self) -> Result<ContentHash, ConfigError> {
        let invalid = |detail: String| ConfigError::Invalid {
            field: "config".into(),
            detail,
        };
        let value = serde_json::to_value(self).map_err(|e| invalid(e.to_string()))?;
        let bytes = canonical_json_bytes(&value).map_err(|e| invalid(e.to_string()))?;
        Ok(canonical_hash(DOMAIN_HARNESS_CONFIG, &bytes))
    }
}

fn env_non_empty<F>(lookup: &F, name: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(name).filter(|v| !v.trim().is_empty())
}

fn parse_env<T: std::str::FromStr>(var: &'static str, raw: &str) -> Result<T, ConfigError> {
    raw.trim().parse::<T>().map_err(|_| ConfigError::Env {
        var,
        value: raw.to_string(),
    })
}
