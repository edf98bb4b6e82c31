//! Golden fixture sets.
//!
//! A [`FixtureSet`] is a frozen regression oracle: an ordered list of
//! `{input, expected_error, is_anomaly}` samples plus, when known, the
//! identity of the artifact it was generated against. It has no mutating
//! methods. New expectations mean a new set, generated from scratch.
//!
//! # Wire format
//!
//! ```text
//! {
//!   "artifact_digest": "sha256:...",     (optional)
//!   "schema_version": "v1",              (optional)
//!   "seed": 12345,                       (optional)
//!   "samples": [{"input": [..F], "expected_error": r, "is_anomaly": b}, ...]
//! }
//! ```
//!
//! Files written by other implementations usually carry only `samples`; they
//! load fine and verify as unbound.

use serde::{Deserialize, Serialize};

use reconscore_kernel::proof::canon::canonical_json_bytes;
use reconscore_kernel::proof::hash::{canonical_hash, ContentHash, HashDomain};

/// Domain prefix for fixture-set digests.
pub const DOMAIN_FIXTURE_SET: HashDomain = HashDomain::FixtureSet;

/// One golden sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FixtureSample {
    pub input: Vec<f64>,
    pub expected_error: f64,
    pub is_anomaly: bool,
}

/// The artifact a fixture set was generated against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixtureIdentity {
    pub artifact_digest: ContentHash,
    pub schema_version: String,
    pub seed: Option<u64>,
}

#[derive(Debug, Serialize, Deserialize)]
struct FixtureDocV1 {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    artifact_digest: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    schema_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    seed: Option<u64>,
    samples: Vec<FixtureSample>,
}

/// Fixture document could not be decoded or is internally inconsistent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FixtureParseError {
    /// Not JSON, or the wrong shape.
    Malformed { detail: String },
    /// `artifact_digest` is not in `algorithm:hex` form.
    BadDigest { raw: String },
    /// A sample is unusable (non-finite values, negative residual, width drift).
    InvalidSample { index: usize, detail: String },
}

impl std::fmt::Display for FixtureParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Malformed { detail } => write!(f, "malformed fixture set: {detail}"),
            Self::BadDigest { raw } => write!(f, "bad artifact digest {raw:?}"),
            Self::InvalidSample { index, detail } => {
                write!(f, "fixture sample {index}: {detail}")
            }
        }
    }
}

impl std::error::Error for FixtureParseError {}

/// Immutable, ordered golden fixture set.
#[derive(Debug, Clone, PartialEq)]
pub struct FixtureSet {
    samples: Vec<FixtureSample>,
    identity: Option<FixtureIdentity>,
}

impl FixtureSet {
    /// Freeze freshly generated samples. Only the generator creates sets.
    pub(crate) fn new(samples: Vec<FixtureSample>, identity: Option<FixtureIdentity>) -> Self {
        Self { samples, identity }
    }

    #[must_use]
    pub fn samples(&self) -> &[FixtureSample] {
        &self.samples
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Artifact identity, when the set recorded one.
    #[must_use]
    pub fn identity(&self) -> Option<&FixtureIdentity> {
        self.identity.as_ref()
    }

    /// Number of samples expected to be anomalous.
    #[must_use]
    pub fn anomaly_count(&self) -> usize {
        self.samples.iter().filter(|s| s.is_anomaly).count()
    }

    /// Canonical JSON bytes (sorted keys, compact, round-trip floats).
    ///
    /// # Errors
    ///
    /// Returns [`FixtureParseError::Malformed`] if a value cannot be
    /// canonicalized. Sets built by this crate never trigger it.
    pub fn to_canonical_bytes(&self) -> Result<Vec<u8>, FixtureParseError> {
        let doc = FixtureDocV1 {
            artifact_digest: self
                .identity
                .as_ref()
                .map(|id| id.artifact_digest.as_str().to_string()),
            schema_version: self.identity.as_ref().map(|id| id.schema_version.clone()),
            seed: self.identity.as_ref().and_then(|id| id.seed),
            samples: self.samples.clone(),
        };
        let value = serde_json::to_value(&doc).map_err(|e| FixtureParseError::Malformed {
            detail: e.to_string(),
        })?;
        canonical_json_bytes(&value).map_err(|e| FixtureParseError::Malformed {
            detail: e.to_string(),
        })
    }

    /// Content digest of the canonical bytes.
    ///
    /// # Errors
    ///
    /// Same as [`to_canonical_bytes`](Self::to_canonical_bytes).
    pub fn digest(&self) -> Result<ContentHash, FixtureParseError> {
        Ok(canonical_hash(DOMAIN_FIXTURE_SET, &self.to_canonical_bytes()?))
    }

    /// Decode a fixture document.
    ///
    /// # Errors
    ///
    /// Returns [`FixtureParseError`] if the bytes are not a fixture document,
    /// the digest is malformed, or any sample is unusable.
    pub fn from_json_bytes(bytes: &[u8]) -> Result<Self, FixtureParseError> {
        let doc: FixtureDocV1 =
            serde_json::from_slice(bytes).map_err(|e| FixtureParseError::Malformed {
                detail: e.to_string(),
            })?;

        let width = doc.samples.first().map(|s| s.input.len());
        for (index, sample) in doc.samples.iter().enumerate() {
            if Some(sample.input.len()) != width {
                return Err(FixtureParseError::InvalidSample {
                    index,
                    detail: format!(
                        "input has {} values, first sample has {}",
                        sample.input.len(),
                        width.unwrap_or(0)
                    ),
                });
            }
            if let Some(i) = sample.input.iter().position(|v| !v.is_finite()) {
                return Err(FixtureParseError::InvalidSample {
                    index,
                    detail: format!("input[{i}] is not finite"),
                });
            }
            if !sample.expected_error.is_finite() || sample.expected_error < 0.0 {
                return Err(FixtureParseError::InvalidSample {
                    index,
                    detail: format!("expected_error {} is not a residual", sample.expected_error),
                });
            }
        }

        let identity = match doc.artifact_digest {
            None => None,
            Some(raw) => {
                let artifact_digest = ContentHash::parse(&raw)
                    .ok_or_else(|| FixtureParseError::BadDigest { raw: raw.clone() })?;
                Some(FixtureIdentity {
                    artifact_digest,
                    schema_version: doc.schema_version.unwrap_or_default(),
                    seed: doc.seed,
                })
            }
        };

        Ok(Self {
            samples: doc.samples,
            identity,
        })
    }
}
