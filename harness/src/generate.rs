//! Golden fixture generation.
//!
//! `generate(model, seed_spec, n)` draws `n` input vectors from a seeded
//! uniform distribution over each feature's operating range, scores them with
//! the kernel, and freezes inputs plus expectations as a [`FixtureSet`].
//!
//! # Random stream
//!
//! ChaCha8 seeded from the 64-bit seed. For each sample, for each feature in
//! model order, exactly one uniform draw in `[low, high]`. The stream is a
//! pure function of `(seed, ranges, n)`; the same inputs produce byte-identical
//! fixture files on every platform.

use std::collections::BTreeMap;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use reconscore_kernel::artifact::Model;
use reconscore_kernel::score::{evaluate, ScoreError};

use crate::fixture::{FixtureIdentity, FixtureSample, FixtureSet};

/// Percentages in the host-telemetry contract.
const PERCENT_FEATURES: [&str; 3] = ["cpu_usage", "memory_usage", "disk_utilization"];
/// Network rates in the host-telemetry contract.
const RATE_FEATURES: [&str; 2] = ["network_rx_rate", "network_tx_rate"];
const PERCENT_RANGE: FeatureRange = FeatureRange::new(0.0, 100.0);
const RATE_RANGE: FeatureRange = FeatureRange::new(0.0, 1000.0);
/// Fallback half-width, in standard deviations, for features with no known range.
const FALLBACK_SPREAD: f64 = 6.0;

/// Closed sampling interval for one feature.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureRange {
    pub low: f64,
    pub high: f64,
}

impl FeatureRange {
    #[must_use]
    pub const fn new(low: f64, high: f64) -> Self {
        Self { low, high }
    }

    /// Both ends finite, `low <= high`, and the width itself finite.
    pub(crate) fn is_valid(self) -> bool {
        self.low.is_finite()
            && self.high.is_finite()
            && self.low <= self.high
            && (self.high - self.low).is_finite()
    }
}

/// Seed and per-feature ranges for a generation run.
#[derive(Debug, Clone, PartialEq)]
pub struct SeedSpec {
    pub seed: u64,
    pub ranges: Vec<FeatureRange>,
}

impl SeedSpec {
    /// Default ranges for `model`.
    ///
    /// Host-telemetry features get their operating ranges (wider than any
    /// training distribution); anything else gets `mean ± 6·scale`.
    #[must_use]
    pub fn for_model(model: &Model, seed: u64) -> Self {
        let ranges = model
            .feature_order()
            .iter()
            .zip(model.mean().iter().zip(model.scale()))
            .map(|(name, (&mean, &scale))| default_range(name, mean, scale))
            .collect();
        Self { seed, ranges }
    }

    /// Replace the ranges of named features. Names the model does not declare
    /// are ignored.
    #[must_use]
    pub fn with_overrides(
        mut self,
        model: &Model,
        overrides: &BTreeMap<String, FeatureRange>,
    ) -> Self {
        for (range, name) in self.ranges.iter_mut().zip(model.feature_order()) {
            if let Some(o) = overrides.get(name) {
                *range = *o;
            }
        }
        self
    }
}

fn default_range(name: &str, mean: f64, scale: f64) -> FeatureRange {
    if PERCENT_FEATURES.contains(&name) {
        PERCENT_RANGE
    } else if RATE_FEATURES.contains(&name) {
        RATE_RANGE
    } else {
        let spread = FALLBACK_SPREAD * scale;
        FeatureRange::new(mean - spread, mean + spread)
    }
}

/// Generation failure. No partial fixture set is ever returned.
#[derive(Debug, Clone, PartialEq)]
pub enum GenerateError {
    /// `ranges` does not have one entry per model feature.
    RangeCount { expected: usize, actual: usize },
    /// A range is non-finite, has `low > high`, or is too wide to sample.
    InvalidRange { index: usize, low: f64, high: f64 },
    /// The kernel rejected a generated input.
    Score { index: usize, error: ScoreError },
}

impl std::fmt::Display for GenerateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RangeCount { expected, actual } => {
                write!(f, "expected {expected} feature ranges, got {actual}")
            }
            Self::InvalidRange { index, low, high } => {
                write!(f, "feature range {index} is invalid: [{low}, {high}]")
            }
            Self::Score { index, error } => write!(f, "scoring sample {index}: {error}"),
        }
    }
}

impl std::error::Error for GenerateError {}

/// Generate `n` golden samples for `model`.
///
/// # Errors
///
/// Returns [`GenerateError`] if the ranges do not fit the model, or if the
/// kernel fails to score a sample.
pub fn generate(model: &Model, spec: &SeedSpec, n: usize) -> Result<FixtureSet, GenerateError> {
    if spec.ranges.len() != model.feature_count() {
        return Err(GenerateError::RangeCount {
            expected: model.feature_count(),
            actual: spec.ranges.len(),
        });
    }
    if let Some((index, r)) = spec.ranges.iter().enumerate().find(|(_, r)| !r.is_valid()) {
        return Err(GenerateError::InvalidRange {
            index,
            low: r.low,
            high: r.high,
        });
    }

    let mut rng = ChaCha8Rng::seed_from_u64(spec.seed);
    let mut samples = Vec::with_capacity(n);
    for index in 0..n {
        let input: Vec<f64> = spec
            .ranges
            .iter()
            .map(|r| rng.gen_range(r.low..=r.high))
            .collect();
        let result = evaluate(model, &input).map_err(|error| GenerateError::Score { index, error })?;
        samples.push(FixtureSample {
            input,
            expected_error: result.residual_magnitude,
            is_anomaly: result.is_anomaly,
        });
    }

    let set = FixtureSet::new(
        samples,
        Some(FixtureIdentity {
            artifact_digest: model.digest().clone(),
            schema_version: model.schema_version().to_string(),
            seed: Some(spec.seed),
        }),
    );
    tracing::info!(
        seed = spec.seed,
        samples = set.len(),
        anomalies = set.anomaly_count(),
        artifact = %model.digest(),
        "fixture set generated"
    );
    Ok(set)
}
