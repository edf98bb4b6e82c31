//! Fixture verification.
//!
//! `verify(fixtures, pipeline, tolerance)` re-runs a scoring pipeline over
//! every recorded input and compares against the recorded expectations:
//! residual within `tolerance` (absolute), decision exactly equal.
//!
//! The pipeline is a trait object so that an alternative implementation
//! (a port, a cached path, a remote scorer adapter) can be checked against
//! the same frozen set the reference kernel produced.

use serde::Serialize;

use reconscore_kernel::artifact::Model;
use reconscore_kernel::proof::hash::ContentHash;
use reconscore_kernel::score::{evaluate, ScoreError, ScoringResult};

use crate::fixture::FixtureSet;

/// Residual tolerance used when none is configured.
pub const DEFAULT_RESIDUAL_TOLERANCE: f64 = 1e-6;

/// A scoring implementation under test.
pub trait ScoringPipeline: Send + Sync {
    /// Score and classify one positional feature vector.
    ///
    /// # Errors
    ///
    /// Whatever the implementation rejects; reported per fixture.
    fn evaluate(&self, x: &[f64]) -> Result<ScoringResult, ScoreError>;

    /// Digest of the artifact the pipeline scores with, if it knows one.
    fn artifact_digest(&self) -> Option<&ContentHash> {
        None
    }
}

impl ScoringPipeline for Model {
    fn evaluate(&self, x: &[f64]) -> Result<ScoringResult, ScoreError> {
        evaluate(self, x)
    }

    fn artifact_digest(&self) -> Option<&ContentHash> {
        Some(self.digest())
    }
}

/// Comparison tolerance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Tolerance {
    /// Maximum absolute residual deviation still counted as a match.
    pub residual_abs: f64,
}

impl Default for Tolerance {
    fn default() -> Self {
        Self {
            residual_abs: DEFAULT_RESIDUAL_TOLERANCE,
        }
    }
}

/// Whether the fixture set and the pipeline agree on which artifact they use.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ArtifactBinding {
    /// Both sides carry the same digest.
    Bound,
    /// One side (usually the fixture file) records no digest.
    Unbound,
    /// The digests differ.
    Mismatch { recorded: String, actual: String },
}

/// What went wrong for one fixture.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MismatchKind {
    /// Residual differs by more than the tolerance.
    Residual {
        expected: f64,
        actual: f64,
        deviation: f64,
    },
    /// Anomaly decision flipped.
    Decision {
        expected: bool,
        actual: bool,
        residual: f64,
    },
    /// The pipeline refused the input.
    PipelineError { detail: String },
}

/// One itemized mismatch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FixtureMismatch {
    pub index: usize,
    #[serde(flatten)]
    pub kind: MismatchKind,
}

/// Verification outcome for a whole fixture set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VerifyReport {
    pub total: usize,
    pub tolerance: Tolerance,
    /// Largest residual deviation observed over fixtures the pipeline scored.
    pub max_deviation: f64,
    pub binding: ArtifactBinding,
    pub mismatches: Vec<FixtureMismatch>,
}

impl VerifyReport {
    /// No mismatches and no artifact disagreement.
    #[must_use]
    pub fn passed(&self) -> bool {
        self.mismatches.is_empty() && !matches!(self.binding, ArtifactBinding::Mismatch { .. })
    }

    /// Distinct fixture indices with at least one mismatch, ascending.
    #[must_use]
    pub fn mismatched_indices(&self) -> Vec<usize> {
        let mut indices: Vec<usize> = self.mismatches.iter().map(|m| m.index).collect();
        indices.dedup();
        indices
    }

    /// JSON form, for CI gating.
    #[must_use]
    pub fn to_json_value(&self) -> serde_json::Value {
        serde_json::json!({
            "passed": self.passed(),
            "total": self.total,
            "tolerance": self.tolerance,
            "max_deviation": self.max_deviation,
            "binding": self.binding,
            "mismatched_indices": self.mismatched_indices(),
            "mismatches": self.mismatches,
        })
    }
}

/// Verify `pipeline` against every fixture in `fixtures`.
///
/// Never fails: every problem is itemized in the report.
#[must_use]
pub fn verify(
    fixtures: &FixtureSet,
    pipeline: &dyn ScoringPipeline,
    tolerance: Tolerance,
) -> VerifyReport {
    let binding = binding_of(fixtures, pipeline);
    let mut mismatches = Vec::new();
    let mut max_deviation = 0.0_f64;

    for (index, sample) in fixtures.samples().iter().enumerate() {
        let result = match pipeline.evaluate(&sample.input) {
            Ok(r) => r,
            Err(e) => {
                mismatches.push(FixtureMismatch {
                    index,
                    kind: MismatchKind::PipelineError {
                        detail: e.to_string(),
                    },
                });
                continue;
            }
        };

        let deviation = (result.residual_magnitude - sample.expected_error).abs();
        max_deviation = max_deviation.max(deviation);
        if deviation.is_nan() || deviation > tolerance.residual_abs {
            mismatches.push(FixtureMismatch {
                index,
                kind: MismatchKind::Residual {
                    expected: sample.expected_error,
                    actual: result.residual_magnitude,
                    deviation,
                },
            });
        }
        if result.is_anomaly != sample.is_anomaly {
            mismatches.push(FixtureMismatch {
                index,
                kind: MismatchKind::Decision {
                    expected: sample.is_anomaly,
                    actual: result.is_anomaly,
                    residual: result.residual_magnitude,
                },
            });
        }
    }

    let report = VerifyReport {
        total: fixtures.len(),
        tolerance,
        max_deviation,
        binding,
        mismatches,
    };
    if report.passed() {
        tracing::info!(
            total = report.total,
            max_deviation = report.max_deviation,
            "fixture verification passed"
        );
    } else {
        tracing::warn!(
            total = report.total,
            mismatches = report.mismatches.len(),
            max_deviation = report.max_deviation,
            binding = ?report.binding,
            "fixture verification failed"
        );
    }
    report
}

fn binding_of(fixtures: &FixtureSet, pipeline: &dyn ScoringPipeline) -> ArtifactBinding {
    let recorded = fixtures.identity().map(|id| &id.artifact_digest);
    match (recorded, pipeline.artifact_digest()) {
        (Some(r), Some(a)) if r == a => ArtifactBinding::Bound,
        (Some(r), Some(a)) => ArtifactBinding::Mismatch {
            recorded: r.to_string(),
            actual: a.to_string(),
        },
        _ => ArtifactBinding::Unbound,
    }
}
