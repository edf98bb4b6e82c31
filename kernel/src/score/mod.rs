//! Scoring: reconstruction residual plus threshold decision.
//!
//! [`evaluate`] is the single composition of [`scorer::score`] and
//! [`classify::classify`] used by the harness and the fixture binaries.

pub mod classify;
pub mod scorer;

use serde::{Deserialize, Serialize};

use crate::artifact::model::Model;
use crate::contract::{validate, ContractError};

/// Typed scoring failure. No partial result is ever returned.
#[derive(Debug, Clone, PartialEq)]
pub enum ScoreError {
    /// Input vector length differs from the model's feature count.
    Dimension { expected: usize, actual: usize },
    /// Input component `index` is NaN or infinite.
    NonFiniteInput { index: usize, value: f64 },
    /// A non-finite value arose from finite inputs. Indicates a logic defect.
    InternalConsistency { detail: String },
}

impl std::fmt::Display for ScoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Dimension { expected, actual } => {
                write!(f, "input has {actual} features, model expects {expected}")
            }
            Self::NonFiniteInput { index, value } => {
                write!(f, "input[{index}] is not finite: {value}")
            }
            Self::InternalConsistency { detail } => {
                write!(f, "internal consistency violation: {detail}")
            }
        }
    }
}

impl std::error::Error for ScoreError {}

/// Outcome of scoring one feature vector.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoringResult {
    /// Euclidean norm of the standardized-space residual (always `>= 0`).
    pub residual_magnitude: f64,
    /// `residual_magnitude > threshold`.
    pub is_anomaly: bool,
    /// The threshold the decision was taken against.
    pub threshold: f64,
}

/// Score and classify one positional feature vector.
///
/// # Errors
///
/// Any [`ScoreError`] from scoring or classification.
pub fn evaluate(model: &Model, x: &[f64]) -> Result<ScoringResult, ScoreError> {
    let residual_magnitude = scorer::score(model, x)?;
    let is_anomaly = classify::classify(residual_magnitude, model.threshold())?;
    Ok(ScoringResult {
        residual_magnitude,
        is_anomaly,
        threshold: model.threshold(),
    })
}

/// Failure of [`evaluate_named`]: either the names or the values were rejected.
#[derive(Debug, Clone, PartialEq)]
pub enum NamedScoreError {
    Contract(ContractError),
    Score(ScoreError),
}

impl std::fmt::Display for NamedScoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Contract(e) => write!(f, "{e}"),
            Self::Score(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for NamedScoreError {}

impl From<ContractError> for NamedScoreError {
    fn from(e: ContractError) -> Self {
        Self::Contract(e)
    }
}

impl From<ScoreError> for NamedScoreError {
    fn from(e: ScoreError) -> Self {
        Self::Score(e)
    }
}

/// Validate the supplied feature names against the model, then evaluate.
///
/// For producers that label their values rather than relying on the
/// positional convention.
///
/// # Errors
///
/// [`NamedScoreError::Contract`] if `names` is not exactly the model's
/// feature order, [`NamedScoreError::Score`] for scoring failures.
pub fn evaluate_named<S: AsRef<str>>(
    model: &Model,
    names: &[S],
    values: &[f64],
) -> Result<ScoringResult, NamedScoreError> {
    validate(names, model)?;
    Ok(evaluate(model, values)?)
}
