//! Threshold decision.

use crate::score::ScoreError;

/// `residual > threshold`, strictly. A residual equal to the threshold is normal.
///
/// # Errors
///
/// [`ScoreError::InternalConsistency`] if either argument is not finite.
/// Valid models and valid inputs never produce one.
pub fn classify(residual: f64, threshold: f64) -> Result<bool, ScoreError> {
    if !residual.is_finite() || !threshold.is_finite() {
        return Err(ScoreError::InternalConsistency {
            detail: format!("cannot classify residual {residual} against threshold {threshold}"),
        });
    }
    Ok(residual > threshold)
}
