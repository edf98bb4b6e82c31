//! Reconstruction residual.
//!
//! The arithmetic below is the cross-implementation contract. Every
//! implementation scoring the same artifact must perform these steps in this
//! order, with sums accumulated in ascending index order starting from `0.0`:
//!
//! 1. `s[i] = (x[i] - mean[i]) / scale[i]`
//! 2. `c[i] = s[i] - basis_mean[i]`
//! 3. `z[k] = Σ_i c[i] * b_k[i]`
//! 4. `r[i] = Σ_k z[k] * b_k[i]`
//! 5. `recon[i] = r[i] + basis_mean[i]`
//! 6. `diff[i] = s[i] - recon[i]`      (against `s`, not `c`)
//! 7. `residual = sqrt(Σ_i diff[i]^2)`
//!
//! Step 6 diffs the standardized vector against the re-centered
//! reconstruction. Diffing against `c`, or skipping the add-back in step 5,
//! changes the numbers and invalidates every golden fixture.
//!
//! No fused multiply-add is used anywhere: `mul_add` rounds once instead of
//! twice and would drift from reference implementations.

use crate::artifact::model::Model;
use crate::score::ScoreError;

/// Residual magnitude of `x` under `model`.
///
/// Pure and allocation-local; safe to call concurrently on a shared model.
///
/// # Errors
///
/// - [`ScoreError::Dimension`] if `x.len() != model.feature_count()`.
/// - [`ScoreError::NonFiniteInput`] if any `x[i]` is NaN or infinite.
/// - [`ScoreError::InternalConsistency`] if the residual is not finite.
pub fn score(model: &Model, x: &[f64]) -> Result<f64, ScoreError> {
    let f = model.feature_count();
    if x.len() != f {
        return Err(ScoreError::Dimension {
            expected: f,
            actual: x.len(),
        });
    }
    if let Some(index) = x.iter().position(|v| !v.is_finite()) {
        return Err(ScoreError::NonFiniteInput {
            index,
            value: x[index],
        });
    }

    let standardized: Vec<f64> = x
        .iter()
        .zip(model.mean())
        .zip(model.scale())
        .map(|((x, mean), scale)| (x - mean) / scale)
        .collect();

    let centered: Vec<f64> = standardized
        .iter()
        .zip(model.basis_mean())
        .map(|(s, m)| s - m)
        .collect();

    let projected: Vec<f64> = model.basis_rows().map(|row| dot(&centered, row)).collect();

    let mut reconstructed = vec![0.0_f64; f];
    for (z, row) in projected.iter().zip(model.basis_rows()) {
        for (r, b) in reconstructed.iter_mut().zip(row) {
            *r += z * b;
        }
    }
    for (r, m) in reconstructed.iter_mut().zip(model.basis_mean()) {
        *r += m;
    }

    let mut sum_sq = 0.0_f64;
    for (s, r) in standardized.iter().zip(&reconstructed) {
        let diff = s - r;
        sum_sq += diff * diff;
    }
    let residual = sum_sq.sqrt();

    if !residual.is_finite() {
        return Err(ScoreError::InternalConsistency {
            detail: format!("residual {residual} from finite input of {f} features"),
        });
    }
    Ok(residual)
}

/// Ascending-order dot product.
fn dot(a: &[f64], b: &[f64]) -> f64 {
    let mut acc = 0.0_f64;
    for (x, y) in a.iter().zip(b) {
        acc += x * y;
    }
    acc
}
