//! Hand-checkable models and inputs.
//!
//! The host-telemetry scenario uses a two-direction basis over the first four
//! metrics, so residuals can be worked out on paper:
//!
//! ```text
//! mean  = [40, 32, 30, 50, 25]
//! scale = [10, 10, 2, 10, 5]
//! b_0   = [0.5,  0.5, 0.5,  0.5, 0]
//! b_1   = [0.5, -0.5, 0.5, -0.5, 0]
//! ```
//!
//! `[95, 5, 60, 900, 2]` standardizes to `[5.5, -2.7, 15, 85, -4.6]`,
//! projects to `z = [51.4, -30.9]`, and leaves
//! `diff = [-4.75, -43.85, 4.75, 43.85, -4.6]`: residual ≈ 62.545.

use reconscore_kernel::artifact::{Model, ModelBuilder};
use reconscore_kernel::contract::HOST_TELEMETRY_V1;

pub const SCENARIO_MEAN: [f64; 5] = [40.0, 32.0, 30.0, 50.0, 25.0];
pub const SCENARIO_SCALE: [f64; 5] = [10.0, 10.0, 2.0, 10.0, 5.0];
pub const SCENARIO_THRESHOLD: f64 = 3.5;

/// Input with every metric far from its operating mean.
pub const SCENARIO_SPIKE: [f64; 5] = [95.0, 5.0, 60.0, 900.0, 2.0];
/// Reference residual for [`SCENARIO_SPIKE`].
pub const SCENARIO_SPIKE_RESIDUAL: f64 = 62.545_423_493_649_8;
/// Standardizes to `2·b_0`, which the basis reconstructs exactly.
pub const SCENARIO_IN_SUBSPACE: [f64; 5] = [50.0, 42.0, 32.0, 60.0, 25.0];

/// The host-telemetry scenario model.
///
/// # Panics
///
/// Never for the constants above.
#[must_use]
pub fn scenario_model() -> Model {
    ModelBuilder::new(HOST_TELEMETRY_V1)
        .standardization(SCENARIO_MEAN.to_vec(), SCENARIO_SCALE.to_vec())
        .basis(
            vec![
                vec![0.5, 0.5, 0.5, 0.5, 0.0],
                vec![0.5, -0.5, 0.5, -0.5, 0.0],
            ],
            vec![0.0; 5],
        )
        .threshold(SCENARIO_THRESHOLD)
        .build()
        .expect("scenario model is valid")
}

/// Two features, identity standardization, basis `[[1, 0]]`: the residual of
/// `[a, b]` is exactly `|b|`.
///
/// # Panics
///
/// Never for a finite non-negative `threshold`.
#[must_use]
pub fn boundary_model(threshold: f64) -> Model {
    ModelBuilder::new(["a", "b"])
        .standardization(vec![0.0, 0.0], vec![1.0, 1.0])
        .basis(vec![vec![1.0, 0.0]], vec![0.0, 0.0])
        .threshold(threshold)
        .build()
        .expect("boundary model is valid")
}
