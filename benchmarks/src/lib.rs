//! Shared helpers for reconscore benchmark suites.

use reconscore_harness::generate::{generate, FeatureRange, SeedSpec};
use reconscore_kernel::artifact::{Model, ModelBuilder};
use reconscore_kernel::proof::hash::{canonical_hash, ContentHash, HashDomain};
use reconscore_kernel::score::scorer::score;

/// Model shapes benchmarked: (features, components).
pub const SHAPES: &[(usize, usize)] = &[(5, 2), (64, 8), (512, 32)];

/// Synthetic model with `features` inputs and `components` basis rows.
///
/// Row `k` is the unit vector on feature `k`, so the basis is exactly
/// orthonormal and residuals stay well-conditioned at every size.
///
/// # Panics
///
/// Panics if `components > features` or `features == 0`. Benchmark setup
/// failures are fatal.
#[must_use]
pub fn synthetic_model(features: usize, components: usize) -> Model {
    let names: Vec<String> = (0..features).map(|i| format!("f{i:04}")).collect();
    let basis = (0..components)
        .map(|k| (0..features).map(|i| if i == k { 1.0 } else { 0.0 }).collect())
        .collect();
    ModelBuilder::new(names)
        .standardization(vec![50.0; features], vec![10.0; features])
        .basis(basis, vec![0.0; features])
        .threshold(3.0)
        .build()
        .expect("synthetic model is valid")
}

/// `n` seeded inputs for `model`, each feature drawn from `[0, 100]`.
///
/// # Panics
///
/// Panics if generation fails.
#[must_use]
pub fn synthetic_inputs(model: &Model, n: usize, seed: u64) -> Vec<Vec<f64>> {
    let spec = SeedSpec {
        seed,
        ranges: vec![FeatureRange::new(0.0, 100.0); model.feature_count()],
    };
    generate(model, &spec, n)
        .expect("synthetic inputs")
        .samples()
        .iter()
        .map(|s| s.input.clone())
        .collect()
}

/// Digest over the residual bit patterns of `inputs`.
///
/// Computed before and after a benchmark group; a difference means the
/// measured code path changed its results, and the timings are not comparable.
///
/// # Panics
///
/// Panics if any input fails to score.
#[must_use]
pub fn residual_guard(model: &Model, inputs: &[Vec<f64>]) -> ContentHash {
    let mut bytes = Vec::with_capacity(inputs.len() * 8);
    for x in inputs {
        let r = score(model, x).expect("benchmark input scores");
        bytes.extend_from_slice(&r.to_bits().to_le_bytes());
    }
    canonical_hash(HashDomain::BenchGuard, &bytes)
}
