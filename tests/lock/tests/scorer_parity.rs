//! Scorer parity.
//!
//! Proves:
//! 1. The Rust pipeline reproduces an independently computed golden file
//!    (written by a separate reference implementation, no artifact digest)
//!    within 1e-6 absolute, with identical decisions
//! 2. The end-to-end host-telemetry scenario scores as worked out by hand
//! 3. A model's own basis mean, mapped back to raw space, scores ≈ 0
//! 4. Concurrent scoring on one shared model is bit-identical to serial scoring

use std::sync::Arc;

use lock_tests::scenario::{
    scenario_model, SCENARIO_IN_SUBSPACE, SCENARIO_MEAN, SCENARIO_SPIKE, SCENARIO_SPIKE_RESIDUAL,
};
use lock_tests::workspace::{host_telemetry_artifact, host_telemetry_reference_golden};
use reconscore_harness::artifact_file::load_artifact_file;
use reconscore_harness::fixture_file::read_fixture_file;
use reconscore_harness::verify::{verify, ArtifactBinding, Tolerance};
use reconscore_kernel::score::evaluate;
use reconscore_kernel::score::scorer::score;

#[test]
fn reference_golden_file_verifies() {
    let model = load_artifact_file(&host_telemetry_artifact()).unwrap();
    let golden = read_fixture_file(&host_telemetry_reference_golden()).unwrap();
    assert_eq!(golden.len(), 52);
    assert!(golden.identity().is_none());

    let report = verify(&golden, &model, Tolerance::default());
    assert!(report.passed(), "{}", report.to_json_value());
    assert_eq!(report.binding, ArtifactBinding::Unbound);
    assert!(report.max_deviation <= 1e-6);
}

#[test]
fn reference_golden_decisions_cover_both_classes() {
    let golden = read_fixture_file(&host_telemetry_reference_golden()).unwrap();
    let anomalies = golden.anomaly_count();
    assert!(anomalies > 0 && anomalies < golden.len());
}

#[test]
fn scenario_input_at_mean_is_normal() {
    let result = evaluate(&scenario_model(), &SCENARIO_MEAN).unwrap();
    assert_eq!(result.residual_magnitude, 0.0);
    assert!(!result.is_anomaly);
}

#[test]
fn scenario_spike_is_anomalous() {
    let result = evaluate(&scenario_model(), &SCENARIO_SPIKE).unwrap();
    assert!(
        (result.residual_magnitude - SCENARIO_SPIKE_RESIDUAL).abs() < 1e-9,
        "residual {}",
        result.residual_magnitude
    );
    assert!(result.is_anomaly);
    assert!((result.threshold - 3.5).abs() < f64::EPSILON);
}

#[test]
fn scenario_point_in_subspace_reconstructs_exactly() {
    let residual = score(&scenario_model(), &SCENARIO_IN_SUBSPACE).unwrap();
    assert_eq!(residual, 0.0);
}

#[test]
fn basis_mean_round_trip_scores_near_zero() {
    let model = load_artifact_file(&host_telemetry_artifact()).unwrap();
    let raw: Vec<f64> = model
        .basis_mean()
        .iter()
        .zip(model.scale())
        .zip(model.mean())
        .map(|((bm, scale), mean)| bm * scale + mean)
        .collect();
    let residual = score(&model, &raw).unwrap();
    assert!(residual < 1e-9, "residual {residual}");
}

#[test]
fn concurrent_scoring_matches_serial_bits() {
    let model = Arc::new(load_artifact_file(&host_telemetry_artifact()).unwrap());
    let golden = read_fixture_file(&host_telemetry_reference_golden()).unwrap();
    let inputs: Arc<Vec<Vec<f64>>> =
        Arc::new(golden.samples().iter().map(|s| s.input.clone()).collect());
    let serial: Vec<u64> = inputs
        .iter()
        .map(|x| score(&model, x).unwrap().to_bits())
        .collect();

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let model = Arc::clone(&model);
            let inputs = Arc::clone(&inputs);
            std::thread::spawn(move || {
                inputs
                    .iter()
                    .map(|x| score(&model, x).unwrap().to_bits())
                    .collect::<Vec<u64>>()
            })
        })
        .collect();
    for h in handles {
        assert_eq!(h.join().unwrap(), serial);
    }
}
