//! Artifact loading against the committed host-telemetry artifact.
//!
//! Proves:
//! 1. The committed artifact loads, declares the host-telemetry contract, and
//!    carries its optional training metadata through
//! 2. Every rejection class surfaces as its own typed error
//! 3. Zero scale is rejected at load time, never at score time
//! 4. The model digest ignores JSON layout but tracks every numeric field

use lock_tests::workspace::host_telemetry_artifact;
use reconscore_harness::artifact_file::load_artifact_file;
use reconscore_kernel::artifact::{load, ArtifactInvariant, LoadError, Model};
use reconscore_kernel::contract::validate_host_telemetry_v1;

fn committed_json() -> serde_json::Value {
    let bytes = std::fs::read(host_telemetry_artifact()).unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn load_value(value: &serde_json::Value) -> Result<Model, LoadError> {
    load(&serde_json::to_vec(value).unwrap())
}

#[test]
fn committed_artifact_loads() {
    let model = load_artifact_file(&host_telemetry_artifact()).unwrap();
    validate_host_telemetry_v1(&model).unwrap();
    assert_eq!(model.feature_count(), 5);
    assert_eq!(model.component_count(), 2);
    assert_eq!(model.basis_row(1), &[0.0, 0.0, 0.0, 0.6, 0.8]);
    assert_eq!(model.basis_mean(), &[0.1, -0.2, 0.05, 0.3, -0.1]);
    assert_eq!(model.explained_variance(), Some(&[2.125, 1.375][..]));
    assert!((model.threshold() - 2.5).abs() < f64::EPSILON);
    assert_eq!(model.digest().algorithm(), "sha256");
}

#[test]
fn unknown_version_is_unsupported() {
    let mut doc = committed_json();
    doc["meta"]["version"] = "v2".into();
    let err = load_value(&doc).unwrap_err();
    assert_eq!(err.kind(), "unsupported_version");
}

#[test]
fn structural_damage_is_format_error() {
    let mut missing = committed_json();
    missing["preprocessing"]
        .as_object_mut()
        .unwrap()
        .remove("scale");
    assert_eq!(load_value(&missing).unwrap_err().kind(), "artifact_format");

    let mut wrong_type = committed_json();
    wrong_type["model"]["components"] = "not a matrix".into();
    assert_eq!(load_value(&wrong_type).unwrap_err().kind(), "artifact_format");
}

#[test]
fn invariant_violations_name_the_invariant() {
    let cases: [(&str, fn(&mut serde_json::Value), ArtifactInvariant); 6] = [
        (
            "duplicate feature",
            |d| d["meta"]["features"][4] = "cpu_usage".into(),
            ArtifactInvariant::DuplicateFeature,
        ),
        (
            "short mean",
            |d| {
                d["preprocessing"]["mean"].as_array_mut().unwrap().pop();
            },
            ArtifactInvariant::MeanLength,
        ),
        (
            "narrow basis row",
            |d| {
                d["model"]["components"][1].as_array_mut().unwrap().pop();
            },
            ArtifactInvariant::BasisWidth,
        ),
        (
            "negative threshold",
            |d| d["thresholds"]["reconstruction_error"] = (-1.0_f64).into(),
            ArtifactInvariant::NegativeThreshold,
        ),
        (
            "component count disagrees",
            |d| d["model"]["n_components"] = 3_u64.into(),
            ArtifactInvariant::ComponentCount,
        ),
        (
            "unknown artifact type",
            |d| d["meta"]["type"] = "isolation_forest".into(),
            ArtifactInvariant::ArtifactType,
        ),
    ];

    for (label, mutate, expected) in cases {
        let mut doc = committed_json();
        mutate(&mut doc);
        let err = load_value(&doc).unwrap_err();
        assert_eq!(err.invariant(), Some(expected), "{label}: got {err}");
    }
}

#[test]
fn zero_scale_rejected_at_load() {
    for bad in [0.0_f64, -15.0] {
        let mut doc = committed_json();
        doc["preprocessing"]["scale"][2] = bad.into();
        let err = load_value(&doc).unwrap_err();
        assert_eq!(err.invariant(), Some(ArtifactInvariant::NonPositiveScale));
    }
}

#[test]
fn digest_ignores_layout_and_tracks_numbers() {
    let from_file = load_artifact_file(&host_telemetry_artifact()).unwrap();
    let compact = load_value(&committed_json()).unwrap();
    assert_eq!(from_file.digest(), compact.digest());

    let mut nudged = committed_json();
    nudged["preprocessing"]["mean"][0] = 45.000_000_001_f64.into();
    assert_ne!(load_value(&nudged).unwrap().digest(), from_file.digest());
}

#[test]
fn reserialized_model_loads_equal() {
    let model = load_artifact_file(&host_telemetry_artifact()).unwrap();
    let again = load_value(&model.to_json_value()).unwrap();
    assert_eq!(model, again);
}
