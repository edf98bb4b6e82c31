//! Feature contract strictness.
//!
//! Proves:
//! 1. The exact declared order is accepted
//! 2. Every non-identity permutation of the five metrics is rejected
//! 3. Subsets, supersets and renamed metrics are rejected
//! 4. Named scoring refuses before any arithmetic

use lock_tests::scenario::{scenario_model, SCENARIO_SPIKE};
use reconscore_kernel::contract::{contract_digest, validate, ContractError, HOST_TELEMETRY_V1};
use reconscore_kernel::score::{evaluate_named, NamedScoreError};

fn permutations(items: &[&'static str]) -> Vec<Vec<&'static str>> {
    if items.len() <= 1 {
        return vec![items.to_vec()];
    }
    let mut out = Vec::new();
    for i in 0..items.len() {
        let mut rest = items.to_vec();
        let head = rest.remove(i);
        for mut tail in permutations(&rest) {
            tail.insert(0, head);
            out.push(tail);
        }
    }
    out
}

#[test]
fn declared_order_accepted() {
    validate(&HOST_TELEMETRY_V1, &scenario_model()).unwrap();
}

#[test]
fn every_permutation_rejected() {
    let model = scenario_model();
    let all = permutations(&HOST_TELEMETRY_V1);
    assert_eq!(all.len(), 120);
    let mut rejected = 0;
    for p in &all {
        if p.as_slice() == HOST_TELEMETRY_V1 {
            continue;
        }
        let err = validate(p, &model).unwrap_err();
        let ContractError::Mismatch {
            first_difference, ..
        } = err;
        assert_ne!(p[first_difference], HOST_TELEMETRY_V1[first_difference]);
        rejected += 1;
    }
    assert_eq!(rejected, 119);
}

#[test]
fn subsets_supersets_and_renames_rejected() {
    let model = scenario_model();
    let subset = &HOST_TELEMETRY_V1[..4];
    let mut superset = HOST_TELEMETRY_V1.to_vec();
    superset.push("gpu_usage");
    let mut renamed = HOST_TELEMETRY_V1.to_vec();
    renamed[1] = "mem_usage";

    for names in [subset.to_vec(), superset, renamed, Vec::new()] {
        assert!(validate(&names, &model).is_err(), "{names:?} accepted");
    }
}

#[test]
fn named_scoring_checks_names_first() {
    let model = scenario_model();
    let mut swapped = HOST_TELEMETRY_V1;
    swapped.swap(3, 4);
    let err = evaluate_named(&model, &swapped, &SCENARIO_SPIKE).unwrap_err();
    assert!(matches!(err, NamedScoreError::Contract(_)));

    let ok = evaluate_named(&model, &HOST_TELEMETRY_V1, &SCENARIO_SPIKE).unwrap();
    assert!(ok.is_anomaly);
}

#[test]
fn contract_digest_is_order_sensitive() {
    let mut swapped = HOST_TELEMETRY_V1;
    swapped.swap(0, 1);
    assert_ne!(contract_digest(&HOST_TELEMETRY_V1), contract_digest(&swapped));
    assert_eq!(
        contract_digest(&HOST_TELEMETRY_V1),
        contract_digest(scenario_model().feature_order())
    );
}
