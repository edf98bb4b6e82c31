//! Feature contract: the ordered feature-name list a model accepts.
//!
//! Matching is exact. Same length, same names, same positions. A correct set
//! of names in a different order is a mismatch, because position `i` of an
//! input vector is multiplied against column `i` of every basis row.

use crate::artifact::model::Model;
use crate::proof::hash::{canonical_hash, ContentHash, HashDomain};

/// The fixed host-telemetry metric contract, in vector order.
pub const HOST_TELEMETRY_V1: [&str; 5] = [
    "cpu_usage",
    "memory_usage",
    "disk_utilization",
    "network_rx_rate",
    "network_tx_rate",
];

/// Supplied feature names do not match the model's contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContractError {
    Mismatch {
        expected: Vec<String>,
        actual: Vec<String>,
        /// First position where the lists differ (or the shorter length).
        first_difference: usize,
    },
}

impl std::fmt::Display for ContractError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Mismatch {
                expected,
                actual,
                first_difference,
            } => write!(
                f,
                "feature contract mismatch at position {first_difference}: expected {expected:?}, got {actual:?}"
            ),
        }
    }
}

impl std::error::Error for ContractError {}

/// Check that `names` is exactly `model.feature_order()`.
///
/// # Errors
///
/// Returns [`ContractError::Mismatch`] on any difference in length, order or
/// content.
pub fn validate<S: AsRef<str>>(names: &[S], model: &Model) -> Result<(), ContractError> {
    check_exact(names, model.feature_order())
}

/// Check that a model declares exactly the [`HOST_TELEMETRY_V1`] contract.
///
/// # Errors
///
/// Returns [`ContractError::Mismatch`] if the model's feature list differs.
pub fn validate_host_telemetry_v1(model: &Model) -> Result<(), ContractError> {
    check_exact(model.feature_order(), &HOST_TELEMETRY_V1)
}

fn check_exact<A: AsRef<str>, E: AsRef<str>>(
    actual: &[A],
    expected: &[E],
) -> Result<(), ContractError> {
    let first_difference = actual
        .iter()
        .zip(expected)
        .position(|(a, e)| a.as_ref() != e.as_ref())
        .or_else(|| (actual.len() != expected.len()).then_some(actual.len().min(expected.len())));

    match first_difference {
        None => Ok(()),
        Some(first_difference) => Err(ContractError::Mismatch {
            expected: expected.iter().map(|s| s.as_ref().to_string()).collect(),
            actual: actual.iter().map(|s| s.as_ref().to_string()).collect(),
            first_difference,
        }),
    }
}

/// Digest of an ordered feature list.
///
/// Names are joined with a NUL separator, so `["ab", "c"]` and `["a", "bc"]`
/// hash differently.
#[must_use]
pub fn contract_digest<S: AsRef<str>>(names: &[S]) -> ContentHash {
    let mut buf = Vec::new();
    for name in names {
        buf.extend_from_slice(name.as_ref().as_bytes());
        buf.push(0);
    }
    canonical_hash(HashDomain::FeatureContract, &buf)
}
