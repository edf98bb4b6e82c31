//! Paths to committed fixtures.

use std::path::{Path, PathBuf};

/// Workspace root (two levels above this crate's manifest).
#[must_use]
pub fn workspace_root() -> PathBuf {
    let manifest = Path::new(env!("CARGO_MANIFEST_DIR"));
    manifest
        .ancestors()
        .nth(2)
        .map_or_else(|| manifest.to_path_buf(), Path::to_path_buf)
}

/// `tests/fixtures/<rel>` under the workspace root.
#[must_use]
pub fn fixture_path(rel: &str) -> PathBuf {
    workspace_root().join("tests/fixtures").join(rel)
}

/// The committed host-telemetry artifact.
#[must_use]
pub fn host_telemetry_artifact() -> PathBuf {
    fixture_path("host_telemetry_v1/model.json")
}

/// Golden samples for the host-telemetry artifact, computed by an independent
/// reference implementation. Carries no artifact digest.
#[must_use]
pub fn host_telemetry_reference_golden() -> PathBuf {
    fixture_path("host_telemetry_v1/golden_reference.json")
}
