//! Loader boundary: `load(raw_bytes) -> Model`.
//!
//! Two-phase parse. The document is first read as untyped JSON so the schema
//! version can be checked before anything else is interpreted; only a
//! supported version is then decoded into the typed v1 shape and handed to
//! [`ModelBuilder`]. Unknown versions are never parsed best-effort.

use crate::artifact::error::LoadError;
use crate::artifact::model::{Model, ModelBuilder};
use crate::artifact::schema::{ArtifactDocV1, SUPPORTED_VERSIONS};

/// Parse and validate artifact bytes.
///
/// Pure apart from logging: no filesystem or network access.
///
/// # Errors
///
/// - [`LoadError::Format`] if the bytes are not JSON, `meta.version` is
///   missing or not a string, or any field is missing or mistyped.
/// - [`LoadError::UnsupportedVersion`] if `meta.version` is not supported.
/// - [`LoadError::Validation`] if a data-model invariant is violated.
pub fn load(raw: &[u8]) -> Result<Model, LoadError> {
    let result = load_inner(raw);
    match &result {
        Ok(model) => tracing::info!(
            schema_version = model.schema_version(),
            features = model.feature_count(),
            components = model.component_count(),
            threshold = model.threshold(),
            digest = %model.digest(),
            "artifact loaded"
        ),
        Err(err) => tracing::warn!(kind = err.kind(), error = %err, "artifact rejected"),
    }
    result
}

fn load_inner(raw: &[u8]) -> Result<Model, LoadError> {
    let document: serde_json::Value = serde_json::from_slice(raw)
        .map_err(|e| LoadError::format(format!("not valid JSON: {e}")))?;

    let version = schema_version_of(&document)?;
    if !SUPPORTED_VERSIONS.contains(&version) {
        return Err(LoadError::UnsupportedVersion {
            found: version.to_string(),
            supported: SUPPORTED_VERSIONS.iter().map(|v| (*v).to_string()).collect(),
        });
    }

    let doc: ArtifactDocV1 =
        serde_json::from_value(document).map_err(|e| LoadError::format(e.to_string()))?;
    ModelBuilder::from_doc(doc).build()
}

fn schema_version_of(document: &serde_json::Value) -> Result<&str, LoadError> {
    let meta = document
        .get("meta")
        .ok_or_else(|| LoadError::format("missing field `meta`"))?;
    let version = meta
        .get("version")
        .ok_or_else(|| LoadError::format("missing field `meta.version`"))?;
    version
        .as_str()
        .ok_or_else(|| LoadError::format("`meta.version` is not a string"))
}
