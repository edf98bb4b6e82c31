//! Wire shape of the v1 model artifact.
//!
//! ```text
//! {
//!   "meta": {"version": "v1", "type": "pca_reconstruction", "features": [..F]},
//!   "preprocessing": {"mean": [..F], "scale": [..F]},
//!   "model": {"components": [[..F]; K], "mean": [..F], "n_components": K},
//!   "thresholds": {"reconstruction_error": t}
//! }
//! ```
//!
//! These types only describe structure. Every semantic check lives in
//! [`super::model::ModelBuilder::build`].

use serde::{Deserialize, Serialize};

/// The only schema version this build scores.
pub const SCHEMA_VERSION_V1: &str = "v1";

/// Schema versions accepted by the loader.
pub const SUPPORTED_VERSIONS: &[&str] = &[SCHEMA_VERSION_V1];

/// Artifact type tag for reconstruction-error scoring.
pub const ARTIFACT_TYPE_PCA: &str = "pca_reconstruction";

/// Top-level v1 artifact document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtifactDocV1 {
    pub meta: MetaV1,
    pub preprocessing: PreprocessingV1,
    pub model: BasisV1,
    pub thresholds: ThresholdsV1,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetaV1 {
    pub version: String,
    #[serde(rename = "type")]
    pub artifact_type: String,
    pub features: Vec<String>,
}

/// Per-feature standardization parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreprocessingV1 {
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

/// Reduced-rank basis in standardized space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BasisV1 {
    /// `K` rows of `F` columns.
    pub components: Vec<Vec<f64>>,
    /// Centering point of the basis (`basisMean`).
    pub mean: Vec<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub n_components: Option<u64>,
    /// Carried through for round-tripping; never used for scoring.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explained_variance: Option<Vec<f64>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThresholdsV1 {
    pub reconstruction_error: f64,
}
