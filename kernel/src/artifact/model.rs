//! `Model`: the validated, immutable in-memory artifact.
//!
//! A `Model` can only be obtained from [`ModelBuilder::build`], which checks
//! every data-model invariant once and then freezes the value. There are no
//! setters: a loaded model is shared read-only (`&Model` / `Arc<Model>`) by
//! any number of concurrent scoring calls.
//!
//! # Layout
//!
//! The basis is stored row-major and flattened: `basis[k * F + i]` is column
//! `i` of row `k`. Rows are exposed through [`Model::basis_rows`].

use std::collections::BTreeSet;

use crate::artifact::error::{ArtifactInvariant, LoadError};
use crate::artifact::schema::{
    ArtifactDocV1, ARTIFACT_TYPE_PCA, SCHEMA_VERSION_V1, SUPPORTED_VERSIONS,
};
use crate::proof::canon::canonical_json_bytes;
use crate::proof::hash::{canonical_hash, ContentHash, HashDomain};

/// Domain prefix for model digests.
pub const DOMAIN_MODEL_ARTIFACT: HashDomain = HashDomain::ModelArtifact;

/// Validated reduced-rank reconstruction model.
///
/// Implements `PartialEq` (field-wise, so two models loaded from equivalent
/// artifacts compare equal) but not `Eq`: the numeric fields are `f64`.
#[derive(Debug, Clone, PartialEq)]
pub struct Model {
    schema_version: String,
    artifact_type: String,
    feature_order: Vec<String>,
    mean: Vec<f64>,
    scale: Vec<f64>,
    component_count: usize,
    /// Flattened `[component_count * F]`, row-major.
    basis: Vec<f64>,
    basis_mean: Vec<f64>,
    threshold: f64,
    explained_variance: Option<Vec<f64>>,
    digest: ContentHash,
}

impl Model {
    /// Schema version tag the model was loaded under (e.g. `"v1"`).
    #[must_use]
    pub fn schema_version(&self) -> &str {
        &self.schema_version
    }

    /// Scoring family tag (`"pca_reconstruction"`).
    #[must_use]
    pub fn artifact_type(&self) -> &str {
        &self.artifact_type
    }

    /// Ordered feature names. Position `i` of every input vector is `feature_order()[i]`.
    #[must_use]
    pub fn feature_order(&self) -> &[String] {
        &self.feature_order
    }

    /// Number of features `F`.
    #[must_use]
    pub fn feature_count(&self) -> usize {
        self.feature_order.len()
    }

    /// Number of basis rows `K`.
    #[must_use]
    pub const fn component_count(&self) -> usize {
        self.component_count
    }

    /// Standardization means, length `F`.
    #[must_use]
    pub fn mean(&self) -> &[f64] {
        &self.mean
    }

    /// Standardization scales, length `F`, all strictly positive.
    #[must_use]
    pub fn scale(&self) -> &[f64] {
        &self.scale
    }

    /// Basis row `k`. Panics if `k >= component_count()`.
    #[must_use]
    pub fn basis_row(&self, k: usize) -> &[f64] {
        let f = self.feature_count();
        &self.basis[k * f..(k + 1) * f]
    }

    /// Basis rows in order `k = 0..K`.
    pub fn basis_rows(&self) -> std::slice::ChunksExact<'_, f64> {
        self.basis.chunks_exact(self.feature_count())
    }

    /// Centering point of the basis in standardized space, length `F`.
    #[must_use]
    pub fn basis_mean(&self) -> &[f64] {
        &self.basis_mean
    }

    /// Decision boundary on residual magnitude.
    #[must_use]
    pub const fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Per-component explained variance, when the artifact carried it.
    #[must_use]
    pub fn explained_variance(&self) -> Option<&[f64]> {
        self.explained_variance.as_deref()
    }

    /// Content digest of the canonical JSON form of this model.
    ///
    /// Whitespace, key order and the presence of `n_components` do not affect
    /// it; any change to a numeric value does.
    #[must_use]
    pub fn digest(&self) -> &ContentHash {
        &self.digest
    }

    /// Approximate resident size in bytes (used by cache budgets).
    #[must_use]
    pub fn estimated_bytes(&self) -> usize {
        let floats = self.mean.len()
            + self.scale.len()
            + self.basis.len()
            + self.basis_mean.len()
            + self.explained_variance.as_ref().map_or(0, Vec::len);
        let names: usize = self.feature_order.iter().map(String::len).sum();
        std::mem::size_of::<Self>() + floats * std::mem::size_of::<f64>() + names
    }

    /// Re-serialize to the v1 artifact JSON shape.
    ///
    /// `load(serde_json::to_vec(&model.to_json_value()))` yields an equal model.
    #[must_use]
    pub fn to_json_value(&self) -> serde_json::Value {
        render_json(
            &self.schema_version,
            &self.artifact_type,
            &self.feature_order,
            &self.mean,
            &self.scale,
            &self.basis,
            self.component_count,
            &self.basis_mean,
            self.threshold,
            self.explained_variance.as_deref(),
        )
    }
}

/// Validate-then-freeze builder for [`Model`].
///
/// Collects the parts of a model in any order; [`build`](Self::build) checks
/// every invariant and either returns the frozen `Model` or the first
/// violation found.
#[derive(Debug, Clone)]
pub struct ModelBuilder {
    schema_version: String,
    artifact_type: String,
    feature_order: Vec<String>,
    mean: Vec<f64>,
    scale: Vec<f64>,
    basis: Vec<Vec<f64>>,
    basis_mean: Vec<f64>,
    threshold: Option<f64>,
    declared_components: Option<u64>,
    explained_variance: Option<Vec<f64>>,
}

impl ModelBuilder {
    /// Start a v1 `pca_reconstruction` model over the given ordered features.
    #[must_use]
    pub fn new<I, S>(features: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            schema_version: SCHEMA_VERSION_V1.to_string(),
            artifact_type: ARTIFACT_TYPE_PCA.to_string(),
            feature_order: features.into_iter().map(Into::into).collect(),
            mean: Vec::new(),
            scale: Vec::new(),
            basis: Vec::new(),
            basis_mean: Vec::new(),
            threshold: None,
            declared_components: None,
            explained_variance: None,
        }
    }

    /// Seed a builder from a parsed v1 document.
    #[must_use]
    pub fn from_doc(doc: ArtifactDocV1) -> Self {
        Self {
            schema_version: doc.meta.version,
            artifact_type: doc.meta.artifact_type,
            feature_order: doc.meta.features,
            mean: doc.preprocessing.mean,
            scale: doc.preprocessing.scale,
            basis: doc.model.components,
            basis_mean: doc.model.mean,
            threshold: Some(doc.thresholds.reconstruction_error),
            declared_components: doc.model.n_components,
            explained_variance: doc.model.explained_variance,
        }
    }

    #[must_use]
    pub fn schema_version(mut self, version: impl Into<String>) -> Self {
        self.schema_version = version.into();
        self
    }

    #[must_use]
    pub fn artifact_type(mut self, artifact_type: impl Into<String>) -> Self {
        self.artifact_type = artifact_type.into();
        self
    }

    /// Standardization parameters: `s[i] = (x[i] - mean[i]) / scale[i]`.
    #[must_use]
    pub fn standardization(mut self, mean: Vec<f64>, scale: Vec<f64>) -> Self {
        self.mean = mean;
        self.scale = scale;
        self
    }

    /// Basis rows (`K x F`) and the basis centering point (`F`).
    #[must_use]
    pub fn basis(mut self, rows: Vec<Vec<f64>>, basis_mean: Vec<f64>) -> Self {
        self.basis = rows;
        self.basis_mean = basis_mean;
        self
    }

    #[must_use]
    pub fn threshold(mut self, threshold: f64) -> Self {
        self.threshold = Some(threshold);
        self
    }

    /// Declared component count (`model.n_components`); must equal `K`.
    #[must_use]
    pub fn declared_components(mut self, n: u64) -> Self {
        self.declared_components = Some(n);
        self
    }

    #[must_use]
    pub fn explained_variance(mut self, variance: Vec<f64>) -> Self {
        self.explained_variance = Some(variance);
        self
    }

    /// Check every invariant and freeze.
    ///
    /// Checks run in a fixed order so the reported violation is deterministic:
    /// version, type, feature list, vector lengths, basis shape, completeness,
    /// finiteness, scale positivity, threshold sign, optional fields.
    ///
    /// # Errors
    ///
    /// [`LoadError::UnsupportedVersion`] for an unknown schema version,
    /// otherwise [`LoadError::Validation`] naming the violated invariant.
    pub fn build(self) -> Result<Model, LoadError> {
        if !SUPPORTED_VERSIONS.contains(&self.schema_version.as_str()) {
            return Err(LoadError::UnsupportedVersion {
                found: self.schema_version,
                supported: SUPPORTED_VERSIONS.iter().map(|v| (*v).to_string()).collect(),
            });
        }
        if self.artifact_type != ARTIFACT_TYPE_PCA {
            return Err(LoadError::validation(
                ArtifactInvariant::ArtifactType,
                format!(
                    "type {:?} is not {ARTIFACT_TYPE_PCA:?}",
                    self.artifact_type
                ),
            ));
        }

        let f = self.feature_order.len();
        if f == 0 {
            return Err(LoadError::validation(
                ArtifactInvariant::EmptyFeatureOrder,
                "feature list is empty",
            ));
        }
        let mut seen = BTreeSet::new();
        for name in &self.feature_order {
            if !seen.insert(name.as_str()) {
                return Err(LoadError::validation(
                    ArtifactInvariant::DuplicateFeature,
                    format!("feature {name:?} listed more than once"),
                ));
            }
        }

        check_len(ArtifactInvariant::MeanLength, "mean", self.mean.len(), f)?;
        check_len(ArtifactInvariant::ScaleLength, "scale", self.scale.len(), f)?;

        let k = self.basis.len();
        if k == 0 {
            return Err(LoadError::validation(
                ArtifactInvariant::EmptyBasis,
                "basis has no components",
            ));
        }
        if k > f {
            return Err(LoadError::validation(
                ArtifactInvariant::BasisRank,
                format!("{k} components exceed {f} features"),
            ));
        }
        for (row_index, row) in self.basis.iter().enumerate() {
            if row.len() != f {
                return Err(LoadError::validation(
                    ArtifactInvariant::BasisWidth,
                    format!("component {row_index} has {} columns, expected {f}", row.len()),
                ));
            }
        }
        check_len(
            ArtifactInvariant::BasisMeanLength,
            "basis mean",
            self.basis_mean.len(),
            f,
        )?;

        let Some(threshold) = self.threshold else {
            return Err(LoadError::validation(
                ArtifactInvariant::Incomplete,
                "threshold was never set",
            ));
        };

        check_finite("mean", &self.mean)?;
        check_finite("scale", &self.scale)?;
        for (row_index, row) in self.basis.iter().enumerate() {
            check_finite(&format!("components[{row_index}]"), row)?;
        }
        check_finite("basis mean", &self.basis_mean)?;
        check_finite("threshold", &[threshold])?;
        if let Some(variance) = &self.explained_variance {
            check_finite("explained_variance", variance)?;
        }

        if let Some((i, s)) = self.scale.iter().enumerate().find(|(_, s)| **s <= 0.0) {
            return Err(LoadError::validation(
                ArtifactInvariant::NonPositiveScale,
                format!("scale[{i}] = {s} (feature {:?})", self.feature_order[i]),
            ));
        }
        if threshold < 0.0 {
            return Err(LoadError::validation(
                ArtifactInvariant::NegativeThreshold,
                format!("threshold = {threshold}"),
            ));
        }

        if let Some(declared) = self.declared_components {
            if usize::try_from(declared).ok() != Some(k) {
                return Err(LoadError::validation(
                    ArtifactInvariant::ComponentCount,
                    format!("n_components = {declared} but basis has {k} rows"),
                ));
            }
        }
        if let Some(variance) = &self.explained_variance {
            if variance.len() != k {
                return Err(LoadError::validation(
                    ArtifactInvariant::ExplainedVariance,
                    format!("{} entries for {k} components", variance.len()),
                ));
            }
            if let Some((i, v)) = variance.iter().enumerate().find(|(_, v)| **v < 0.0) {
                return Err(LoadError::validation(
                    ArtifactInvariant::ExplainedVariance,
                    format!("explained_variance[{i}] = {v}"),
                ));
            }
        }

        let basis: Vec<f64> = self.basis.into_iter().flatten().collect();
        let rendered = render_json(
            &self.schema_version,
            &self.artifact_type,
            &self.feature_order,
            &self.mean,
            &self.scale,
            &basis,
            k,
            &self.basis_mean,
            threshold,
            self.explained_variance.as_deref(),
        );
        let canonical = canonical_json_bytes(&rendered).map_err(|e| {
            LoadError::validation(ArtifactInvariant::NonFinite, e.to_string())
        })?;
        let digest = canonical_hash(DOMAIN_MODEL_ARTIFACT, &canonical);

        Ok(Model {
            schema_version: self.schema_version,
            artifact_type: self.artifact_type,
            feature_order: self.feature_order,
            mean: self.mean,
            scale: self.scale,
            component_count: k,
            basis,
            basis_mean: self.basis_mean,
            threshold,
            explained_variance: self.explained_variance,
            digest,
        })
    }
}

fn check_len(
    invariant: ArtifactInvariant,
    what: &str,
    actual: usize,
    expected: usize,
) -> Result<(), LoadError> {
    if actual == expected {
        Ok(())
    } else {
        Err(LoadError::validation(
            invariant,
            format!("{what} has {actual} entries, expected {expected}"),
        ))
    }
}

fn check_finite(what: &str, values: &[f64]) -> Result<(), LoadError> {
    match values.iter().position(|v| !v.is_finite()) {
        None => Ok(()),
        Some(i) => Err(LoadError::validation(
            ArtifactInvariant::NonFinite,
            format!("{what}[{i}] = {}", values[i]),
        )),
    }
}

#[allow(clippy::too_many_arguments)]
fn render_json(
    schema_version: &str,
    artifact_type: &str,
    feature_order: &[String],
    mean: &[f64],
    scale: &[f64],
    basis: &[f64],
    component_count: usize,
    basis_mean: &[f64],
    threshold: f64,
    explained_variance: Option<&[f64]>,
) -> serde_json::Value {
    let f = feature_order.len();
    let components: Vec<&[f64]> = if f == 0 {
        Vec::new()
    } else {
        basis.chunks_exact(f).collect()
    };
    let mut model = serde_json::json!({
        "components": components,
        "mean": basis_mean,
        "n_components": component_count,
    });
    if let Some(variance) = explained_variance {
        model["explained_variance"] = serde_json::json!(variance);
    }
    serde_json::json!({
        "meta": {
            "version": schema_version,
            "type": artifact_type,
            "features": feature_order,
        },
        "preprocessing": {
            "mean": mean,
            "scale": scale,
        },
        "model": model,
        "thresholds": {
            "reconstruction_error": threshold,
        },
    })
}
