//! Typed artifact load failures.

/// The data-model invariant an otherwise well-formed artifact violated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtifactInvariant {
    /// `meta.type` is not a supported scoring family.
    ArtifactType,
    /// A required part (e.g. the threshold) was never supplied to the builder.
    Incomplete,
    /// `meta.features` is empty.
    EmptyFeatureOrder,
    /// A feature name appears more than once.
    DuplicateFeature,
    /// `len(mean) != F`.
    MeanLength,
    /// `len(scale) != F`.
    ScaleLength,
    /// The basis has no rows (`K == 0`).
    EmptyBasis,
    /// The basis has more rows than features (`K > F`).
    BasisRank,
    /// A basis row does not have exactly `F` columns.
    BasisWidth,
    /// `len(basisMean) != F`.
    BasisMeanLength,
    /// A numeric field is NaN or infinite.
    NonFinite,
    /// Some `scale[i] <= 0`.
    NonPositiveScale,
    /// The threshold is negative.
    NegativeThreshold,
    /// `model.n_components` disagrees with the number of basis rows.
    ComponentCount,
    /// `model.explained_variance` has the wrong length or a negative entry.
    ExplainedVariance,
}

impl ArtifactInvariant {
    /// Stable snake-case name, used in logs and error messages.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::ArtifactType => "artifact_type",
            Self::Incomplete => "incomplete",
            Self::EmptyFeatureOrder => "empty_feature_order",
            Self::DuplicateFeature => "duplicate_feature",
            Self::MeanLength => "mean_length",
            Self::ScaleLength => "scale_length",
            Self::EmptyBasis => "empty_basis",
            Self::BasisRank => "basis_rank",
            Self::BasisWidth => "basis_width",
            Self::BasisMeanLength => "basis_mean_length",
            Self::NonFinite => "non_finite",
            Self::NonPositiveScale => "non_positive_scale",
            Self::NegativeThreshold => "negative_threshold",
            Self::ComponentCount => "component_count",
            Self::ExplainedVariance => "explained_variance",
        }
    }
}

impl std::fmt::Display for ArtifactInvariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Typed artifact load failure. Fail-closed: no partial `Model` is produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadError {
    /// Bytes are not JSON, or a field is missing or has the wrong type.
    Format { detail: String },
    /// `meta.version` names a schema this build does not understand.
    UnsupportedVersion {
        found: String,
        supported: Vec<String>,
    },
    /// Well-formed artifact that violates a data-model invariant.
    Validation {
        invariant: ArtifactInvariant,
        detail: String,
    },
}

impl LoadError {
    pub(crate) fn format(detail: impl Into<String>) -> Self {
        Self::Format {
            detail: detail.into(),
        }
    }

    pub(crate) fn validation(invariant: ArtifactInvariant, detail: impl Into<String>) -> Self {
        Self::Validation {
            invariant,
            detail: detail.into(),
        }
    }

    /// Short machine-readable error kind.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Format { .. } => "artifact_format",
            Self::UnsupportedVersion { .. } => "unsupported_version",
            Self::Validation { .. } => "artifact_validation",
        }
    }

    /// The violated invariant, for `Validation` errors.
    #[must_use]
    pub const fn invariant(&self) -> Option<ArtifactInvariant> {
        match self {
            Self::Validation { invariant, .. } => Some(*invariant),
            _ => None,
        }
    }
}

impl std::fmt::Display for LoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Format { detail } => write!(f, "malformed artifact: {detail}"),
            Self::UnsupportedVersion { found, supported } => write!(
                f,
                "unsupported artifact schema version {found:?} (supported: {})",
                supported.join(", ")
            ),
            Self::Validation { invariant, detail } => {
                write!(f, "artifact violates {invariant}: {detail}")
            }
        }
    }
}

impl std::error::Error for LoadError {}
