//! Artifact files on disk.
//!
//! The only place the harness turns a path into a [`Model`]. The raw bytes are
//! held just long enough to parse them.

use std::path::{Path, PathBuf};

use reconscore_kernel::artifact::{load, LoadError, Model};

/// Failure reading or loading an artifact file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArtifactFileError {
    /// The file could not be read.
    Io { path: PathBuf, detail: String },
    /// The bytes were read but the kernel rejected them.
    Load { path: PathBuf, error: LoadError },
}

impl std::fmt::Display for ArtifactFileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, detail } => write!(f, "reading {}: {detail}", path.display()),
            Self::Load { path, error } => write!(f, "loading {}: {error}", path.display()),
        }
    }
}

impl std::error::Error for ArtifactFileError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { .. } => None,
            Self::Load { error, .. } => Some(error),
        }
    }
}

/// Read and load an artifact file.
///
/// # Errors
///
/// [`ArtifactFileError::Io`] if the file cannot be read,
/// [`ArtifactFileError::Load`] if its contents are rejected.
pub fn load_artifact_file(path: &Path) -> Result<Model, ArtifactFileError> {
    let bytes = std::fs::read(path).map_err(|e| ArtifactFileError::Io {
        path: path.to_path_buf(),
        detail: e.to_string(),
    })?;
    tracing::debug!(path = %path.display(), bytes = bytes.len(), "artifact file read");
    load(&bytes).map_err(|error| ArtifactFileError::Load {
        path: path.to_path_buf(),
        error,
    })
}
