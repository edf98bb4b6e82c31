//! Fixture files on disk.
//!
//! Writes are atomic: canonical bytes go to a sibling temp file which is then
//! published at the target, so a reader never observes a half-written set.
//! A committed fixture is only replaced when the caller asks for it; in
//! `CreateNew` mode the target is created by hard link, which fails if the
//! file already exists, so a concurrent writer is never clobbered.

use std::io::ErrorKind;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::fixture::{FixtureParseError, FixtureSet};

/// What to do when the target file already exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    /// Refuse to overwrite an existing fixture.
    CreateNew,
    /// Regenerate: replace whatever is there.
    Replace,
}

/// Error writing or reading a fixture file.
#[derive(Debug)]
pub enum FixtureFileError {
    /// I/O error.
    Io { detail: String },
    /// `WriteMode::CreateNew` and the file exists.
    AlreadyExists { path: String },
    /// Contents are not a usable fixture set.
    Parse(FixtureParseError),
}

impl std::fmt::Display for FixtureFileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { detail } => write!(f, "I/O error: {detail}"),
            Self::AlreadyExists { path } => {
                write!(f, "fixture file exists, refusing to overwrite: {path}")
            }
            Self::Parse(e) => write!(f, "fixture parse error: {e}"),
        }
    }
}

impl std::error::Error for FixtureFileError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Parse(e) => Some(e),
            _ => None,
        }
    }
}

impl From<FixtureParseError> for FixtureFileError {
    fn from(e: FixtureParseError) -> Self {
        Self::Parse(e)
    }
}

/// Write a fixture set as canonical JSON.
///
/// # Errors
///
/// Returns [`FixtureFileError::AlreadyExists`] in `CreateNew` mode when the
/// target exists, [`FixtureFileError::Io`] on filesystem failure.
pub fn write_fixture_file(
    set: &FixtureSet,
    path: &Path,
    mode: WriteMode,
) -> Result<(), FixtureFileError> {
    let bytes = set.to_canonical_bytes()?;
    write_atomic(path, &bytes, mode)?;
    tracing::info!(
        path = %path.display(),
        samples = set.len(),
        anomalies = set.anomaly_count(),
        "fixture set written"
    );
    Ok(())
}

/// Read and validate a fixture file.
///
/// # Errors
///
/// Returns [`FixtureFileError::Io`] if the file cannot be read,
/// [`FixtureFileError::Parse`] if its contents are rejected.
pub fn read_fixture_file(path: &Path) -> Result<FixtureSet, FixtureFileError> {
    let bytes = std::fs::read(path).map_err(|e| FixtureFileError::Io {
        detail: format!("read {}: {e}", path.display()),
    })?;
    let set = FixtureSet::from_json_bytes(&bytes)?;
    tracing::debug!(path = %path.display(), samples = set.len(), "fixture set read");
    Ok(set)
}

/// Distinguishes temp files of writers in the same process.
static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Write bytes to a file atomically (write to temp, then link or rename).
/// The temp file never outlives the call.
fn write_atomic(path: &Path, content: &[u8], mode: WriteMode) -> Result<(), FixtureFileError> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        Some(_) => Path::new("."),
        None => {
            return Err(FixtureFileError::Io {
                detail: "no parent directory".into(),
            })
        }
    };

    let temp_name = format!(
        ".tmp_{}_{}_{}",
        std::process::id(),
        TEMP_COUNTER.fetch_add(1, Ordering::Relaxed),
        path.file_name().unwrap_or_default().to_string_lossy()
    );
    let temp_path = dir.join(temp_name);

    let result = std::fs::write(&temp_path, content)
        .map_err(|e| FixtureFileError::Io {
            detail: format!("write {}: {e}", temp_path.display()),
        })
        .and_then(|()| publish(&temp_path, path, mode));
    if result.is_err() || mode == WriteMode::CreateNew {
        let _ = std::fs::remove_file(&temp_path);
    }
    result
}

fn publish(temp_path: &Path, path: &Path, mode: WriteMode) -> Result<(), FixtureFileError> {
    match mode {
        WriteMode::CreateNew => std::fs::hard_link(temp_path, path).map_err(|e| {
            if e.kind() == ErrorKind::AlreadyExists {
                FixtureFileError::AlreadyExists {
                    path: path.display().to_string(),
                }
            } else {
                FixtureFileError::Io {
                    detail: format!("link {} → {}: {e}", temp_path.display(), path.display()),
                }
            }
        }),
        WriteMode::Replace => std::fs::rename(temp_path, path).map_err(|e| FixtureFileError::Io {
            detail: format!("rename {} → {}: {e}", temp_path.display(), path.display()),
        }),
    }
}
