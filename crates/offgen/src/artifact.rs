//! Artifact writing.
//!
//! Artifacts are only rewritten when their content changes, so unchanged
//! generated files keep their mtime and do not trigger incremental rebuilds.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use offgen_emit::Artifacts;

use crate::{Error, Result};

/// Outcome of writing one artifact.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WriteStatus {
    Written,
    Unchanged,
}

/// Destination paths for the two artifacts.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArtifactPaths {
    pub header: PathBuf,
    pub source: PathBuf,
}

impl ArtifactPaths {
    #[must_use]
    pub fn new(header: impl Into<PathBuf>, source: impl Into<PathBuf>) -> Self {
        Self {
            header: header.into(),
            source: source.into(),
        }
    }
}

/// Check whether `path` already holds exactly `contents`.
///
/// # Errors
///
/// Returns [`Error::Io`] if `path` exists but cannot be read.
pub fn is_up_to_date(path: &Path, contents: &str) -> Result<bool> {
    match std::fs::read(path) {
        Ok(existing) => Ok(existing == contents.as_bytes()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
        Err(e) => Err(Error::io(path, e)),
    }
}

/// Write `contents` to `path` unless it already holds them.
///
/// Missing parent directories are created.
///
/// # Errors
///
/// Returns [`Error::Io`] if the existing file cannot be read or the new
/// contents cannot be written.
pub fn write_if_changed(path: &Path, contents: &str) -> Result<WriteStatus> {
    if is_up_to_date(path, contents)? {
        debug!(path = %path.display(), "artifact unchanged");
        return Ok(WriteStatus::Unchanged);
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
    }
    std::fs::write(path, contents).map_err(|e| Error::io(path, e))?;
    info!(path = %path.display(), bytes = contents.len(), "wrote artifact");
    Ok(WriteStatus::Written)
}

/// Write both artifacts. Returns (header, source) statuses.
///
/// # Errors
///
/// Stops at the first artifact that fails to write.
pub fn write_artifacts(
    paths: &ArtifactPaths,
    artifacts: &Artifacts,
) -> Result<(WriteStatus, WriteStatus)> {
    let header = write_if_changed(&paths.header, &artifacts.header)?;
    let source = write_if_changed(&paths.source, &artifacts.source)?;
    Ok((header, source))
}

/// Paths whose content differs from `artifacts`.
///
/// # Errors
///
/// Returns [`Error::Io`] if an existing artifact cannot be read.
pub fn stale_artifacts(paths: &ArtifactPaths, artifacts: &Artifacts) -> Result<Vec<PathBuf>> {
    let mut stale = Vec::new();
    for (path, contents) in [
        (&paths.header, &artifacts.header),
        (&paths.source, &artifacts.source),
    ] {
        if !is_up_to_date(path, contents)? {
            stale.push(path.clone());
        }
    }
    Ok(stale)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_if_changed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gen").join("out.h");

        let write = |contents| write_if_changed(&path, contents).unwrap();
        assert_eq!(write("a\n"), WriteStatus::Written);
        assert_eq!(write("a\n"), WriteStatus::Unchanged);
        assert_eq!(write("b\n"), WriteStatus::Written);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "b\n");
    }

    #[test]
    fn test_stale_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        let paths = ArtifactPaths::new(dir.path().join("x.h"), dir.path().join("x.c"));
        let artifacts = Artifacts {
            header: "h\n".to_string(),
            source: "c\n".to_string(),
        };

        assert_eq!(stale_artifacts(&paths, &artifacts).unwrap().len(), 2);

        let statuses = write_artifacts(&paths, &artifacts).unwrap();
        assert_eq!(statuses, (WriteStatus::Written, WriteStatus::Written));
        assert!(stale_artifacts(&paths, &artifacts).unwrap().is_empty());

        std::fs::write(&paths.source, "edited\n").unwrap();
        let stale = stale_artifacts(&paths, &artifacts).unwrap();
        assert_eq!(stale, [paths.source]);
    }
}
