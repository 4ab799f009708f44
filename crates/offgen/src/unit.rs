//! Compilation unit loading.

use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::WalkDir;

use crate::{Error, Result};

/// File extensions scanned when walking an include directory.
pub const SCANNED_EXTENSIONS: &[&str] = &["h", "c"];

/// One compilation unit: file identity plus decoded text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceUnit {
    pub path: PathBuf,
    pub text: String,
}

impl SourceUnit {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, text: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            text: text.into(),
        }
    }

    /// Read a unit from disk as UTF-8.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the file cannot be read or is not UTF-8.
    pub fn read(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        Ok(Self::new(path, text))
    }
}

/// Expand input paths into the list of files to scan.
///
/// Files are kept as given, in order. Directories are walked recursively and
/// contribute their `.h`/`.c` files sorted by path, so the result does not
/// depend on directory iteration order.
///
/// # Errors
///
/// Returns [`Error::Io`] for a missing input or an unreadable directory, and
/// [`Error::NoInputs`] if nothing is left to scan.
pub fn collect_inputs(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for path in paths {
        let meta = std::fs::metadata(path).map_err(|e| Error::io(path, e))?;
        if !meta.is_dir() {
            files.push(path.clone());
            continue;
        }

        let mut found = Vec::new();
        for entry in WalkDir::new(path).follow_links(true) {
            let entry = entry.map_err(|e| {
                let at = e.path().unwrap_or(path).to_path_buf();
                Error::io(at, e.into())
            })?;
            if entry.file_type().is_file() && has_scanned_extension(entry.path()) {
                found.push(entry.into_path());
            }
        }
        found.sort();
        debug!(dir = %path.display(), files = found.len(), "scanned include directory");
        files.extend(found);
    }

    if files.is_empty() {
        return Err(Error::NoInputs);
    }
    Ok(files)
}

/// Read every input file into a unit, preserving order.
///
/// # Errors
///
/// Fails like [`collect_inputs`], or on the first file that cannot be read.
pub fn load_units(paths: &[PathBuf]) -> Result<Vec<SourceUnit>> {
    collect_inputs(paths)?
        .iter()
        .map(|path| SourceUnit::read(path))
        .collect()
}

fn has_scanned_extension(path: &Path) -> bool {
    path.extension()
        .and_then(std::ffi::OsStr::to_str)
        .is_some_and(|ext| SCANNED_EXTENSIONS.contains(&ext))
}
