//! Blocking reads for configuration sources

use std::fs;
use std::path::Path;

use crate::{Error, Result};

/// Check whether anything exists at `path`.
///
/// Directories count as existing; reading one later reports an I/O error.
pub fn exists(path: impl AsRef<Path>) -> bool {
    path.as_ref().exists()
}

/// Read text content from a file that may not exist.
///
/// Returns `Ok(None)` when nothing exists at `path`. Anything that exists
/// but cannot be read as UTF-8 text is an error.
pub fn read_optional_text(path: impl AsRef<Path>) -> Result<Option<String>> {
    let path = path.as_ref();
    if !exists(path) {
        tracing::trace!(path = %path.display(), "No file present");
        return Ok(None);
    }

    fs::read_to_string(path)
        .map(Some)
        .map_err(|e| Error::io(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_reads_as_none() {
        let temp = TempDir::new().unwrap();
        let content = read_optional_text(temp.path().join("absent.config")).unwrap();
        assert!(content.is_none());
    }

    #[test]
    fn existing_file_reads_its_content() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("jx.config");
        fs::write(&path, "{\"maxCPU\": 10}").unwrap();

        let content = read_optional_text(&path).unwrap();
        assert_eq!(content.as_deref(), Some("{\"maxCPU\": 10}"));
    }

    #[test]
    fn directory_in_place_of_file_is_an_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("app.js.jxcore.config");
        fs::create_dir(&path).unwrap();

        let err = read_optional_text(&path).unwrap_err();
        assert_eq!(err.path(), path.as_path());
    }

    #[test]
    fn exists_sees_directories() {
        let temp = TempDir::new().unwrap();
        assert!(exists(temp.path()));
        assert!(!exists(temp.path().join("nope")));
    }
}
