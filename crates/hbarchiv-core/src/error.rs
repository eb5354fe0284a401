//! Fatal error type for check runs.

use std::path::Path;
use thiserror::Error;

/// The only fatal, run-aborting condition. Everything else the walker
/// encounters is accumulated as a violation in the report.
#[derive(Debug, Error)]
pub enum StructureError {
    /// The archive root is missing or not a directory.
    #[error("{path} ist kein Verzeichnis!")]
    RootNotADirectory { path: String },
}

/// Validates the archive root once, before a walk. The walker itself trusts
/// the root and never re-checks it.
pub fn ensure_root(root: &Path) -> Result<(), StructureError> {
    if root.is_dir() {
        Ok(())
    } else {
        Err(StructureError::RootNotADirectory {
            path: root.display().to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_root_is_fatal() {
        let err = ensure_root(Path::new("/does/not/exist")).unwrap_err();
        assert_eq!(err.to_string(), "/does/not/exist ist kein Verzeichnis!");
    }

    #[test]
    fn file_root_is_fatal() {
        let file = tempfile::NamedTempFile::new().unwrap();
        assert!(ensure_root(file.path()).is_err());
    }

    #[test]
    fn directory_root_is_accepted() {
        let dir = tempfile::tempdir().unwrap();
        assert!(ensure_root(dir.path()).is_ok());
    }
}
