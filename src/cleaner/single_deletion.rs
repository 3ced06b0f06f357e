//! Single deletion feature.
//!
//! This module owns removal of one candidate path.

use super::path_precheck::precheck_path;
use crate::classifier::PathClassifier;
use crate::error::FileError;
use std::fs;
use std::path::Path;

/// Remove a file directly or a directory recursively.
pub fn remove_path(path: &Path) -> Result<(), FileError> {
    let meta = fs::symlink_metadata(path)?;
    if meta.is_dir() {
        fs::remove_dir_all(path)?;
    } else {
        // Regular files and symlinks; a symlink is unlinked, never followed
        fs::remove_file(path)?;
    }
    Ok(())
}

/// Precheck `path`, then remove it.
pub fn delete_with_precheck(path: &Path, classifier: Option<&PathClassifier>) -> Result<(), FileError> {
    if let Some(err) = precheck_path(path, classifier).into_error() {
        return Err(err);
    }

    match remove_path(path) {
        Ok(()) => Ok(()),
        // Vanished between precheck and removal
        Err(_) if path.symlink_metadata().is_err() => Err(FileError::NotFound),
        Err(err) => Err(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_dir() -> TempDir {
        tempfile::tempdir().unwrap()
    }

    #[test]
    fn test_remove_file() {
        let temp_dir = create_test_dir();
        let file = temp_dir.path().join("a.tmp");
        fs::write(&file, "x").unwrap();

        remove_path(&file).unwrap();
        assert!(!file.exists());
    }

    #[test]
    fn test_remove_directory_recursively() {
        let temp_dir = create_test_dir();
        let dir = temp_dir.path().join("Cache");
        fs::create_dir_all(dir.join("a").join("b")).unwrap();
        fs::write(dir.join("a").join("b").join("f"), "x").unwrap();

        remove_path(&dir).unwrap();
        assert!(!dir.exists());
    }

    #[test]
    fn test_delete_nonexistent_is_not_found() {
        let temp_dir = create_test_dir();
        let nonexistent = temp_dir.path().join("nonexistent.txt");

        assert_eq!(delete_with_precheck(&nonexistent, None), Err(FileError::NotFound));
    }
}
