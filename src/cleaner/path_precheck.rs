//! Path precheck feature.
//!
//! This module owns path eligibility checks immediately before deletion.

use crate::classifier::PathClassifier;
use crate::error::FileError;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PrecheckOutcome {
    Eligible,
    Missing,
    Locked,
    BlockedProtected,
}

impl PrecheckOutcome {
    pub(crate) fn into_error(self) -> Option<FileError> {
        match self {
            PrecheckOutcome::Eligible => None,
            PrecheckOutcome::Missing => Some(FileError::NotFound),
            PrecheckOutcome::Locked => Some(FileError::InUse),
            PrecheckOutcome::BlockedProtected => Some(FileError::Protected),
        }
    }
}

/// Check if a path is locked by another process (Windows-specific)
///
/// Attempts to open the path with DELETE access and full sharing. If it fails with
/// sharing/lock errors, the path is in use and removal would fail.
#[cfg(windows)]
pub(crate) fn is_path_locked(path: &Path) -> bool {
    use std::fs::OpenOptions;
    use std::os::windows::fs::OpenOptionsExt;

    if !path.exists() {
        return false;
    }

    const FILE_SHARE_READ: u32 = 0x00000001;
    const FILE_SHARE_WRITE: u32 = 0x00000002;
    const FILE_SHARE_DELETE: u32 = 0x00000004;
    const DELETE: u32 = 0x00010000;
    const FILE_FLAG_BACKUP_SEMANTICS: u32 = 0x02000000;

    let mut options = OpenOptions::new();
    options
        .access_mode(DELETE)
        .share_mode(FILE_SHARE_READ | FILE_SHARE_WRITE | FILE_SHARE_DELETE);
    if path.is_dir() {
        options.custom_flags(FILE_FLAG_BACKUP_SEMANTICS);
    }

    match options.open(path) {
        Ok(_) => false,
        Err(e) if matches!(e.raw_os_error(), Some(32) | Some(33)) => true, // ERROR_SHARING_VIOLATION, ERROR_LOCK_VIOLATION
        Err(_) => false,
    }
}

#[cfg(not(windows))]
pub(crate) fn is_path_locked(_path: &Path) -> bool {
    // Advisory locks do not prevent unlinking
    false
}

/// Protected prefixes are checked again here against the resolved path, so a stale or
/// hand-built index, a relative path or a symlinked ancestor can never reach into a
/// protected tree.
pub(crate) fn precheck_path(path: &Path, classifier: Option<&PathClassifier>) -> PrecheckOutcome {
    if classifier.map(|c| c.is_protected_resolved(path)).unwrap_or(false) {
        return PrecheckOutcome::BlockedProtected;
    }

    if path.symlink_metadata().is_err() {
        return PrecheckOutcome::Missing;
    }

    if is_path_locked(path) {
        return PrecheckOutcome::Locked;
    }

    PrecheckOutcome::Eligible
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn create_test_dir() -> TempDir {
        tempfile::tempdir().unwrap()
    }

    #[test]
    fn test_is_path_locked_regular_file() {
        let temp_dir = create_test_dir();
        let file = temp_dir.path().join("unlocked.txt");
        fs::write(&file, "test").unwrap();

        assert!(!is_path_locked(&file));
    }

    #[test]
    fn test_precheck_missing() {
        let temp_dir = create_test_dir();
        let missing = temp_dir.path().join("gone.tmp");
        assert_eq!(precheck_path(&missing, None), PrecheckOutcome::Missing);
        assert_eq!(PrecheckOutcome::Missing.into_error(), Some(FileError::NotFound));
    }

    #[test]
    fn test_precheck_protected_wins_over_existence() {
        let temp_dir = create_test_dir();
        let protected = temp_dir.path().join("Program Files");
        let file = protected.join("app.log");
        fs::create_dir_all(&protected).unwrap();
        fs::write(&file, "x").unwrap();

        let classifier = PathClassifier::new(Vec::<String>::new(), [protected]);
        assert_eq!(
            precheck_path(&file, Some(&classifier)),
            PrecheckOutcome::BlockedProtected
        );
        assert_eq!(precheck_path(&file, None), PrecheckOutcome::Eligible);
    }

    #[cfg(unix)]
    #[test]
    fn test_precheck_blocks_protected_file_reached_through_symlink() {
        let temp_dir = create_test_dir();
        let protected = temp_dir.path().join(".config");
        fs::create_dir_all(&protected).unwrap();
        fs::write(protected.join("settings.json"), "x").unwrap();
        let scratch = temp_dir.path().join("scratch");
        std::os::unix::fs::symlink(&protected, &scratch).unwrap();

        let classifier = PathClassifier::new(Vec::<String>::new(), [protected]);
        assert_eq!(
            precheck_path(&scratch.join("settings.json"), Some(&classifier)),
            PrecheckOutcome::BlockedProtected
        );
    }

    #[test]
    fn test_precheck_eligible_directory() {
        let temp_dir = create_test_dir();
        let classifier = PathClassifier::new(["cookies"], Vec::<PathBuf>::new());
        assert_eq!(
            precheck_path(temp_dir.path(), Some(&classifier)),
            PrecheckOutcome::Eligible
        );
    }
}
