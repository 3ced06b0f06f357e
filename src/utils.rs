//! Shared filesystem helpers for the scanner, sweeper and cleaner.

use crate::error::FileError;
use std::fs;
use std::path::{Path, PathBuf};

/// Returns true if this path is a Windows reparse point (junction/symlink/mount point).
///
/// `walkdir`'s `follow_links(false)` does not stop it from descending into directory
/// junctions, which can loop back on themselves.
pub fn is_windows_reparse_point(path: &Path) -> bool {
    #[cfg(windows)]
    {
        use std::os::windows::fs::MetadataExt;
        const FILE_ATTRIBUTE_REPARSE_POINT: u32 = 0x0400;
        if let Ok(meta) = std::fs::symlink_metadata(path) {
            return meta.file_attributes() & FILE_ATTRIBUTE_REPARSE_POINT != 0;
        }
        false
    }
    #[cfg(not(windows))]
    {
        let _ = path;
        false
    }
}

/// Immediate child directories of `dir`, in listing order. Symlinks are not followed.
pub fn list_subdirs(dir: &Path) -> Result<Vec<PathBuf>, FileError> {
    let mut dirs = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let file_type = entry.file_type()?;
        if file_type.is_dir() {
            dirs.push(entry.path());
        }
    }
    Ok(dirs)
}

/// Resolve `path` to its canonical absolute form with symlinks and `..` removed.
///
/// Paths that cannot be resolved (missing, unreadable) come back unchanged. On Windows
/// the `\\?\` verbatim prefix is dropped so results compare against ordinary paths.
pub fn resolve_path(path: &Path) -> PathBuf {
    match path.canonicalize() {
        Ok(canonical) => strip_verbatim_prefix(canonical),
        Err(_) => path.to_path_buf(),
    }
}

#[cfg(windows)]
fn strip_verbatim_prefix(path: PathBuf) -> PathBuf {
    let stripped = {
        let text = path.to_string_lossy();
        if let Some(rest) = text.strip_prefix(r"\\?\UNC\") {
            Some(PathBuf::from(format!(r"\\{}", rest)))
        } else {
            text.strip_prefix(r"\\?\").map(PathBuf::from)
        }
    };
    stripped.unwrap_or(path)
}

#[cfg(not(windows))]
fn strip_verbatim_prefix(path: PathBuf) -> PathBuf {
    path
}

/// Final component of `path` as UTF-8, if it has one.
pub fn file_name_str(path: &Path) -> Option<&str> {
    path.file_name().and_then(|n| n.to_str())
}

/// Format a count with thousands separators.
pub fn format_number(n: u64) -> String {
    let s = n.to_string();
    let mut result = String::new();
    for (i, c) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    result.chars().rev().collect()
}
