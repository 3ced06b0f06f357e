//! Full recursive enumeration of one directory tree through the classifier.
//!
//! Shared by the scanner (configured roots, browser profile caches) and the drive
//! sweeper (heuristically named cache folders).

use crate::classifier::PathClassifier;
use crate::debug_log;
use crate::error::FileError;
use crate::scan_events::{CancelToken, ScanProgress};
use crate::utils;
use serde::Serialize;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// A discovered path eligible for deletion, with its size at discovery time.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Candidate {
    pub path: PathBuf,
    pub size_bytes: u64,
}

impl Candidate {
    pub fn new(path: impl Into<PathBuf>, size_bytes: u64) -> Self {
        Self {
            path: path.into(),
            size_bytes,
        }
    }
}

/// Everything a traversal needs besides its roots. Cheap to copy.
#[derive(Clone, Copy)]
pub struct ScanContext<'a> {
    pub classifier: &'a PathClassifier,
    pub progress: Option<&'a ScanProgress<'a>>,
    pub cancel: Option<&'a CancelToken>,
}

impl<'a> ScanContext<'a> {
    pub fn new(classifier: &'a PathClassifier) -> Self {
        Self {
            classifier,
            progress: None,
            cancel: None,
        }
    }

    pub fn with_progress(mut self, progress: &'a ScanProgress<'a>) -> Self {
        self.progress = Some(progress);
        self
    }

    pub fn with_cancel(mut self, cancel: &'a CancelToken) -> Self {
        self.cancel = Some(cancel);
        self
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.map(|c| c.is_cancelled()).unwrap_or(false)
    }
}

/// Lazy iterator over the eligible regular files below one directory.
///
/// Symlinks are neither followed nor reported. Protected subtrees are pruned. Errors are
/// logged and the offending entry skipped.
pub struct Harvest<'a> {
    walker: walkdir::IntoIter,
    ctx: ScanContext<'a>,
}

impl<'a> Harvest<'a> {
    pub fn new(root: &Path, ctx: ScanContext<'a>) -> Self {
        Self {
            walker: WalkDir::new(root).follow_links(false).into_iter(),
            ctx,
        }
    }
}

impl Iterator for Harvest<'_> {
    type Item = Candidate;

    fn next(&mut self) -> Option<Candidate> {
        loop {
            let entry = match self.walker.next()? {
                Ok(entry) => entry,
                Err(err) => {
                    let at = err
                        .path()
                        .map(|p| p.display().to_string())
                        .unwrap_or_default();
                    debug_log::error(&format!("Scan error: {} - {}", at, err));
                    continue;
                }
            };

            let file_type = entry.file_type();
            if file_type.is_dir() {
                if self.ctx.is_cancelled() {
                    return None;
                }
                if self.ctx.classifier.is_protected(entry.path())
                    || utils::is_windows_reparse_point(entry.path())
                {
                    self.walker.skip_current_dir();
                    continue;
                }
                if let Some(progress) = self.ctx.progress {
                    progress.emit_path(entry.path());
                }
                continue;
            }
            if !file_type.is_file() {
                continue;
            }

            let path = entry.path();
            if !self.ctx.classifier.is_eligible(path) {
                continue;
            }
            match entry.metadata().map_err(|e| match e.into_io_error() {
                Some(io) => FileError::from(io),
                None => FileError::Io("metadata unavailable".to_string()),
            }) {
                Ok(meta) => return Some(Candidate::new(entry.into_path(), meta.len())),
                Err(err) => {
                    debug_log::error(&format!("Error: cannot add {} - {}", path.display(), err));
                }
            }
        }
    }
}
