//! Bulk deletion of selected categories.
//!
//! Best effort, no transactions: each path is attempted independently, failures are
//! recorded and logged, and the batch always runs to the end (or to a cancellation
//! request, which is only honoured between paths).

mod path_precheck;
mod single_deletion;

pub use single_deletion::{delete_with_precheck, remove_path};

use crate::categories::{CategoryIndex, SelectionSet};
use crate::classifier::PathClassifier;
use crate::debug_log;
use crate::error::FileError;
use crate::scan_events::{CancelToken, NoopReporter, ProgressEvent, ProgressReporter};
use serde::Serialize;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeletionFailure {
    pub path: PathBuf,
    pub reason: FileError,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DeletionResult {
    pub deleted_count: usize,
    /// Sum of sizes recorded at scan time, not re-measured.
    pub freed_bytes: u64,
    pub failures: Vec<DeletionFailure>,
    pub cancelled: bool,
}

impl DeletionResult {
    pub fn freed_human(&self) -> String {
        bytesize::to_string(self.freed_bytes, false)
    }
}

pub struct DeletionExecutor<'a> {
    classifier: Option<&'a PathClassifier>,
    reporter: &'a dyn ProgressReporter,
    cancel: Option<&'a CancelToken>,
}

impl Default for DeletionExecutor<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> DeletionExecutor<'a> {
    pub fn new() -> Self {
        Self {
            classifier: None,
            reporter: &NoopReporter,
            cancel: None,
        }
    }

    /// Refuse paths under the classifier's protected prefixes at delete time.
    pub fn with_classifier(mut self, classifier: &'a PathClassifier) -> Self {
        self.classifier = Some(classifier);
        self
    }

    pub fn with_reporter(mut self, reporter: &'a dyn ProgressReporter) -> Self {
        self.reporter = reporter;
        self
    }

    pub fn with_cancel(mut self, cancel: &'a CancelToken) -> Self {
        self.cancel = Some(cancel);
        self
    }

    /// Remove every candidate of every selected category.
    pub fn delete(&self, index: &CategoryIndex, selection: &SelectionSet) -> DeletionResult {
        let mut result = DeletionResult::default();
        let total: usize = selection
            .selected()
            .map(|category| index.bucket(category).len())
            .sum();
        let mut processed = 0usize;

        'categories: for category in selection.selected() {
            for candidate in &index.bucket(category).candidates {
                if self.cancel.map(|c| c.is_cancelled()).unwrap_or(false) {
                    result.cancelled = true;
                    break 'categories;
                }

                match delete_with_precheck(&candidate.path, self.classifier) {
                    Ok(()) => {
                        result.deleted_count += 1;
                        result.freed_bytes += candidate.size_bytes;
                    }
                    Err(reason) => {
                        debug_log::error(&format!(
                            "Deleting error: {} - {}",
                            candidate.path.display(),
                            reason
                        ));
                        result.failures.push(DeletionFailure {
                            path: candidate.path.clone(),
                            reason,
                        });
                    }
                }

                processed += 1;
                self.reporter.report(ProgressEvent::DeletionStep {
                    processed,
                    total,
                    freed_bytes: result.freed_bytes,
                });
            }
        }

        self.reporter
            .report(ProgressEvent::DeletionFinished(result.clone()));
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::categories::{categorize, Category};
    use crate::harvest::Candidate;
    use crate::scan_events::ChannelReporter;
    use std::fs;
    use std::path::Path;
    use std::sync::mpsc;
    use tempfile::TempDir;

    fn create_test_dir() -> TempDir {
        tempfile::tempdir().unwrap()
    }

    fn write_file(path: &Path, len: usize) -> Candidate {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, vec![0u8; len]).unwrap();
        Candidate::new(path, len as u64)
    }

    #[test]
    fn test_empty_category_deletes_nothing() {
        let index = categorize(Vec::new());
        let selection = SelectionSet::only(&[Category::OtherTemp]);
        let result = DeletionExecutor::new().delete(&index, &selection);

        assert_eq!(result.deleted_count, 0);
        assert_eq!(result.freed_bytes, 0);
        assert!(result.failures.is_empty());
    }

    #[test]
    fn test_deletes_selected_categories_only() {
        let temp_dir = create_test_dir();
        // Temp dir names differ per platform; use whichever category both files landed in
        let a = write_file(&temp_dir.path().join("a.bin"), 10);
        let b = write_file(&temp_dir.path().join("b.bin"), 20);
        let index = categorize(vec![a.clone(), b.clone()]);
        let category = index
            .iter()
            .find(|(_, bucket)| !bucket.is_empty())
            .map(|(c, _)| c)
            .unwrap();

        let mut others = SelectionSet::all();
        others.set(category, false);
        let result = DeletionExecutor::new().delete(&index, &others);
        assert_eq!(result.deleted_count, 0);
        assert!(a.path.exists());

        let result = DeletionExecutor::new().delete(&index, &SelectionSet::only(&[category]));
        assert_eq!(result.deleted_count, 2);
        assert_eq!(result.freed_bytes, 30);
        assert!(!a.path.exists());
        assert!(!b.path.exists());
    }

    #[test]
    fn test_missing_path_is_a_failure_and_not_counted() {
        let temp_dir = create_test_dir();
        let present = write_file(&temp_dir.path().join("present.tmp"), 5);
        let missing = Candidate::new(temp_dir.path().join("missing.tmp"), 99);
        let index = categorize(vec![missing.clone(), present.clone()]);

        let result = DeletionExecutor::new().delete(&index, &SelectionSet::all());

        assert_eq!(result.deleted_count, 1);
        assert_eq!(result.freed_bytes, 5);
        assert_eq!(
            result.failures,
            vec![DeletionFailure {
                path: missing.path,
                reason: FileError::NotFound,
            }]
        );
    }

    #[test]
    fn test_directory_candidates_are_removed_recursively() {
        let temp_dir = create_test_dir();
        let dir = temp_dir.path().join("cache2");
        write_file(&dir.join("entries").join("A1"), 4);
        let index = categorize(vec![Candidate::new(&dir, 4)]);

        let result = DeletionExecutor::new().delete(&index, &SelectionSet::all());

        assert_eq!(result.deleted_count, 1);
        assert!(!dir.exists());
    }

    #[test]
    fn test_protected_candidate_is_refused() {
        let temp_dir = create_test_dir();
        let protected = temp_dir.path().join("System32");
        let file = write_file(&protected.join("x.log"), 1);
        let classifier = PathClassifier::new(Vec::<String>::new(), [protected]);
        let index = categorize(vec![file.clone()]);

        let result = DeletionExecutor::new()
            .with_classifier(&classifier)
            .delete(&index, &SelectionSet::all());

        assert_eq!(result.deleted_count, 0);
        assert_eq!(result.failures[0].reason, FileError::Protected);
        assert!(file.path.exists());
    }

    #[test]
    fn test_cancel_stops_between_paths() {
        let temp_dir = create_test_dir();
        let a = write_file(&temp_dir.path().join("a"), 1);
        let index = categorize(vec![a.clone()]);
        let cancel = CancelToken::new();
        cancel.cancel();

        let result = DeletionExecutor::new()
            .with_cancel(&cancel)
            .delete(&index, &SelectionSet::all());

        assert!(result.cancelled);
        assert_eq!(result.deleted_count, 0);
        assert!(a.path.exists());
    }

    #[test]
    fn test_progress_events_and_terminal_result() {
        let temp_dir = create_test_dir();
        let a = write_file(&temp_dir.path().join("a"), 3);
        let b = write_file(&temp_dir.path().join("b"), 4);
        let index = categorize(vec![a, b]);
        let (tx, rx) = mpsc::channel();
        let reporter = ChannelReporter::new(tx);

        let result = DeletionExecutor::new()
            .with_reporter(&reporter)
            .delete(&index, &SelectionSet::all());

        let events: Vec<ProgressEvent> = rx.try_iter().collect();
        assert_eq!(events.len(), 3);
        match &events[1] {
            ProgressEvent::DeletionStep { processed, total, freed_bytes } => {
                assert_eq!((*processed, *total, *freed_bytes), (2, 2, 7));
            }
            other => panic!("unexpected event: {:?}", other),
        }
        match &events[2] {
            ProgressEvent::DeletionFinished(done) => assert_eq!(done, &result),
            other => panic!("unexpected event: {:?}", other),
        }
    }
}
