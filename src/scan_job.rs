//! Background scan worker.
//!
//! One worker thread runs the scanner, the drive sweeper and the categorizer, then hands
//! the finished index to the caller through the join handle. Nothing is shared with the
//! caller during the scan except the cancellation flag and the progress reporter.

use crate::categories::{categorize, CategoryIndex, SelectionSet};
use crate::classifier::PathClassifier;
use crate::harvest::ScanContext;
use crate::scan_events::{CancelToken, ProgressReporter, ScanProgress};
use crate::scanner::{self, CacheRoot, Scanner};
use crate::sweeper::{DriveSweeper, DEFAULT_DEPTH_LIMIT};
use anyhow::{anyhow, Context, Result};
use serde::Serialize;
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

/// Default minimum gap between current-path progress events.
pub const PATH_EVENT_INTERVAL_MS: u64 = 100;

/// Fully resolved inputs for one scan.
#[derive(Debug, Clone)]
pub struct ScanPlan {
    pub roots: Vec<PathBuf>,
    pub cache_roots: Vec<CacheRoot>,
    pub volume_roots: Vec<PathBuf>,
    pub depth_limit: usize,
    pub cache_folder_names: Vec<String>,
    pub classifier: PathClassifier,
    pub path_event_interval_ms: u64,
}

impl ScanPlan {
    pub fn new(classifier: PathClassifier) -> Self {
        Self {
            roots: Vec::new(),
            cache_roots: Vec::new(),
            volume_roots: Vec::new(),
            depth_limit: DEFAULT_DEPTH_LIMIT,
            cache_folder_names: Vec::new(),
            classifier,
            path_event_interval_ms: PATH_EVENT_INTERVAL_MS,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScanResult {
    pub total_count: usize,
    pub total_size_bytes: u64,
    pub elapsed_seconds: u64,
    pub cancelled: bool,
}

impl ScanResult {
    pub fn size_human(&self) -> String {
        bytesize::to_string(self.total_size_bytes, false)
    }
}

/// Everything a finished scan hands over to the caller.
#[derive(Debug, Clone)]
pub struct ScanReport {
    pub index: CategoryIndex,
    pub selection: SelectionSet,
    pub summary: ScanResult,
}

/// Run a complete scan on the current thread.
///
/// Scanner and sweeper output is concatenated and de-duplicated by path before
/// categorizing, since a configured root may also be found again by the sweep.
pub fn run_scan(plan: &ScanPlan, reporter: &dyn ProgressReporter, cancel: &CancelToken) -> ScanReport {
    let roots = scanner::existing_roots(&plan.roots);
    let total_steps = roots.len() + plan.cache_roots.len() + plan.volume_roots.len();
    let progress = ScanProgress::new(reporter, total_steps, plan.path_event_interval_ms);
    let ctx = ScanContext::new(&plan.classifier)
        .with_progress(&progress)
        .with_cancel(cancel);

    let scanner = Scanner::new(ctx);
    let sweeper = DriveSweeper::new(ctx, plan.depth_limit, plan.cache_folder_names.iter().cloned());

    let mut seen = HashSet::new();
    let candidates = scanner
        .scan(&roots, &plan.cache_roots)
        .chain(sweeper.sweep(&plan.volume_roots))
        .filter(|c| seen.insert(c.path.clone()));
    let index = categorize(candidates);

    let summary = ScanResult {
        total_count: index.total_count(),
        total_size_bytes: index.total_size_bytes(),
        elapsed_seconds: progress.started().elapsed().as_secs(),
        cancelled: cancel.is_cancelled(),
    };
    progress.finish(&summary);

    ScanReport {
        index,
        selection: SelectionSet::all(),
        summary,
    }
}

/// Handle to a scan running on its own thread. Callers must not start a second scan
/// before joining the first.
pub struct ScanHandle {
    cancel: CancelToken,
    handle: JoinHandle<ScanReport>,
}

impl ScanHandle {
    /// Ask the worker to stop at its next directory step.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Wait for the worker and take ownership of its report.
    pub fn join(self) -> Result<ScanReport> {
        self.handle
            .join()
            .map_err(|_| anyhow!("Scan worker panicked"))
    }
}

pub fn spawn_scan(plan: ScanPlan, reporter: Arc<dyn ProgressReporter>) -> Result<ScanHandle> {
    let cancel = CancelToken::new();
    let worker_cancel = cancel.clone();
    let handle = thread::Builder::new()
        .name("scan-worker".to_string())
        .spawn(move || run_scan(&plan, reporter.as_ref(), &worker_cancel))
        .context("Failed to start scan worker")?;
    Ok(ScanHandle { cancel, handle })
}
