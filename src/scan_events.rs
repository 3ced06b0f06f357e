//! Progress events emitted during scanning and cleaning, and the reporter seam the front
//! end plugs into.

use crate::cleaner::DeletionResult;
use crate::scan_job::ScanResult;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::mpsc::Sender;
use std::sync::{Arc, Mutex};
use std::time::{Instant, SystemTime, UNIX_EPOCH};

/// Real-time progress updates.
#[derive(Debug, Clone)]
pub enum ProgressEvent {
    /// A root directory, browser cache root or volume finished.
    ScanStep {
        completed: usize,
        total: usize,
        elapsed_secs: u64,
        estimated_remaining_secs: u64,
        label: String,
    },

    /// The scanner is currently inside `path`. Throttled.
    ScanPath { path: PathBuf },

    ScanFinished(ScanResult),

    DeletionStep {
        processed: usize,
        total: usize,
        freed_bytes: u64,
    },

    DeletionFinished(DeletionResult),
}

/// Receives progress events. Implemented by the front end; the core only ever calls
/// [`ProgressReporter::report`].
pub trait ProgressReporter: Send + Sync {
    fn report(&self, event: ProgressEvent);
}

/// Discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopReporter;

impl ProgressReporter for NoopReporter {
    fn report(&self, _event: ProgressEvent) {}
}

/// Forwards events over a channel so the receiving thread never blocks the worker.
#[derive(Debug)]
pub struct ChannelReporter {
    tx: Sender<ProgressEvent>,
}

impl ChannelReporter {
    pub fn new(tx: Sender<ProgressEvent>) -> Self {
        Self { tx }
    }
}

impl ProgressReporter for ChannelReporter {
    fn report(&self, event: ProgressEvent) {
        // A dropped receiver only means nobody is watching
        let _ = self.tx.send(event);
    }
}

/// Shared cancellation flag. Scans check it between directory steps, deletions between
/// paths.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Moving-average estimate of the time left in a step-based scan.
///
/// After each step the running average `elapsed / steps_done` is sampled; the estimate
/// is the mean of all samples times the number of steps left.
#[derive(Debug, Clone)]
pub struct EtaEstimator {
    total_steps: usize,
    completed: usize,
    samples: Vec<f64>,
}

impl EtaEstimator {
    pub fn new(total_steps: usize) -> Self {
        Self {
            total_steps,
            completed: 0,
            samples: Vec::with_capacity(total_steps),
        }
    }

    pub fn completed(&self) -> usize {
        self.completed
    }

    pub fn total_steps(&self) -> usize {
        self.total_steps
    }

    /// Record a finished step at `elapsed_secs` since the scan began and return the
    /// estimated seconds remaining.
    pub fn step_finished(&mut self, elapsed_secs: f64) -> u64 {
        self.completed += 1;
        self.samples.push(elapsed_secs / self.completed as f64);
        let avg = self.samples.iter().sum::<f64>() / self.samples.len() as f64;
        let remaining_steps = self.total_steps.saturating_sub(self.completed);
        (avg * remaining_steps as f64) as u64
    }
}

/// Progress bookkeeping shared by the scanner, the sweeper and their harvests for one
/// scan run.
pub struct ScanProgress<'a> {
    reporter: &'a dyn ProgressReporter,
    started: Instant,
    eta: Mutex<EtaEstimator>,
    min_interval_ms: u64,
    last_emit_ms: AtomicU64,
}

impl<'a> ScanProgress<'a> {
    pub fn new(reporter: &'a dyn ProgressReporter, total_steps: usize, min_interval_ms: u64) -> Self {
        Self {
            reporter,
            started: Instant::now(),
            eta: Mutex::new(EtaEstimator::new(total_steps)),
            min_interval_ms,
            last_emit_ms: AtomicU64::new(0),
        }
    }

    pub fn started(&self) -> Instant {
        self.started
    }

    pub fn step_finished(&self, label: &str) {
        let elapsed = self.started.elapsed();
        let Ok(mut eta) = self.eta.lock() else {
            return;
        };
        let remaining = eta.step_finished(elapsed.as_secs_f64());
        self.reporter.report(ProgressEvent::ScanStep {
            completed: eta.completed(),
            total: eta.total_steps(),
            elapsed_secs: elapsed.as_secs(),
            estimated_remaining_secs: remaining,
            label: label.to_string(),
        });
    }

    pub fn emit_path(&self, path: &Path) {
        let now_ms = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64;
        let last = self.last_emit_ms.load(Ordering::Relaxed);
        if last != 0 && now_ms.saturating_sub(last) < self.min_interval_ms {
            return;
        }
        if self
            .last_emit_ms
            .compare_exchange(last, now_ms, Ordering::Relaxed, Ordering::Relaxed)
            .is_err()
        {
            return;
        }

        self.reporter.report(ProgressEvent::ScanPath {
            path: path.to_path_buf(),
        });
    }

    pub fn finish(&self, result: &ScanResult) {
        self.reporter.report(ProgressEvent::ScanFinished(result.clone()));
    }
}
