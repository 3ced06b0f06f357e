use crate::output::truncate_path_start;
use crate::scan_events::{ProgressEvent, ProgressReporter};
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Mutex;
use std::time::Duration;

const SPINNER_CHARS: &str = "⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏";

/// Create a scanning progress bar (one position per root or volume)
///
/// Shows: spinner, progress bar, position/total steps, elapsed time, message
pub fn create_scan_progress_bar(total: u64, msg: &str) -> ProgressBar {
    let pb = ProgressBar::new(total);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} ({elapsed_precise}) {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .tick_chars(SPINNER_CHARS)
            .progress_chars("█▓░"),
    );
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Create a progress bar for determinate progress
pub fn create_progress_bar(total: u64, msg: &str) -> ProgressBar {
    let pb = ProgressBar::new(total);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▓░"),
    );
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

pub fn eta_message(estimated_remaining_secs: u64) -> String {
    format!(
        "Scanning files... Estimated time: ~{}s left",
        estimated_remaining_secs
    )
}

#[derive(Default)]
struct BarState {
    bar: Option<ProgressBar>,
    eta: String,
}

/// Renders scan and deletion progress on stderr with indicatif.
///
/// Bars are created on the first event of a run and cleared on its finish event, so
/// one reporter can serve a scan, a deletion and the rescan after it.
pub struct CliReporter {
    state: Mutex<BarState>,
    hidden: bool,
}

impl CliReporter {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(BarState::default()),
            hidden: false,
        }
    }

    /// Accepts events but draws nothing.
    pub fn hidden() -> Self {
        Self {
            state: Mutex::new(BarState::default()),
            hidden: true,
        }
    }

    fn bar_for(&self, state: &mut BarState, make: impl FnOnce() -> ProgressBar) -> ProgressBar {
        state
            .bar
            .get_or_insert_with(|| {
                if self.hidden {
                    ProgressBar::hidden()
                } else {
                    make()
                }
            })
            .clone()
    }
}

impl Default for CliReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressReporter for CliReporter {
    fn report(&self, event: ProgressEvent) {
        let Ok(mut state) = self.state.lock() else {
            return;
        };

        match event {
            ProgressEvent::ScanStep {
                completed,
                total,
                estimated_remaining_secs,
                ..
            } => {
                let pb = self.bar_for(&mut state, || create_scan_progress_bar(total as u64, ""));
                state.eta = eta_message(estimated_remaining_secs);
                pb.set_length(total as u64);
                pb.set_position(completed as u64);
                pb.set_message(state.eta.clone());
            }
            ProgressEvent::ScanPath { path } => {
                let pb = self.bar_for(&mut state, || create_scan_progress_bar(0, ""));
                let shown = truncate_path_start(&path.display().to_string(), 50);
                if state.eta.is_empty() {
                    pb.set_message(format!("Scanning files... {}", shown));
                } else {
                    pb.set_message(format!("{} {}", state.eta, shown));
                }
            }
            ProgressEvent::DeletionStep {
                processed,
                total,
                freed_bytes,
            } => {
                let pb = self.bar_for(&mut state, || create_progress_bar(total as u64, ""));
                pb.set_length(total as u64);
                pb.set_position(processed as u64);
                pb.set_message(format!("Freed: {}", bytesize::to_string(freed_bytes, false)));
            }
            ProgressEvent::ScanFinished(_) | ProgressEvent::DeletionFinished(_) => {
                if let Some(pb) = state.bar.take() {
                    pb.finish_and_clear();
                }
                state.eta.clear();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cleaner::DeletionResult;
    use crate::scan_job::ScanResult;
    use std::path::PathBuf;

    #[test]
    fn test_create_scan_progress_bar() {
        let pb = create_scan_progress_bar(10, "Test scan progress");
        assert_eq!(pb.length(), Some(10));
        pb.inc(5);
        assert_eq!(pb.position(), 5);
        pb.finish();
    }

    #[test]
    fn test_eta_message() {
        assert_eq!(eta_message(12), "Scanning files... Estimated time: ~12s left");
    }

    #[test]
    fn test_reporter_tracks_scan_then_deletion() {
        let reporter = CliReporter::hidden();

        reporter.report(ProgressEvent::ScanPath {
            path: PathBuf::from("/tmp/a"),
        });
        reporter.report(ProgressEvent::ScanStep {
            completed: 2,
            total: 3,
            elapsed_secs: 4,
            estimated_remaining_secs: 2,
            label: "/tmp".to_string(),
        });
        {
            let state = reporter.state.lock().unwrap();
            let pb = state.bar.as_ref().unwrap();
            assert_eq!(pb.length(), Some(3));
            assert_eq!(pb.position(), 2);
            assert_eq!(state.eta, eta_message(2));
        }

        reporter.report(ProgressEvent::ScanFinished(ScanResult::default()));
        assert!(reporter.state.lock().unwrap().bar.is_none());

        reporter.report(ProgressEvent::DeletionStep {
            processed: 1,
            total: 4,
            freed_bytes: 10,
        });
        assert_eq!(
            reporter.state.lock().unwrap().bar.as_ref().unwrap().length(),
            Some(4)
        );

        reporter.report(ProgressEvent::DeletionFinished(DeletionResult::default()));
        assert!(reporter.state.lock().unwrap().bar.is_none());
    }
}
