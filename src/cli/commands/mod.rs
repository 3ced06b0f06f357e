//! Command feature handlers.
//!
//! Each module owns one command feature. Helpers shared by the scanning commands live
//! here.

pub mod clean_command;
pub mod config_command;
pub mod scan_command;

use super::ScanScope;
use crate::config::Config;
use crate::debug_log;
use crate::output::OutputMode;
use crate::progress::CliReporter;
use crate::scan_events::ProgressReporter;
use crate::scan_job::{self, ScanPlan, ScanReport};
use crate::theme::Theme;
use std::sync::Arc;

/// Load the config, apply command-line overrides and start the error log.
pub(crate) fn prepare_config(scope: &ScanScope) -> Config {
    let mut config = Config::load();
    config.apply_cli_overrides(scope.depth, scope.no_sweep, scope.roots.clone());

    let log_path = config.error_log_path();
    if let Err(e) = debug_log::init(&log_path) {
        eprintln!("{} {:#}", Theme::warning("Warning:"), e);
    }
    config
}

/// Progress bars are drawn unless the output must stay machine-readable or quiet.
pub(crate) fn reporter_for(mode: OutputMode, json: bool) -> Arc<dyn ProgressReporter> {
    if json || mode == OutputMode::Quiet {
        Arc::new(CliReporter::hidden())
    } else {
        Arc::new(CliReporter::new())
    }
}

/// Run one scan on the worker thread and wait for its report.
pub(crate) fn scan_blocking(plan: ScanPlan, reporter: Arc<dyn ProgressReporter>) -> anyhow::Result<ScanReport> {
    let handle = scan_job::spawn_scan(plan, reporter)?;
    let report = handle.join()?;
    if report.summary.cancelled {
        debug_log::warn("Scan cancelled before completion");
    }
    debug_log::info(&crate::output::scan_summary_line(&report.summary));
    Ok(report)
}
