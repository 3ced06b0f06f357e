//! Scan command feature.
//!
//! This module owns and handles the "trashcleaner scan" command behavior.

use super::{prepare_config, reporter_for, scan_blocking};
use crate::cli::ScanScope;
use crate::output::{self, OutputMode};

pub(crate) fn handle_scan(scope: ScanScope, json: bool, output_mode: OutputMode) -> anyhow::Result<()> {
    let config = prepare_config(&scope);
    let plan = config.scan_plan();

    let report = scan_blocking(plan, reporter_for(output_mode, json))?;

    if json {
        output::print_json(&report)?;
    } else {
        output::print_scan_report(&report, output_mode);
    }

    Ok(())
}
