//! Clean command feature.
//!
//! This module owns and handles the "trashcleaner clean" command behavior: scan, pick
//! categories, confirm, delete, then scan again so the numbers shown are current.

use super::{prepare_config, reporter_for, scan_blocking};
use crate::categories::{Category, SelectionSet};
use crate::cleaner::{DeletionExecutor, DeletionResult};
use crate::cli::{confirm, ScanScope};
use crate::debug_log;
use crate::output::{self, OutputMode};
use crate::scan_job::ScanReport;
use crate::theme::Theme;
use anyhow::Context;

pub(crate) struct CleanOptions {
    pub all: bool,
    pub categories: Vec<Category>,
    pub yes: bool,
    pub dry_run: bool,
    pub json: bool,
    pub no_rescan: bool,
    pub scope: ScanScope,
}

impl CleanOptions {
    /// `None` when neither `--all` nor any `--category` was given.
    fn selection(&self) -> Option<SelectionSet> {
        if self.all {
            Some(SelectionSet::all())
        } else if self.categories.is_empty() {
            None
        } else {
            Some(SelectionSet::only(&self.categories))
        }
    }
}

/// JSON document for a `--json` run that stops before deleting: the scan report with
/// its selection for a dry run, otherwise an empty deletion result.
fn json_without_deleting(report: &ScanReport, dry_run: bool) -> anyhow::Result<String> {
    if dry_run {
        output::scan_json(report)
    } else {
        output::deletion_json(&DeletionResult::default())
    }
}

pub(crate) fn handle_clean(options: CleanOptions, output_mode: OutputMode) -> anyhow::Result<()> {
    let Some(selection) = options.selection() else {
        eprintln!("No categories specified. Use --all or --category NAME (temp, browser, windows, recent, other)");
        eprintln!("Run 'trashcleaner clean --help' for more information.");
        return Ok(());
    };

    let config = prepare_config(&options.scope);
    let plan = config.scan_plan();
    let reporter = reporter_for(output_mode, options.json);

    let mut report = scan_blocking(plan.clone(), reporter.clone())?;
    report.selection = selection;

    if !options.json {
        output::print_scan_report(&report, output_mode);
    }

    let selected_count: usize = report
        .selection
        .selected()
        .map(|c| report.index.bucket(c).len())
        .sum();
    if selected_count == 0 || options.dry_run {
        if options.json {
            println!("{}", json_without_deleting(&report, options.dry_run)?);
        } else if selected_count > 0 {
            output::print_dry_run(&report.index, &report.selection, output_mode);
        } else if output_mode != OutputMode::Quiet {
            println!("{}", Theme::success("Nothing to delete in the selected categories."));
        }
        return Ok(());
    }

    if !options.yes {
        let proceed = confirm("Delete selected categories?").context("Failed to read confirmation")?;
        if !proceed {
            if output_mode != OutputMode::Quiet {
                eprintln!("Cancelled.");
            }
            return Ok(());
        }
    }

    let result = DeletionExecutor::new()
        .with_classifier(&plan.classifier)
        .with_reporter(reporter.as_ref())
        .delete(&report.index, &report.selection);
    debug_log::info(&output::deletion_summary_line(&result));

    if options.json {
        output::print_deletion_json(&result)?;
        return Ok(());
    }
    output::print_deletion_result(&result, output_mode);

    if !options.no_rescan {
        let rescan = scan_blocking(plan, reporter)?;
        output::print_scan_report(&rescan, output_mode);
    }

    Ok(())
}
