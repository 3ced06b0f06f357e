use crate::categories::{Category, CategoryIndex, SelectionSet};
use crate::cleaner::DeletionResult;
use crate::scan_job::{ScanReport, ScanResult};
use crate::theme::Theme;
use crate::utils::format_number;
use serde::Serialize;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Truncate a string to a maximum display width (adds ellipsis if needed).
pub fn truncate_to_width(s: &str, max_width: usize) -> String {
    if UnicodeWidthStr::width(s) <= max_width {
        return s.to_string();
    }

    let ellipsis = "…";
    let ellipsis_w = UnicodeWidthStr::width(ellipsis);
    let target = max_width.saturating_sub(ellipsis_w);

    let mut out = String::new();
    let mut w = 0usize;
    for ch in s.chars() {
        let cw = UnicodeWidthChar::width(ch).unwrap_or(0);
        if w + cw > target {
            break;
        }
        out.push(ch);
        w += cw;
    }
    out.push_str(ellipsis);
    out
}

/// Keep the tail of a path, which is the informative end, within `max_width` columns.
pub fn truncate_path_start(s: &str, max_width: usize) -> String {
    if UnicodeWidthStr::width(s) <= max_width {
        return s.to_string();
    }

    let target = max_width.saturating_sub(UnicodeWidthStr::width("…"));
    let mut tail: Vec<char> = Vec::new();
    let mut w = 0usize;
    for ch in s.chars().rev() {
        let cw = UnicodeWidthChar::width(ch).unwrap_or(0);
        if w + cw > target {
            break;
        }
        tail.push(ch);
        w += cw;
    }
    let mut out = String::from("…");
    out.extend(tail.into_iter().rev());
    out
}

/// Pad/truncate content to a specific display width (Unicode-aware).
fn pad_right_to_width(s: &str, width: usize) -> String {
    let truncated = truncate_to_width(s, width);
    let w = UnicodeWidthStr::width(truncated.as_str());
    format!("{}{}", truncated, " ".repeat(width.saturating_sub(w)))
}

/// Pad a cell as plain text, then style it.
fn cell(content: &str, width: usize, style: fn(&str) -> String) -> String {
    style(&pad_right_to_width(content, width))
}

/// Print a table row with borders and 1-space cell padding.
fn print_table_row(cells: &[String]) {
    let mut row = String::from("│");
    for content in cells {
        row.push(' ');
        row.push_str(content);
        row.push(' ');
        row.push('│');
    }
    println!("{}", row);
}

/// Print a horizontal separator line (Unicode box drawing).
/// Widths are content widths (excluding the 1-space left/right padding).
fn print_table_separator(widths: &[usize], left: &str, mid: &str, right: &str) {
    let mut sep = left.to_string();
    for (i, width) in widths.iter().enumerate() {
        if i > 0 {
            sep.push_str(mid);
        }
        // +2 for the 1-space padding on each side of the cell
        sep.push_str(&"─".repeat(width + 2));
    }
    sep.push_str(right);
    println!("{}", sep);
}

/// Output verbosity mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Quiet,   // Only errors
    Normal,  // Standard output
    Verbose, // Paths per category
}

impl OutputMode {
    pub fn from_flags(quiet: bool, verbose: u8) -> Self {
        if quiet {
            OutputMode::Quiet
        } else if verbose > 0 {
            OutputMode::Verbose
        } else {
            OutputMode::Normal
        }
    }
}

pub fn scan_summary_line(summary: &ScanResult) -> String {
    format!(
        "Found {} files. Total size: {} | Took {}s",
        format_number(summary.total_count as u64),
        summary.size_human(),
        summary.elapsed_seconds
    )
}

pub fn deletion_summary_line(result: &DeletionResult) -> String {
    format!(
        "Deleted {} files. Freed: {}",
        format_number(result.deleted_count as u64),
        result.freed_human()
    )
}

const COL_WIDTHS: [usize; 4] = [18, 9, 12, 8];

fn print_category_table(index: &CategoryIndex, selection: &SelectionSet, mode: OutputMode) {
    print_table_separator(&COL_WIDTHS, "┌", "┬", "┐");
    print_table_row(&[
        cell("Category", COL_WIDTHS[0], Theme::primary),
        cell("Items", COL_WIDTHS[1], Theme::primary),
        cell("Size", COL_WIDTHS[2], Theme::primary),
        cell("Selected", COL_WIDTHS[3], Theme::primary),
    ]);
    print_table_separator(&COL_WIDTHS, "├", "┼", "┤");

    for (category, bucket) in index.iter() {
        let selected = if selection.is_selected(category) { "yes" } else { "no" };
        print_table_row(&[
            cell(category.label(), COL_WIDTHS[0], Theme::category),
            cell(&format_number(bucket.len() as u64), COL_WIDTHS[1], Theme::value),
            cell(&bucket.size_human(), COL_WIDTHS[2], Theme::size),
            cell(selected, COL_WIDTHS[3], Theme::muted),
        ]);
    }

    print_table_separator(&COL_WIDTHS, "├", "┼", "┤");
    print_table_row(&[
        cell("Total", COL_WIDTHS[0], Theme::header),
        cell(&format_number(index.total_count() as u64), COL_WIDTHS[1], Theme::value),
        cell(
            &bytesize::to_string(index.total_size_bytes(), false),
            COL_WIDTHS[2],
            Theme::size,
        ),
        cell("", COL_WIDTHS[3], Theme::muted),
    ]);
    print_table_separator(&COL_WIDTHS, "└", "┴", "┘");

    if mode == OutputMode::Verbose {
        for (category, bucket) in index.iter().filter(|(_, b)| !b.is_empty()) {
            println!();
            println!("{}", Theme::category(category.label()));
            for candidate in &bucket.candidates {
                println!(
                    "  {}  {}",
                    Theme::muted(&truncate_path_start(&candidate.path.display().to_string(), 70)),
                    Theme::size(&bytesize::to_string(candidate.size_bytes, false))
                );
            }
        }
    }
}

pub fn print_scan_report(report: &ScanReport, mode: OutputMode) {
    if mode == OutputMode::Quiet {
        return;
    }

    println!();
    println!("{}", Theme::header("Scan Results"));
    println!("{}", Theme::divider_bold(60));
    println!();

    print_category_table(&report.index, &report.selection, mode);

    println!();
    if report.summary.cancelled {
        println!("{}", Theme::warning("Scan cancelled, results are partial."));
    }
    println!("{}", scan_summary_line(&report.summary));
    if report.index.is_empty() {
        println!("{}", Theme::success("Nothing to clean."));
    } else {
        println!(
            "Run {} to remove these files.",
            Theme::command("trashcleaner clean --all")
        );
    }
    println!();
}

/// What a `--dry-run` clean would remove.
pub fn print_dry_run(index: &CategoryIndex, selection: &SelectionSet, mode: OutputMode) {
    if mode == OutputMode::Quiet {
        return;
    }

    let mut count = 0usize;
    let mut bytes = 0u64;
    for category in selection.selected() {
        let bucket = index.bucket(category);
        count += bucket.len();
        bytes += bucket.size_bytes;
        if bucket.is_empty() {
            continue;
        }
        println!(
            "{} ({} files, {})",
            Theme::category(category.label()),
            format_number(bucket.len() as u64),
            Theme::size(&bucket.size_human())
        );
        if mode == OutputMode::Verbose {
            for candidate in &bucket.candidates {
                println!("  {}", Theme::muted(&candidate.path.display().to_string()));
            }
        }
    }
    println!(
        "{} Would delete {} files. Would free: {}",
        Theme::warning("[dry run]"),
        format_number(count as u64),
        bytesize::to_string(bytes, false)
    );
}

pub fn print_deletion_result(result: &DeletionResult, mode: OutputMode) {
    // Failures are printed even in quiet mode
    for failure in &result.failures {
        eprintln!(
            "{} {} - {}",
            Theme::error("Could not delete:"),
            failure.path.display(),
            failure.reason
        );
    }

    if mode == OutputMode::Quiet {
        return;
    }

    if result.cancelled {
        println!("{}", Theme::warning("Deletion cancelled."));
    }
    println!("{}", Theme::success(&deletion_summary_line(result)));
    if !result.failures.is_empty() {
        println!(
            "{}",
            Theme::muted(&format!(
                "{} files could not be deleted.",
                format_number(result.failures.len() as u64)
            ))
        );
    }
}

#[derive(Serialize)]
struct JsonScan {
    version: String,
    timestamp: String,
    categories: Vec<JsonCategory>,
    summary: JsonSummary,
}

#[derive(Serialize)]
struct JsonCategory {
    key: &'static str,
    label: &'static str,
    selected: bool,
    items: usize,
    size_bytes: u64,
    size_human: String,
    paths: Vec<String>,
}

#[derive(Serialize)]
struct JsonSummary {
    total_items: usize,
    total_bytes: u64,
    total_human: String,
    elapsed_seconds: u64,
    cancelled: bool,
}

fn json_category(category: Category, index: &CategoryIndex, selection: &SelectionSet) -> JsonCategory {
    let bucket = index.bucket(category);
    JsonCategory {
        key: category.key(),
        label: category.label(),
        selected: selection.is_selected(category),
        items: bucket.len(),
        size_bytes: bucket.size_bytes,
        size_human: bucket.size_human(),
        paths: bucket
            .candidates
            .iter()
            .map(|c| c.path.to_string_lossy().to_string())
            .collect(),
    }
}

fn json_scan(report: &ScanReport) -> JsonScan {
    JsonScan {
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        categories: Category::ALL
            .into_iter()
            .map(|c| json_category(c, &report.index, &report.selection))
            .collect(),
        summary: JsonSummary {
            total_items: report.summary.total_count,
            total_bytes: report.summary.total_size_bytes,
            total_human: report.summary.size_human(),
            elapsed_seconds: report.summary.elapsed_seconds,
            cancelled: report.summary.cancelled,
        },
    }
}

pub fn scan_json(report: &ScanReport) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(&json_scan(report))?)
}

pub fn print_json(report: &ScanReport) -> anyhow::Result<()> {
    println!("{}", scan_json(report)?);
    Ok(())
}

#[derive(Serialize)]
struct JsonDeletion<'a> {
    timestamp: String,
    freed_human: String,
    #[serde(flatten)]
    result: &'a DeletionResult,
}

pub fn deletion_json(result: &DeletionResult) -> anyhow::Result<String> {
    let json = JsonDeletion {
        timestamp: chrono::Utc::now().to_rfc3339(),
        freed_human: result.freed_human(),
        result,
    };
    Ok(serde_json::to_string_pretty(&json)?)
}

pub fn print_deletion_json(result: &DeletionResult) -> anyhow::Result<()> {
    println!("{}", deletion_json(result)?);
    Ok(())
}
