use clap::{ArgAction, Args, Parser, Subcommand};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

mod commands;

use crate::categories::Category;
use crate::output::OutputMode;

/// Read a line from stdin. The prompt goes to stderr so `--json` output on stdout stays
/// a single document.
fn read_line_from_stdin() -> io::Result<String> {
    io::stderr().flush()?;

    let mut input = String::new();
    let stdin = io::stdin();
    let mut handle = stdin.lock();
    handle.read_line(&mut input)?;

    Ok(input)
}

/// Ask a yes/no question. Anything but `y`/`yes` is a no.
pub(crate) fn confirm(prompt: &str) -> io::Result<bool> {
    eprint!("{} [y/N] ", prompt);
    let answer = read_line_from_stdin()?;
    Ok(is_yes(&answer))
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

#[derive(Parser)]
#[command(name = "trashcleaner")]
#[command(version)]
#[command(about = "Find and delete temporary files, caches and logs")]
#[command(
    long_about = "Trashcleaner scans temp directories, browser profile caches and cache-named \
    folders on every volume, groups what it finds into categories and deletes the ones you \
    pick. Paths with sensitive names (cookies, passwords, history...) and protected system \
    locations are never touched.\n\n\
    Examples:\n  \
    trashcleaner scan                       # Scan default locations and all volumes\n  \
    trashcleaner scan --no-sweep --json     # Fixed roots only, JSON output\n  \
    trashcleaner clean --category temp      # Delete System Temp after confirming\n  \
    trashcleaner clean --all -y             # Delete everything found, no prompt\n  \
    trashcleaner config --init              # Write a config file with the defaults"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase output verbosity (-v lists every path)
    #[arg(short = 'v', long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short = 'q', long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,
}

/// Options that change what a scan looks at.
#[derive(Args, Debug, Clone, Default)]
pub struct ScanScope {
    /// Scan this directory instead of the default roots (repeatable)
    #[arg(long = "root", value_name = "PATH")]
    pub roots: Vec<PathBuf>,

    /// Skip the cache-folder sweep across mounted volumes
    #[arg(long)]
    pub no_sweep: bool,

    /// Maximum directory depth for the volume sweep
    #[arg(long, value_name = "N")]
    pub depth: Option<usize>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Find junk files and show them by category (nothing is deleted)
    #[command(visible_alias = "s")]
    Scan {
        #[command(flatten)]
        scope: ScanScope,

        /// Output results as JSON
        #[arg(long)]
        json: bool,
    },

    /// Scan, then delete the selected categories
    #[command(visible_alias = "c")]
    Clean {
        /// Delete every category
        #[arg(short = 'a', long, conflicts_with = "categories")]
        all: bool,

        /// Category to delete: temp, browser, windows, recent, other (repeatable)
        #[arg(long = "category", value_name = "NAME")]
        categories: Vec<Category>,

        /// Skip the confirmation prompt
        #[arg(short = 'y', long = "yes")]
        yes: bool,

        /// Show what would be deleted without deleting
        #[arg(long)]
        dry_run: bool,

        /// Output the deletion result as JSON
        #[arg(long)]
        json: bool,

        /// Do not scan again after deleting
        #[arg(long)]
        no_rescan: bool,

        #[command(flatten)]
        scope: ScanScope,
    },

    /// Show or create the configuration file
    Config {
        /// Print the effective configuration (default)
        #[arg(long)]
        show: bool,

        /// Write a config file with the default settings
        #[arg(long, conflicts_with_all = ["show", "path"])]
        init: bool,

        /// Print the config file location
        #[arg(long)]
        path: bool,
    },
}

impl Cli {
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    pub fn run(self) -> anyhow::Result<()> {
        let output_mode = OutputMode::from_flags(self.quiet, self.verbose);

        match self.command {
            Commands::Scan { scope, json } => {
                commands::scan_command::handle_scan(scope, json, output_mode)
            }
            Commands::Clean {
                all,
                categories,
                yes,
                dry_run,
                json,
                no_rescan,
                scope,
            } => commands::clean_command::handle_clean(
                commands::clean_command::CleanOptions {
                    all,
                    categories,
                    yes,
                    dry_run,
                    json,
                    no_rescan,
                    scope,
                },
                output_mode,
            ),
            Commands::Config { show: _, init, path } => {
                commands::config_command::handle_config(init, path)
            }
        }
    }
}
