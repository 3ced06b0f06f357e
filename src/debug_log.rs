//! Append-only error log.
//!
//! Every filesystem error caught by the scanner, sweeper or cleaner ends up here as one
//! line: `timestamp - LEVEL - message`. The log is diagnostic only and never read back.
//! Until [`init`] is called all logging calls are no-ops, which keeps library users and
//! tests free of stray files.

use anyhow::{Context, Result};
use std::fmt;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, OnceLock};

static LOG_FILE: OnceLock<Mutex<PathBuf>> = OnceLock::new();

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Error,
    Warn,
    Info,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Level::Error => "ERROR",
            Level::Warn => "WARNING",
            Level::Info => "INFO",
        };
        f.write_str(s)
    }
}

/// Route log lines to `path`. Only the first call takes effect.
pub fn init(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create log directory: {}", parent.display())
            })?;
        }
    }
    let _ = LOG_FILE.set(Mutex::new(path.to_path_buf()));
    Ok(())
}

/// Path of the active log file, if logging was initialised.
pub fn log_path() -> Option<PathBuf> {
    LOG_FILE
        .get()
        .and_then(|m| m.lock().ok().map(|p| p.clone()))
}

pub fn error(msg: &str) {
    write_line(Level::Error, msg);
}

pub fn warn(msg: &str) {
    write_line(Level::Warn, msg);
}

pub fn info(msg: &str) {
    write_line(Level::Info, msg);
}

pub fn format_line(level: Level, msg: &str) -> String {
    let now = chrono::Local::now().format("%Y-%m-%d %H:%M:%S,%3f");
    format!("{} - {} - {}\n", now, level, msg)
}

fn write_line(level: Level, msg: &str) {
    let Some(lock) = LOG_FILE.get() else {
        return;
    };
    // Holding the lock serialises writers from the scan worker and the caller thread
    let Ok(path) = lock.lock() else {
        return;
    };
    if let Ok(mut file) = OpenOptions::new().create(true).append(true).open(&*path) {
        let _ = file.write_all(format_line(level, msg).as_bytes());
    }
}
