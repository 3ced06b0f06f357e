//! Trashcleaner library crate
//!
//! This crate provides both a CLI binary and a library API for programmatic use:
//! scan for junk files, group them by category and delete the selected groups.

pub mod categories;
pub mod classifier;
pub mod cleaner;
pub mod cli;
pub mod config;
pub mod debug_log;
pub mod error;
pub mod harvest;
pub mod locations;
pub mod output;
pub mod progress;
pub mod scan_events;
pub mod scan_job;
pub mod scanner;
pub mod sweeper;
pub mod theme;
pub mod utils;
