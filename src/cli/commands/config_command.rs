//! Config command feature.
//!
//! This module owns and handles the "trashcleaner config" command behavior.

use crate::config::Config;
use crate::theme::Theme;
use std::path::PathBuf;

fn print_paths(title: &str, paths: &[PathBuf], configured: bool) {
    let note = if configured { "" } else { " (platform defaults)" };
    println!("{}{}:", title, note);
    if paths.is_empty() {
        println!("  (none)");
    }
    for path in paths {
        println!("  {}", path.display());
    }
    println!();
}

fn show_config() {
    let config = Config::load();
    let plan = config.scan_plan();

    println!("{}", Theme::header("Current Configuration"));
    println!("{}", Theme::divider_bold(60));
    println!();
    println!("Rules:");
    println!("  Sweep depth limit: {}", config.rules.depth_limit);
    println!("  Excluded keywords: {}", config.rules.exclude_keywords.join(", "));
    println!("  Cache folder names: {}", config.rules.cache_folder_names.join(", "));
    println!();

    print_paths("Scan roots", &plan.roots, !config.paths.scan_roots.is_empty());

    let browsers_configured = !config.paths.browser_caches.is_empty();
    println!(
        "Browser caches{}:",
        if browsers_configured { "" } else { " (platform defaults)" }
    );
    if plan.cache_roots.is_empty() {
        println!("  (none)");
    }
    for cache in &plan.cache_roots {
        println!(
            "  {:<10} {} [{}]",
            cache.name,
            cache.base.display(),
            cache.cache_subpath.display()
        );
    }
    println!();

    print_paths(
        "Protected paths",
        plan.classifier.protected_paths(),
        !config.rules.protected_paths.is_empty(),
    );
    if config.paths.sweep_volumes {
        print_paths("Swept volumes", &plan.volume_roots, !config.paths.volume_roots.is_empty());
    } else {
        println!("Swept volumes: (sweep disabled)");
        println!();
    }

    println!("Error log: {}", config.error_log_path().display());
    if let Ok(path) = Config::config_path() {
        let state = if path.exists() { "" } else { " (not created, using defaults)" };
        println!("Config file: {}{}", path.display(), state);
    }
}

/// `--show` is the default, so only the other two flags need checking.
pub(crate) fn handle_config(init: bool, path: bool) -> anyhow::Result<()> {
    if path {
        println!("{}", Config::config_path()?.display());
    } else if init {
        let config_path = Config::config_path()?;
        if config_path.exists() {
            println!(
                "{} Config file already exists: {}",
                Theme::warning("Skipped"),
                config_path.display()
            );
        } else {
            let written = Config::default().save()?;
            println!("{} Created {}", Theme::success("OK"), written.display());
        }
    } else {
        show_config();
    }
    Ok(())
}
