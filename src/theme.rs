//! Terminal styling for CLI output.
//!
//! Styling is applied last, after any padding, so width calculations only ever see
//! plain text. `colored` drops the escapes itself when stdout is not a terminal or
//! `NO_COLOR` is set.

use colored::Colorize;

pub struct Theme;

impl Theme {
    pub fn header(text: &str) -> String {
        text.bold().cyan().to_string()
    }

    pub fn divider_bold(width: usize) -> String {
        "=".repeat(width).dimmed().to_string()
    }

    pub fn primary(text: &str) -> String {
        text.bold().to_string()
    }

    pub fn category(text: &str) -> String {
        text.white().to_string()
    }

    pub fn value(text: &str) -> String {
        text.to_string()
    }

    pub fn size(text: &str) -> String {
        text.yellow().to_string()
    }

    pub fn muted(text: &str) -> String {
        text.dimmed().to_string()
    }

    pub fn success(text: &str) -> String {
        text.green().to_string()
    }

    pub fn warning(text: &str) -> String {
        text.yellow().bold().to_string()
    }

    pub fn error(text: &str) -> String {
        text.red().to_string()
    }

    pub fn command(text: &str) -> String {
        text.cyan().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_styles_keep_text() {
        colored::control::set_override(false);
        assert_eq!(Theme::size("1.0 MB"), "1.0 MB");
        assert_eq!(Theme::divider_bold(3), "===");
        colored::control::unset_override();
    }
}
