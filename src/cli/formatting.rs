//! Formatting utilities for CLI output.
//!
//! Provides consistent, colored formatting for parameters, listener events
//! and errors.

/// ANSI color codes for terminal output
pub struct Colors;

impl Colors {
    /// Reset all formatting
    pub const RESET: &'static str = "\x1b[0m";
    /// Bold text
    pub const BOLD: &'static str = "\x1b[1m";
    /// Dim text
    pub const DIM: &'static str = "\x1b[2m";

    /// Red color
    pub const RED: &'static str = "\x1b[31m";
    /// Green color
    pub const GREEN: &'static str = "\x1b[32m";
    /// Cyan color
    pub const CYAN: &'static str = "\x1b[36m";
}

/// Formats section headers with styling
pub fn format_header(text: &str) -> String {
    format!("{}{}{}{}", Colors::BOLD, Colors::CYAN, text, Colors::RESET)
}

/// Formats error messages with styling
pub fn format_error(text: &str) -> String {
    format!("{}{}{}{}", Colors::BOLD, Colors::RED, text, Colors::RESET)
}

/// Formats a listener notification line
pub fn format_event(text: &str) -> String {
    format!("{}  ~ {}{}", Colors::DIM, text, Colors::RESET)
}

/// Formats a key and an optional value for display.
///
/// Absent values render as `<unset>`.
pub fn format_parameter(key: &str, value: Option<&str>) -> String {
    match value {
        Some(value) => format!("{}{key}{} = {value:?}", Colors::GREEN, Colors::RESET),
        None => format!("{}{key}{} = <unset>", Colors::GREEN, Colors::RESET),
    }
}
