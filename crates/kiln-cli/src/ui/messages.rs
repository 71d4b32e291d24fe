//! Status message functions for terminal output.

use owo_colors::{OwoColorize, Stream::Stderr, Style};

fn print(symbol: &str, symbol_style: Style, message: &str, message_style: Style) {
    eprintln!(
        "{} {}",
        symbol.if_supports_color(Stderr, |s| s.style(symbol_style)),
        message.if_supports_color(Stderr, |m| m.style(message_style)),
    );
}

/// Print a success message to stderr.
pub fn success(message: &str) {
    print("✓", Style::new().green().bold(), message, Style::new());
}

/// Print an info message to stderr.
pub fn info(message: &str) {
    print("ℹ", Style::new().blue().bold(), message, Style::new());
}

/// Print a warning message to stderr.
pub fn warning(message: &str) {
    print("⚠", Style::new().yellow().bold(), message, Style::new().yellow());
}

/// Print an error message to stderr.
pub fn error(message: &str) {
    print("✗", Style::new().red().bold(), message, Style::new().red());
}
