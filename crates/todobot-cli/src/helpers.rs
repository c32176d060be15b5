//! Shared CLI helpers: path expansion, reply and error printing, banner.
//!
//! Replies go to stdout; everything else goes to stderr.

use std::path::PathBuf;

use colored::Colorize;

/// Prefix for every agent reply.
pub const REPLY_PREFIX: &str = "🤖: ";

/// Expand `~` at the start of a path to the user's home directory.
pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs_next::home_dir() {
            return home.join(rest);
        }
    }
    if path == "~" {
        if let Some(home) = dirs_next::home_dir() {
            return home;
        }
    }
    PathBuf::from(path)
}

/// Format an agent reply for stdout.
pub fn format_response(response: &str) -> String {
    format!("{REPLY_PREFIX}{response}")
}

/// Print an agent reply to stdout.
pub fn print_response(response: &str) {
    println!("{}", format_response(response));
}

/// Print a diagnostic to stderr.
pub fn print_error(message: &str) {
    eprintln!("{} {}", "✗".red().bold(), message.red());
}

/// Print the banner shown at REPL start.
pub fn print_banner() {
    let version = env!("CARGO_PKG_VERSION");
    eprintln!("{}  v{}", "✅ Todobot".cyan().bold(), version.dimmed());
    eprintln!(
        "{}",
        "Ask me to add, list, search or delete todos. Ctrl-D to quit.".dimmed()
    );
}

/// Print a "thinking" placeholder.
pub fn print_thinking() {
    eprint!("{}", "⠿ thinking...".dimmed());
}

/// Clear the "thinking" placeholder.
pub fn clear_thinking() {
    eprint!("\r{}\r", " ".repeat(40));
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
