//! Interactive REPL.
//!
//! Uses `rustyline` for readline-style editing with persistent history.
//! Ctrl-C or Ctrl-D ends the session.

use anyhow::Result;
use rustyline::config::Configurer;
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::{DefaultEditor, Editor};
use tracing::debug;

use todobot_agent::AgentLoop;
use todobot_core::utils::{get_history_path, truncate_string};

use crate::helpers;

const PROMPT: &str = ">> ";

/// Run the interactive REPL loop.
pub async fn run(mut agent: AgentLoop, show_logs: bool) -> Result<()> {
    helpers::print_banner();

    let mut editor = create_editor()?;

    loop {
        let input = match editor.readline(PROMPT) {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(e) => {
                helpers::print_error(&format!("Input error: {e}"));
                break;
            }
        };

        let Some(request) = prepare_input(&input) else {
            continue;
        };

        let _ = editor.add_history_entry(request);

        debug!(input = %truncate_string(request, 80), "processing input");
        if !show_logs {
            helpers::print_thinking();
        }

        let result = agent.process_input(request).await;
        if !show_logs {
            helpers::clear_thinking();
        }

        match result {
            Ok(reply) => helpers::print_response(&reply),
            Err(e) => helpers::print_error(&format!("Request failed: {e}")),
        }
    }

    save_history(&mut editor);
    Ok(())
}

/// The text to send for a line of input, or `None` for a blank line.
fn prepare_input(line: &str) -> Option<&str> {
    let trimmed = line.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

/// Create a rustyline editor with history.
fn create_editor() -> Result<Editor<(), DefaultHistory>> {
    let mut editor = DefaultEditor::new()?;
    editor.set_max_history_size(1000)?;

    let history_path = get_history_path();
    if history_path.exists() {
        let _ = editor.load_history(&history_path);
        debug!("loaded REPL history from {}", history_path.display());
    }

    Ok(editor)
}

/// Save history to disk.
fn save_history(editor: &mut Editor<(), DefaultHistory>) {
    let path = get_history_path();
    if let Some(parent) = path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }
    if let Err(e) = editor.save_history(&path) {
        debug!("failed to save history: {e}");
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
