// ============================================================================
// src/ui.rs – operator-facing status lines (stderr, optionally colored)
// ============================================================================

use colored::Colorize;

/// Status output for humans. Command output meant for scripts goes to stdout
/// directly; everything here goes to stderr.
pub struct UX;

impl UX {
    pub fn new(color: bool) -> Self {
        if !color {
            colored::control::set_override(false);
        }
        Self
    }

    pub fn info(&self, msg: &str) {
        eprintln!("{} {}", "▸".cyan(), msg);
    }

    pub fn success(&self, msg: &str) {
        eprintln!("{} {}", "✔".green().bold(), msg.green());
    }

    pub fn error(&self, msg: &str) {
        eprintln!("{} {}", "✘".red().bold(), msg.red());
    }
}
