//! Terminal output helpers
//!
//! Colors apply only when stderr is a terminal and the run is not in
//! JSON mode; diagnostics stay on stderr so JSON events own stdout.

use std::io::Write;

use crossterm::style::Stylize;
use is_terminal::IsTerminal;

/// Writes user-facing status lines
pub struct Output {
    color: bool,
    quiet: bool,
}

impl Output {
    /// JSON mode silences human-readable lines
    pub fn new(json: bool) -> Self {
        Self {
            color: std::io::stderr().is_terminal(),
            quiet: json,
        }
    }

    pub fn plain(&self, msg: &str) {
        self.line(msg.to_string());
    }

    pub fn success(&self, msg: &str) {
        if self.color {
            self.line(msg.to_string().green().to_string());
        } else {
            self.line(msg.to_string());
        }
    }

    pub fn warn(&self, msg: &str) {
        if self.color {
            self.line(msg.to_string().yellow().to_string());
        } else {
            self.line(msg.to_string());
        }
    }

    pub fn error(&self, msg: &str) {
        // errors print even in JSON mode
        let text = if self.color {
            msg.to_string().red().to_string()
        } else {
            msg.to_string()
        };
        let _ = writeln!(std::io::stderr(), "{text}");
    }

    fn line(&self, text: String) {
        if self.quiet {
            return;
        }
        let _ = writeln!(std::io::stderr(), "{text}");
    }
}
