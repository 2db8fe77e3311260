//! Colored stderr output for command status lines.

use std::path::Path;

use console::{Style, Term};

/// Status line writer. Converted HTML goes to stdout; everything here goes to stderr.
pub(crate) struct Output {
    term: Term,
    label: Style,
    done: Style,
    failed: Style,
}

impl Output {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self {
            term: Term::stderr(),
            label: Style::new().cyan().bold(),
            done: Style::new().green(),
            failed: Style::new().red(),
        }
    }

    /// Print `label: value` with a highlighted label.
    pub(crate) fn field(&self, label: &str, value: impl std::fmt::Display) {
        let _ = self
            .term
            .write_line(&format!("{} {value}", self.label.apply_to(format!("{label}:"))));
    }

    /// Report a written output file.
    pub(crate) fn written(&self, path: &Path, bytes: usize) {
        let line = written_line(path, bytes);
        let _ = self.term.write_line(&self.done.apply_to(line).to_string());
    }

    pub(crate) fn error(&self, err: &dyn std::error::Error) {
        let _ = self
            .term
            .write_line(&self.failed.apply_to(format!("Error: {err}")).to_string());
    }
}

fn written_line(path: &Path, bytes: usize) -> String {
    format!("Wrote {bytes} bytes to {}", path.display())
}
