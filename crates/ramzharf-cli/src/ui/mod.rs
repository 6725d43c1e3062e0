//! UI primitives for the Ramzharf CLI.
//!
//! - **UiContext**: environment detection (TTY, color)
//! - **render**: badges and tables
//! - **progress**: spinner shown while a password-derived key is computed

pub mod progress;
pub mod render;

use std::io::IsTerminal;

/// Terminal context for UI decisions.
#[derive(Debug, Clone, Copy)]
pub struct UiContext {
    /// Whether stdout is a TTY
    pub is_tty: bool,
    /// Whether color output is enabled
    pub color: bool,
    /// Whether stderr is a TTY (spinners draw there)
    pub stderr_tty: bool,
}

impl UiContext {
    pub fn from_env() -> Self {
        let is_tty = std::io::stdout().is_terminal();
        let term_is_dumb = std::env::var("TERM").map(|v| v == "dumb").unwrap_or(false);
        let no_color_env = std::env::var("NO_COLOR").is_ok();

        Self {
            is_tty,
            color: is_tty && !no_color_env && !term_is_dumb,
            stderr_tty: std::io::stderr().is_terminal() && !term_is_dumb,
        }
    }

    pub fn allows_animation(&self) -> bool {
        self.stderr_tty
    }
}

pub use progress::with_spinner;
pub use render::{badge, notes_table, Badge};
