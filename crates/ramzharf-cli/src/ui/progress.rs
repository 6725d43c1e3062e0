//! Spinner for the PBKDF2 derivation, which takes a noticeable moment.

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

use super::UiContext;

/// Callers pass their own trailing ellipsis in the message.
const SPINNER_TEMPLATE: &str = "{spinner:.cyan} {msg}";

pub struct Spinner {
    bar: Option<ProgressBar>,
}

impl Spinner {
    /// Start a spinner on stderr. Does nothing when stderr is not a terminal
    /// or `quiet` is set.
    pub fn start(ctx: &UiContext, quiet: bool, message: &str) -> Self {
        if quiet || !ctx.allows_animation() {
            return Self { bar: None };
        }

        let bar = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template(SPINNER_TEMPLATE) {
            bar.set_style(
                style.tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", ""]),
            );
        }
        bar.set_message(message.to_string());
        bar.enable_steady_tick(Duration::from_millis(80));
        Self { bar: Some(bar) }
    }

    pub fn finish(self) {
        if let Some(bar) = self.bar {
            bar.finish_and_clear();
        }
    }
}

/// Run `work` behind a spinner.
pub fn with_spinner<T>(
    ctx: &UiContext,
    quiet: bool,
    message: &str,
    work: impl FnOnce() -> T,
) -> T {
    let spinner = Spinner::start(ctx, quiet, message);
    let result = work();
    spinner.finish();
    result
}
