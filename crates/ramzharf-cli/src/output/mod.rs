//! Output formatting helpers for the CLI.
//!
//! JSON for `--json`, plain text otherwise. Tables live in [`crate::ui`].

mod json;
mod text;

// Re-export public API
pub use json::{note_json, notes_json, opened_note_json, user_json};
pub use text::{print_opened_note, print_user};
