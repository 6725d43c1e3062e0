//! Input and parsing helper functions for the CLI.
//!
//! This module provides utilities for:
//! - Password prompting and note body reading (`input`)
//! - Duration, expiry, and ID parsing (`parsing`)

mod input;
mod parsing;

// Re-export public API
pub use input::{
    prompt_account_password, prompt_new_account_password, prompt_note_password, read_note_body,
};
pub use parsing::{parse_duration, parse_expires_in, parse_note_id};
