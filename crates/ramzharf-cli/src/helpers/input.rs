//! Input handling helpers for passwords and note bodies.

use std::io::{self, IsTerminal, Read};

use dialoguer::Password;

use crate::constants::{NOTE_PASSWORD_ENV, PASSWORD_ENV};

fn env_value(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn interactive(no_input: bool) -> bool {
    !no_input && io::stdin().is_terminal()
}

/// Prompt for the account password, or read it from RAMZHARF_PASSWORD.
pub fn prompt_account_password(no_input: bool) -> anyhow::Result<String> {
    if let Some(value) = env_value(PASSWORD_ENV) {
        return Ok(value);
    }
    if !interactive(no_input) {
        return Err(anyhow::anyhow!(
            "No password provided and no TTY available. Set {}.",
            PASSWORD_ENV
        ));
    }
    Password::new()
        .with_prompt("Password")
        .interact()
        .map_err(|e| anyhow::anyhow!("Failed to read password: {}", e))
}

/// Prompt for a new account password with confirmation.
///
/// Returns `(password, confirmation)`; the service checks that they match.
pub fn prompt_new_account_password(no_input: bool) -> anyhow::Result<(String, String)> {
    if let Some(value) = env_value(PASSWORD_ENV) {
        return Ok((value.clone(), value));
    }
    if !interactive(no_input) {
        return Err(anyhow::anyhow!(
            "No password provided and no TTY available. Set {}.",
            PASSWORD_ENV
        ));
    }
    let password = Password::new()
        .with_prompt("Choose a password")
        .interact()
        .map_err(|e| anyhow::anyhow!("Failed to read password: {}", e))?;
    let confirm = Password::new()
        .with_prompt("Confirm password")
        .interact()
        .map_err(|e| anyhow::anyhow!("Failed to read password: {}", e))?;
    Ok((password, confirm))
}

/// Prompt for a note password, or read it from RAMZHARF_NOTE_PASSWORD.
///
/// With `confirm`, an interactive prompt asks twice.
pub fn prompt_note_password(no_input: bool, confirm: bool) -> anyhow::Result<String> {
    if let Some(value) = env_value(NOTE_PASSWORD_ENV) {
        return Ok(value);
    }
    if !interactive(no_input) {
        return Err(anyhow::anyhow!(
            "No note password provided and no TTY available. Set {}.",
            NOTE_PASSWORD_ENV
        ));
    }
    let mut prompt = Password::new().with_prompt("Note password");
    if confirm {
        prompt = prompt.with_confirmation("Confirm note password", "Passwords do not match");
    }
    prompt
        .interact()
        .map_err(|e| anyhow::anyhow!("Failed to read note password: {}", e))
}

/// Read note text from --body or stdin.
pub fn read_note_body(body: Option<String>) -> anyhow::Result<String> {
    if let Some(value) = body {
        if value.trim().is_empty() {
            return Err(anyhow::anyhow!("--body cannot be empty"));
        }
        return Ok(value);
    }

    if io::stdin().is_terminal() {
        return Err(anyhow::anyhow!(
            "No note body provided. Use --body or pipe text on stdin."
        ));
    }

    let mut buffer = String::new();
    io::stdin()
        .read_to_string(&mut buffer)
        .map_err(|e| anyhow::anyhow!("Failed to read stdin: {}", e))?;
    let trimmed = buffer.trim_end().to_string();
    if trimmed.is_empty() {
        return Err(anyhow::anyhow!("No input provided on stdin"));
    }
    Ok(trimmed)
}
