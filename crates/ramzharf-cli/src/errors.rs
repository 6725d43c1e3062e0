//! CLI error types for structured error handling.
//!
//! Typed errors map to specific exit codes. Core errors that reach `main`
//! are classified by [`exit_code_for`].

use std::fmt;

use ramzharf_core::RamzError;

use crate::constants::exit_codes;

/// CLI-specific errors with associated exit codes.
#[derive(Debug)]
pub enum CliError {
    /// Resource not found (config, database, session)
    NotFound { message: String, hint: String },

    /// Authentication failed or no usable session
    AuthFailed {
        message: String,
        hint: Option<String>,
    },

    /// Invalid user input
    InvalidInput(String),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::NotFound { message, hint } => {
                write!(f, "{}\n{}", message, hint)
            }
            CliError::AuthFailed { message, hint } => {
                if let Some(h) = hint {
                    write!(f, "{}\n{}", message, h)
                } else {
                    write!(f, "{}", message)
                }
            }
            CliError::InvalidInput(message) => write!(f, "{}", message),
        }
    }
}

impl std::error::Error for CliError {}

impl CliError {
    pub fn not_found(message: impl Into<String>, hint: impl Into<String>) -> Self {
        CliError::NotFound {
            message: message.into(),
            hint: hint.into(),
        }
    }

    pub fn auth_failed_with_hint(message: impl Into<String>, hint: impl Into<String>) -> Self {
        CliError::AuthFailed {
            message: message.into(),
            hint: Some(hint.into()),
        }
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        CliError::InvalidInput(message.into())
    }

    /// Get the exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::NotFound { .. } => exit_codes::NOT_FOUND,
            CliError::AuthFailed { .. } => exit_codes::AUTH_FAILED,
            CliError::InvalidInput(_) => exit_codes::INVALID_INPUT,
        }
    }
}

/// Exit code for a core error.
pub fn exit_code_for(err: &RamzError) -> i32 {
    match err {
        RamzError::Validation(_) | RamzError::UsernameTaken | RamzError::Config(_) => {
            exit_codes::INVALID_INPUT
        }
        RamzError::Decryption
        | RamzError::InvalidToken
        | RamzError::ExpiredToken
        | RamzError::InvalidCredentials => exit_codes::AUTH_FAILED,
        RamzError::AccountLocked => exit_codes::LOCKED,
        RamzError::NotFound(_) => exit_codes::NOT_FOUND,
        RamzError::Gone(_) => exit_codes::GONE,
        _ => 1,
    }
}

/// Exit code for any error that reached `main`.
pub fn exit_code(err: &anyhow::Error) -> i32 {
    if let Some(cli_err) = err.downcast_ref::<CliError>() {
        return cli_err.exit_code();
    }
    err.downcast_ref::<RamzError>().map(exit_code_for).unwrap_or(1)
}
