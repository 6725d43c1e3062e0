//! Constants used throughout the CLI.

/// Exit codes for the CLI.
///
/// These follow common Unix conventions:
/// - 0: Success
/// - 1: General error (used by anyhow for unhandled errors)
/// - 2: Misuse of shell command (reserved by shells)
/// - 3+: Application-specific errors
pub mod exit_codes {
    /// Resource not found (config, database, session, note).
    pub const NOT_FOUND: i32 = 3;

    /// Invalid user input or arguments.
    pub const INVALID_INPUT: i32 = 4;

    /// Authentication failed (wrong password, rejected token, wrong note password).
    pub const AUTH_FAILED: i32 = 5;

    /// Account is locked after too many failed logins.
    pub const LOCKED: i32 = 6;

    /// Note existed but has expired.
    pub const GONE: i32 = 7;
}

/// Environment variable holding the account password.
pub const PASSWORD_ENV: &str = "RAMZHARF_PASSWORD";

/// Environment variable holding the note password.
pub const NOTE_PASSWORD_ENV: &str = "RAMZHARF_NOTE_PASSWORD";

/// Environment variable overriding the config file location.
pub const CONFIG_ENV: &str = "RAMZHARF_CONFIG";

/// Environment variable holding the log filter.
pub const LOG_ENV: &str = "RAMZHARF_LOG";
