//! Command handlers.

pub mod account;
pub mod engine;
pub mod init;
pub mod misc;
pub mod notes;

use ramzharf_core::auth::{AuthService, ClientSession};
use ramzharf_core::RamzError;

use crate::app::{require_session, save_session, AppContext, StoredSession};
use crate::errors::CliError;

/// Run a protected call with the stored session.
///
/// A rejected access token is refreshed once and the call retried once; a
/// rotated pair is written back to the session file. A session that cannot
/// be refreshed ends with a login hint.
pub(crate) fn with_session<T, F>(
    ctx: &AppContext,
    auth: &AuthService,
    call: F,
) -> anyhow::Result<T>
where
    F: FnMut(&str) -> ramzharf_core::Result<T>,
{
    let path = ctx.session_path()?;
    let stored = require_session(&path)?;
    let mut session = ClientSession::new(stored.tokens.clone());

    let result = session.call(auth, call);

    if session.was_refreshed() {
        save_session(
            &path,
            &StoredSession::new(stored.username, session.into_tokens()),
        )?;
    }

    result.map_err(session_error)
}

/// Turn token failures into a login hint; pass everything else through.
pub(crate) fn session_error(err: RamzError) -> anyhow::Error {
    if err.is_token_error() {
        return CliError::auth_failed_with_hint(
            "Session expired or revoked",
            "Run:\n  ramzharf login <USERNAME>",
        )
        .into();
    }
    err.into()
}
