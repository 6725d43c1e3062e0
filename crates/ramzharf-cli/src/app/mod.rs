//! Application-level utilities for the Ramzharf CLI.
//!
//! This module provides:
//! - Path resolution for config, database and session files
//! - The lazily-initialized application context
//! - Session file persistence

mod context;
mod resolver;
mod session_file;

// Re-export public API
pub use context::AppContext;
pub use resolver::resolve_config_path;
pub use session_file::{
    delete_session, load_session, require_session, save_session, StoredSession,
};
