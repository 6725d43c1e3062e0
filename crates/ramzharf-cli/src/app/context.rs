//! Application context for the Ramzharf CLI.
//!
//! Bundles CLI arguments with the lazily-loaded config and the store handle,
//! and builds the core services on top of them.

use std::path::PathBuf;
use std::sync::Arc;

use once_cell::unsync::OnceCell;
use tracing::debug;

use ramzharf_core::auth::{AuthService, HttpProfileSync, ProfileSync};
use ramzharf_core::{NoteService, SqliteStore};

use crate::cli::Cli;
use crate::config::RamzharfConfig;
use crate::errors::CliError;
use crate::ui::UiContext;

use super::resolver::{
    load_config, missing_config_hint, missing_db_message, resolve_db_path, resolve_session_path,
};

pub struct AppContext<'a> {
    cli: &'a Cli,
    config: OnceCell<RamzharfConfig>,
    store: OnceCell<Arc<SqliteStore>>,
}

impl<'a> AppContext<'a> {
    pub fn new(cli: &'a Cli) -> Self {
        Self {
            cli,
            config: OnceCell::new(),
            store: OnceCell::new(),
        }
    }

    pub fn quiet(&self) -> bool {
        self.cli.quiet
    }

    /// Database path given with `--db`, if any.
    pub fn db_override(&self) -> Option<PathBuf> {
        self.cli
            .db
            .as_deref()
            .filter(|path| !path.trim().is_empty())
            .map(PathBuf::from)
    }

    pub fn ui(&self) -> UiContext {
        UiContext::from_env()
    }

    pub fn config(&self) -> anyhow::Result<&RamzharfConfig> {
        self.config.get_or_try_init(load_config)
    }

    pub fn session_path(&self) -> anyhow::Result<PathBuf> {
        resolve_session_path()
    }

    /// Open the database named by the config. It must already exist.
    pub fn store(&self) -> anyhow::Result<Arc<SqliteStore>> {
        let store = self.store.get_or_try_init(|| -> anyhow::Result<_> {
            let path = resolve_db_path(self.cli, self.config()?);
            if !path.exists() {
                return Err(
                    CliError::not_found(missing_db_message(&path), missing_config_hint()).into(),
                );
            }
            Ok(Arc::new(SqliteStore::open(&path)?))
        })?;
        Ok(Arc::clone(store))
    }

    pub fn auth_service(&self) -> anyhow::Result<AuthService> {
        let config = self.config()?;
        let mut service = AuthService::new(self.store()?, &config.token_config()?)?
            .with_lockout_policy(config.lockout_policy()?)?;

        if let Some((base_url, timeout)) = config.profile_sync_target()? {
            let sync: Arc<dyn ProfileSync> =
                Arc::new(HttpProfileSync::with_timeout(&base_url, timeout)?);
            service = service.with_profile_sync(sync);
        }
        Ok(service)
    }

    pub fn note_service(&self) -> anyhow::Result<NoteService> {
        Ok(NoteService::new(self.store()?))
    }

    /// Close the store if this context opened it.
    pub fn close(self) -> anyhow::Result<()> {
        if let Some(store) = self.store.into_inner() {
            match Arc::try_unwrap(store) {
                Ok(store) => store.close()?,
                Err(_) => debug!("Store still shared at shutdown; dropping"),
            }
        }
        Ok(())
    }
}
