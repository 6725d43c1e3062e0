use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use zeroize::Zeroize;

use ramzharf_core::SqliteStore;

use crate::app::{resolve_config_path, AppContext};
use crate::cli::InitArgs;
use crate::config::{default_db_path, write_config, RamzharfConfig};
use crate::errors::CliError;
use crate::ui::{badge, Badge};

/// Length of each generated token secret in bytes.
const SECRET_LENGTH: usize = 32;

fn generate_secret() -> anyhow::Result<String> {
    let mut bytes = [0u8; SECRET_LENGTH];
    getrandom::getrandom(&mut bytes)
        .map_err(|e| anyhow::anyhow!("Failed to generate secret: {}", e))?;
    let encoded = STANDARD.encode(bytes);
    bytes.zeroize();
    Ok(encoded)
}

pub fn handle_init(ctx: &AppContext, args: &InitArgs) -> anyhow::Result<()> {
    let config_path = resolve_config_path()?;
    if config_path.exists() && !args.force {
        return Err(CliError::invalid_input(format!(
            "Config already exists at {} (use --force to overwrite)",
            config_path.display()
        ))
        .into());
    }

    let db_path = match ctx.db_override() {
        Some(path) => path,
        None => default_db_path()?,
    };
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|e| {
                anyhow::anyhow!("Failed to create directory {}: {}", parent.display(), e)
            })?;
        }
    }

    let config = RamzharfConfig::new(
        db_path.clone(),
        generate_secret()?,
        generate_secret()?,
        args.profile_sync_url.clone(),
    );
    config.token_config()?;
    write_config(&config_path, &config)?;

    SqliteStore::open(&db_path)?.close()?;

    if !ctx.quiet() {
        let ui = ctx.ui();
        println!(
            "{}",
            badge(
                &ui,
                Badge::Ok,
                &format!("Wrote config to {}", config_path.display())
            )
        );
        println!(
            "{}",
            badge(
                &ui,
                Badge::Ok,
                &format!("Database ready at {}", db_path.display())
            )
        );
    }
    Ok(())
}
