//! Ramzharf CLI - password-sealed secret notes with account sessions
//!
//! Wires the command line onto the core services: accounts and sessions,
//! note storage, and the standalone encryption engine.

mod app;
mod cli;
mod commands;
mod config;
mod constants;
mod errors;
mod helpers;
mod output;
mod ui;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::app::AppContext;
use crate::cli::{Cli, Commands};
use crate::commands::{account, engine, init, misc, notes};
use crate::constants::LOG_ENV;

fn main() {
    init_tracing();

    let cli = Cli::parse();
    let ctx = AppContext::new(&cli);

    let result = run(&ctx, &cli).and_then(|()| ctx.close());
    if let Err(err) = result {
        eprintln!("Error: {}", err);
        std::process::exit(errors::exit_code(&err));
    }
}

/// Log to stderr, filtered by RAMZHARF_LOG (default "warn").
fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn run(ctx: &AppContext, cli: &Cli) -> anyhow::Result<()> {
    match &cli.command {
        Commands::Init(args) => init::handle_init(ctx, args),
        Commands::Register(args) => account::handle_register(ctx, args),
        Commands::Login(args) => account::handle_login(ctx, args),
        Commands::Refresh => account::handle_refresh(ctx),
        Commands::Logout => account::handle_logout(ctx),
        Commands::Whoami(args) => account::handle_whoami(ctx, args),
        Commands::Note(command) => notes::handle_note(ctx, command),
        Commands::Encrypt(args) => engine::handle_encrypt(ctx, args),
        Commands::Decrypt(args) => engine::handle_decrypt(ctx, args),
        Commands::Completions { shell } => misc::handle_completions(*shell),
    }
}
