use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

use ramzharf_core::VERSION;

/// Ramzharf - password-sealed secret notes
#[derive(Parser)]
#[command(name = "ramzharf")]
#[command(author, version = VERSION, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the database file
    #[arg(short, long, global = true, env = "RAMZHARF_DB")]
    pub db: Option<String>,

    #[command(subcommand)]
    pub command: Commands,

    /// Quiet mode (minimal output)
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a config file with fresh token secrets and create the database
    Init(InitArgs),

    /// Create an account and start a session
    Register(CredentialsArgs),

    /// Start a session for an existing account
    Login(CredentialsArgs),

    /// Exchange the stored refresh token for a new pair
    Refresh,

    /// Revoke the stored refresh token and forget the session
    Logout,

    /// Show the account behind the current session
    Whoami(JsonArgs),

    /// Create, read, list and delete notes
    #[command(subcommand)]
    Note(NoteCommands),

    /// Encrypt text with a password without storing it
    Encrypt(EncryptArgs),

    /// Decrypt a ciphertext/salt pair with a password
    Decrypt(DecryptArgs),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_name = "SHELL")]
        shell: Shell,
    },
}

/// Arguments for the `init` command
#[derive(Args)]
pub struct InitArgs {
    /// Overwrite an existing config file
    #[arg(long)]
    pub force: bool,

    /// Base URL of the user service to notify after registration
    #[arg(long, value_name = "URL")]
    pub profile_sync_url: Option<String>,
}

/// Arguments for `register` and `login`
#[derive(Args)]
pub struct CredentialsArgs {
    /// Account name
    #[arg(value_name = "USERNAME")]
    pub username: String,

    /// Disable interactive prompts
    #[arg(long)]
    pub no_input: bool,
}

#[derive(Args)]
pub struct JsonArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum NoteCommands {
    /// Seal a note with a password and store it
    Create(NoteCreateArgs),

    /// Fetch and decrypt a note
    Show(NoteShowArgs),

    /// List your notes
    List(JsonArgs),

    /// Delete one of your notes
    Delete(NoteDeleteArgs),
}

/// Arguments for `note create`
#[derive(Args)]
pub struct NoteCreateArgs {
    /// Note body (overrides stdin)
    #[arg(long)]
    pub body: Option<String>,

    /// Expiry such as "1h", "7d" or "never"
    #[arg(long, default_value = "never")]
    pub expires_in: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Disable interactive prompts
    #[arg(long)]
    pub no_input: bool,
}

/// Arguments for `note show`
#[derive(Args)]
pub struct NoteShowArgs {
    /// Note ID (full UUID)
    #[arg(value_name = "ID")]
    pub id: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Disable interactive prompts
    #[arg(long)]
    pub no_input: bool,
}

/// Arguments for `note delete`
#[derive(Args)]
pub struct NoteDeleteArgs {
    /// Note ID (full UUID)
    #[arg(value_name = "ID")]
    pub id: String,
}

/// Arguments for `encrypt`
#[derive(Args)]
pub struct EncryptArgs {
    /// Text to encrypt (overrides stdin)
    #[arg(long)]
    pub body: Option<String>,

    /// Disable interactive prompts
    #[arg(long)]
    pub no_input: bool,
}

/// Arguments for `decrypt`
#[derive(Args)]
pub struct DecryptArgs {
    /// base64 ciphertext blob
    #[arg(long)]
    pub ciphertext: String,

    /// base64 salt
    #[arg(long)]
    pub salt: String,

    /// Disable interactive prompts
    #[arg(long)]
    pub no_input: bool,
}
