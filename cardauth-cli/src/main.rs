//! cardauth - inspect and check smartcard login data

mod commands;
mod utils;

use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use cardauth_core::usersdb::Directory;
use cardauth_localdb::{KeyStore, LocalDbConfig, UsersDbFile};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::Outcome;

/// Config file read when `--config` is not given, if it exists.
const DEFAULT_CONFIG_PATH: &str = "/etc/cardauth/cardauth.toml";

/// cardauth - smartcard login keys and users database
#[derive(Parser, Debug)]
#[command(name = "cardauth", version, about)]
struct Cli {
    /// Config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Key directory (overrides the config file)
    #[arg(long, global = true)]
    key_dir: Option<PathBuf>,

    /// Users database (overrides the config file)
    #[arg(long, global = true)]
    users_db: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Check that a card is registered for a user
    Check {
        /// Card serial number
        serialno: String,
        /// Account name
        username: String,
    },

    /// Show the user a card belongs to
    Whois {
        /// Card serial number
        serialno: String,
    },

    /// Show the card a user logs in with
    Serial {
        /// Account name
        username: String,
    },

    /// Show the public key stored for a card
    Key {
        /// Card serial number
        serialno: String,

        /// Also print a hex transcript of the key
        #[arg(long)]
        hex: bool,
    },

    /// Print a fresh challenge
    Challenge,

    /// Verify a card's response to a challenge
    Verify {
        /// Card serial number
        serialno: String,

        /// Challenge that was sent to the card (hex)
        #[arg(long)]
        challenge: String,

        /// Signature returned by the card (hex)
        #[arg(long)]
        response: String,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(outcome) => outcome.into(),
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_writer(io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<Outcome> {
    let config = resolve_config(&cli)?;
    tracing::debug!(
        key_dir = %config.key_dir.display(),
        users_db = %config.users_db.display(),
        "configuration loaded"
    );

    let directory = || Directory::new(UsersDbFile::new(&config.users_db));
    let keys = || KeyStore::new(&config.key_dir);
    let mut out = io::stdout().lock();

    match &cli.command {
        Commands::Check { serialno, username } => {
            commands::check(&directory(), serialno, username, &mut out)
        }
        Commands::Whois { serialno } => commands::whois(&directory(), serialno, &mut out),
        Commands::Serial { username } => commands::serial(&directory(), username, &mut out),
        Commands::Key { serialno, hex } => {
            let capacity = hex.then_some(config.transcript_capacity);
            commands::show_key(&keys(), serialno, capacity, &mut out)
        }
        Commands::Challenge => commands::challenge(&mut out),
        Commands::Verify {
            serialno,
            challenge,
            response,
        } => commands::verify(&keys(), serialno, challenge, response, &mut out),
    }
}

/// Load the config file and apply command-line overrides.
fn resolve_config(cli: &Cli) -> Result<LocalDbConfig> {
    let mut config = load_config(cli.config.as_deref(), Path::new(DEFAULT_CONFIG_PATH))?;
    if let Some(key_dir) = &cli.key_dir {
        config.key_dir = key_dir.clone();
    }
    if let Some(users_db) = &cli.users_db {
        config.users_db = users_db.clone();
    }
    Ok(config)
}

/// An explicit config file must exist; the default one is optional.
fn load_config(explicit: Option<&Path>, default: &Path) -> Result<LocalDbConfig> {
    let path = match explicit {
        Some(path) => path,
        None if default.exists() => default,
        None => return Ok(LocalDbConfig::default()),
    };
    LocalDbConfig::load(path)
        .with_context(|| format!("Failed to load config from {}", path.display()))
}
