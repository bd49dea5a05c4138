//! holo-shard operator CLI entrypoint.
//!
//! - `holo-shard split` - split one document element into shard documents
//! - `holo-shard combine` - restore a document from shard documents
//! - `holo-shard encrypt` - seal a file and store its key shares
//! - `holo-shard decrypt` - fetch key shares and open an envelope

#![forbid(unsafe_code)]

mod combine;
mod config;
mod decrypt;
mod encrypt;
mod split;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use config::CliConfig;

/// Threshold secret sharing for asset administration shells.
#[derive(Parser)]
#[command(name = "holo-shard")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// TOML configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Emit logs as JSON lines on stderr.
    #[arg(long, global = true, default_value_t = false)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Split the value of one element into N shard documents.
    ///
    /// Each shard document is a copy of the input with the element's value
    /// replaced by a SHARD_V1 share. Any K of them restore it.
    Split(split::SplitArgs),

    /// Restore an element from shard documents.
    Combine(combine::CombineArgs),

    /// Encrypt a file and split its key into shares kept in a blob store.
    Encrypt(encrypt::EncryptArgs),

    /// Decrypt an envelope using key shares fetched from a blob store.
    Decrypt(decrypt::DecryptArgs),
}

fn init_tracing(config: &CliConfig) {
    // Logs go to stderr so stdout carries only command results.
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    let builder = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter);
    if config.json_logs {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => CliConfig::load(path)?,
        None => CliConfig::default(),
    };
    if cli.json_logs {
        config = config.with_json_logs(true);
    }
    init_tracing(&config);

    match cli.command {
        Commands::Split(args) => split::run(&args, &config),
        Commands::Combine(args) => combine::run(&args, &config),
        Commands::Encrypt(args) => encrypt::run(&args, &config),
        Commands::Decrypt(args) => decrypt::run(&args),
    }
}
