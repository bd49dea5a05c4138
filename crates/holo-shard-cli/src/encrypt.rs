//! `holo-shard encrypt` command implementation.
//!
//! The file is sealed under a fresh key in an `AHS1` envelope and the key is
//! split into shares, each stored as a blob in a directory store. The
//! handles are printed one per line; any `threshold` of them open the
//! envelope.
//!
//! # Usage
//!
//! ```text
//! holo-shard encrypt pump.aasx --threshold 3 --total 5 --store shares/
//! ```

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use holo_shard_store::{DirBlobStore, store_shares};

use crate::config::CliConfig;

/// Extension appended to envelope files.
pub const ENVELOPE_EXTENSION: &str = "ahs";

/// Arguments for the `holo-shard encrypt` command.
#[derive(Args, Debug)]
pub struct EncryptArgs {
    /// File to encrypt.
    pub file: PathBuf,

    /// Number of shares needed to decrypt.
    #[arg(short = 'k', long)]
    pub threshold: Option<usize>,

    /// Number of shares to create.
    #[arg(short = 'n', long)]
    pub total: Option<usize>,

    /// Directory blob store for the shares (default `<file>.shares`).
    #[arg(long)]
    pub store: Option<PathBuf>,

    /// Envelope output path (default `<file>.ahs`).
    #[arg(short = 'o', long)]
    pub output: Option<PathBuf>,
}

/// `path` with `.ext` appended to its full file name.
pub(crate) fn append_extension(path: &Path, ext: &str) -> PathBuf {
    let mut name = path
        .file_name()
        .map_or_else(OsString::new, ToOwned::to_owned);
    name.push(".");
    name.push(ext);
    path.with_file_name(name)
}

/// Run the encrypt command.
///
/// # Errors
///
/// Returns an error if the input cannot be read, the parameters are invalid,
/// or the envelope or shares cannot be written.
pub fn run(args: &EncryptArgs, config: &CliConfig) -> Result<()> {
    let threshold = args.threshold.unwrap_or(config.default_threshold);
    let total = args.total.unwrap_or(config.default_total);

    let payload =
        fs::read(&args.file).with_context(|| format!("failed to read {}", args.file.display()))?;

    let bundle = holo_shard_crypto::encrypt_and_split(&payload, threshold, total)
        .context("failed to encrypt payload")?;

    let output = args
        .output
        .clone()
        .unwrap_or_else(|| append_extension(&args.file, ENVELOPE_EXTENSION));
    fs::write(&output, &bundle.encrypted)
        .with_context(|| format!("failed to write {}", output.display()))?;

    let store_dir = args
        .store
        .clone()
        .unwrap_or_else(|| append_extension(&args.file, "shares"));
    let store = DirBlobStore::open(&store_dir)
        .with_context(|| format!("failed to open store {}", store_dir.display()))?;
    let handles = store_shares(&store, &bundle.shares).context("failed to store key shares")?;

    tracing::info!(
        envelope = %output.display(),
        store = %store_dir.display(),
        threshold,
        total,
        "wrote envelope and key shares"
    );
    for handle in &handles {
        println!("{handle}");
    }
    Ok(())
}
