//! `holo-shard decrypt` command implementation.
//!
//! # Usage
//!
//! ```text
//! holo-shard decrypt pump.aasx.ahs --store shares/ --handle <h1> --handle <h2>
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::Args;
use holo_shard_store::{BlobHandle, DirBlobStore, fetch_shares};

use crate::encrypt::{ENVELOPE_EXTENSION, append_extension};

/// Arguments for the `holo-shard decrypt` command.
#[derive(Args, Debug)]
pub struct DecryptArgs {
    /// Envelope file produced by `encrypt`.
    pub envelope: PathBuf,

    /// Directory blob store holding the shares.
    #[arg(long)]
    pub store: PathBuf,

    /// Share handle; repeat for each share.
    #[arg(long = "handle", required = true, num_args = 1..)]
    pub handles: Vec<String>,

    /// Output path (default: the envelope path without `.ahs`).
    #[arg(short = 'o', long)]
    pub output: Option<PathBuf>,
}

fn default_output(envelope: &Path) -> PathBuf {
    if envelope.extension().is_some_and(|ext| ext == ENVELOPE_EXTENSION) {
        envelope.with_extension("")
    } else {
        append_extension(envelope, "out")
    }
}

/// Run the decrypt command.
///
/// # Errors
///
/// Returns an error if a handle is malformed, a share is missing or corrupt,
/// the envelope cannot be read, or the shares do not open it.
pub fn run(args: &DecryptArgs) -> Result<()> {
    let handles = args
        .handles
        .iter()
        .map(|h| h.parse::<BlobHandle>())
        .collect::<Result<Vec<_>, _>>()
        .context("invalid share handle")?;

    if !args.store.is_dir() {
        bail!("share store {} does not exist", args.store.display());
    }
    let store = DirBlobStore::open(&args.store)
        .with_context(|| format!("failed to open store {}", args.store.display()))?;
    let shares = fetch_shares(&store, &handles).context("failed to fetch key shares")?;

    let encrypted = fs::read(&args.envelope)
        .with_context(|| format!("failed to read {}", args.envelope.display()))?;
    let payload = holo_shard_crypto::reconstruct_and_decrypt(&encrypted, &shares)
        .context("failed to decrypt envelope")?;

    let output = args
        .output
        .clone()
        .unwrap_or_else(|| default_output(&args.envelope));
    fs::write(&output, &payload)
        .with_context(|| format!("failed to write {}", output.display()))?;

    println!("Decrypted: {}", output.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_output_strips_envelope_extension() {
        assert_eq!(
            default_output(Path::new("dir/pump.aasx.ahs")),
            PathBuf::from("dir/pump.aasx")
        );
        assert_eq!(
            default_output(Path::new("blob.bin")),
            PathBuf::from("blob.bin.out")
        );
    }
}
