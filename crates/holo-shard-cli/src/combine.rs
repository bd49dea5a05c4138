//! `holo-shard combine` command implementation.
//!
//! # Usage
//!
//! ```text
//! holo-shard combine MasterKey pump_shard_1.json pump_shard_3.json -o pump.json
//! ```

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use serde_json::Value;

use crate::config::CliConfig;

/// Arguments for the `holo-shard combine` command.
#[derive(Args, Debug)]
pub struct CombineArgs {
    /// `idShort` of the element to restore.
    pub id: String,

    /// Shard documents.
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Output file for the restored document.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,
}

/// Run the combine command.
///
/// # Errors
///
/// Returns an error if a shard file cannot be read or parsed, no shard is
/// found, recovery fails, or the output cannot be written.
pub fn run(args: &CombineArgs, config: &CliConfig) -> Result<()> {
    let docs = args
        .files
        .iter()
        .map(|path| {
            let content = fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            serde_json::from_str::<Value>(&content)
                .with_context(|| format!("{} is not valid JSON", path.display()))
        })
        .collect::<Result<Vec<_>>>()?;

    let (restored, secret) = holo_shard_doc::combine_documents(&docs, &args.id)
        .with_context(|| format!("failed to restore '{}'", args.id))?;

    let output = args.output.as_ref().unwrap_or(&config.restored_output);
    fs::write(output, serde_json::to_string_pretty(&restored)?)
        .with_context(|| format!("failed to write {}", output.display()))?;

    println!("Reconstruction successful");
    println!("Recovered: {secret}");
    println!("Saved: {}", output.display());
    Ok(())
}
