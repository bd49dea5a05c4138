//! `holo-shard split` command implementation.
//!
//! # Usage
//!
//! ```text
//! holo-shard split pump.json MasterKey -n 5 -k 3
//! ```
//!
//! Writes `pump_shard_1.json` .. `pump_shard_5.json` next to the input.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use serde_json::Value;

use crate::config::CliConfig;

/// Arguments for the `holo-shard split` command.
#[derive(Args, Debug)]
pub struct SplitArgs {
    /// Input asset document (JSON).
    pub file: PathBuf,

    /// `idShort` of the element whose value is split.
    pub id: String,

    /// Total number of shard documents.
    #[arg(short = 'n', long = "total")]
    pub total: Option<usize>,

    /// Number of shard documents needed to restore.
    #[arg(short = 'k', long = "threshold")]
    pub threshold: Option<usize>,
}

/// Output path for shard `index` of `input`.
fn shard_path(input: &Path, suffix: &str, index: usize) -> PathBuf {
    let stem = input
        .file_stem()
        .map_or_else(|| "document".into(), |s| s.to_string_lossy());
    input.with_file_name(format!("{stem}{suffix}{index}.json"))
}

/// Run the split command.
///
/// # Errors
///
/// Returns an error if the input cannot be read or parsed, the element is
/// missing, the parameters are invalid, or an output cannot be written.
pub fn run(args: &SplitArgs, config: &CliConfig) -> Result<()> {
    let total = args.total.unwrap_or(config.default_total);
    let threshold = args.threshold.unwrap_or(config.default_threshold);

    let content = fs::read_to_string(&args.file)
        .with_context(|| format!("failed to read {}", args.file.display()))?;
    let doc: Value = serde_json::from_str(&content)
        .with_context(|| format!("{} is not valid JSON", args.file.display()))?;

    let shards = holo_shard_doc::split_document(&doc, &args.id, total, threshold)
        .with_context(|| format!("failed to split '{}'", args.id))?;

    let mut written = Vec::with_capacity(shards.len());
    for (i, shard) in shards.iter().enumerate() {
        let path = shard_path(&args.file, &config.shard_file_suffix, i + 1);
        let json = serde_json::to_string_pretty(shard)?;
        fs::write(&path, json).with_context(|| format!("failed to write {}", path.display()))?;
        written.push(path);
    }

    println!("Split into {} shards", written.len());
    for path in &written {
        println!("  {}", path.display());
    }
    Ok(())
}
