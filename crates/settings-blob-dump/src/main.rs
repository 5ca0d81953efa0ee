//! Inspect a compiled settings blob.
//!
//! Decodes the file, reports the first corrupted field if any, and prints a
//! summary (or JSON) of its blocks.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use settings_blob::{
    decode_blob_with, encode_blob, Block, ConfigBlob, DecodeOptions, EventFilter, EventFilterSyntax,
};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "settings-blob-dump")]
#[command(about = "Decode and inspect a compiled settings blob", long_about = None)]
struct Cli {
    /// Path to the blob
    path: PathBuf,

    /// Print the decoded blob as JSON
    #[arg(long)]
    json: bool,

    /// Skip unknown data at the end of blocks
    #[arg(long)]
    forward_compatible: bool,

    /// Do not check filter syntax
    #[arg(long)]
    no_filter_check: bool,

    /// Write a re-encoded copy of the blob to this path
    #[arg(long, value_name = "PATH")]
    reencode: Option<PathBuf>,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long)]
    verbose: bool,
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn format_data(data: &[u8]) -> String {
    let preview: String = String::from_utf8_lossy(&data[..data.len().min(60)])
        .chars()
        .map(|c| if c == '\0' { '|' } else { c })
        .collect();
    if data.len() > 60 {
        format!("\"{}...\"", preview)
    } else {
        format!("\"{}\"", preview)
    }
}

fn print_block(i: usize, block: &Block) {
    println!("[{}] {}", i, block.name);
    println!("      base settings: {} bytes {}", block.base.data.len(), format_data(&block.base.data));
    if block.base.has_error() {
        println!("      base error: {}", block.base.error_text());
    }
    if block.filter.is_unfiltered() {
        println!("      filter: (none)");
    } else {
        match EventFilter::parse(&block.filter.filter) {
            Ok(parsed) => println!("      filter: {}", parsed),
            Err(_) => println!("      filter: {} (unchecked)", block.filter.filter),
        }
    }
    if block.filter.has_error() {
        println!("      filter error: {}", block.filter.error_text());
    }
}

fn print_summary(blob: &ConfigBlob, file_size: usize) {
    println!("Version: {}", blob.version);
    println!("File size: {} bytes", file_size);
    println!("Full size: {} bytes", blob.full_size());

    let filtered = blob.blocks.iter().filter(|b| !b.filter.is_unfiltered()).count();
    let with_errors = blob
        .blocks
        .iter()
        .filter(|b| b.base.has_error() || b.filter.has_error())
        .count();

    println!("\n=== Blocks ({}) ===", blob.len());
    println!("  filtered: {}", filtered);
    println!("  with errors: {}", with_errors);
    println!();
    for (i, block) in blob.blocks.iter().enumerate() {
        print_block(i, block);
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let data = fs::read(&cli.path).with_context(|| format!("reading {}", cli.path.display()))?;
    debug!(path = %cli.path.display(), bytes = data.len(), "read blob");

    let mut options = if cli.forward_compatible {
        DecodeOptions::forward_compatible()
    } else {
        DecodeOptions::default()
    };
    if cli.no_filter_check {
        options = options.without_filter_validation();
    }

    let blob = decode_blob_with(&data, &options, &EventFilterSyntax)
        .with_context(|| format!("decoding {}", cli.path.display()))?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&blob)?);
    } else {
        print_summary(&blob, data.len());
    }

    if let Some(out) = &cli.reencode {
        let encoded = encode_blob(&blob).context("re-encoding blob")?;
        fs::write(out, &encoded).with_context(|| format!("writing {}", out.display()))?;
        info!(path = %out.display(), bytes = encoded.len(), "wrote re-encoded blob");
    }

    Ok(())
}
