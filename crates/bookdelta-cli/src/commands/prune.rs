//! Prune command
//!
//! Usage: bookdelta prune <DIR> --days <N> [--ext csv]

use bookdelta_store::prune;
use clap::Args;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct PruneArgs {
    /// Directory to clean up
    pub dir: PathBuf,

    /// Keep files at most this many days old
    #[arg(long, value_parser = clap::value_parser!(u32))]
    pub days: u32,

    /// File extension, without the dot
    #[arg(long, default_value = "csv")]
    pub ext: String,
}

/// Execute prune command
pub fn execute(args: PruneArgs) -> Result<(), Box<dyn std::error::Error>> {
    let report = prune(&args.dir, &args.ext, i64::from(args.days))?;
    for path in &report.deleted {
        println!("✓ Deleted {}", path.display());
    }
    println!(
        "{} deleted, {} skipped, {} failed",
        report.deleted.len(),
        report.skipped,
        report.failed
    );
    Ok(())
}
