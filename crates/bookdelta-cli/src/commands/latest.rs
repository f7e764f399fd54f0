//! Latest command
//!
//! Usage: bookdelta latest <DIR> --prefix <PREFIX> [--ext csv] [--exclude FILE]

use bookdelta_store::find_latest;
use clap::Args;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct LatestArgs {
    /// Directory to scan
    pub dir: PathBuf,

    /// File name prefix
    #[arg(long)]
    pub prefix: String,

    /// File extension, without the dot
    #[arg(long, default_value = "csv")]
    pub ext: String,

    /// File to leave out of consideration
    #[arg(long)]
    pub exclude: Option<PathBuf>,
}

/// Execute latest command
pub fn execute(args: LatestArgs) -> Result<(), Box<dyn std::error::Error>> {
    match find_latest(&args.dir, &args.prefix, &args.ext, args.exclude.as_deref()) {
        Some(path) => println!("{}", path.display()),
        None => eprintln!(
            "No valid files found in {} with prefix {}",
            args.dir.display(),
            args.prefix
        ),
    }
    Ok(())
}
