//! bookdelta CLI
//!
//! Command-line interface for the incremental book-listing update pipeline

use clap::{Parser, Subcommand};

mod commands;

#[derive(Debug, Parser)]
#[command(name = "bookdelta")]
#[command(about = "bookdelta - snapshot diffing and incremental re-indexing", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run one crawl → diff → ingest → prune cycle
    Update(commands::update::UpdateArgs),
    /// Compare two snapshot files
    Diff(commands::diff::DiffArgs),
    /// Print the latest timestamped file in a directory
    Latest(commands::latest::LatestArgs),
    /// Delete timestamped files older than a retention window
    Prune(commands::prune::PruneArgs),
    /// Render a snapshot's records as retrieval documents
    Render(commands::render::RenderArgs),
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Update(args) => commands::update::execute(args),
        Commands::Diff(args) => commands::diff::execute(args),
        Commands::Latest(args) => commands::latest::execute(args),
        Commands::Prune(args) => commands::prune::execute(args),
        Commands::Render(args) => commands::render::execute(args),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
