//! Render command
//!
//! Usage: bookdelta render <FILE> [--id-column id] [--output FILE]

use bookdelta_core::render::render_record_texts;
use bookdelta_store::read_snapshot;
use clap::Args;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct RenderArgs {
    /// Snapshot or diff artifact to render
    pub file: PathBuf,

    /// Unique identifier column
    #[arg(long, default_value = "id")]
    pub id_column: String,

    /// Output file path (default: stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Execute render command
pub fn execute(args: RenderArgs) -> Result<(), Box<dyn std::error::Error>> {
    let snapshot = read_snapshot(&args.file, &args.id_column)?;
    let (texts, ids) = render_record_texts(&snapshot);

    let documents: Vec<String> = ids
        .iter()
        .zip(&texts)
        .map(|(id, text)| format!("## {}\n\n{}\n", id, text))
        .collect();
    let rendered = documents.join("\n");

    if let Some(output_path) = args.output {
        std::fs::write(&output_path, rendered)?;
        println!("✓ Rendered {} records to {}", ids.len(), output_path.display());
    } else {
        print!("{}", rendered);
    }

    Ok(())
}
