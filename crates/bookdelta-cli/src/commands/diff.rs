//! Diff command
//!
//! Usage: bookdelta diff <OLD> <NEW> [--id-column id] [--json]

use bookdelta_core::diff::{compute_changes, render_change_summary, DiffOutcome};
use bookdelta_store::read_snapshot;
use clap::Args;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct DiffArgs {
    /// Previous snapshot
    pub old: PathBuf,

    /// New snapshot
    pub new: PathBuf,

    /// Unique identifier column
    #[arg(long, default_value = "id")]
    pub id_column: String,

    /// Print the change set as JSON instead of a Markdown report
    #[arg(long)]
    pub json: bool,
}

/// Execute diff command
pub fn execute(args: DiffArgs) -> Result<(), Box<dyn std::error::Error>> {
    let old = read_snapshot(&args.old, &args.id_column)?;
    let new = read_snapshot(&args.new, &args.id_column)?;
    let outcome = compute_changes(&old, &new)?;

    if args.json {
        let value = match &outcome {
            DiffOutcome::NoOp => serde_json::json!({ "outcome": "noop" }),
            DiffOutcome::Changes(set) => serde_json::json!({
                "outcome": "changes",
                "added": set.added,
                "changed": set.changed,
            }),
        };
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else {
        print!("{}", render_change_summary(&outcome, &new));
    }

    Ok(())
}
