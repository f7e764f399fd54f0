//! Update command
//!
//! Usage: bookdelta update [--input FILE] [--crawl-dir DIR] [--compare-dir DIR]
//!        [--days N] [--dry-run] [--json-logs]
//!
//! Configuration errors exit non-zero before the cycle starts. Once the cycle
//! has run the command exits 0, whatever the cycle's outcome.

use bookdelta_core::errors::{ExError, ExErrorKind};
use bookdelta_core::logging_facility::{init, init_to_file, Profile};
use bookdelta_engine::{
    CommandSource, FileSource, HttpIngestionSink, IngestionSink, NoopIngestionSink,
    SnapshotSource, UpdateConfig, UpdateOrchestrator,
};
use clap::Args;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct UpdateArgs {
    /// Use an existing CSV file as the new snapshot instead of running the
    /// crawler
    #[arg(long)]
    pub input: Option<PathBuf>,

    /// Snapshot directory (overrides CRAWL_DIR)
    #[arg(long)]
    pub crawl_dir: Option<PathBuf>,

    /// Diff artifact directory (overrides COMPARE_DIR)
    #[arg(long)]
    pub compare_dir: Option<PathBuf>,

    /// Retention window in days (overrides DAYS_TO_KEEP)
    #[arg(long, value_parser = clap::value_parser!(u32))]
    pub days: Option<u32>,

    /// Do not call the ingestion service
    #[arg(long)]
    pub dry_run: bool,

    /// Emit JSON logs
    #[arg(long)]
    pub json_logs: bool,
}

/// Execute update command
pub fn execute(args: UpdateArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = UpdateConfig::from_env()?;
    if let Some(dir) = args.crawl_dir {
        config.crawl_dir = dir;
    }
    if let Some(dir) = args.compare_dir {
        config.compare_dir = dir;
    }
    if let Some(days) = args.days {
        config.retention_days = i64::from(days);
    }

    let profile = if args.json_logs {
        Profile::Production
    } else {
        Profile::Development
    };
    match &config.log_file {
        Some(path) => init_to_file(profile, path, config.log_append)?,
        None => init(profile),
    }

    config.prepare_directories()?;

    let source: Box<dyn SnapshotSource> = match (&args.input, &config.crawl_command) {
        (Some(input), _) => Box::new(FileSource::new(input, &config.id_column)),
        (None, Some(command)) => Box::new(CommandSource::new(command, &config.id_column)),
        (None, None) => {
            return Err(ExError::new(ExErrorKind::InvalidConfig)
                .with_op("update")
                .with_message("no crawler configured: set CRAWL_COMMAND or pass --input")
                .into())
        }
    };
    let sink: Box<dyn IngestionSink> = if args.dry_run {
        Box::new(NoopIngestionSink)
    } else {
        Box::new(HttpIngestionSink::from_config(&config)?)
    };

    let orchestrator = UpdateOrchestrator::new(config, source, sink);
    let report = orchestrator.run_cycle(chrono::Local::now().naive_local());

    println!("cycle:        {}", report.cycle_id);
    println!("outcome:      {:?}", report.outcome);
    println!("notification: {:?}", report.notification);
    if let Some(artifact) = &report.artifact {
        println!("artifact:     {}", artifact.display());
    }
    println!(
        "changes:      {} added, {} changed",
        report.added_count, report.changed_count
    );
    println!(
        "pruned:       {} snapshots, {} artifacts",
        report.pruned_snapshots, report.pruned_artifacts
    );
    if let Some(err) = &report.error {
        println!("error:        {}", err);
    }

    Ok(())
}
