//! Subcommand implementations

pub mod diff;
pub mod latest;
pub mod prune;
pub mod render;
pub mod update;
