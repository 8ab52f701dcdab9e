use std::path::PathBuf;

use clap::Parser;

use crate::cmd::Commands;

/// Simple, file-backed to-do list manager.
/// Storage defaults to ~/.todo/storage.json or a path passed via --store.
#[derive(Parser)]
#[command(name = "todo", version, about = "Daily to-do list CLI")]
pub struct Cli {
    /// Path to the storage file.
    #[arg(long, global = true)]
    pub store: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}
