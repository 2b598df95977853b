//! Cadence CLI Application
//!
//! Command-line interface for the Cadence staged-plan coaching tool.

mod args;
mod cli;

use std::path::PathBuf;

use anyhow::{Context, Result};
use args::{Args, Commands};
use cadence_core::{SqliteStorage, StagingStoreBuilder};
use clap::Parser;
use cli::Cli;
use log::info;

/// The queue database lives next to the item database when one is given,
/// otherwise in the XDG data directory.
fn queue_file_path(queue_file: Option<PathBuf>, database_file: Option<&PathBuf>) -> Result<PathBuf> {
    match (queue_file, database_file) {
        (Some(path), _) => Ok(path),
        (None, Some(db)) => Ok(db.with_file_name("queue.db")),
        (None, None) => SqliteStorage::default_path().context("Failed to resolve queue path"),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let Args {
        database_file,
        queue_file,
        command,
    } = Args::parse();

    let store = StagingStoreBuilder::new()
        .with_database_path(database_file.clone())
        .build()
        .await
        .context("Failed to initialize staging store")?;

    info!("Cadence started");

    let cli = Cli::new(store);
    match command {
        Commands::Status(args) => cli.status(args).await,
        Commands::List(args) => cli.list(args).await,
        Commands::Overwrite(args) => cli.overwrite(args).await,
        Commands::Approve(args) => cli.approve(args).await,
        Commands::Publish(args) => cli.publish(args).await,
        Commands::Discard(args) => cli.discard(args).await,
        Commands::Align(args) => cli.align(args),
        Commands::Queue { command } => {
            let queue_file = queue_file_path(queue_file, database_file.as_ref())?;
            cli.queue(command, queue_file).await
        }
    }
}
