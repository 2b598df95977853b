use std::path::PathBuf;

use clap::{Args as ClapArgs, Parser, Subcommand};

/// Main command-line interface for the Cadence staging tool
///
/// Cadence manages staged calendar plans for coaching subjects: drafts are
/// written and reworked freely, then published atomically once approved.
/// Mutations made while the backend is unreachable land in a durable offline
/// queue and replay when connectivity returns.
#[derive(Parser)]
#[command(version, about, name = "cadence")]
pub struct Args {
    /// Path to the SQLite database file. Defaults to
    /// $XDG_DATA_HOME/cadence/cadence.db
    #[arg(long, global = true)]
    pub database_file: Option<PathBuf>,

    /// Path to the offline queue database. Defaults to queue.db next to the
    /// database file
    #[arg(long, global = true)]
    pub queue_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands for the Cadence CLI
#[derive(Subcommand)]
pub enum Commands {
    /// Show the approval status of a window
    #[command(alias = "st")]
    Status(StatusArgs),
    /// List the items of a window
    #[command(aliases = ["l", "ls"])]
    List(ListArgs),
    /// Replace the draft items of a window
    #[command(alias = "o")]
    Overwrite(OverwriteArgs),
    /// Approve the draft items of a window without publishing
    #[command(alias = "a")]
    Approve(WindowArgs),
    /// Publish a window: approve the drafts and replace the published copy
    #[command(alias = "p")]
    Publish(WindowArgs),
    /// Discard the draft items of a window
    #[command(aliases = ["d", "rm"])]
    Discard(WindowArgs),
    /// Align a date forward to a target weekday
    Align(AlignArgs),
    /// Inspect and drive the offline operation queue
    #[command(alias = "q")]
    Queue {
        #[command(subcommand)]
        command: QueueCommands,
    },
}

/// A window addressed on the command line.
///
/// The start date accepts anything the validation boundary accepts: a plain
/// `YYYY-MM-DD`, a civil datetime, or an RFC 3339 instant (normalized to its
/// UTC calendar day).
#[derive(ClapArgs)]
pub struct WindowArgs {
    /// Subject the window belongs to
    pub subject_id: i64,
    /// First day of the window (inclusive)
    pub start: String,
    /// Number of days in the window
    #[arg(long, default_value_t = 7)]
    pub days: i32,
}

/// Show the approval status of a window
#[derive(ClapArgs)]
pub struct StatusArgs {
    /// Subject the window belongs to
    pub subject_id: i64,
    /// First day of the window (inclusive)
    pub start: String,
    /// Show the 28-day breakdown instead of a single week
    #[arg(long)]
    pub monthly: bool,
}

/// List the items of a window
#[derive(ClapArgs)]
pub struct ListArgs {
    #[command(flatten)]
    pub window: WindowArgs,
    /// Read the published tier instead of the draft tier
    #[arg(long)]
    pub published: bool,
}

/// Replace the draft items of a window
#[derive(ClapArgs)]
pub struct OverwriteArgs {
    #[command(flatten)]
    pub window: WindowArgs,
    /// Replacement items as a JSON array
    #[arg(long, conflicts_with = "items_file", required_unless_present = "items_file")]
    pub items: Option<String>,
    /// Read the replacement items from a JSON file
    #[arg(long)]
    pub items_file: Option<PathBuf>,
}

/// Align a date forward to a target weekday
#[derive(ClapArgs)]
pub struct AlignArgs {
    /// The date to align
    pub date: String,
    /// Target weekday (e.g. monday, thu)
    pub weekday: String,
}

/// Offline queue operations
#[derive(Subcommand)]
pub enum QueueCommands {
    /// Show the pending operations and recent terminal failures
    #[command(aliases = ["l", "ls"])]
    List,
    /// Replay every pending operation now
    Flush,
    /// Drop every pending operation
    Clear,
}
