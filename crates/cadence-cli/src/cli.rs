//! Command handlers bridging parsed arguments and the core store.
//!
//! Argument structures stay in [`crate::args`]; this module converts them
//! into core parameter types (parsing dates at the validation boundary) and
//! formats results through the core display wrappers.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use cadence_core::dates::{self, DateInput};
use cadence_core::params::{FetchWindow, NewPlanItem, OverwriteWindow, Window};
use cadence_core::{
    MonthlyReport, OfflineOperationQueue, PlanItems, QueueReport, SqliteStorage, StagingStore,
    StoreExecutor, Tier, WeeklyReport,
};
use jiff::civil::{Date, Weekday};

use crate::args::{AlignArgs, ListArgs, OverwriteArgs, QueueCommands, StatusArgs, WindowArgs};

/// Parses a date-like argument, surfacing the validation message on failure.
fn parse_date(input: &str) -> Result<Date> {
    let validation = dates::validate(Some(&DateInput::Text(input.to_string())));
    match validation.date {
        Some(date) => Ok(date),
        None => bail!(
            "invalid date {input:?}: {}",
            validation.error.unwrap_or_else(|| "unknown error".to_string())
        ),
    }
}

fn parse_weekday(input: &str) -> Result<Weekday> {
    match input.to_lowercase().as_str() {
        "sunday" | "sun" => Ok(Weekday::Sunday),
        "monday" | "mon" => Ok(Weekday::Monday),
        "tuesday" | "tue" => Ok(Weekday::Tuesday),
        "wednesday" | "wed" => Ok(Weekday::Wednesday),
        "thursday" | "thu" => Ok(Weekday::Thursday),
        "friday" | "fri" => Ok(Weekday::Friday),
        "saturday" | "sat" => Ok(Weekday::Saturday),
        other => bail!("invalid weekday {other:?}"),
    }
}

fn to_window(args: &WindowArgs) -> Result<Window> {
    Ok(Window {
        subject_id: args.subject_id,
        start: parse_date(&args.start)?,
        days: args.days,
    })
}

/// Command handler over a configured store.
pub struct Cli {
    store: StagingStore,
}

impl Cli {
    pub fn new(store: StagingStore) -> Self {
        Self { store }
    }

    pub async fn status(&self, args: StatusArgs) -> Result<()> {
        let start = parse_date(&args.start)?;
        if args.monthly {
            let monthly = self.store.monthly_status(args.subject_id, start).await?;
            print!("{}", MonthlyReport(monthly));
        } else {
            let weekly = self.store.weekly_status(args.subject_id, start).await?;
            print!("{}", WeeklyReport(weekly));
        }
        Ok(())
    }

    pub async fn list(&self, args: ListArgs) -> Result<()> {
        let window = to_window(&args.window)?;
        let tier = if args.published {
            Tier::Published
        } else {
            Tier::Draft
        };
        let items = self.store.fetch_window(&FetchWindow { window, tier }).await?;
        print!("{}", PlanItems(items));
        Ok(())
    }

    pub async fn overwrite(&self, args: OverwriteArgs) -> Result<()> {
        let window = to_window(&args.window)?;
        let raw = match (args.items, args.items_file) {
            (Some(json), _) => json,
            (None, Some(path)) => std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read items from {}", path.display()))?,
            (None, None) => bail!("either --items or --items-file is required"),
        };
        let items: Vec<NewPlanItem> =
            serde_json::from_str(&raw).context("Failed to parse items JSON")?;

        let written = self
            .store
            .overwrite_window(&OverwriteWindow { window, items })
            .await?;
        println!(
            "Staged {} draft item(s) for subject {} in {}..={}",
            written.len(),
            window.subject_id,
            window.start,
            window.end(),
        );
        Ok(())
    }

    pub async fn approve(&self, args: WindowArgs) -> Result<()> {
        let window = to_window(&args)?;
        let approved = self.store.approve_window(&window).await?;
        println!("Approved {approved} draft item(s)");
        Ok(())
    }

    pub async fn publish(&self, args: WindowArgs) -> Result<()> {
        let window = to_window(&args)?;
        let published = self.store.publish_window(&window).await?;
        println!(
            "Published {published} item(s) for subject {} in {}..={}",
            window.subject_id,
            window.start,
            window.end(),
        );
        Ok(())
    }

    pub async fn discard(&self, args: WindowArgs) -> Result<()> {
        let window = to_window(&args)?;
        let discarded = self.store.discard_window(&window).await?;
        println!("Discarded {discarded} draft item(s)");
        Ok(())
    }

    pub fn align(&self, args: AlignArgs) -> Result<()> {
        let date = parse_date(&args.date)?;
        let target = parse_weekday(&args.weekday)?;
        let alignment = dates::align_to_weekday(date, target);
        if alignment.was_aligned {
            println!(
                "{date} -> {} ({})",
                alignment.aligned_date,
                dates::day_name(alignment.aligned_date),
            );
        } else {
            println!(
                "{date} already falls on {}",
                dates::day_name(alignment.aligned_date),
            );
        }
        Ok(())
    }

    pub async fn queue(&self, command: QueueCommands, queue_file: PathBuf) -> Result<()> {
        let storage =
            SqliteStorage::open(&queue_file).context("Failed to open offline queue storage")?;
        let queue = OfflineOperationQueue::new(
            Box::new(storage),
            Box::new(StoreExecutor::new(self.store.clone())),
        );

        match command {
            QueueCommands::List => {
                print!("{}", QueueReport(queue.state()));
            }
            QueueCommands::Flush => {
                let report = queue.sync().await;
                println!(
                    "Replayed {} operation(s): {} succeeded, {} retried, {} dropped",
                    report.attempted, report.succeeded, report.retried, report.dropped,
                );
                let state = queue.state();
                if !state.terminal_failures.is_empty() {
                    print!("{}", QueueReport(state));
                }
            }
            QueueCommands::Clear => {
                let dropped = queue.clear();
                println!("Dropped {dropped} pending operation(s)");
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use jiff::civil::date;

    use super::*;

    #[test]
    fn test_parse_date_accepts_boundary_formats() {
        assert_eq!(parse_date("2025-03-03").unwrap(), date(2025, 3, 3));
        assert_eq!(
            parse_date("2025-03-03T23:59:00-05:00").unwrap(),
            date(2025, 3, 4)
        );
        assert!(parse_date("not-a-date").is_err());
    }

    #[test]
    fn test_parse_weekday_names_and_abbreviations() {
        assert_eq!(parse_weekday("Monday").unwrap(), Weekday::Monday);
        assert_eq!(parse_weekday("thu").unwrap(), Weekday::Thursday);
        assert!(parse_weekday("someday").is_err());
    }
}
