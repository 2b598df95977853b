//! Status and queue report wrappers.

use std::fmt;

use super::datetime::LocalDateTime;
use crate::models::{MonthlyStatus, QueueState, WeeklyStatus};

/// Wrapper type for displaying a weekly approval status.
pub struct WeeklyReport(pub WeeklyStatus);

impl fmt::Display for WeeklyReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Week {} ({} to {}): {}, {} item(s)",
            self.0.week,
            self.0.start,
            self.0.end,
            self.0.status.with_icon(),
            self.0.item_count,
        )
    }
}

/// Wrapper type for displaying a monthly approval status with its per-week
/// breakdown.
pub struct MonthlyReport(pub MonthlyStatus);

impl fmt::Display for MonthlyReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Month: {}", self.0.overall.with_icon())?;
        for week in &self.0.weeks {
            write!(f, "  {}", WeeklyReport(week.clone()))?;
        }
        Ok(())
    }
}

/// Wrapper type for displaying a snapshot of the offline queue.
pub struct QueueReport(pub QueueState);

impl fmt::Display for QueueReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Queue: {}{}",
            if self.0.is_online { "online" } else { "offline" },
            if self.0.sync_in_progress {
                ", sync in progress"
            } else {
                ""
            },
        )?;
        if let Some(ref last) = self.0.last_sync_time {
            writeln!(f, "Last sync: {}", LocalDateTime(last))?;
        }

        if self.0.operations.is_empty() {
            writeln!(f, "No pending operations.")?;
        } else {
            writeln!(f, "Pending operations:")?;
            for op in &self.0.operations {
                writeln!(
                    f,
                    "  {} {} priority={} retries={}/{} enqueued={}",
                    op.id,
                    op.kind.as_str(),
                    op.priority.as_str(),
                    op.retry_count,
                    op.max_retries,
                    LocalDateTime(&op.enqueued_at),
                )?;
            }
        }

        if !self.0.terminal_failures.is_empty() {
            writeln!(f, "Dropped operations:")?;
            for failure in &self.0.terminal_failures {
                writeln!(
                    f,
                    "  {} {} after {} attempt(s): {}",
                    failure.operation_id,
                    failure.kind.as_str(),
                    failure.attempts,
                    failure.reason,
                )?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use jiff::civil::date;

    use super::*;
    use crate::models::ApprovalStatus;

    fn week(n: u8, status: ApprovalStatus) -> WeeklyStatus {
        WeeklyStatus {
            week: n,
            status,
            start: date(2025, 3, 3),
            end: date(2025, 3, 9),
            item_count: 4,
        }
    }

    #[test]
    fn test_weekly_report() {
        let output = format!("{}", WeeklyReport(week(1, ApprovalStatus::Approved)));
        assert!(output.contains("Week 1"));
        assert!(output.contains("✓ Approved"));
        assert!(output.contains("4 item(s)"));
    }

    #[test]
    fn test_monthly_report_lists_every_week() {
        let monthly = MonthlyStatus {
            overall: ApprovalStatus::PartialApproved,
            weeks: vec![
                week(1, ApprovalStatus::Approved),
                week(2, ApprovalStatus::NotApproved),
                week(3, ApprovalStatus::Pending),
                week(4, ApprovalStatus::Pending),
            ],
        };

        let output = format!("{}", MonthlyReport(monthly));
        assert!(output.contains("◐ Partially Approved"));
        assert_eq!(output.matches("Week ").count(), 4);
    }

    #[test]
    fn test_queue_report_empty() {
        let state = QueueState {
            is_online: true,
            operations: Vec::new(),
            sync_in_progress: false,
            last_sync_time: None,
            terminal_failures: Vec::new(),
        };
        let output = format!("{}", QueueReport(state));
        assert!(output.contains("online"));
        assert!(output.contains("No pending operations."));
    }
}
