//! Approval status operations for the StagingStore.
//!
//! Both entry points read the draft tier and delegate the classification to
//! [`crate::status`], so the weekly view and the monthly breakdown can never
//! disagree about a shared sub-window.

use jiff::civil::Date;

use super::StagingStore;
use crate::{
    error::Result,
    models::{MonthlyStatus, Tier, WeeklyStatus},
    params::{FetchWindow, Window},
    status::{self, MONTH_DAYS, WEEK_DAYS},
};

impl StagingStore {
    /// Approval status of the 7-day draft window starting at `start`.
    pub async fn weekly_status(&self, subject_id: i64, start: Date) -> Result<WeeklyStatus> {
        let items = self
            .fetch_window(&FetchWindow {
                window: Window {
                    subject_id,
                    start,
                    days: WEEK_DAYS,
                },
                tier: Tier::Draft,
            })
            .await?;

        Ok(status::weekly_status(&items, start))
    }

    /// Approval status of the 28-day draft window starting at `start`, with
    /// the per-week breakdown.
    pub async fn monthly_status(&self, subject_id: i64, start: Date) -> Result<MonthlyStatus> {
        let items = self
            .fetch_window(&FetchWindow {
                window: Window {
                    subject_id,
                    start,
                    days: MONTH_DAYS,
                },
                tier: Tier::Draft,
            })
            .await?;

        Ok(status::monthly_status(&items, start))
    }
}
