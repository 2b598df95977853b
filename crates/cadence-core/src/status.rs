//! Approval status computation.
//!
//! [`window_status`] is the single source of truth for classifying a window
//! of plan items. The weekly and monthly entry points are thin wrappers over
//! it, so any 7-day sub-window yields the same status no matter which view
//! asks; re-deriving the classification at call sites is exactly the
//! divergence this module exists to prevent.
//!
//! The computation is pure and synchronous: it sees one consistent snapshot
//! of the item set and has no caching or call-order dependence.

use std::collections::BTreeMap;

use jiff::civil::Date;

use crate::dates;
use crate::models::{ApprovalStatus, MonthlyStatus, PlanItem, WeeklyStatus};

/// Days in a weekly window.
pub const WEEK_DAYS: i32 = 7;

/// Days in a monthly window (four weeks).
pub const MONTH_DAYS: i32 = 28;

/// Classifies a window of draft items.
///
/// Items are grouped by calendar day. A day is approved only when every item
/// on it is approved; a day with no items simply does not exist yet, which is
/// distinct from "exists but not approved". Presence drives the result: three
/// fully approved days with four absent days is `Approved`, not partial.
pub fn window_status<'a, I>(items: I) -> ApprovalStatus
where
    I: IntoIterator<Item = &'a PlanItem>,
{
    let mut day_approved: BTreeMap<Date, bool> = BTreeMap::new();
    for item in items {
        let approved = day_approved.entry(item.for_date).or_insert(true);
        *approved = *approved && item.is_approved;
    }

    if day_approved.is_empty() {
        return ApprovalStatus::Pending;
    }

    let approved_days = day_approved.values().filter(|approved| **approved).count();
    if approved_days == 0 {
        ApprovalStatus::NotApproved
    } else if approved_days == day_approved.len() {
        ApprovalStatus::Approved
    } else {
        ApprovalStatus::PartialApproved
    }
}

/// Status of the 7-day window starting at `start`.
pub fn weekly_status(items: &[PlanItem], start: Date) -> WeeklyStatus {
    week_slice(items, 1, start)
}

/// Status of the 28-day window starting at `start`, with a per-week
/// breakdown computed by the same function the weekly view uses.
pub fn monthly_status(items: &[PlanItem], start: Date) -> MonthlyStatus {
    let weeks: Vec<WeeklyStatus> = (0..MONTH_DAYS / WEEK_DAYS)
        .map(|week| {
            let week_start = dates::safe_add_days(start, i64::from(week * WEEK_DAYS));
            week_slice(items, week as u8 + 1, week_start)
        })
        .collect();

    MonthlyStatus {
        overall: roll_up(&weeks),
        weeks,
    }
}

fn week_slice(items: &[PlanItem], week: u8, start: Date) -> WeeklyStatus {
    let end = dates::safe_add_days(start, i64::from(WEEK_DAYS - 1));
    let in_week: Vec<&PlanItem> = items
        .iter()
        .filter(|item| item.for_date >= start && item.for_date <= end)
        .collect();

    WeeklyStatus {
        week,
        status: window_status(in_week.iter().copied()),
        start,
        end,
        item_count: in_week.len(),
    }
}

/// Monthly roll-up across the four sub-window statuses.
///
/// Tie-break preserved from the shipped behavior: any approval at all, even
/// alongside a fully rejected week, classifies the month as
/// `PartialApproved`. Changing this silently would alter the user-visible
/// status of existing partially-approved plans.
fn roll_up(weeks: &[WeeklyStatus]) -> ApprovalStatus {
    if weeks.iter().all(|w| w.status == ApprovalStatus::Pending) {
        return ApprovalStatus::Pending;
    }
    if weeks.iter().all(|w| w.status == ApprovalStatus::Approved) {
        return ApprovalStatus::Approved;
    }

    let any_approval = weeks.iter().any(|w| {
        matches!(
            w.status,
            ApprovalStatus::Approved | ApprovalStatus::PartialApproved
        )
    });
    if any_approval {
        ApprovalStatus::PartialApproved
    } else {
        ApprovalStatus::NotApproved
    }
}
