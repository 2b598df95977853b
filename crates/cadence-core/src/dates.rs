//! Defensive calendar-day arithmetic.
//!
//! Everything downstream of this module compares days, not timestamps: the
//! approval grouping in [`crate::status`] and the window math in
//! [`crate::store`] both key on the normalized calendar day produced here.
//! Timestamps are collapsed to their UTC calendar day exactly once, at the
//! validation boundary, so an entry written at 23:59 in one offset and one
//! written at 00:01 in another can never land on different grouping keys.

use jiff::civil::{Date, DateTime, Weekday};
use jiff::tz::TimeZone;
use jiff::{Span, Timestamp};

use crate::error::{CadenceError, Result};

/// Any date-like value accepted at the validation boundary.
#[derive(Debug, Clone, PartialEq)]
pub enum DateInput {
    /// A textual date: `YYYY-MM-DD`, a civil datetime, or an RFC 3339 instant
    Text(String),

    /// Milliseconds since the Unix epoch
    EpochMillis(i64),

    /// An already-normalized calendar day
    Day(Date),

    /// An exact instant, normalized to its UTC calendar day
    Instant(Timestamp),
}

/// Outcome of validating a date-like input. Value type; never mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct DateValidationResult {
    /// The normalized calendar day, when validation succeeded
    pub date: Option<Date>,

    /// Why validation failed, when it did
    pub error: Option<String>,
}

impl DateValidationResult {
    fn valid(date: Date) -> Self {
        Self {
            date: Some(date),
            error: None,
        }
    }

    fn invalid(error: impl Into<String>) -> Self {
        Self {
            date: None,
            error: Some(error.into()),
        }
    }

    /// Whether the input parsed to a usable calendar day.
    pub fn is_valid(&self) -> bool {
        self.date.is_some()
    }
}

/// Result of aligning a date to a target weekday.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Alignment {
    /// The date moved forward to the target weekday
    pub aligned_date: Date,

    /// False iff the input already fell on the target weekday
    pub was_aligned: bool,
}

/// Validates an arbitrary date-like input and normalizes it to day
/// granularity. Never panics; malformed input comes back as an invalid
/// result with a message.
pub fn validate(input: Option<&DateInput>) -> DateValidationResult {
    let Some(input) = input else {
        return DateValidationResult::invalid("no date input provided");
    };

    match input {
        DateInput::Text(text) => {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                return DateValidationResult::invalid("empty date string provided");
            }
            match parse_text(trimmed) {
                Ok(date) => DateValidationResult::valid(date),
                Err(reason) => DateValidationResult::invalid(reason),
            }
        }
        DateInput::EpochMillis(millis) => match Timestamp::from_millisecond(*millis) {
            Ok(ts) => DateValidationResult::valid(normalize_to_calendar_day(&ts)),
            Err(e) => {
                DateValidationResult::invalid(format!("invalid epoch milliseconds {millis}: {e}"))
            }
        },
        DateInput::Day(date) => DateValidationResult::valid(*date),
        DateInput::Instant(ts) => DateValidationResult::valid(normalize_to_calendar_day(ts)),
    }
}

/// Instants are tried first so that offset-carrying strings are normalized
/// through UTC rather than read as a local civil date.
fn parse_text(text: &str) -> std::result::Result<Date, String> {
    if let Ok(ts) = text.parse::<Timestamp>() {
        return Ok(normalize_to_calendar_day(&ts));
    }
    if let Ok(dt) = text.parse::<DateTime>() {
        return Ok(dt.date());
    }
    text.parse::<Date>()
        .map_err(|e| format!("unparseable date \"{text}\": {e}"))
}

/// Aligns a date forward to the target weekday.
///
/// The delta is the smallest non-negative number of days to add, so the
/// result is always within `[0, 6]` days of the input and `was_aligned` is
/// false exactly when the input already falls on the target weekday.
pub fn align_to_weekday(date: Date, target: Weekday) -> Alignment {
    let current = i64::from(date.weekday().to_sunday_zero_offset());
    let wanted = i64::from(target.to_sunday_zero_offset());
    let delta = (wanted - current).rem_euclid(7);

    if delta == 0 {
        Alignment {
            aligned_date: date,
            was_aligned: false,
        }
    } else {
        Alignment {
            aligned_date: safe_add_days(date, delta),
            was_aligned: true,
        }
    }
}

/// Generates a contiguous ascending range of `days` calendar days starting
/// at (and including) `start`.
pub fn generate_range(start: Date, days: i32) -> Result<Vec<Date>> {
    if days < 0 {
        return Err(CadenceError::invalid_input(
            "days",
            format!("{days} is negative; a range length must be non-negative"),
        ));
    }

    let mut range = Vec::with_capacity(days as usize);
    for offset in 0..i64::from(days) {
        range.push(safe_add_days(start, offset));
    }
    Ok(range)
}

/// Collapses an instant to its UTC calendar day.
///
/// This is the sole "same day" key used for approval grouping.
pub fn normalize_to_calendar_day(ts: &Timestamp) -> Date {
    ts.to_zoned(TimeZone::UTC).date()
}

/// Adds days to a date, saturating at the calendar bounds.
pub fn safe_add_days(date: Date, days: i64) -> Date {
    date.saturating_add(Span::new().days(days))
}

/// English weekday name for a date.
pub fn day_name(date: Date) -> &'static str {
    match date.weekday() {
        Weekday::Sunday => "Sunday",
        Weekday::Monday => "Monday",
        Weekday::Tuesday => "Tuesday",
        Weekday::Wednesday => "Wednesday",
        Weekday::Thursday => "Thursday",
        Weekday::Friday => "Friday",
        Weekday::Saturday => "Saturday",
    }
}

/// Whether two date-like inputs fall on the same calendar day. Invalid
/// inputs never compare equal to anything.
pub fn is_same_day(a: &DateInput, b: &DateInput) -> bool {
    match (validate(Some(a)).date, validate(Some(b)).date) {
        (Some(da), Some(db)) => da == db,
        _ => false,
    }
}

/// Picks the first valid date from an ordered list of sources, falling back
/// to `fallback` when none parses.
pub fn date_from_sources(
    primary: Option<&DateInput>,
    secondary: Option<&DateInput>,
    fallback: Date,
) -> Date {
    for source in [primary, secondary] {
        let validation = validate(source);
        if let Some(date) = validation.date {
            return date;
        }
    }
    fallback
}
