// crates/core/src/window.rs
//! Time-Window Builder: the ordered current/previous calendar bucket lists
//! for a requested range.
//!
//! Deterministic: identical `(range, now)` inputs produce byte-identical
//! windows, and `now` is always supplied by the caller (never read from the
//! clock here).

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};

use crate::range::TimeRange;

/// The site went live 2022-08-05; the all-time window starts at that month.
const SITE_LAUNCH: (i32, u32) = (2022, 8);

/// A single time slot of a window: a representative instant used for
/// nearest-match assignment plus the label the chart displays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bucket {
    pub instant: DateTime<Utc>,
    pub label: String,
    /// True iff this bucket lies in the already-elapsed part of the active
    /// period. Never set on previous-window or all-time buckets.
    pub is_current: bool,
}

/// The paired current/previous bucket lists for a selected range.
///
/// `current` is never empty; `previous` is empty only for all-time (there is
/// no meaningful period before the site launched).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeWindow {
    pub range: TimeRange,
    pub current: Vec<Bucket>,
    pub previous: Vec<Bucket>,
}

impl TimeWindow {
    /// Chart x-axis labels, in order.
    pub fn labels(&self) -> Vec<String> {
        self.current.iter().map(|b| b.label.clone()).collect()
    }
}

/// First instant of a calendar month, UTC.
fn month_start(year: i32, month: u32) -> DateTime<Utc> {
    NaiveDate::from_ymd_opt(year, month, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
        .and_utc()
}

/// Midnight at the start of a calendar day, UTC.
fn day_start(date: NaiveDate) -> DateTime<Utc> {
    date.and_hms_opt(0, 0, 0).unwrap().and_utc()
}

fn next_month(year: i32, month: u32) -> (i32, u32) {
    if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    }
}

fn previous_month(year: i32, month: u32) -> (i32, u32) {
    if month == 1 {
        (year - 1, 12)
    } else {
        (year, month - 1)
    }
}

/// Number of days in a calendar month (handles leap years via chrono).
pub fn days_in_month(year: i32, month: u32) -> u32 {
    let (ny, nm) = next_month(year, month);
    NaiveDate::from_ymd_opt(ny, nm, 1)
        .unwrap()
        .signed_duration_since(NaiveDate::from_ymd_opt(year, month, 1).unwrap())
        .num_days() as u32
}

fn bucket(range: TimeRange, instant: DateTime<Utc>, is_current: bool) -> Bucket {
    Bucket {
        instant,
        label: range.bucket_label(instant),
        is_current,
    }
}

/// Build the current and previous bucket lists for `range` as of `now`.
///
/// Per-range shape:
/// - all-time: every second month-start from the launch month through `now`,
///   previous empty;
/// - year: the 12 month-starts of `now`'s year / the year before;
/// - month: one bucket per day of `now`'s month / the same day positions of
///   the preceding month, clipped to its actual length;
/// - week: the 7 days from Monday of `now`'s week / the week before;
/// - day: the 24 hours of `now`'s calendar day / the day before.
///
/// `is_current` marks current-window buckets whose instant lies within
/// [window start, now] inclusive; buckets after `now` in the still-running
/// period stay unflagged so the chart never draws zeros for the future.
pub fn build_window(range: TimeRange, now: DateTime<Utc>) -> TimeWindow {
    let today = now.date_naive();
    let (current, previous) = match range {
        TimeRange::AllTime => {
            let mut months = Vec::new();
            let (mut y, mut m) = SITE_LAUNCH;
            while month_start(y, m) <= now {
                months.push(month_start(y, m));
                (y, m) = next_month(y, m);
            }
            let current = months
                .into_iter()
                .enumerate()
                .filter(|(idx, _)| idx % 2 == 0)
                .map(|(_, instant)| bucket(range, instant, false))
                .collect();
            (current, Vec::new())
        }
        TimeRange::Year => {
            let current = (1..=12)
                .map(|m| {
                    let instant = month_start(now.year(), m);
                    bucket(range, instant, instant <= now)
                })
                .collect();
            let previous = (1..=12)
                .map(|m| bucket(range, month_start(now.year() - 1, m), false))
                .collect();
            (current, previous)
        }
        TimeRange::Month => {
            let (year, month) = (today.year(), today.month());
            let current: Vec<Bucket> = (1..=days_in_month(year, month))
                .map(|d| {
                    let instant = day_start(NaiveDate::from_ymd_opt(year, month, d).unwrap());
                    bucket(range, instant, instant <= now)
                })
                .collect();
            // Same day positions one month back, clipped to that month's
            // actual length (March's 31 days pair with February's 28).
            let (py, pm) = previous_month(year, month);
            let prev_len = days_in_month(year, month).min(days_in_month(py, pm));
            let previous = (1..=prev_len)
                .map(|d| {
                    let instant = day_start(NaiveDate::from_ymd_opt(py, pm, d).unwrap());
                    bucket(range, instant, false)
                })
                .collect();
            (current, previous)
        }
        TimeRange::Week => {
            let monday = today - Duration::days(today.weekday().num_days_from_monday() as i64);
            let current = (0..7)
                .map(|d| {
                    let instant = day_start(monday + Duration::days(d));
                    bucket(range, instant, instant <= now)
                })
                .collect();
            let prev_monday = monday - Duration::days(7);
            let previous = (0..7)
                .map(|d| bucket(range, day_start(prev_monday + Duration::days(d)), false))
                .collect();
            (current, previous)
        }
        TimeRange::Day => {
            let current = (0..24)
                .map(|h| {
                    let instant = today.and_hms_opt(h, 0, 0).unwrap().and_utc();
                    bucket(range, instant, instant <= now)
                })
                .collect();
            let yesterday = today - Duration::days(1);
            let previous = (0..24)
                .map(|h| bucket(range, yesterday.and_hms_opt(h, 0, 0).unwrap().and_utc(), false))
                .collect();
            (current, previous)
        }
    };

    TimeWindow {
        range,
        current,
        previous,
    }
}

// ============================================================================
// Tests
// ============================================================================
