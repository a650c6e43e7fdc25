// crates/core/src/bucketize.rs
//! Bucketed Counter: maps timestamped events onto a window's bucket list,
//! producing per-label counts or duration sums.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::range::TimeRange;
use crate::window::{Bucket, TimeWindow};

/// Which side of a window the counter aggregates into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowKey {
    Current,
    Previous,
}

/// A timestamped viewing with its elapsed seconds, for duration series.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisitSample {
    pub at: DateTime<Utc>,
    pub time_spent: u64,
}

/// Running duration aggregate for one bucket, reduced to an average later.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimeAgg {
    pub seconds: u64,
    pub count: u64,
}

impl TimeAgg {
    /// Rounded average seconds, 0 when the bucket saw no activity.
    pub fn average(&self) -> u64 {
        if self.count == 0 {
            return 0;
        }
        (self.seconds as f64 / self.count as f64).round() as u64
    }
}

fn active_buckets(window: &TimeWindow, key: WindowKey) -> &[Bucket] {
    match key {
        WindowKey::Current => &window.current,
        WindowKey::Previous => &window.previous,
    }
}

/// Whether a bucket is pre-seeded with a zero entry: fully-elapsed buckets
/// stay visible as gaps even with no activity. Previous-window buckets are
/// always fully elapsed, and all-time is entirely historical.
fn is_seeded(bucket: &Bucket, range: TimeRange, key: WindowKey) -> bool {
    bucket.is_current || key == WindowKey::Previous || range == TimeRange::AllTime
}

/// Assign a raw timestamp to the closest active bucket, or `None` when the
/// event falls outside the window (never misattributed to an edge bucket).
///
/// The timestamp is normalized for the window's range first; an exact
/// midpoint tie resolves to the earlier bucket.
fn assign<'w>(window: &'w TimeWindow, key: WindowKey, ts: DateTime<Utc>) -> Option<&'w Bucket> {
    let buckets = active_buckets(window, key);
    let first = buckets.first()?;
    let ts = window.range.normalize(ts);
    if buckets.len() > 1 && (ts < first.instant || ts > buckets[buckets.len() - 1].instant) {
        return None;
    }
    let mut best = first;
    let mut best_distance = distance(ts, best.instant);
    for bucket in &buckets[1..] {
        let d = distance(ts, bucket.instant);
        if d < best_distance {
            best = bucket;
            best_distance = d;
        }
    }
    Some(best)
}

fn distance(a: DateTime<Utc>, b: DateTime<Utc>) -> i64 {
    (a - b).num_seconds().abs()
}

/// Count events per bucket label for one side of the window.
///
/// Out-of-window events contribute nothing; every in-window event increments
/// exactly one label.
pub fn count_by_bucket(
    events: &[DateTime<Utc>],
    window: &TimeWindow,
    key: WindowKey,
) -> HashMap<String, u64> {
    let mut counts: HashMap<String, u64> = active_buckets(window, key)
        .iter()
        .filter(|b| is_seeded(b, window.range, key))
        .map(|b| (b.label.clone(), 0))
        .collect();
    for &ts in events {
        if let Some(bucket) = assign(window, key, ts) {
            *counts.entry(bucket.label.clone()).or_insert(0) += 1;
        }
    }
    counts
}

/// Accumulate visit durations per bucket label for one side of the window.
pub fn time_by_bucket(
    samples: &[VisitSample],
    window: &TimeWindow,
    key: WindowKey,
) -> HashMap<String, TimeAgg> {
    let mut aggregates: HashMap<String, TimeAgg> = active_buckets(window, key)
        .iter()
        .filter(|b| is_seeded(b, window.range, key))
        .map(|b| (b.label.clone(), TimeAgg::default()))
        .collect();
    for sample in samples {
        if let Some(bucket) = assign(window, key, sample.at) {
            let agg = aggregates.entry(bucket.label.clone()).or_default();
            agg.seconds += sample.time_spent;
            agg.count += 1;
        }
    }
    aggregates
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::window::build_window;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
            .and_utc()
    }

    // Friday 2024-03-15 14:30 UTC; the week window spans Mon 11th .. Sun 17th.
    fn week_window() -> TimeWindow {
        build_window(TimeRange::Week, at(2024, 3, 15, 14, 30))
    }

    #[test]
    fn test_week_counts_land_on_their_weekday() {
        let window = week_window();
        let events = vec![
            at(2024, 3, 12, 9, 15),  // Tuesday morning
            at(2024, 3, 12, 22, 40), // Tuesday night
            at(2024, 3, 14, 6, 5),   // Thursday
        ];
        let counts = count_by_bucket(&events, &window, WindowKey::Current);
        assert_eq!(counts["Tue"], 2);
        assert_eq!(counts["Thu"], 1);
        // Elapsed but quiet days are seeded with explicit zeros.
        assert_eq!(counts["Mon"], 0);
        assert_eq!(counts["Wed"], 0);
        assert_eq!(counts["Fri"], 0);
        // Future days of the running week are absent, not zero.
        assert!(!counts.contains_key("Sat"));
        assert!(!counts.contains_key("Sun"));
    }

    #[test]
    fn test_in_range_events_assigned_exactly_once() {
        let window = week_window();
        let events: Vec<_> = (0..7)
            .map(|d| at(2024, 3, 11 + d, 12, 0))
            .collect();
        let counts = count_by_bucket(&events, &window, WindowKey::Current);
        let total: u64 = counts.values().sum();
        assert_eq!(total, 7, "each in-range event increments one bucket");
    }

    #[test]
    fn test_out_of_range_events_are_discarded() {
        let window = week_window();
        let events = vec![
            at(2024, 3, 10, 23, 59), // Sunday before the window
            at(2024, 3, 18, 0, 0),   // Monday after the window
        ];
        let counts = count_by_bucket(&events, &window, WindowKey::Current);
        assert_eq!(counts.values().sum::<u64>(), 0);
    }

    #[test]
    fn test_previous_window_fully_seeded() {
        let window = week_window();
        let counts = count_by_bucket(&[], &window, WindowKey::Previous);
        assert_eq!(counts.len(), 7);
        assert!(counts.values().all(|&v| v == 0));
    }

    #[test]
    fn test_previous_all_time_contributes_nothing() {
        let window = build_window(TimeRange::AllTime, at(2024, 3, 15, 14, 30));
        let events = vec![at(2023, 6, 10, 12, 0)];
        let counts = count_by_bucket(&events, &window, WindowKey::Previous);
        assert!(counts.is_empty());
    }

    #[test]
    fn test_all_time_buckets_always_seeded() {
        let window = build_window(TimeRange::AllTime, at(2024, 3, 15, 14, 30));
        let counts = count_by_bucket(&[], &window, WindowKey::Current);
        assert_eq!(counts.len(), window.current.len());
    }

    #[test]
    fn test_tie_resolves_to_earlier_bucket() {
        // Year range: normalized month starts are equidistant from nothing
        // naturally, so use all-time (no normalization) with an instant
        // exactly midway between two kept month starts.
        let window = build_window(TimeRange::AllTime, at(2024, 3, 15, 14, 30));
        let a = window.current[0].instant; // Aug 1 2022
        let b = window.current[1].instant; // Oct 1 2022
        let midpoint = a + (b - a) / 2;
        let counts = count_by_bucket(&[midpoint], &window, WindowKey::Current);
        assert_eq!(counts["Aug 2022"], 1);
        assert_eq!(counts["Oct 2022"], 0);
    }

    #[test]
    fn test_day_range_truncates_to_hour_before_matching() {
        let window = build_window(TimeRange::Day, at(2024, 3, 15, 14, 30));
        // 09:59 belongs to the 9AM bucket even though 10AM is nearer raw.
        let counts = count_by_bucket(&[at(2024, 3, 15, 9, 59)], &window, WindowKey::Current);
        assert_eq!(counts["9AM"], 1);
        assert_eq!(counts["10AM"], 0);
    }

    #[test]
    fn test_year_range_collapses_days_into_month() {
        let window = build_window(TimeRange::Year, at(2024, 6, 20, 10, 0));
        let events = vec![
            at(2024, 2, 1, 0, 0),
            at(2024, 2, 14, 18, 45),
            at(2024, 2, 29, 23, 59),
        ];
        let counts = count_by_bucket(&events, &window, WindowKey::Current);
        assert_eq!(counts["Feb"], 3);
    }

    #[test]
    fn test_time_by_bucket_accumulates_sum_and_count() {
        let window = week_window();
        let samples = vec![
            VisitSample { at: at(2024, 3, 12, 9, 0), time_spent: 10 },
            VisitSample { at: at(2024, 3, 12, 21, 0), time_spent: 30 },
        ];
        let aggs = time_by_bucket(&samples, &window, WindowKey::Current);
        assert_eq!(aggs["Tue"], TimeAgg { seconds: 40, count: 2 });
        assert_eq!(aggs["Tue"].average(), 20);
        assert_eq!(aggs["Mon"], TimeAgg::default());
        assert_eq!(aggs["Mon"].average(), 0);
    }

    #[test]
    fn test_time_agg_average_rounds() {
        let agg = TimeAgg { seconds: 10, count: 3 };
        assert_eq!(agg.average(), 3);
        let agg = TimeAgg { seconds: 11, count: 2 };
        assert_eq!(agg.average(), 6); // 5.5 rounds up
    }
}
