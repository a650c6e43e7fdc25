// crates/core/src/stats.rs
//! Stat Composer: combines current/previous bucket counts into the
//! value + percent-trend pairs the dashboard's headline cards render, and
//! assembles the full per-range traffic summary.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use siteview_types::PageAnalytics;
use ts_rs::TS;

use crate::bucketize::{count_by_bucket, time_by_bucket, VisitSample, WindowKey};
use crate::events::{duration_samples, total_visitor_events, unique_visitor_events};
use crate::range::TimeRange;
use crate::window::{build_window, TimeWindow};

/// One metric of the dashboard: the current-window series for the chart plus
/// the headline value and its percent change versus the previous period.
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../../../web/src/types/generated/")]
#[serde(rename_all = "camelCase")]
pub struct MetricReport {
    pub value: u64,
    /// Percent change vs. the previous period, rounded to whole percent.
    /// `None` when the previous period has no baseline (total of zero, or
    /// the all-time range which has no previous period at all).
    pub diff: Option<i64>,
    /// Bucket label → aggregated value for the current window.
    pub series: HashMap<String, u64>,
}

/// The three headline metrics plus the chart x-axis for one range.
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../../../web/src/types/generated/")]
#[serde(rename_all = "camelCase")]
pub struct TrafficSummary {
    pub range: TimeRange,
    /// Current-window bucket labels, in chart order.
    pub labels: Vec<String>,
    pub unique_visitors: MetricReport,
    pub total_visitors: MetricReport,
    pub visit_duration: MetricReport,
}

/// Percent change of `value` versus `previous`, rounded to whole percent.
///
/// Guarded: `None` whenever `previous` is not strictly positive, so a zero
/// baseline never divides. A real drop to zero against a positive baseline
/// still computes (-100).
pub fn percent_diff(value: f64, previous: f64) -> Option<i64> {
    if previous > 0.0 {
        Some((((value - previous) / previous) * 100.0).round() as i64)
    } else {
        None
    }
}

/// Compose a count metric (unique or total visitors) over a window.
///
/// `value` is the sum of the current-window per-bucket counts; the trend
/// compares it against the previous window's sum. The previous period is
/// always the full period even when the current one is only partially
/// elapsed, so mid-period diffs skew negative.
pub fn count_report(events: &[DateTime<Utc>], window: &TimeWindow) -> MetricReport {
    let series = count_by_bucket(events, window, WindowKey::Current);
    let value: u64 = series.values().sum();
    let previous: u64 = count_by_bucket(events, window, WindowKey::Previous)
        .values()
        .sum();
    MetricReport {
        value,
        diff: percent_diff(value as f64, previous as f64),
        series,
    }
}

/// Compose the visit-duration metric over a window.
///
/// Each bucket reduces to its rounded average; the headline value is the
/// rounded mean of the non-zero bucket averages, coerced to 0 when no bucket
/// saw activity (never NaN).
pub fn duration_report(samples: &[VisitSample], window: &TimeWindow) -> MetricReport {
    let series: HashMap<String, u64> = time_by_bucket(samples, window, WindowKey::Current)
        .into_iter()
        .map(|(label, agg)| (label, agg.average()))
        .collect();
    let value = mean_of_active_buckets(&series);
    let previous_series: HashMap<String, u64> =
        time_by_bucket(samples, window, WindowKey::Previous)
            .into_iter()
            .map(|(label, agg)| (label, agg.average()))
            .collect();
    let previous = mean_of_active_buckets(&previous_series);
    MetricReport {
        value,
        diff: percent_diff(value as f64, previous as f64),
        series,
    }
}

/// Rounded mean of the non-zero per-bucket averages; 0 when every bucket is
/// empty.
fn mean_of_active_buckets(series: &HashMap<String, u64>) -> u64 {
    let active: Vec<u64> = series.values().copied().filter(|&v| v > 0).collect();
    if active.is_empty() {
        return 0;
    }
    (active.iter().sum::<u64>() as f64 / active.len() as f64).round() as u64
}

/// Build the full traffic summary for a range: flatten the export once per
/// metric, build the window, and compose all three reports.
///
/// Pure and stateless; safe to call concurrently for several ranges.
pub fn summarize(pages: &[PageAnalytics], range: TimeRange, now: DateTime<Utc>) -> TrafficSummary {
    let window = build_window(range, now);
    let unique_visitors = count_report(&unique_visitor_events(pages), &window);
    let total_visitors = count_report(&total_visitor_events(pages), &window);
    let visit_duration = duration_report(&duration_samples(pages), &window);
    tracing::debug!(
        range = %range,
        buckets = window.current.len(),
        unique = unique_visitors.value,
        total = total_visitors.value,
        "computed traffic summary"
    );
    TrafficSummary {
        range,
        labels: window.labels(),
        unique_visitors,
        total_visitors,
        visit_duration,
    }
}

// ============================================================================
// Tests
// ============================================================================
