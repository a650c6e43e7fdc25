// crates/core/src/range.rs
//! Range keywords and the per-range strategy (label format + timestamp
//! normalization) shared by the window builder and the bucketed counter.

use chrono::{DateTime, Datelike, Timelike, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use ts_rs::TS;

use crate::format::{hour_label, ordinal_day};

/// The calendar window a dashboard chart covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../../../web/src/types/generated/")]
#[serde(rename_all = "kebab-case")]
pub enum TimeRange {
    /// Every month since the site launched, down-sampled for label density.
    AllTime,
    Year,
    Month,
    Week,
    Day,
}

/// Error parsing a range keyword from a query string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown time range: {0:?} (expected all-time, year, month, week or day)")]
pub struct ParseTimeRangeError(pub String);

impl std::str::FromStr for TimeRange {
    type Err = ParseTimeRangeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all-time" => Ok(Self::AllTime),
            "year" => Ok(Self::Year),
            "month" => Ok(Self::Month),
            "week" => Ok(Self::Week),
            "day" => Ok(Self::Day),
            other => Err(ParseTimeRangeError(other.to_string())),
        }
    }
}

impl TimeRange {
    /// All ranges, in the order the dashboard's selector lists them.
    pub const ALL: [TimeRange; 5] = [
        Self::AllTime,
        Self::Year,
        Self::Month,
        Self::Week,
        Self::Day,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AllTime => "all-time",
            Self::Year => "year",
            Self::Month => "month",
            Self::Week => "week",
            Self::Day => "day",
        }
    }

    /// Display label for a bucket instant under this range.
    ///
    /// all-time "Aug 2022", year "Mar", month "22nd", week "Tue", day "3PM".
    pub fn bucket_label(&self, instant: DateTime<Utc>) -> String {
        match self {
            Self::AllTime => instant.format("%b %Y").to_string(),
            Self::Year => instant.format("%b").to_string(),
            Self::Month => ordinal_day(instant.day()),
            Self::Week => instant.format("%a").to_string(),
            Self::Day => hour_label(instant.hour()),
        }
    }

    /// Normalize an event timestamp before nearest-bucket matching, so
    /// time-of-day noise in the source record cannot flip the assignment.
    ///
    /// Returns a new value; the input is never mutated.
    pub fn normalize(&self, ts: DateTime<Utc>) -> DateTime<Utc> {
        let date = ts.date_naive();
        match self {
            // Truncate to the containing clock hour.
            Self::Day => date.and_hms_opt(ts.hour(), 0, 0).unwrap().and_utc(),
            // Truncate to midnight of the calendar day.
            Self::Week | Self::Month => date.and_hms_opt(0, 0, 0).unwrap().and_utc(),
            // Truncate to the 1st of the calendar month.
            Self::Year => date
                .with_day(1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap()
                .and_utc(),
            // All-time buckets are month starts; raw timestamps match fine.
            Self::AllTime => ts,
        }
    }
}

impl std::fmt::Display for TimeRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> DateTime<Utc> {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, s)
            .unwrap()
            .and_utc()
    }

    #[test]
    fn test_from_str_round_trips_all_ranges() {
        for range in TimeRange::ALL {
            assert_eq!(range.as_str().parse::<TimeRange>().unwrap(), range);
        }
    }

    #[test]
    fn test_from_str_rejects_unknown_keyword() {
        let err = "fortnight".parse::<TimeRange>().unwrap_err();
        assert!(err.to_string().contains("fortnight"));
    }

    #[test]
    fn test_serde_uses_kebab_case() {
        assert_eq!(
            serde_json::to_string(&TimeRange::AllTime).unwrap(),
            "\"all-time\""
        );
        let parsed: TimeRange = serde_json::from_str("\"week\"").unwrap();
        assert_eq!(parsed, TimeRange::Week);
    }

    #[test]
    fn test_normalize_day_truncates_to_hour() {
        let ts = at(2024, 3, 12, 15, 42, 31);
        assert_eq!(TimeRange::Day.normalize(ts), at(2024, 3, 12, 15, 0, 0));
    }

    #[test]
    fn test_normalize_week_and_month_truncate_to_midnight() {
        let ts = at(2024, 3, 12, 15, 42, 31);
        assert_eq!(TimeRange::Week.normalize(ts), at(2024, 3, 12, 0, 0, 0));
        assert_eq!(TimeRange::Month.normalize(ts), at(2024, 3, 12, 0, 0, 0));
    }

    #[test]
    fn test_normalize_year_truncates_to_month_start() {
        let ts = at(2024, 3, 12, 15, 42, 31);
        assert_eq!(TimeRange::Year.normalize(ts), at(2024, 3, 1, 0, 0, 0));
    }

    #[test]
    fn test_normalize_all_time_is_identity() {
        let ts = at(2023, 11, 5, 9, 30, 0);
        assert_eq!(TimeRange::AllTime.normalize(ts), ts);
    }

    #[test]
    fn test_bucket_labels_per_range() {
        let ts = at(2024, 3, 22, 15, 0, 0); // a Friday
        assert_eq!(TimeRange::AllTime.bucket_label(ts), "Mar 2024");
        assert_eq!(TimeRange::Year.bucket_label(ts), "Mar");
        assert_eq!(TimeRange::Month.bucket_label(ts), "22nd");
        assert_eq!(TimeRange::Week.bucket_label(ts), "Fri");
        assert_eq!(TimeRange::Day.bucket_label(ts), "3PM");
    }
}
