// crates/core/src/format.rs
//! Display formatting helpers for bucket labels and duration values.

/// Format a duration in seconds the way the stat cards and chart ticks
/// render it: `"20s"`, `"2m 5s"`, `"12.5s"`.
///
/// Fractional seconds keep one decimal place; a trailing `.0` is dropped.
pub fn format_time(value: f64) -> String {
    let minutes = (value / 60.0).floor() as u64;
    let raw = format!("{:.1}", value % 60.0);
    let seconds = raw.strip_suffix(".0").unwrap_or(&raw);
    if minutes > 0 {
        format!("{minutes}m {seconds}s")
    } else {
        format!("{seconds}s")
    }
}

/// Ordinal day-of-month label: 1 → "1st", 22 → "22nd", 31 → "31st".
pub fn ordinal_day(day: u32) -> String {
    let suffix = match day {
        11..=13 => "th",
        _ => match day % 10 {
            1 => "st",
            2 => "nd",
            3 => "rd",
            _ => "th",
        },
    };
    format!("{day}{suffix}")
}

/// 12-hour clock label for an hour bucket: 0 → "12AM", 15 → "3PM".
pub fn hour_label(hour: u32) -> String {
    match hour {
        0 => "12AM".to_string(),
        1..=11 => format!("{hour}AM"),
        12 => "12PM".to_string(),
        _ => format!("{}PM", hour - 12),
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_format_time_seconds_only() {
        assert_eq!(format_time(20.0), "20s");
        assert_eq!(format_time(0.0), "0s");
        assert_eq!(format_time(10.0), "10s");
        assert_eq!(format_time(59.0), "59s");
    }

    #[test]
    fn test_format_time_only_trims_trailing_zero_decimal() {
        // A ".0" may only be dropped at the very end of the figure.
        assert_eq!(format_time(0.4), "0.4s");
        assert_eq!(format_time(40.0), "40s");
        assert_eq!(format_time(100.0), "1m 40s");
    }

    #[test]
    fn test_format_time_minutes_and_seconds() {
        assert_eq!(format_time(125.0), "2m 5s");
        assert_eq!(format_time(60.0), "1m 0s");
        assert_eq!(format_time(3599.0), "59m 59s");
    }

    #[test]
    fn test_format_time_keeps_fractional_seconds() {
        assert_eq!(format_time(12.5), "12.5s");
        assert_eq!(format_time(72.5), "1m 12.5s");
    }

    #[test]
    fn test_ordinal_day_regular_suffixes() {
        assert_eq!(ordinal_day(1), "1st");
        assert_eq!(ordinal_day(2), "2nd");
        assert_eq!(ordinal_day(3), "3rd");
        assert_eq!(ordinal_day(4), "4th");
        assert_eq!(ordinal_day(22), "22nd");
        assert_eq!(ordinal_day(31), "31st");
    }

    #[test]
    fn test_ordinal_day_teens_are_th() {
        assert_eq!(ordinal_day(11), "11th");
        assert_eq!(ordinal_day(12), "12th");
        assert_eq!(ordinal_day(13), "13th");
    }

    #[test]
    fn test_hour_label_clock_edges() {
        assert_eq!(hour_label(0), "12AM");
        assert_eq!(hour_label(1), "1AM");
        assert_eq!(hour_label(11), "11AM");
        assert_eq!(hour_label(12), "12PM");
        assert_eq!(hour_label(13), "1PM");
        assert_eq!(hour_label(23), "11PM");
    }
}
