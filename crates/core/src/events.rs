// crates/core/src/events.rs
//! Flattening of raw page-analytics records into the flat event arrays the
//! bucketed counter consumes.
//!
//! Three views of the same export:
//! - unique visitors: one event per visitor, taken from the last viewing of
//!   their session;
//! - total visitors: one event per page viewing;
//! - durations: every viewing paired with its elapsed seconds.
//!
//! Viewing dates are raw ISO-8601 strings; malformed ones are skipped
//! silently rather than failing the aggregation.

use chrono::{DateTime, Utc};
use siteview_types::PageAnalytics;

use crate::bucketize::VisitSample;

/// Parse a viewing's ISO-8601 date, `None` when malformed.
pub fn parse_viewing_date(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// One event per visitor: the timestamp of their session's last viewing.
pub fn unique_visitor_events(pages: &[PageAnalytics]) -> Vec<DateTime<Utc>> {
    pages
        .iter()
        .flat_map(|page| &page.visitors)
        .filter_map(|visitor| visitor.viewings.last())
        .filter_map(|viewing| parse_viewing_date(&viewing.date))
        .collect()
}

/// One event per page viewing, counting raw traffic volume.
pub fn total_visitor_events(pages: &[PageAnalytics]) -> Vec<DateTime<Utc>> {
    pages
        .iter()
        .flat_map(|page| &page.visitors)
        .flat_map(|visitor| &visitor.viewings)
        .filter_map(|viewing| parse_viewing_date(&viewing.date))
        .collect()
}

/// Every viewing paired with its elapsed seconds.
pub fn duration_samples(pages: &[PageAnalytics]) -> Vec<VisitSample> {
    pages
        .iter()
        .flat_map(|page| &page.visitors)
        .flat_map(|visitor| &visitor.viewings)
        .filter_map(|viewing| {
            parse_viewing_date(&viewing.date).map(|at| VisitSample {
                at,
                time_spent: viewing.time_spent,
            })
        })
        .collect()
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use siteview_types::{Viewing, Visitor};

    fn viewing(date: &str, time_spent: u64) -> Viewing {
        Viewing {
            date: date.to_string(),
            time_spent,
            referrer: String::new(),
            location_long: String::new(),
            location_short: String::new(),
            flag: String::new(),
            lat_long: Vec::new(),
        }
    }

    fn visitor(ip: &str, viewings: Vec<Viewing>) -> Visitor {
        Visitor {
            ip: ip.to_string(),
            device: String::new(),
            browser: String::new(),
            os: String::new(),
            viewings,
        }
    }

    fn sample_pages() -> Vec<PageAnalytics> {
        vec![
            PageAnalytics {
                slug: "home".into(),
                visitors: vec![
                    visitor(
                        "198.51.100.1",
                        vec![
                            viewing("2024-03-12T09:00:00Z", 10),
                            viewing("2024-03-12T09:05:00Z", 30),
                        ],
                    ),
                    visitor("198.51.100.2", vec![viewing("2024-03-13T11:00:00Z", 5)]),
                ],
            },
            PageAnalytics {
                slug: "blog".into(),
                visitors: vec![visitor("198.51.100.3", vec![])],
            },
        ]
    }

    #[test]
    fn test_unique_visitor_events_take_last_viewing() {
        let events = unique_visitor_events(&sample_pages());
        // Visitor 1's last viewing + visitor 2's only one; empty sessions skip.
        assert_eq!(events.len(), 2);
        assert_eq!(events[0], parse_viewing_date("2024-03-12T09:05:00Z").unwrap());
    }

    #[test]
    fn test_total_visitor_events_take_every_viewing() {
        let events = total_visitor_events(&sample_pages());
        assert_eq!(events.len(), 3);
    }

    #[test]
    fn test_duration_samples_carry_time_spent() {
        let samples = duration_samples(&sample_pages());
        assert_eq!(samples.len(), 3);
        assert_eq!(samples[0].time_spent, 10);
        assert_eq!(samples[1].time_spent, 30);
    }

    #[test]
    fn test_malformed_dates_skipped_silently() {
        let pages = vec![PageAnalytics {
            slug: "home".into(),
            visitors: vec![visitor(
                "198.51.100.9",
                vec![
                    viewing("not-a-date", 10),
                    viewing("2024-03-12T09:00:00Z", 20),
                ],
            )],
        }];
        assert_eq!(total_visitor_events(&pages).len(), 1);
        // The visitor's last viewing is valid, so unique still counts them.
        assert_eq!(unique_visitor_events(&pages).len(), 1);
    }

    #[test]
    fn test_offset_timestamps_normalize_to_utc() {
        let parsed = parse_viewing_date("2024-03-12T10:00:00+02:00").unwrap();
        assert_eq!(parsed, parse_viewing_date("2024-03-12T08:00:00Z").unwrap());
    }
}
