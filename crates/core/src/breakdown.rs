// crates/core/src/breakdown.rs
//! Traffic breakdown tables: top pages, referrers, locations and devices,
//! plus the map's location markers.
//!
//! Counting rule: a visitor (IP) contributes at most once per key value, so
//! repeated viewings never inflate a referrer or location; for the
//! device/browser/OS tables each IP is counted once overall, attributed to
//! the first value seen for it.

use std::collections::{BTreeMap, HashMap, HashSet};

use serde::Serialize;
use siteview_types::PageAnalytics;
use ts_rs::TS;

/// A breakdown row: one key value with its distinct-visitor count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export, export_to = "../../../web/src/types/generated/")]
#[serde(rename_all = "camelCase")]
pub struct LabelCount {
    pub label: String,
    pub visitors: u64,
}

/// A page row: route plus its visitor count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export, export_to = "../../../web/src/types/generated/")]
#[serde(rename_all = "camelCase")]
pub struct PageCount {
    pub slug: String,
    pub visitors: u64,
}

/// A marker on the visitor map.
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export, export_to = "../../../web/src/types/generated/")]
#[serde(rename_all = "camelCase")]
pub struct MapPoint {
    pub location: String,
    pub lat_long: Vec<f64>,
    pub visitors: u64,
}

/// All breakdown tables the dashboard cards render.
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../../../web/src/types/generated/")]
#[serde(rename_all = "camelCase")]
pub struct Breakdowns {
    pub top_pages: Vec<PageCount>,
    pub top_referrers: Vec<LabelCount>,
    pub top_countries: Vec<LabelCount>,
    pub top_regions: Vec<LabelCount>,
    pub top_cities: Vec<LabelCount>,
    pub top_devices: Vec<LabelCount>,
    pub top_browsers: Vec<LabelCount>,
    pub top_os: Vec<LabelCount>,
    pub locations: Vec<MapPoint>,
}

/// Count distinct IPs per key value, sorted by visitors descending.
///
/// Keys are collected into a BTreeMap first so equal counts order
/// alphabetically and output stays deterministic.
fn distinct_ip_counts(entries: impl Iterator<Item = (String, String)>) -> Vec<LabelCount> {
    let mut per_key: BTreeMap<String, HashSet<String>> = BTreeMap::new();
    for (key, ip) in entries {
        per_key.entry(key).or_default().insert(ip);
    }
    let mut counts: Vec<LabelCount> = per_key
        .into_iter()
        .map(|(label, ips)| LabelCount {
            label,
            visitors: ips.len() as u64,
        })
        .collect();
    counts.sort_by(|a, b| b.visitors.cmp(&a.visitors));
    counts
}

/// Count each IP once overall, attributed to the first key value seen for
/// it. Used for the device/browser/OS tables, where a visitor has one
/// device rather than one per viewing.
fn first_value_per_ip(entries: impl Iterator<Item = (String, String)>) -> Vec<LabelCount> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut counts: BTreeMap<String, u64> = BTreeMap::new();
    for (key, ip) in entries {
        if seen.insert(ip) {
            *counts.entry(key).or_insert(0) += 1;
        }
    }
    let mut counts: Vec<LabelCount> = counts
        .into_iter()
        .map(|(label, visitors)| LabelCount { label, visitors })
        .collect();
    counts.sort_by(|a, b| b.visitors.cmp(&a.visitors));
    counts
}

/// Map a stored page slug to its public route.
fn page_route(slug: &str) -> String {
    match slug {
        "home" => "/".to_string(),
        "blog" => "/blog".to_string(),
        other => format!("/blog/{other}"),
    }
}

/// Split a "City, Region, Country" location string at the given position,
/// suffixed with the country flag. Empty when the field doesn't split.
fn location_part(location_long: &str, flag: &str, index: usize) -> Option<String> {
    let part = location_long.split(", ").nth(index)?;
    Some(format!("{part} {flag}"))
}

/// Per-viewing (key, ip) pairs drawn from every page's visitors.
fn viewing_entries<'a, F>(
    pages: &'a [PageAnalytics],
    mut key: F,
) -> impl Iterator<Item = (String, String)> + 'a
where
    F: FnMut(&'a siteview_types::Viewing) -> Option<String> + 'a,
{
    pages
        .iter()
        .flat_map(|page| &page.visitors)
        .flat_map(move |visitor| {
            visitor
                .viewings
                .iter()
                .filter_map(|v| key(v).map(|k| (k, visitor.ip.clone())))
                .collect::<Vec<_>>()
        })
}

/// Build every breakdown table from the raw export.
pub fn breakdowns(pages: &[PageAnalytics]) -> Breakdowns {
    let mut top_pages: Vec<PageCount> = pages
        .iter()
        .map(|page| PageCount {
            slug: page_route(&page.slug),
            visitors: page.visitors.len() as u64,
        })
        .collect();
    top_pages.sort_by(|a, b| b.visitors.cmp(&a.visitors));

    let top_referrers = distinct_ip_counts(viewing_entries(pages, |v| {
        (!v.referrer.is_empty()).then(|| v.referrer.clone())
    }));
    let top_countries = distinct_ip_counts(viewing_entries(pages, |v| {
        location_part(&v.location_long, &v.flag, 2)
    }));
    let top_regions = distinct_ip_counts(viewing_entries(pages, |v| {
        location_part(&v.location_long, &v.flag, 1)
    }));
    let top_cities = distinct_ip_counts(viewing_entries(pages, |v| {
        location_part(&v.location_long, &v.flag, 0)
    }));

    let visitor_entries = |field: fn(&siteview_types::Visitor) -> &str| {
        pages
            .iter()
            .flat_map(|page| &page.visitors)
            .filter(move |visitor| !field(visitor).is_empty())
            .map(move |visitor| (field(visitor).to_string(), visitor.ip.clone()))
    };
    let top_devices = first_value_per_ip(visitor_entries(|v| &v.device));
    let top_browsers = first_value_per_ip(visitor_entries(|v| &v.browser));
    let top_os = first_value_per_ip(visitor_entries(|v| &v.os));

    // Map markers: distinct IPs per short location, first lat/long kept.
    let mut marker_ips: HashMap<String, HashSet<String>> = HashMap::new();
    let mut marker_coords: BTreeMap<String, Vec<f64>> = BTreeMap::new();
    for visitor in pages.iter().flat_map(|page| &page.visitors) {
        for viewing in &visitor.viewings {
            if viewing.location_short.is_empty() || viewing.lat_long.is_empty() {
                continue;
            }
            let location = format!("{} {}", viewing.location_short, viewing.flag);
            marker_coords
                .entry(location.clone())
                .or_insert_with(|| viewing.lat_long.clone());
            marker_ips
                .entry(location)
                .or_default()
                .insert(visitor.ip.clone());
        }
    }
    let locations = marker_coords
        .into_iter()
        .map(|(location, lat_long)| MapPoint {
            visitors: marker_ips[&location].len() as u64,
            location,
            lat_long,
        })
        .collect();

    Breakdowns {
        top_pages,
        top_referrers,
        top_countries,
        top_regions,
        top_cities,
        top_devices,
        top_browsers,
        top_os,
        locations,
    }
}

// ============================================================================
// Tests
// ============================================================================
