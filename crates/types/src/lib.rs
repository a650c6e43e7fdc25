// crates/types/src/lib.rs
//! Wire types shared between the aggregation core and the HTTP server.
//!
//! These mirror the document-store export consumed by the dashboard: one
//! record per page, each holding its visitors, each holding their viewings.
//! All JSON is camelCase to match the TS frontend; ts-rs generates the
//! frontend types from these definitions.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Analytics record for a single page of the site.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../../../web/src/types/generated/")]
#[serde(rename_all = "camelCase")]
pub struct PageAnalytics {
    /// Page slug as stored ("home", "blog", or a blog post slug).
    pub slug: String,
    pub visitors: Vec<Visitor>,
}

/// A distinct visitor of a page, keyed by IP within the export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../../../web/src/types/generated/")]
#[serde(rename_all = "camelCase")]
pub struct Visitor {
    pub ip: String,
    #[serde(default)]
    pub device: String,
    #[serde(default)]
    pub browser: String,
    #[serde(default)]
    pub os: String,
    /// Chronologically ordered page viewings for this visitor's session.
    pub viewings: Vec<Viewing>,
}

/// A single page viewing.
///
/// `date` stays a raw ISO-8601 string: malformed timestamps in the export
/// are skipped during flattening rather than failing the whole load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../../../web/src/types/generated/")]
#[serde(rename_all = "camelCase")]
pub struct Viewing {
    pub date: String,
    /// Seconds spent on the page during this viewing.
    #[serde(default)]
    pub time_spent: u64,
    #[serde(default)]
    pub referrer: String,
    /// "City, Region, Country" as resolved by the IP lookup service.
    #[serde(default)]
    pub location_long: String,
    /// Short "City, CC" form used for the map tooltip.
    #[serde(default)]
    pub location_short: String,
    /// Country flag emoji.
    #[serde(default)]
    pub flag: String,
    /// [latitude, longitude] for the map marker.
    #[serde(default)]
    pub lat_long: Vec<f64>,
}

/// A third-party service the site depends on, with its expiration status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../../../web/src/types/generated/")]
#[serde(rename_all = "camelCase")]
pub struct ServiceStatus {
    pub name: String,
    /// What the service provides ("Domain", "IP Lookup", ...).
    pub service: String,
    pub rate_limit: String,
    pub pricing: String,
    /// ISO date the plan/registration lapses; None when perpetual.
    pub expires_on: Option<String>,
    /// Management dashboard URL.
    pub link: String,
}
