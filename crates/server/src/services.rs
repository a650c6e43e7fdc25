// crates/server/src/services.rs
//! Third-party service expiration status.
//!
//! Each service the site depends on has a fixed catalog entry plus an
//! optional environment variable carrying its account details as
//! `rateLimit,pricing,expiresOn,link`. Unset variables fall back to
//! placeholder values with the public dashboard link, so the card still
//! renders without credentials configured.

use chrono::NaiveDate;
use siteview_types::ServiceStatus;

/// `(env var, display name, what it provides, management link)`.
const SERVICE_CATALOG: &[(&str, &str, &str, &str)] = &[
    ("SITEVIEW_EASY_CRON", "Easy Cron", "Cron Job", "https://www.easycron.com/user"),
    ("SITEVIEW_GODADDY", "GoDaddy", "Domain", "https://dashboard.godaddy.com/venture"),
    ("SITEVIEW_IPAPI", "ipapi", "IP Lookup", "https://ipapi.co"),
    ("SITEVIEW_SANITY", "Sanity", "DB/CMS", "https://www.sanity.io/manage"),
    ("SITEVIEW_EMAILJS", "EmailJS", "Email", "https://dashboard.emailjs.com/admin"),
    ("SITEVIEW_STRIPE", "Stripe", "Payment", "https://dashboard.stripe.com/dashboard"),
    ("SITEVIEW_HCAPTCHA", "hCaptcha", "Anti-Spam", "https://dashboard.hcaptcha.com/overview"),
];

/// Build the service list using the given environment lookup, sorted by
/// expiration date ascending; undated entries sort last in catalog order.
pub fn service_statuses<F>(env: F) -> Vec<ServiceStatus>
where
    F: Fn(&str) -> Option<String>,
{
    let mut services: Vec<ServiceStatus> = SERVICE_CATALOG
        .iter()
        .map(|&(var, name, service, link)| match env(var) {
            Some(raw) => parse_entry(&raw, name, service, link),
            None => placeholder(name, service, link),
        })
        .collect();
    services.sort_by_key(|s| expiry(s).unwrap_or(NaiveDate::MAX));
    services
}

/// Build the service list from the process environment.
pub fn service_statuses_from_env() -> Vec<ServiceStatus> {
    service_statuses(|var| std::env::var(var).ok())
}

/// Parse a `rateLimit,pricing,expiresOn,link` entry. The literal string
/// "null" marks fields the account genuinely has no value for.
fn parse_entry(raw: &str, name: &str, service: &str, default_link: &str) -> ServiceStatus {
    let mut fields = raw.splitn(4, ',').map(str::trim);
    let rate_limit = fields.next().unwrap_or("-");
    let pricing = fields.next().unwrap_or("-");
    let expires_on = fields.next().unwrap_or("null");
    let link = fields.next().unwrap_or(default_link);
    ServiceStatus {
        name: name.to_string(),
        service: service.to_string(),
        rate_limit: nullable(rate_limit),
        pricing: pricing.to_string(),
        expires_on: (expires_on != "null").then(|| expires_on.to_string()),
        link: link.to_string(),
    }
}

fn placeholder(name: &str, service: &str, link: &str) -> ServiceStatus {
    ServiceStatus {
        name: name.to_string(),
        service: service.to_string(),
        rate_limit: "-".to_string(),
        pricing: "-".to_string(),
        expires_on: None,
        link: link.to_string(),
    }
}

fn nullable(field: &str) -> String {
    if field == "null" {
        "-".to_string()
    } else {
        field.to_string()
    }
}

fn expiry(service: &ServiceStatus) -> Option<NaiveDate> {
    let raw = service.expires_on.as_deref()?;
    match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        Ok(date) => Some(date),
        Err(err) => {
            tracing::warn!(
                service = %service.name,
                date = raw,
                error = %err,
                "Unparseable expiry date, sorting last"
            );
            None
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
