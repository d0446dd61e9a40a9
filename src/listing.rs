//! Raw provider records to display-ready listings.

use chrono::{DateTime, Duration, Utc};

use crate::format::{format_price, optimistic_float_to_int, parse_datetime, Number};
use crate::ingest::types::RawListing;

/// Listings at least this old are dropped.
pub const MAX_AGE_HOURS: i64 = 24;

#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedListing {
    pub street: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub price: String,
    pub sqft: Option<Number>,
    pub beds: Option<Number>,
    pub baths: Number,
    pub url: String,
    pub listed: DateTime<Utc>,
}

impl NormalizedListing {
    /// `"???"` when area is unknown or zero.
    pub fn sqft_label(&self) -> String {
        known(self.sqft).map_or_else(|| "???".to_string(), |n| n.to_string())
    }

    /// `"?"` when unknown or zero.
    pub fn beds_label(&self) -> String {
        known(self.beds).map_or_else(|| "?".to_string(), |n| n.to_string())
    }

    /// `"?"` when no baths were reported.
    pub fn baths_label(&self) -> String {
        known(Some(self.baths)).map_or_else(|| "?".to_string(), |n| n.to_string())
    }
}

fn known(n: Option<Number>) -> Option<Number> {
    n.filter(|n| !n.is_zero())
}

/// Keep only records listed (or updated) strictly less than 24h before `now`,
/// in input order.
pub fn normalize(raw: &[RawListing], now: DateTime<Utc>) -> Vec<NormalizedListing> {
    let max_age = Duration::hours(MAX_AGE_HOURS);
    let mut out = Vec::with_capacity(raw.len());

    for r in raw {
        let Some(listed) = listed_at(r) else {
            tracing::debug!(href = ?r.href, "listing without a usable timestamp, skipped");
            continue;
        };
        if now.signed_duration_since(listed) >= max_age {
            continue;
        }
        out.push(normalize_one(r, listed));
    }

    out
}

fn listed_at(r: &RawListing) -> Option<DateTime<Utc>> {
    r.list_date
        .as_deref()
        .and_then(parse_datetime)
        .or_else(|| r.last_update_date.as_deref().and_then(parse_datetime))
}

fn normalize_one(r: &RawListing, listed: DateTime<Utc>) -> NormalizedListing {
    let address = r
        .location
        .as_ref()
        .and_then(|l| l.address.clone())
        .unwrap_or_default();
    let desc = r.description.clone().unwrap_or_default();

    let full = desc.baths_full.unwrap_or(0.0);
    let half = desc.baths_half.unwrap_or(0.0);

    NormalizedListing {
        street: address.line.unwrap_or_default(),
        city: address.city.unwrap_or_default(),
        state: address.state_code.unwrap_or_default(),
        postal_code: address.postal_code.unwrap_or_default(),
        price: r
            .list_price
            .map(format_price)
            .unwrap_or_else(|| "$?".to_string()),
        sqft: desc.sqft.map(optimistic_float_to_int),
        beds: desc.beds.map(optimistic_float_to_int),
        baths: optimistic_float_to_int(full + 0.5 * half),
        url: r.href.clone().unwrap_or_default(),
        listed,
    }
}
