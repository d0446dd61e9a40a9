// src/ingest/mod.rs
pub mod providers;
pub mod types;

use crate::ingest::types::{ListingProvider, Location, RawListing};

/// Fetch one location. Failures are logged and isolated: `None` means the
/// location is skipped for this run.
pub async fn fetch_location(
    provider: &dyn ListingProvider,
    location: &Location,
) -> Option<Vec<RawListing>> {
    tracing::info!(location = %location, provider = provider.name(), "checking location");
    match provider.fetch_listings(location).await {
        Ok(raw) => Some(raw),
        Err(e) => {
            tracing::warn!(
                error = %e,
                location = %location,
                provider = provider.name(),
                "fetch failed, skipping location"
            );
            None
        }
    }
}
