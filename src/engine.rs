//! # Digest Engine
//! One linear pass per invocation: fetch each configured location in order,
//! normalize, render a section, then print the report and (unless dry)
//! deliver it. Nothing here aborts once configuration has loaded.

use std::io::Write;

use chrono::{DateTime, Utc};

use crate::config::Config;
use crate::ingest::fetch_location;
use crate::ingest::types::{ListingProvider, Location};
use crate::listing::normalize;
use crate::notify::{deliver, Notifier};
use crate::report::Report;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// `--dry`: the notifier is never touched.
    DryRun,
    Sent,
    Failed,
    /// Live run, but no transport could be built.
    Unavailable,
}

#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub report: Report,
    /// Locations whose fetch failed; they have no section in the report.
    pub skipped: Vec<Location>,
    pub delivery: Delivery,
}

/// Fetch + normalize + render for every location, strictly one at a time.
pub async fn build_report(
    cfg: &Config,
    provider: &dyn ListingProvider,
    now: DateTime<Utc>,
) -> (Report, Vec<Location>) {
    let mut report = Report::new();
    let mut skipped = Vec::new();

    for location in &cfg.locations {
        let Some(raw) = fetch_location(provider, location).await else {
            skipped.push(location.clone());
            continue;
        };
        let listings = normalize(&raw, now);
        tracing::info!(
            location = %location,
            fetched = raw.len(),
            fresh = listings.len(),
            "location processed"
        );
        report.push_section(&location.to_string(), &listings);
    }

    (report, skipped)
}

/// Full run. The report is written to `out` before any delivery attempt.
/// With `dry` set the notifier is never called, so no SMTP connection is made.
pub async fn run<W: Write>(
    cfg: &Config,
    provider: &dyn ListingProvider,
    dry: bool,
    notifier: Option<&dyn Notifier>,
    now: DateTime<Utc>,
    out: &mut W,
) -> RunOutcome {
    let (report, skipped) = build_report(cfg, provider, now).await;
    let text = report.to_string();

    if let Err(e) = writeln!(out, "{text}").and_then(|_| out.flush()) {
        tracing::warn!(error = %e, "could not write report to stdout");
    }

    let delivery = match (dry, notifier) {
        (true, _) => {
            tracing::info!("dry run, email not sent");
            Delivery::DryRun
        }
        (false, Some(n)) => {
            if deliver(n, &text, now.date_naive()).await {
                Delivery::Sent
            } else {
                Delivery::Failed
            }
        }
        (false, None) => {
            tracing::warn!("no email transport available, delivery skipped");
            Delivery::Unavailable
        }
    };

    tracing::info!(
        sections = report.sections().len(),
        listings = report.listing_count(),
        skipped = skipped.len(),
        delivery = ?delivery,
        "run complete"
    );

    RunOutcome {
        report,
        skipped,
        delivery,
    }
}
