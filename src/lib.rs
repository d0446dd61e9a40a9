// src/lib.rs
// Public library surface for the binary and integration tests.

pub mod config;
pub mod engine;
pub mod error;
pub mod format;
pub mod ingest;
pub mod listing;
pub mod notify;
pub mod report;

// ---- Re-exports for stable public API ----
pub use crate::config::Config;
pub use crate::engine::{run, Delivery, RunOutcome};
pub use crate::error::{ConfigError, DeliveryError, FetchError};
pub use crate::ingest::types::{ListingProvider, Location, RawListing};
pub use crate::notify::{EmailSender, Notifier};
pub use crate::report::Report;
