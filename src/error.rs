// src/error.rs
use std::path::PathBuf;

use thiserror::Error;

/// Fatal: the run aborts before any network activity.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no configuration found (set CONFIG_DATA or provide config.json)")]
    Missing,

    #[error("config file {} does not exist", .0.display())]
    NotFound(PathBuf),

    #[error("reading config from {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parsing JSON config: {0}")]
    Json(#[from] serde_json::Error),

    #[error("parsing TOML config: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("at least one location must be configured")]
    NoLocations,

    #[error("invalid location {0:?}: expected a postal code or `city,state`")]
    InvalidLocation(String),

    #[error("{field} must not be empty")]
    Empty { field: &'static str },

    #[error("{field} is not a valid email address: {value}")]
    InvalidEmail { field: &'static str, value: String },

    #[error("SMTP.PORT must be between 1 and 65535")]
    InvalidPort,
}

/// Recoverable: only the affected location is skipped.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("listings request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("listings response is not valid JSON: {0}")]
    Decode(#[source] serde_json::Error),
}

/// Non-fatal: logged, the run still succeeds.
#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("invalid mailbox {value:?}: {source}")]
    Address {
        value: String,
        #[source]
        source: lettre::address::AddressError,
    },

    #[error("building email: {0}")]
    Message(#[from] lettre::error::Error),

    #[error("smtp: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),
}
