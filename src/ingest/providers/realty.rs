// src/ingest/providers/realty.rs
//! RapidAPI "realty-in-us" v3 list endpoint.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::error::FetchError;
use crate::ingest::types::{ListingProvider, Location, RawListing};

/// Items per response.
pub const PAGE_SIZE: u32 = 20;

#[derive(Debug, Deserialize)]
struct Envelope {
    data: Option<Data>,
}
#[derive(Debug, Deserialize)]
struct Data {
    home_search: Option<HomeSearch>,
}
#[derive(Debug, Deserialize)]
struct HomeSearch {
    results: Option<Vec<serde_json::Value>>,
}

#[derive(Debug, Serialize, PartialEq)]
pub(crate) struct SearchBody<'a> {
    limit: u32,
    offset: u32,
    status: [&'static str; 2],
    sort: Sort,
    #[serde(skip_serializing_if = "Option::is_none")]
    postal_code: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    city: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    state_code: Option<&'a str>,
}

#[derive(Debug, Serialize, PartialEq)]
struct Sort {
    direction: &'static str,
    field: &'static str,
}

impl<'a> SearchBody<'a> {
    pub(crate) fn for_location(location: &'a Location) -> Self {
        let (postal_code, city, state_code) = match location {
            Location::PostalCode(zip) => (Some(zip.as_str()), None, None),
            Location::CityState { city, state } => (None, Some(city.as_str()), Some(state.as_str())),
        };
        Self {
            limit: PAGE_SIZE,
            offset: 0,
            status: ["for_sale", "ready_to_build"],
            sort: Sort {
                direction: "desc",
                field: "list_date",
            },
            postal_code,
            city,
            state_code,
        }
    }
}

pub struct RealtyProvider {
    mode: Mode,
}

enum Mode {
    // Canned body returned for every location.
    Fixture(String),
    Http {
        client: reqwest::Client,
        url: String,
        host: String,
        api_key: String,
    },
}

impl RealtyProvider {
    pub fn from_config(cfg: &Config) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("realtor-digest/", env!("CARGO_PKG_VERSION")))
            .connect_timeout(cfg.api.timeout.min(std::time::Duration::from_secs(10)))
            .timeout(cfg.api.timeout)
            .build()?;
        Ok(Self {
            mode: Mode::Http {
                client,
                url: cfg.api.url.clone(),
                host: cfg.api.host.clone(),
                api_key: cfg.api_key.clone(),
            },
        })
    }

    pub fn from_fixture_str(body: &str) -> Self {
        Self {
            mode: Mode::Fixture(body.to_string()),
        }
    }

    /// Extract `data.home_search.results`. Missing or null levels yield an
    /// empty list; a body that is not JSON, or not shaped like the envelope,
    /// is a decode error. Entries that are not objects are skipped one by one.
    pub fn parse_results(body: &str) -> Result<Vec<RawListing>, FetchError> {
        let env: Envelope = serde_json::from_str(body).map_err(FetchError::Decode)?;
        let results = env
            .data
            .and_then(|d| d.home_search)
            .and_then(|h| h.results)
            .unwrap_or_default();

        let mut out = Vec::with_capacity(results.len());
        for (idx, value) in results.into_iter().enumerate() {
            match serde_json::from_value::<RawListing>(value) {
                Ok(raw) => out.push(raw),
                Err(e) => tracing::debug!(idx, error = %e, "unusable listing entry, skipped"),
            }
        }
        Ok(out)
    }
}

#[async_trait]
impl ListingProvider for RealtyProvider {
    async fn fetch_listings(&self, location: &Location) -> Result<Vec<RawListing>, FetchError> {
        match &self.mode {
            Mode::Fixture(body) => Self::parse_results(body),
            Mode::Http {
                client,
                url,
                host,
                api_key,
            } => {
                let resp = client
                    .post(url)
                    .header("x-rapidapi-host", host)
                    .header("x-rapidapi-key", api_key)
                    .json(&SearchBody::for_location(location))
                    .send()
                    .await?
                    .error_for_status()?;
                let body = resp.text().await?;
                let out = Self::parse_results(&body)?;
                tracing::debug!(location = %location, count = out.len(), "listings fetched");
                Ok(out)
            }
        }
    }

    fn name(&self) -> &'static str {
        "realty-in-us"
    }
}
