// src/ingest/types.rs
use std::fmt;

use serde::Deserialize;

use crate::error::FetchError;

/// One search key: a postal code or a city/state pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    PostalCode(String),
    CityState { city: String, state: String },
}

impl Location {
    /// `"55401"` is a postal code, `"Minneapolis,MN"` a city/state pair.
    /// Returns `None` for blank input or a pair with an empty half.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        if s.is_empty() {
            return None;
        }
        match s.split_once(',') {
            Some((city, state)) => {
                let (city, state) = (city.trim(), state.trim());
                if city.is_empty() || state.is_empty() || state.contains(',') {
                    return None;
                }
                Some(Location::CityState {
                    city: city.to_string(),
                    state: state.to_string(),
                })
            }
            None => Some(Location::PostalCode(s.to_string())),
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::PostalCode(zip) => write!(f, "Zip Code {zip}"),
            Location::CityState { city, state } => write!(f, "{city}, {state}"),
        }
    }
}

/// Provider record, loosely typed: any field may be absent, null or of an
/// unexpected type. Mismatched values decode as `None` instead of failing
/// the whole record.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct RawListing {
    #[serde(deserialize_with = "lenient::number")]
    pub list_price: Option<f64>,
    #[serde(deserialize_with = "lenient::text")]
    pub list_date: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub last_update_date: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub href: Option<String>,
    #[serde(deserialize_with = "lenient::object")]
    pub location: Option<RawLocation>,
    #[serde(deserialize_with = "lenient::object")]
    pub description: Option<RawDescription>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct RawLocation {
    #[serde(deserialize_with = "lenient::object")]
    pub address: Option<RawAddress>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct RawAddress {
    #[serde(deserialize_with = "lenient::text")]
    pub line: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub city: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub state_code: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub postal_code: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct RawDescription {
    #[serde(deserialize_with = "lenient::number")]
    pub sqft: Option<f64>,
    #[serde(deserialize_with = "lenient::number")]
    pub beds: Option<f64>,
    #[serde(deserialize_with = "lenient::number")]
    pub baths_full: Option<f64>,
    #[serde(deserialize_with = "lenient::number")]
    pub baths_half: Option<f64>,
}

mod lenient {
    use serde::de::DeserializeOwned;
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    /// Numbers, or numeric strings like `"189900"` / `"1,850"`.
    pub fn number<'de, D: Deserializer<'de>>(d: D) -> Result<Option<f64>, D::Error> {
        Ok(match Value::deserialize(d)? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().replace(',', "").parse().ok(),
            _ => None,
        })
    }

    /// Strings; bare numbers (a numeric postal code) are kept as their text.
    pub fn text<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
        Ok(match Value::deserialize(d)? {
            Value::String(s) => Some(s),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
    }

    pub fn object<'de, D, T>(d: D) -> Result<Option<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned,
    {
        Ok(match Value::deserialize(d)? {
            v @ Value::Object(_) => serde_json::from_value(v).ok(),
            _ => None,
        })
    }
}

#[async_trait::async_trait]
pub trait ListingProvider: Send + Sync {
    async fn fetch_listings(&self, location: &Location) -> Result<Vec<RawListing>, FetchError>;
    fn name(&self) -> &'static str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_both_location_forms() {
        assert_eq!(
            Location::parse(" 55401 "),
            Some(Location::PostalCode("55401".into()))
        );
        assert_eq!(
            Location::parse("Saint Paul, MN"),
            Some(Location::CityState {
                city: "Saint Paul".into(),
                state: "MN".into()
            })
        );
        assert_eq!(Location::parse(""), None);
        assert_eq!(Location::parse(",MN"), None);
        assert_eq!(Location::parse("a,b,c"), None);
    }

    #[test]
    fn labels() {
        assert_eq!(
            Location::PostalCode("55401".into()).to_string(),
            "Zip Code 55401"
        );
        assert_eq!(
            Location::parse("Duluth,MN").unwrap().to_string(),
            "Duluth, MN"
        );
    }

    #[test]
    fn raw_listing_tolerates_nulls() {
        let raw: RawListing = serde_json::from_str(
            r#"{"list_price": null, "description": {"baths_full": null}, "extra": 1}"#,
        )
        .unwrap();
        assert_eq!(raw.list_price, None);
        assert_eq!(raw.description.unwrap().baths_full, None);
    }

    #[test]
    fn mismatched_types_decode_as_none() {
        let raw: RawListing = serde_json::from_str(
            r#"{
                "list_price": "189,900",
                "list_date": 20240502,
                "href": ["not", "a", "url"],
                "location": {"address": {"line": "9 Elm", "postal_code": 55403, "city": {}}},
                "description": {"sqft": "n/a", "beds": true, "baths_full": "2"}
            }"#,
        )
        .unwrap();
        assert_eq!(raw.list_price, Some(189_900.0));
        assert_eq!(raw.list_date.as_deref(), Some("20240502"));
        assert_eq!(raw.href, None);
        let addr = raw.location.unwrap().address.unwrap();
        assert_eq!(addr.postal_code.as_deref(), Some("55403"));
        assert_eq!(addr.city, None);
        let desc = raw.description.unwrap();
        assert_eq!(desc.sqft, None);
        assert_eq!(desc.beds, None);
        assert_eq!(desc.baths_full, Some(2.0));
    }

    #[test]
    fn non_object_nested_fields_are_dropped() {
        let raw: RawListing =
            serde_json::from_str(r#"{"location": "Duluth", "description": null}"#).unwrap();
        assert_eq!(raw.location, None);
        assert_eq!(raw.description, None);
    }
}
