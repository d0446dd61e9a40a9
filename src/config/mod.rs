// src/config/mod.rs
//! Run configuration: one validated value, built at process start.

use std::env;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use lettre::message::Mailbox;
use lettre::Address;
use serde::Deserialize;

use crate::error::ConfigError;
use crate::ingest::types::Location;

pub const ENV_CONFIG_PATH: &str = "REALTOR_CONFIG_PATH";
pub const ENV_CONFIG_DATA: &str = "CONFIG_DATA";
pub const DEFAULT_CONFIG_FILE: &str = "config.json";

pub const DEFAULT_RAPIDAPI_HOST: &str = "realty-in-us.p.rapidapi.com";
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 20;
const DEFAULT_SMTP_TIMEOUT_SECS: u64 = 30;
const DEFAULT_FROM_NAME: &str = "Daily Realtor";

#[derive(Clone)]
pub struct Config {
    pub api_key: String,
    pub locations: Vec<Location>,
    pub destination_email: String,
    pub smtp: SmtpConfig,
    pub api: ApiConfig,
}

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub host: String,
    pub url: String,
    pub timeout: Duration,
}

#[derive(Clone)]
pub struct SmtpConfig {
    pub server: String,
    pub port: u16,
    pub user: String,
    pub pass: String,
    pub from_email: String,
    pub from_name: String,
    pub timeout: Duration,
}

// Secrets stay out of Debug output.
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("api_key_len", &self.api_key.len())
            .field("locations", &self.locations)
            .field("destination_email", &self.destination_email)
            .field("smtp", &self.smtp)
            .field("api", &self.api)
            .finish()
    }
}

impl fmt::Debug for SmtpConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SmtpConfig")
            .field("server", &self.server)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("from_email", &self.from_email)
            .field("from_name", &self.from_name)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Deserialize)]
struct ConfigDoc {
    #[serde(rename = "RAPIDAPI_KEY")]
    rapidapi_key: String,
    #[serde(rename = "LOCATIONS", alias = "ZIP_CODES")]
    locations: LocationsDoc,
    #[serde(rename = "DESTINATION_EMAIL")]
    destination_email: String,
    #[serde(rename = "SMTP")]
    smtp: SmtpDoc,
    #[serde(rename = "RAPIDAPI_HOST", default)]
    rapidapi_host: Option<String>,
    #[serde(rename = "API_URL", default)]
    api_url: Option<String>,
    #[serde(rename = "HTTP_TIMEOUT_SECS", default)]
    http_timeout_secs: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct SmtpDoc {
    #[serde(rename = "SERVER")]
    server: String,
    #[serde(rename = "PORT")]
    port: u16,
    #[serde(rename = "USER")]
    user: String,
    #[serde(rename = "PASS")]
    pass: String,
    #[serde(rename = "FROM_EMAIL")]
    from_email: String,
    #[serde(rename = "FROM_NAME", default)]
    from_name: Option<String>,
    #[serde(rename = "TIMEOUT_SECS", default)]
    timeout_secs: Option<u64>,
}

/// Either a JSON list or one colon-delimited string (`"Duluth,MN:55401"`).
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum LocationsDoc {
    List(Vec<String>),
    Delimited(String),
}

impl LocationsDoc {
    fn into_entries(self) -> Vec<String> {
        match self {
            LocationsDoc::List(v) => v,
            LocationsDoc::Delimited(s) if s.trim().is_empty() => Vec::new(),
            LocationsDoc::Delimited(s) => s.split(':').map(str::to_string).collect(),
        }
    }
}

impl Config {
    /// Resolve and load the configuration:
    /// 1) `explicit` path (from the command line)
    /// 2) $REALTOR_CONFIG_PATH
    /// 3) `config.json` next to the executable, then in the working directory
    /// 4) $CONFIG_DATA holding the JSON document
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        if let Some(path) = explicit {
            return Self::load_from(path);
        }

        if let Ok(p) = env::var(ENV_CONFIG_PATH) {
            return Self::load_from(Path::new(&p));
        }

        for candidate in default_candidates() {
            if candidate.is_file() {
                tracing::debug!(path = %candidate.display(), "using config file");
                return Self::load_from(&candidate);
            }
        }

        match env::var(ENV_CONFIG_DATA) {
            Ok(data) => Self::from_json_str(&data),
            Err(_) => Err(ConfigError::Missing),
        }
    }

    /// Load from an explicit file. `.toml` is parsed as TOML, anything else as JSON.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let is_toml = path
            .extension()
            .and_then(|s| s.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));
        if is_toml {
            Self::from_toml_str(&content)
        } else {
            Self::from_json_str(&content)
        }
    }

    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        let doc: ConfigDoc = serde_json::from_str(s)?;
        doc.validate()
    }

    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let doc: ConfigDoc = toml::from_str(s)?;
        doc.validate()
    }
}

impl ConfigDoc {
    fn validate(self) -> Result<Config, ConfigError> {
        let api_key = non_empty("RAPIDAPI_KEY", self.rapidapi_key)?;

        let entries = self.locations.into_entries();
        if entries.is_empty() {
            return Err(ConfigError::NoLocations);
        }
        let locations = entries
            .iter()
            .map(|e| Location::parse(e).ok_or_else(|| ConfigError::InvalidLocation(e.clone())))
            .collect::<Result<Vec<_>, _>>()?;

        let destination_email = non_empty("DESTINATION_EMAIL", self.destination_email)?;
        if destination_email.parse::<Mailbox>().is_err() {
            return Err(ConfigError::InvalidEmail {
                field: "DESTINATION_EMAIL",
                value: destination_email,
            });
        }

        let smtp = self.smtp;
        if smtp.port == 0 {
            return Err(ConfigError::InvalidPort);
        }
        let from_email = non_empty("SMTP.FROM_EMAIL", smtp.from_email)?;
        if from_email.parse::<Address>().is_err() {
            return Err(ConfigError::InvalidEmail {
                field: "SMTP.FROM_EMAIL",
                value: from_email,
            });
        }

        let host = self
            .rapidapi_host
            .filter(|h| !h.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_RAPIDAPI_HOST.to_string());
        let url = self
            .api_url
            .filter(|u| !u.trim().is_empty())
            .unwrap_or_else(|| format!("https://{host}/properties/v3/list"));

        Ok(Config {
            api_key,
            locations,
            destination_email,
            smtp: SmtpConfig {
                server: non_empty("SMTP.SERVER", smtp.server)?,
                port: smtp.port,
                user: smtp.user,
                pass: smtp.pass,
                from_email,
                from_name: smtp
                    .from_name
                    .unwrap_or_else(|| DEFAULT_FROM_NAME.to_string()),
                timeout: Duration::from_secs(
                    smtp.timeout_secs.unwrap_or(DEFAULT_SMTP_TIMEOUT_SECS).max(1),
                ),
            },
            api: ApiConfig {
                host,
                url,
                timeout: Duration::from_secs(
                    self.http_timeout_secs
                        .unwrap_or(DEFAULT_HTTP_TIMEOUT_SECS)
                        .max(1),
                ),
            },
        })
    }
}

fn non_empty(field: &'static str, value: String) -> Result<String, ConfigError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::Empty { field });
    }
    Ok(trimmed.to_string())
}

fn default_candidates() -> Vec<PathBuf> {
    let mut out = Vec::with_capacity(2);
    if let Some(dir) = env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(Path::to_path_buf))
    {
        out.push(dir.join(DEFAULT_CONFIG_FILE));
    }
    out.push(PathBuf::from(DEFAULT_CONFIG_FILE));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(locations: &str) -> String {
        format!(
            r#"{{
                "RAPIDAPI_KEY": "k-123",
                "LOCATIONS": {locations},
                "DESTINATION_EMAIL": "me@example.com",
                "SMTP": {{
                    "SERVER": "smtp.example.com",
                    "PORT": 587,
                    "USER": "bot",
                    "PASS": "secret",
                    "FROM_EMAIL": "bot@example.com"
                }}
            }}"#
        )
    }

    #[test]
    fn loads_list_of_locations_with_defaults() {
        let cfg = Config::from_json_str(&sample(r#"["55401", "Duluth, MN"]"#)).unwrap();
        assert_eq!(cfg.locations.len(), 2);
        assert_eq!(cfg.locations[0], Location::PostalCode("55401".into()));
        assert_eq!(cfg.smtp.port, 587);
        assert_eq!(cfg.smtp.from_name, "Daily Realtor");
        assert_eq!(cfg.api.host, DEFAULT_RAPIDAPI_HOST);
        assert_eq!(
            cfg.api.url,
            "https://realty-in-us.p.rapidapi.com/properties/v3/list"
        );
    }

    #[test]
    fn accepts_colon_delimited_string() {
        let cfg = Config::from_json_str(&sample(r#""Duluth,MN:Fargo,ND""#)).unwrap();
        assert_eq!(
            cfg.locations[1],
            Location::CityState {
                city: "Fargo".into(),
                state: "ND".into()
            }
        );
    }

    #[test]
    fn zip_codes_alias_is_accepted() {
        let json = sample(r#"["55401"]"#).replace("LOCATIONS", "ZIP_CODES");
        let cfg = Config::from_json_str(&json).unwrap();
        assert_eq!(cfg.locations, vec![Location::PostalCode("55401".into())]);
    }

    #[test]
    fn empty_location_list_is_rejected() {
        let err = Config::from_json_str(&sample("[]")).unwrap_err();
        assert!(matches!(err, ConfigError::NoLocations));
        let err = Config::from_json_str(&sample(r#""""#)).unwrap_err();
        assert!(matches!(err, ConfigError::NoLocations));
    }

    #[test]
    fn non_integer_port_is_rejected() {
        let json = sample(r#"["55401"]"#).replace("587", r#""five""#);
        assert!(matches!(
            Config::from_json_str(&json).unwrap_err(),
            ConfigError::Json(_)
        ));
    }

    #[test]
    fn missing_key_is_rejected() {
        let json = sample(r#"["55401"]"#).replace(r#""RAPIDAPI_KEY": "k-123","#, "");
        assert!(matches!(
            Config::from_json_str(&json).unwrap_err(),
            ConfigError::Json(_)
        ));
    }

    #[test]
    fn bad_destination_is_rejected() {
        let json = sample(r#"["55401"]"#).replace("me@example.com", "not-an-email");
        assert!(matches!(
            Config::from_json_str(&json).unwrap_err(),
            ConfigError::InvalidEmail { field: "DESTINATION_EMAIL", .. }
        ));
    }

    #[test]
    fn toml_document_parses() {
        let toml = r#"
RAPIDAPI_KEY = "k"
LOCATIONS = ["55401"]
DESTINATION_EMAIL = "me@example.com"

[SMTP]
SERVER = "smtp.example.com"
PORT = 2525
USER = "u"
PASS = "p"
FROM_EMAIL = "bot@example.com"
TIMEOUT_SECS = 5
"#;
        let cfg = Config::from_toml_str(toml).unwrap();
        assert_eq!(cfg.smtp.port, 2525);
        assert_eq!(cfg.smtp.timeout, Duration::from_secs(5));
    }

    #[test]
    fn debug_output_hides_secrets() {
        let cfg = Config::from_json_str(&sample(r#"["55401"]"#)).unwrap();
        let dbg = format!("{cfg:?}");
        assert!(!dbg.contains("k-123"));
        assert!(!dbg.contains("secret"));
    }
}
