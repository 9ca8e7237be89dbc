//! Environment-driven configuration of the prediction server.
//!
//! | Variable | Default | Meaning |
//! |----------|---------|---------|
//! | `PATH_TO_DATASET` | required | Training CSV used to fit the preprocessor |
//! | `PATH_TO_MODEL` | `models` | Directory holding `trained_model-<version>.bin` |
//! | `MODEL_VERSION` | `v1` | Registry name of the model to serve |
//! | `PREPROCESSOR_STATE` | unset | Fitted state file loaded instead of fitting |
//! | `API_KEY` | unset | Required `Authorization` header value when set |
//! | `HOST` | `127.0.0.1` | Bind address |
//! | `PORT` | `8000` | Bind port |

use std::fmt;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

pub const DEFAULT_MODEL_DIR: &str = "models";
pub const DEFAULT_MODEL_NAME: &str = "v1";
pub const DEFAULT_PORT: u16 = 8000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A required variable is unset or empty.
    Missing(&'static str),
    /// A variable is set but cannot be parsed.
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "Missing required environment variable {}", key),
            ConfigError::Invalid { key, value, reason } => {
                write!(f, "Invalid value '{}' for {}: {}", value, key, reason)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    pub dataset_path: PathBuf,
    pub model_dir: PathBuf,
    pub model_name: String,
    pub preprocessor_state: Option<PathBuf>,
    pub api_key: Option<String>,
    pub host: IpAddr,
    pub port: u16,
}

impl ServiceConfig {
    /// Read the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read the configuration through an arbitrary lookup. Empty values count
    /// as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let dataset_path = get("PATH_TO_DATASET")
            .map(PathBuf::from)
            .ok_or(ConfigError::Missing("PATH_TO_DATASET"))?;

        let host = match get("HOST") {
            Some(value) => value.parse().map_err(|e: std::net::AddrParseError| ConfigError::Invalid {
                key: "HOST",
                value: value.clone(),
                reason: e.to_string(),
            })?,
            None => IpAddr::V4(Ipv4Addr::LOCALHOST),
        };

        let port = match get("PORT") {
            Some(value) => value.parse().map_err(|e: std::num::ParseIntError| ConfigError::Invalid {
                key: "PORT",
                value: value.clone(),
                reason: e.to_string(),
            })?,
            None => DEFAULT_PORT,
        };

        Ok(Self {
            dataset_path,
            model_dir: get("PATH_TO_MODEL")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_MODEL_DIR)),
            model_name: get("MODEL_VERSION").unwrap_or_else(|| DEFAULT_MODEL_NAME.to_string()),
            preprocessor_state: get("PREPROCESSOR_STATE").map(PathBuf::from),
            api_key: get("API_KEY"),
            host,
            port,
        })
    }

    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config =
            ServiceConfig::from_lookup(lookup(&[("PATH_TO_DATASET", "data/insurance.csv")])).unwrap();

        assert_eq!(config.dataset_path, PathBuf::from("data/insurance.csv"));
        assert_eq!(config.model_dir, PathBuf::from("models"));
        assert_eq!(config.model_name, "v1");
        assert_eq!(config.preprocessor_state, None);
        assert_eq!(config.api_key, None);
        assert_eq!(config.addr(), "127.0.0.1:8000".parse::<SocketAddr>().unwrap());
    }

    #[test]
    fn test_all_values() {
        let config = ServiceConfig::from_lookup(lookup(&[
            ("PATH_TO_DATASET", "train.csv"),
            ("PATH_TO_MODEL", "/srv/models"),
            ("MODEL_VERSION", "v2"),
            ("PREPROCESSOR_STATE", "/srv/state.bin"),
            ("API_KEY", "secret"),
            ("HOST", "0.0.0.0"),
            ("PORT", "9090"),
        ]))
        .unwrap();

        assert_eq!(config.model_dir, PathBuf::from("/srv/models"));
        assert_eq!(config.model_name, "v2");
        assert_eq!(config.preprocessor_state, Some(PathBuf::from("/srv/state.bin")));
        assert_eq!(config.api_key.as_deref(), Some("secret"));
        assert_eq!(config.addr(), "0.0.0.0:9090".parse::<SocketAddr>().unwrap());
    }

    #[test]
    fn test_missing_dataset() {
        let result = ServiceConfig::from_lookup(lookup(&[("PORT", "8000")]));
        assert_eq!(result, Err(ConfigError::Missing("PATH_TO_DATASET")));
    }

    #[test]
    fn test_empty_values_are_unset() {
        let config = ServiceConfig::from_lookup(lookup(&[
            ("PATH_TO_DATASET", "train.csv"),
            ("API_KEY", ""),
            ("MODEL_VERSION", "  "),
        ]))
        .unwrap();
        assert_eq!(config.api_key, None);
        assert_eq!(config.model_name, "v1");
    }

    #[test]
    fn test_invalid_port() {
        let result = ServiceConfig::from_lookup(lookup(&[
            ("PATH_TO_DATASET", "train.csv"),
            ("PORT", "eighty"),
        ]));
        assert!(matches!(
            result,
            Err(ConfigError::Invalid { key: "PORT", .. })
        ));
    }

    #[test]
    fn test_invalid_host() {
        let result = ServiceConfig::from_lookup(lookup(&[
            ("PATH_TO_DATASET", "train.csv"),
            ("HOST", "not-an-ip"),
        ]));
        assert!(matches!(
            result,
            Err(ConfigError::Invalid { key: "HOST", .. })
        ));
    }
}
