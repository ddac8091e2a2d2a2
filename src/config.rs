//! Endpoint configuration for the production data API
//!
//! Settings come from an optional JSON file and are overlaid by environment
//! variables. Every setting is optional: a missing credential or host leaves the
//! fetcher in a degraded state that returns empty lists instead of failing.

use directories::ProjectDirs;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Environment variable overriding `basic_auth`
pub const ENV_BASIC_AUTH: &str = "API_INTERFACE_BASIC_AUTH";
/// Environment variable overriding `host`
pub const ENV_HOST: &str = "API_INTERFACE_HOST";
/// Environment variable overriding `client_id`
pub const ENV_CLIENT_ID: &str = "API_INTERFACE_CLIENT_ID";
/// Environment variable overriding `client_secret`
pub const ENV_CLIENT_SECRET: &str = "API_INTERFACE_CLIENT_SECRET";
/// Environment variable overriding `timeout_secs`
pub const ENV_TIMEOUT_SECS: &str = "API_INTERFACE_TIMEOUT_SECS";

/// Request timeout applied when none is configured
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Errors that can occur while loading the settings file
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An explicitly requested settings file does not exist
    #[error("Settings file not found: {0}")]
    NotFound(PathBuf),

    /// The settings file exists but could not be read
    #[error("Failed to read settings file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The settings file is not valid JSON for this schema
    #[error("Failed to parse settings file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// An environment override holds an unusable value
    #[error("Invalid value for {name}: '{value}'")]
    InvalidValue { name: &'static str, value: String },
}

/// Connection settings for the production data API
///
/// Immutable once loaded. Absent values are a valid state; see
/// [`EndpointConfig::endpoint`] and [`EndpointConfig::credentials`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EndpointConfig {
    /// Credential prefix placed in the authority part of the endpoint
    pub basic_auth: Option<String>,
    /// API host name
    pub host: Option<String>,
    /// Value of the `client_id` request header
    pub client_id: Option<String>,
    /// Value of the `client_secret` request header
    pub client_secret: Option<String>,
    /// Request timeout in seconds
    pub timeout_secs: Option<u64>,
}

/// Client identity sent with every request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

impl EndpointConfig {
    /// Loads settings from a file, then applies environment overrides
    ///
    /// With an explicit path the file must exist. Without one, the default
    /// settings file is used when present and silently skipped otherwise.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self, ConfigError> {
        let base = match explicit_path {
            Some(path) if !path.exists() => return Err(ConfigError::NotFound(path.to_path_buf())),
            Some(path) => Self::from_file(path)?,
            None => match Self::default_path().filter(|p| p.exists()) {
                Some(path) => Self::from_file(&path)?,
                None => Self::default(),
            },
        };

        base.with_overrides(|name| std::env::var(name).ok())
    }

    /// Returns the default settings file location
    ///
    /// `~/.config/prodlist/settings.json` on Linux, or the equivalent platform path.
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "prodlist").map(|dirs| dirs.config_dir().join("settings.json"))
    }

    /// Reads settings from a JSON file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Applies overrides from a variable lookup (normally the process environment)
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup(ENV_BASIC_AUTH) {
            self.basic_auth = Some(v);
        }
        if let Some(v) = lookup(ENV_HOST) {
            self.host = Some(v);
        }
        if let Some(v) = lookup(ENV_CLIENT_ID) {
            self.client_id = Some(v);
        }
        if let Some(v) = lookup(ENV_CLIENT_SECRET) {
            self.client_secret = Some(v);
        }
        if let Some(v) = lookup(ENV_TIMEOUT_SECS) {
            let secs = v
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or_else(|| ConfigError::InvalidValue {
                    name: ENV_TIMEOUT_SECS,
                    value: v.clone(),
                })?;
            self.timeout_secs = Some(secs);
        }
        self.validate()
    }

    /// Rejects settings that would make every request fail
    fn validate(self) -> Result<Self, ConfigError> {
        if self.timeout_secs == Some(0) {
            return Err(ConfigError::InvalidValue {
                name: "timeout_secs",
                value: "0".to_string(),
            });
        }
        Ok(self)
    }

    /// Returns the endpoint authority `basic_auth@host`
    ///
    /// `None` unless both parts are present and non-empty.
    pub fn endpoint(&self) -> Option<String> {
        let auth = non_empty(&self.basic_auth)?;
        let host = non_empty(&self.host)?;
        Some(format!("{}@{}", auth, host))
    }

    /// Returns the client identity, if both halves are present and non-empty
    pub fn credentials(&self) -> Option<Credentials> {
        Some(Credentials {
            client_id: non_empty(&self.client_id)?.to_string(),
            client_secret: non_empty(&self.client_secret)?.to_string(),
        })
    }

    /// Request timeout, falling back to [`DEFAULT_TIMEOUT_SECS`]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS))
    }
}
