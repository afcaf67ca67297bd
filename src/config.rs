//! Relay configuration loading.
//!
//! Configuration is a single JSON document with an `integration` section
//! (remote service connection settings) and a `routing` section (category
//! to list and field mapping). Selected integration values may be
//! overridden from the environment.

use camino::Utf8Path;
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::lead::domain::{IntegrationSettings, RoutingTable, TaskPriority};

/// Environment variable overriding the remote base URL.
pub const BASE_URL_ENV: &str = "LEAD_RELAY_BASE_URL";
/// Environment variable overriding the remote access token.
pub const ACCESS_TOKEN_ENV: &str = "LEAD_RELAY_ACCESS_TOKEN";
/// Environment variable overriding the default task priority.
pub const DEFAULT_PRIORITY_ENV: &str = "LEAD_RELAY_DEFAULT_PRIORITY";

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be opened or read.
    #[error("failed to read configuration file {path}: {source}")]
    Read {
        /// Path that was read.
        path: String,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// The configuration document is not valid JSON for the expected shape.
    #[error("invalid configuration in {origin}: {source}")]
    Parse {
        /// Where the document came from.
        origin: String,
        /// Underlying parse failure.
        #[source]
        source: serde_json::Error,
    },

    /// An environment override holds an unusable value.
    #[error("invalid value for {name}: {reason}")]
    InvalidOverride {
        /// Variable name.
        name: &'static str,
        /// Why the value was rejected.
        reason: String,
    },
}

/// Complete relay configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelayConfig {
    /// Remote service connection settings.
    #[serde(default)]
    pub integration: IntegrationSettings,
    /// Category routing table.
    #[serde(default)]
    pub routing: RoutingTable,
}

impl RelayConfig {
    /// Parses configuration from a JSON document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] when the document is malformed.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Self::parse(json, "inline document")
    }

    /// Reads and parses a configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Read`] when the file cannot be read and
    /// [`ConfigError::Parse`] when it is malformed.
    pub fn load(path: &Utf8Path) -> Result<Self, ConfigError> {
        let contents = read_text_file(path)?;
        Self::parse(&contents, path.as_str())
    }

    fn parse(json: &str, origin: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(|source| ConfigError::Parse {
            origin: origin.to_owned(),
            source,
        })
    }

    /// Applies environment overrides using `lookup` to read variables.
    ///
    /// Unset or blank variables leave the configured value untouched.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidOverride`] when the priority override is
    /// not an integer in `1..=4`.
    pub fn with_env_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        if let Some(base_url) = read(BASE_URL_ENV) {
            self.integration.base_url = base_url;
        }
        if let Some(access_token) = read(ACCESS_TOKEN_ENV) {
            self.integration.access_token = access_token;
        }
        if let Some(raw_priority) = read(DEFAULT_PRIORITY_ENV) {
            self.integration.default_priority = parse_priority(&raw_priority)?;
        }
        Ok(self)
    }

    /// Applies overrides from the process environment.
    ///
    /// # Errors
    ///
    /// See [`with_env_overrides`](Self::with_env_overrides).
    pub fn with_process_env(self) -> Result<Self, ConfigError> {
        self.with_env_overrides(|name| std::env::var(name).ok())
    }
}

fn parse_priority(raw: &str) -> Result<TaskPriority, ConfigError> {
    let value = raw
        .trim()
        .parse::<u8>()
        .map_err(|err| ConfigError::InvalidOverride {
            name: DEFAULT_PRIORITY_ENV,
            reason: err.to_string(),
        })?;
    TaskPriority::try_from(value).map_err(|err| ConfigError::InvalidOverride {
        name: DEFAULT_PRIORITY_ENV,
        reason: err.to_string(),
    })
}

/// Reads a UTF-8 file through a capability on its parent directory.
///
/// # Errors
///
/// Returns [`ConfigError::Read`] when the path has no file name or the file
/// cannot be read.
pub fn read_text_file(path: &Utf8Path) -> Result<String, ConfigError> {
    let read_error = |source: std::io::Error| ConfigError::Read {
        path: path.as_str().to_owned(),
        source,
    };
    let file_name = path
        .file_name()
        .ok_or_else(|| read_error(std::io::Error::other("path must include a file name")))?;
    let parent = path
        .parent()
        .filter(|parent| !parent.as_str().is_empty())
        .unwrap_or_else(|| Utf8Path::new("."));
    let dir = Dir::open_ambient_dir(parent, ambient_authority()).map_err(read_error)?;
    dir.read_to_string(file_name).map_err(read_error)
}
