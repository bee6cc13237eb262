//! Client configuration: `config.json` plus environment overrides.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::ports::FileSystem;

/// Environment variable pointing at the config file.
pub const CONFIG_ENV: &str = "JOINBOARD_CONFIG";
/// Environment variable overriding `apiUrl`.
pub const API_URL_ENV: &str = "JOINBOARD_API_URL";
/// Environment variable for the state directory (token, cassettes).
pub const HOME_ENV: &str = "JOINBOARD_HOME";

const DEFAULT_CONFIG: &str = "config.json";
const DEFAULT_HOME: &str = ".joinboard";

/// Contents of `config.json`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Base URL of the REST backend, without trailing `/`.
    pub api_url: String,
    /// Account used by `login --guest`.
    #[serde(default)]
    pub guest_email: String,
    /// Password of the guest account.
    #[serde(default)]
    pub guest_password: String,
}

/// Typed key for [`Config::get`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigKey {
    /// `apiUrl`
    ApiUrl,
    /// `guestEmail`
    GuestEmail,
    /// `guestPassword`
    GuestPassword,
}

impl fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::ApiUrl => "apiUrl",
            Self::GuestEmail => "guestEmail",
            Self::GuestPassword => "guestPassword",
        })
    }
}

impl Config {
    /// Parses `config.json` contents.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or `apiUrl` is missing or empty.
    pub fn parse(contents: &str) -> Result<Self, String> {
        let mut config: Self =
            serde_json::from_str(contents).map_err(|e| format!("Invalid config: {e}"))?;
        config.api_url = config.api_url.trim().trim_end_matches('/').to_string();
        if config.api_url.is_empty() {
            return Err("Invalid config: apiUrl is empty".into());
        }
        Ok(config)
    }

    /// Reads the config file through `fs` and applies `JOINBOARD_API_URL`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(fs: &dyn FileSystem, path: &Path) -> Result<Self, String> {
        let contents = fs
            .read_to_string(path)
            .map_err(|e| format!("Failed to read config {}: {e}", path.display()))?;
        let config = Self::parse(&contents)?;
        Ok(config.with_api_url_override(std::env::var(API_URL_ENV).ok()))
    }

    /// Replaces `apiUrl` when `api_url` is a non-empty value.
    #[must_use]
    pub fn with_api_url_override(mut self, api_url: Option<String>) -> Self {
        if let Some(url) = api_url.map(|u| u.trim().trim_end_matches('/').to_string()) {
            if !url.is_empty() {
                tracing::debug!(%url, "apiUrl overridden from environment");
                self.api_url = url;
            }
        }
        self
    }

    /// Value of a single key.
    #[must_use]
    pub fn get(&self, key: ConfigKey) -> &str {
        match key {
            ConfigKey::ApiUrl => &self.api_url,
            ConfigKey::GuestEmail => &self.guest_email,
            ConfigKey::GuestPassword => &self.guest_password,
        }
    }
}

/// Config file location: the `--config` flag, else `JOINBOARD_CONFIG`, else `./config.json`.
#[must_use]
pub fn config_path(flag: Option<&Path>) -> PathBuf {
    flag.map(Path::to_path_buf).unwrap_or_else(|| {
        std::env::var(CONFIG_ENV).map_or_else(|_| PathBuf::from(DEFAULT_CONFIG), PathBuf::from)
    })
}

/// State directory: `JOINBOARD_HOME`, else `.joinboard`.
#[must_use]
pub fn state_dir() -> PathBuf {
    std::env::var(HOME_ENV).map_or_else(|_| PathBuf::from(DEFAULT_HOME), PathBuf::from)
}
