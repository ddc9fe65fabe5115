//! Application configuration module
//!
//! Provides the backend connection settings used by the account services.
//!
//! Configuration is resolved from, in order of preference:
//!
//! - an explicit TOML file (`AppConfig::from_toml_file`)
//! - `<config dir>/datawizard/config.toml` when present (`AppConfig::load`)
//! - `DATAWIZARD_*` environment variables, with `.env` support (`AppConfig::from_env`)

use std::path::{Path, PathBuf};
use std::time::Duration;

use reqwest::Url;
use serde::Deserialize;
use thiserror::Error;

/// Default backend URL (local Supabase API gateway)
pub const DEFAULT_BACKEND_URL: &str = "http://127.0.0.1:54321";

/// Lowest and highest cost accepted by bcrypt
const MIN_BCRYPT_COST: u32 = 4;
const MAX_BCRYPT_COST: u32 = 31;

const ENV_BACKEND_URL: &str = "DATAWIZARD_BACKEND_URL";
const ENV_API_KEY: &str = "DATAWIZARD_API_KEY";
const ENV_BCRYPT_COST: &str = "DATAWIZARD_BCRYPT_COST";
const ENV_REQUEST_TIMEOUT: &str = "DATAWIZARD_REQUEST_TIMEOUT_SECS";

/// Application configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Backend base URL, without a trailing slash
    pub backend_url: String,
    /// Key sent as both `apikey` and bearer token
    pub api_key: String,
    /// bcrypt work factor used when registering users
    pub bcrypt_cost: u32,
    /// Per-request timeout; `None` leaves requests unbounded
    pub request_timeout: Option<Duration>,
}

impl AppConfig {
    /// Create a new AppConfigBuilder
    pub fn builder() -> AppConfigBuilder {
        AppConfigBuilder::default()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = Url::parse(&self.backend_url)
            .map_err(|e| ConfigError::InvalidUrl(format!("{}: {}", self.backend_url, e)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidUrl(format!(
                "{}: unsupported scheme '{}'",
                self.backend_url,
                url.scheme()
            )));
        }

        if self.api_key.trim().is_empty() {
            return Err(ConfigError::MissingValue("api_key"));
        }

        if !(MIN_BCRYPT_COST..=MAX_BCRYPT_COST).contains(&self.bcrypt_cost) {
            return Err(ConfigError::InvalidValue {
                key: "bcrypt_cost",
                message: format!(
                    "{} is outside {}..={}",
                    self.bcrypt_cost, MIN_BCRYPT_COST, MAX_BCRYPT_COST
                ),
            });
        }

        Ok(())
    }

    /// Get the full URL for an API endpoint
    pub fn api_url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.backend_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// Build the configuration from `DATAWIZARD_*` environment variables.
    ///
    /// A `.env` file in the working directory is loaded first if present.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();

        let mut builder = Self::builder();
        if let Ok(url) = std::env::var(ENV_BACKEND_URL) {
            builder = builder.backend_url(url);
        }
        if let Ok(key) = std::env::var(ENV_API_KEY) {
            builder = builder.api_key(key);
        }
        if let Ok(cost) = std::env::var(ENV_BCRYPT_COST) {
            let cost = cost.trim().parse::<u32>().map_err(|e| ConfigError::InvalidValue {
                key: "bcrypt_cost",
                message: e.to_string(),
            })?;
            builder = builder.bcrypt_cost(cost);
        }
        if let Ok(secs) = std::env::var(ENV_REQUEST_TIMEOUT) {
            let secs = secs.trim().parse::<u64>().map_err(|e| ConfigError::InvalidValue {
                key: "request_timeout_secs",
                message: e.to_string(),
            })?;
            builder = builder.request_timeout(Duration::from_secs(secs));
        }

        builder.build()
    }

    /// Parse a TOML configuration file
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::from_toml_str(&contents)
    }

    /// Parse TOML configuration text
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let file: FileConfig =
            toml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))?;

        let mut builder = Self::builder();
        if let Some(url) = file.backend_url {
            builder = builder.backend_url(url);
        }
        if let Some(key) = file.api_key {
            builder = builder.api_key(key);
        }
        if let Some(cost) = file.bcrypt_cost {
            builder = builder.bcrypt_cost(cost);
        }
        if let Some(secs) = file.request_timeout_secs {
            builder = builder.request_timeout(Duration::from_secs(secs));
        }
        builder.build()
    }

    /// Load from the per-user config file, falling back to the environment
    pub fn load() -> Result<Self, ConfigError> {
        match default_config_path() {
            Some(path) if path.exists() => {
                tracing::debug!("[Config] Loading {}", path.display());
                Self::from_toml_file(path)
            }
            _ => {
                tracing::debug!("[Config] No config file, reading environment");
                Self::from_env()
            }
        }
    }
}

/// `<config dir>/datawizard/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("datawizard").join("config.toml"))
}

/// On-disk layout of the TOML config file
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    backend_url: Option<String>,
    api_key: Option<String>,
    bcrypt_cost: Option<u32>,
    request_timeout_secs: Option<u64>,
}

/// Builder for AppConfig
#[derive(Debug, Default)]
pub struct AppConfigBuilder {
    backend_url: Option<String>,
    api_key: Option<String>,
    bcrypt_cost: Option<u32>,
    request_timeout: Option<Duration>,
}

impl AppConfigBuilder {
    /// Set the backend URL
    pub fn backend_url(mut self, url: impl Into<String>) -> Self {
        self.backend_url = Some(url.into());
        self
    }

    /// Set the API key
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Set the bcrypt cost
    pub fn bcrypt_cost(mut self, cost: u32) -> Self {
        self.bcrypt_cost = Some(cost);
        self
    }

    /// Set a per-request timeout
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Build and validate the configuration
    pub fn build(self) -> Result<AppConfig, ConfigError> {
        let backend_url = self
            .backend_url
            .map(|url| url.trim().trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_BACKEND_URL.to_string());

        let config = AppConfig {
            backend_url,
            api_key: self.api_key.ok_or(ConfigError::MissingValue("api_key"))?,
            bcrypt_cost: self.bcrypt_cost.unwrap_or(bcrypt::DEFAULT_COST),
            request_timeout: self.request_timeout,
        };
        config.validate()?;
        Ok(config)
    }
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid URL: {0}")]
    InvalidUrl(String),
    #[error("missing value: {0}")]
    MissingValue(&'static str),
    #[error("invalid value for {key}: {message}")]
    InvalidValue { key: &'static str, message: String },
    #[error("failed to read {}: {message}", path.display())]
    Io { path: PathBuf, message: String },
    #[error("failed to parse config file: {0}")]
    Parse(String),
    #[error("failed to build HTTP client: {0}")]
    HttpClient(String),
}
