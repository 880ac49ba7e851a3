//! Portal client configuration loaded via OrthoConfig.

use std::path::PathBuf;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use url::Url;

use crate::outbound::http::ApiClientConfig;

const DEFAULT_API_BASE_URL: &str = "http://localhost:5000/api";
const DEFAULT_CREDENTIAL_DIR: &str = ".portal";

/// Errors raised while interpreting loaded settings.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// The API base URL did not parse.
    #[error("invalid API base URL `{value}`: {message}")]
    InvalidBaseUrl {
        /// Configured value.
        value: String,
        /// Parser or scheme error.
        message: String,
    },
    /// The request timeout was zero.
    #[error("request timeout must be at least one second")]
    ZeroTimeout,
}

/// Settings for connecting to the portal backend.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "PORTAL")]
pub struct PortalSettings {
    /// API root, e.g. `https://portal.example.com/api`.
    pub api_base_url: Option<String>,
    /// Whole-request timeout in seconds.
    #[ortho_config(default = 30)]
    pub request_timeout_secs: u64,
    /// Directory holding the persisted credential.
    pub credential_dir: Option<PathBuf>,
}

impl PortalSettings {
    /// Return the API root, falling back to the local development backend.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidBaseUrl`] for unparsable values and for
    /// schemes other than `http` and `https`.
    pub fn api_base_url(&self) -> Result<Url, ConfigError> {
        let raw = self.api_base_url.as_deref().unwrap_or(DEFAULT_API_BASE_URL);
        let invalid = |message: String| ConfigError::InvalidBaseUrl {
            value: raw.to_owned(),
            message,
        };
        let url = Url::parse(raw).map_err(|error| invalid(error.to_string()))?;
        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(invalid(format!("unsupported scheme `{other}`"))),
        }
    }

    /// Return the request timeout.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ZeroTimeout`] when the timeout is zero.
    pub const fn request_timeout(&self) -> Result<Duration, ConfigError> {
        match self.request_timeout_secs {
            0 => Err(ConfigError::ZeroTimeout),
            secs => Ok(Duration::from_secs(secs)),
        }
    }

    /// Return the credential directory, falling back to `.portal`.
    pub fn credential_dir(&self) -> PathBuf {
        self.credential_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CREDENTIAL_DIR))
    }

    /// Transport settings for the API client.
    ///
    /// # Errors
    ///
    /// Propagates [`ConfigError`] from the individual accessors.
    pub fn api_client_config(&self) -> Result<ApiClientConfig, ConfigError> {
        let mut config = ApiClientConfig::new(self.api_base_url()?);
        config.timeout = self.request_timeout()?;
        Ok(config)
    }
}
