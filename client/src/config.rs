//! Client configuration loaded via OrthoConfig.

use std::time::Duration;

use camino::Utf8PathBuf;
use ortho_config::OrthoConfig;
use serde::Deserialize;
use url::Url;

use crate::outbound::http::HttpGatewayConfig;

/// Server origin used when none is configured.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8001";
const DEFAULT_CREDENTIALS_DIR: &str = ".marquee";

/// Errors raised while interpreting settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    /// The base URL does not parse.
    #[error("invalid API base URL {value:?}: {source}")]
    InvalidBaseUrl {
        /// Configured value.
        value: String,
        /// Parser failure.
        #[source]
        source: url::ParseError,
    },
}

/// Configuration values for the client and its terminal front-end.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "MARQUEE")]
pub struct ClientSettings {
    /// Remote API origin, without the `/api` suffix.
    #[ortho_config(default = DEFAULT_API_BASE_URL.to_owned())]
    pub api_base_url: String,
    /// Directory holding the persisted credential.
    pub credentials_dir: Option<String>,
    /// Per-request timeout in seconds. Unset or zero means no timeout.
    pub request_timeout_secs: Option<u64>,
}

impl ClientSettings {
    /// Configured origin; [`DEFAULT_API_BASE_URL`] unless overridden.
    ///
    /// # Errors
    ///
    /// [`SettingsError::InvalidBaseUrl`] when the value is not a URL.
    pub fn api_base_url(&self) -> Result<Url, SettingsError> {
        let raw = self.api_base_url.as_str();
        Url::parse(raw).map_err(|source| SettingsError::InvalidBaseUrl {
            value: raw.to_owned(),
            source,
        })
    }

    /// Credential directory, falling back to `.marquee`.
    pub fn credentials_dir(&self) -> Utf8PathBuf {
        Utf8PathBuf::from(
            self.credentials_dir
                .as_deref()
                .unwrap_or(DEFAULT_CREDENTIALS_DIR),
        )
    }

    /// Per-request timeout, if one is configured.
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }

    /// Gateway settings derived from this configuration.
    ///
    /// # Errors
    ///
    /// As [`Self::api_base_url`].
    pub fn gateway_config(&self) -> Result<HttpGatewayConfig, SettingsError> {
        let config = HttpGatewayConfig::new(self.api_base_url()?);
        Ok(match self.request_timeout() {
            Some(timeout) => config.with_timeout(timeout),
            None => config,
        })
    }
}
