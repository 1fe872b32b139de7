//! Proxy configuration loaded via OrthoConfig.

use std::net::{Ipv4Addr, SocketAddr};

use ortho_config::OrthoConfig;
use serde::Deserialize;
use url::Url;
use zeroize::Zeroizing;

/// Statistics endpoint used when none is configured.
pub const DEFAULT_UPSTREAM_URL: &str = "https://api.botghost.com/bot/stats";
/// Listening port used when none is configured.
pub const DEFAULT_PORT: u16 = 3000;

/// Errors raised while interpreting settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    /// No upstream token was configured.
    #[error("STATS_PROXY_UPSTREAM_TOKEN must be set")]
    MissingToken,
    /// The upstream URL does not parse.
    #[error("invalid upstream URL {value:?}: {source}")]
    InvalidUpstreamUrl {
        /// Configured value.
        value: String,
        /// Parser failure.
        #[source]
        source: url::ParseError,
    },
}

/// Configuration values for the proxy.
#[derive(Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "STATS_PROXY")]
pub struct ProxySettings {
    /// Bearer token for the upstream API.
    pub upstream_token: Option<String>,
    /// Upstream statistics endpoint.
    pub upstream_url: Option<String>,
    /// Port to listen on, on all interfaces.
    #[ortho_config(default = DEFAULT_PORT)]
    pub port: u16,
}

impl std::fmt::Debug for ProxySettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProxySettings")
            .field(
                "upstream_token",
                &self.upstream_token.as_ref().map(|_| "<redacted>"),
            )
            .field("upstream_url", &self.upstream_url)
            .field("port", &self.port)
            .finish()
    }
}

impl ProxySettings {
    /// Configured token. Blank values count as missing.
    ///
    /// # Errors
    ///
    /// [`SettingsError::MissingToken`] when unset or blank.
    pub fn upstream_token(&self) -> Result<Zeroizing<String>, SettingsError> {
        self.upstream_token
            .as_deref()
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .map(|token| Zeroizing::new(token.to_owned()))
            .ok_or(SettingsError::MissingToken)
    }

    /// Configured endpoint, falling back to [`DEFAULT_UPSTREAM_URL`].
    ///
    /// # Errors
    ///
    /// [`SettingsError::InvalidUpstreamUrl`] when the value is not a URL.
    pub fn upstream_url(&self) -> Result<Url, SettingsError> {
        let raw = self.upstream_url.as_deref().unwrap_or(DEFAULT_UPSTREAM_URL);
        Url::parse(raw).map_err(|source| SettingsError::InvalidUpstreamUrl {
            value: raw.to_owned(),
            source,
        })
    }

    /// Address to bind: every interface on the configured port.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::from((Ipv4Addr::UNSPECIFIED, self.port))
    }
}
