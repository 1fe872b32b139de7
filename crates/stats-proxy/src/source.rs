//! Upstream statistics port and its reqwest adapter.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::debug;
use url::Url;
use zeroize::Zeroizing;

/// Failures fetching statistics from upstream.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StatsSourceError {
    /// Upstream answered outside 2xx.
    #[error("upstream answered with status {status}")]
    Status {
        /// HTTP status returned by upstream.
        status: u16,
    },
    /// The request did not complete.
    #[error("upstream request failed: {message}")]
    Transport {
        /// Transport failure description.
        message: String,
    },
    /// Upstream answered 2xx with a body that is not JSON.
    #[error("upstream body is not JSON: {message}")]
    Decode {
        /// Parser failure description.
        message: String,
    },
}

/// Source of bot statistics.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StatsSource: Send + Sync {
    /// Fetch the current statistics document.
    async fn fetch(&self) -> Result<Value, StatsSourceError>;
}

/// Adapter calling the third-party statistics API.
pub struct HttpStatsSource {
    client: Client,
    url: Url,
    token: Zeroizing<String>,
}

impl HttpStatsSource {
    /// Build an adapter for `url` authenticating with `token`.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(url: Url, token: Zeroizing<String>) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .user_agent(concat!("stats-proxy/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client, url, token })
    }
}

#[async_trait]
impl StatsSource for HttpStatsSource {
    async fn fetch(&self) -> Result<Value, StatsSourceError> {
        let response = self
            .client
            .get(self.url.clone())
            .bearer_auth(self.token.as_str())
            .send()
            .await
            .map_err(|error| StatsSourceError::Transport {
                message: error.to_string(),
            })?;
        let status = response.status();
        debug!(status = status.as_u16(), "upstream statistics response");
        if !status.is_success() {
            return Err(StatsSourceError::Status {
                status: status.as_u16(),
            });
        }
        let body = response
            .bytes()
            .await
            .map_err(|error| StatsSourceError::Transport {
                message: error.to_string(),
            })?;
        serde_json::from_slice(&body).map_err(|error| StatsSourceError::Decode {
            message: error.to_string(),
        })
    }
}
