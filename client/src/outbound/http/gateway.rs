//! Reqwest-backed API gateway adapter.
//!
//! This adapter owns transport details only: URL resolution under the API
//! root, bearer authentication, JSON encoding and mapping every failure into
//! the domain [`Error`].

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, StatusCode, Url};
use serde_json::Value;
use tracing::{debug, warn};

use crate::domain::Error;
use crate::domain::ports::{ApiGateway, ApiRequest, CredentialStore, HttpMethod};

const DEFAULT_USER_AGENT: &str = concat!("marquee-client/", env!("CARGO_PKG_VERSION"));
const API_PREFIX: &str = "api/";

/// Connection settings for [`HttpApiGateway`].
#[derive(Debug, Clone)]
pub struct HttpGatewayConfig {
    /// Server origin; requests go to `<base_url>/api/...`.
    pub base_url: Url,
    /// Per-request timeout. `None` leaves requests unbounded.
    pub timeout: Option<Duration>,
    /// HTTP user-agent.
    pub user_agent: String,
}

impl HttpGatewayConfig {
    /// Settings for `base_url` with no timeout.
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            timeout: None,
            user_agent: DEFAULT_USER_AGENT.to_owned(),
        }
    }

    /// Bound each request by `timeout`.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// Gateway adapter that performs JSON requests against the remote API.
pub struct HttpApiGateway<S> {
    client: Client,
    api_root: Url,
    credentials: Arc<S>,
}

impl<S> HttpApiGateway<S> {
    /// Build an adapter reading its bearer token from `credentials`.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(config: HttpGatewayConfig, credentials: Arc<S>) -> Result<Self, reqwest::Error> {
        let mut builder = Client::builder().user_agent(config.user_agent);
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
            api_root: api_root(config.base_url),
            credentials,
        })
    }

    fn endpoint(&self, request: &ApiRequest) -> Result<Url, Error> {
        let mut url = self
            .api_root
            .join(request.path().trim_start_matches('/'))
            .map_err(|error| {
                Error::validation(format!("invalid request path {:?}: {error}", request.path()))
            })?;
        if !request.query().is_empty() {
            url.query_pairs_mut().extend_pairs(request.query());
        }
        Ok(url)
    }
}

fn api_root(mut base: Url) -> Url {
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    base.set_query(None);
    base.join(API_PREFIX).unwrap_or(base)
}

fn method(method: HttpMethod) -> Method {
    match method {
        HttpMethod::Get => Method::GET,
        HttpMethod::Post => Method::POST,
        HttpMethod::Put => Method::PUT,
    }
}

#[async_trait]
impl<S: CredentialStore> ApiGateway for HttpApiGateway<S> {
    async fn call(&self, request: ApiRequest) -> Result<Value, Error> {
        let url = self.endpoint(&request)?;
        let mut builder = self
            .client
            .request(method(request.method()), url)
            .header(reqwest::header::ACCEPT, "application/json");
        match self.credentials.token() {
            Ok(Some(token)) => builder = builder.bearer_auth(token.expose()),
            Ok(None) => {}
            Err(error) => warn!(error = %error, "credential unreadable; sending unauthenticated"),
        }
        if let Some(body) = request.body() {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(map_transport_error)?;
        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        debug!(
            method = %request.method(),
            path = request.path(),
            status = status.as_u16(),
            "remote call completed"
        );
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref()));
        }
        parse_body(body.as_ref())
    }
}

fn map_transport_error(error: reqwest::Error) -> Error {
    if error.is_timeout() {
        Error::network(format!("request timed out: {error}"))
    } else {
        Error::network(error.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> Error {
    let parsed = serde_json::from_slice::<Value>(body).ok();
    Error::from_remote_body(status.as_u16(), parsed.as_ref())
}

fn parse_body(body: &[u8]) -> Result<Value, Error> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Null);
    }
    serde_json::from_slice(body).map_err(|error| Error::remote(format!("malformed response: {error}")))
}
