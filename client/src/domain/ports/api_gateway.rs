//! Port for the single chokepoint all remote calls go through.
//!
//! The gateway owns transport concerns only: attaching the bearer token,
//! JSON encoding, and folding every failure into [`Error`]. It never retries.

use std::fmt;

use async_trait::async_trait;
use serde_json::Value;
use url::form_urlencoded;

use crate::domain::Error;

/// HTTP verbs used by the remote API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    /// `GET`
    Get,
    /// `POST`
    Post,
    /// `PUT`
    Put,
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
        })
    }
}

/// Transport-neutral request addressed relative to the API root.
///
/// # Examples
/// ```
/// use client::domain::ports::{ApiRequest, HttpMethod};
///
/// let request = ApiRequest::get("/content/search")
///     .with_query("q", "the witcher")
///     .with_query("page", "1");
/// assert_eq!(request.method(), HttpMethod::Get);
/// assert_eq!(request.target(), "/content/search?q=the+witcher&page=1");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    method: HttpMethod,
    path: String,
    query: Vec<(String, String)>,
    body: Option<Value>,
}

impl ApiRequest {
    fn new(method: HttpMethod, path: impl Into<String>, body: Option<Value>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body,
        }
    }

    /// `GET` request without a body.
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, path, None)
    }

    /// `POST` request with a JSON body.
    pub fn post(path: impl Into<String>, body: Value) -> Self {
        Self::new(HttpMethod::Post, path, Some(body))
    }

    /// `PUT` request with a JSON body.
    pub fn put(path: impl Into<String>, body: Value) -> Self {
        Self::new(HttpMethod::Put, path, Some(body))
    }

    /// Append a query parameter. Values are encoded by [`Self::target`] and
    /// by gateway adapters, never by callers.
    #[must_use]
    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Request method.
    pub fn method(&self) -> HttpMethod {
        self.method
    }

    /// Path below the API root, starting with `/`.
    pub fn path(&self) -> &str {
        self.path.as_str()
    }

    /// Raw (unencoded) query pairs in insertion order.
    pub fn query(&self) -> &[(String, String)] {
        self.query.as_slice()
    }

    /// JSON body, if any.
    pub fn body(&self) -> Option<&Value> {
        self.body.as_ref()
    }

    /// Path plus form-urlencoded query string.
    pub fn target(&self) -> String {
        if self.query.is_empty() {
            return self.path.clone();
        }
        let encoded = form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.query.iter())
            .finish();
        format!("{}?{encoded}", self.path)
    }
}

/// Single entry point for remote calls.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ApiGateway: Send + Sync {
    /// Issue `request` and return the decoded JSON body.
    ///
    /// # Errors
    ///
    /// [`ErrorKind::Network`](crate::domain::ErrorKind::Network) when no
    /// response arrived; [`ErrorKind::Remote`](crate::domain::ErrorKind::Remote)
    /// for non-2xx statuses or bodies that are not JSON.
    async fn call(&self, request: ApiRequest) -> Result<Value, Error>;
}
