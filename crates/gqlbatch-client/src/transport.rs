//! The network seam.
//!
//! [`Transport`] takes a serialized request body plus extra headers and
//! yields a status code and a response body. Endpoint, authentication and
//! retry policy belong to the implementation, not to the executor.
//! [`HttpTransport`] is the reqwest-backed implementation.

use std::sync::Arc;

use async_trait::async_trait;
use indexmap::IndexMap;
use url::Url;

use crate::config::ClientConfig;
use crate::Result;

/// Extra request headers, applied in order.
pub type Headers = IndexMap<String, String>;

/// What came back from the server, before any GraphQL interpretation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

impl TransportResponse {
    #[must_use]
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Status 400 and above.
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.status >= 400
    }
}

/// Sends one serialized GraphQL request.
///
/// The returned future may be dropped before it completes; implementations
/// must tolerate that and release the in-flight request.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, body: String, headers: &Headers) -> Result<TransportResponse>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    async fn send(&self, body: String, headers: &Headers) -> Result<TransportResponse> {
        (**self).send(body, headers).await
    }
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Box<T> {
    async fn send(&self, body: String, headers: &Headers) -> Result<TransportResponse> {
        (**self).send(body, headers).await
    }
}

/// HTTP POST transport.
///
/// Every request carries `content-type: application/json` and an `origin`
/// derived from the endpoint's scheme and host, unless the configured or
/// per-call headers already set them.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http: reqwest::Client,
    endpoint: Url,
    headers: Headers,
}

impl HttpTransport {
    #[must_use]
    pub fn new(endpoint: Url) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint,
            headers: Headers::new(),
        }
    }

    #[must_use]
    pub fn from_config(config: &ClientConfig) -> Self {
        Self {
            headers: config.headers.clone(),
            ..Self::new(config.endpoint.clone())
        }
    }

    /// Adds a header sent with every request.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    #[must_use]
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Configured headers, then per-call headers, then the defaults for
    /// whatever neither supplied. Names compare case-insensitively; a
    /// per-call header replaces a configured one of the same name.
    fn request_headers(&self, extra: &Headers) -> Headers {
        let mut headers = self.headers.clone();
        for (name, value) in extra {
            headers.retain(|existing, _| !existing.eq_ignore_ascii_case(name));
            headers.insert(name.clone(), value.clone());
        }

        if !contains_header(&headers, "content-type") {
            headers.insert("content-type".into(), "application/json".into());
        }
        if !contains_header(&headers, "origin")
            && let Some(origin) = origin_of(&self.endpoint)
        {
            headers.insert("origin".into(), origin);
        }
        headers
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, body: String, headers: &Headers) -> Result<TransportResponse> {
        let mut req = self.http.post(self.endpoint.clone());
        for (name, value) in self.request_headers(headers) {
            req = req.header(name, value);
        }

        let resp = req.body(body).send().await?;
        let status = resp.status().as_u16();
        let body = resp.text().await?;
        Ok(TransportResponse { status, body })
    }
}

fn contains_header(headers: &Headers, name: &str) -> bool {
    headers.keys().any(|k| k.eq_ignore_ascii_case(name))
}

/// `<scheme>://<host>` of the endpoint; the port is not included.
fn origin_of(url: &Url) -> Option<String> {
    url.host_str()
        .map(|host| format!("{}://{}", url.scheme(), host))
}
