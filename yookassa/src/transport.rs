//! The network seam of the client.
//!
//! The [`RequestEngine`](crate::engine::RequestEngine) prepares a fully
//! described [`HttpRequest`] (URL, credentials, idempotence key, timeout)
//! and hands it to a [`Transport`], which performs exactly one HTTP attempt
//! and returns the status and raw body. All protocol decisions stay in the
//! engine, so a transport only moves bytes.
//!
//! [`ReqwestTransport`] is the production implementation. Tests substitute
//! their own transport through [`Client::with_transport`](crate::Client::with_transport).

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use http::{Method, StatusCode};
use serde_json::Value;
use url::Url;

use crate::constants::IDEMPOTENCE_KEY_HEADER;
use crate::error::{TransportError, TransportErrorKind};
use crate::idempotence::IdempotenceKey;

/// A boxed, `Send` future borrowed for `'a`.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// HTTP Basic credentials attached to every attempt.
#[derive(Clone, PartialEq, Eq)]
pub struct BasicAuth {
    /// Shop identifier.
    pub username: String,
    /// Secret key.
    pub password: String,
}

impl std::fmt::Debug for BasicAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BasicAuth")
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

/// One fully prepared HTTP attempt.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    /// HTTP method.
    pub method: Method,
    /// Absolute request URL.
    pub url: Url,
    /// JSON body, `None` for requests without one.
    pub body: Option<Value>,
    /// Value of the `Idempotence-Key` header.
    pub idempotence_key: IdempotenceKey,
    /// Basic authentication credentials.
    pub auth: BasicAuth,
    /// Timeout for this attempt.
    pub timeout: Duration,
}

/// Status and raw body of one HTTP attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// Response status.
    pub status: StatusCode,
    /// Response body as text; empty when the server sent none.
    pub body: String,
}

/// Performs single HTTP attempts on behalf of the request engine.
///
/// Implementations must not retry, interpret statuses, or decode bodies.
pub trait Transport: Send + Sync {
    /// Sends one request and returns the response, whatever its status.
    fn send<'a>(
        &'a self,
        request: &'a HttpRequest,
    ) -> BoxFuture<'a, Result<HttpResponse, TransportError>>;
}

/// [`Transport`] backed by a shared [`reqwest::Client`].
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Creates a transport with a default `reqwest` client.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a transport over a pre-configured `reqwest` client.
    #[must_use]
    pub const fn from_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    async fn send_inner(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        let mut req = self
            .client
            .request(request.method.clone(), request.url.clone())
            .basic_auth(&request.auth.username, Some(&request.auth.password))
            .header(IDEMPOTENCE_KEY_HEADER, request.idempotence_key.as_str())
            .timeout(request.timeout);
        if let Some(body) = &request.body {
            req = req.json(body);
        }

        let response = req.send().await?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| TransportError::new(TransportErrorKind::Body, e))?;

        Ok(HttpResponse { status, body })
    }
}

impl Transport for ReqwestTransport {
    fn send<'a>(
        &'a self,
        request: &'a HttpRequest,
    ) -> BoxFuture<'a, Result<HttpResponse, TransportError>> {
        Box::pin(self.send_inner(request))
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        let kind = if err.is_timeout() {
            TransportErrorKind::Timeout
        } else if err.is_connect() {
            TransportErrorKind::Connect
        } else if err.is_body() || err.is_decode() {
            TransportErrorKind::Body
        } else {
            TransportErrorKind::Other
        };
        Self::new(kind, err)
    }
}
