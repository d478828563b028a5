//! The request execution engine.
//!
//! Every API call goes through [`RequestEngine::execute`], which
//!
//! 1. fixes the idempotence key of the logical call (caller-supplied or a
//!    fresh v4 UUID),
//! 2. resolves the path against the configured base URL,
//! 3. attaches Basic credentials, the `Idempotence-Key` header and the
//!    per-attempt timeout,
//! 4. follows the gateway's pending protocol: a `202 Accepted` answer means
//!    the operation is still being processed, and the identical request is
//!    re-sent after the `retry_after` milliseconds named in the body,
//! 5. decodes success bodies and hands everything else to the
//!    [`ErrorClassifier`].
//!
//! The pending loop is bounded by the [`PendingPolicy`] of the config and
//! fails with [`GatewayError::PendingTimeout`] once a bound is hit.

use std::sync::Arc;
use std::time::Duration;

use http::{Method, StatusCode};
use serde_json::Value;

use crate::classifier::{ErrorClassifier, StandardClassifier};
use crate::config::{ClientConfig, PendingPolicy};
use crate::constants::RETRY_AFTER_FIELD;
use crate::error::{DecodeError, GatewayError};
use crate::idempotence::IdempotenceKey;
use crate::transport::{BasicAuth, HttpRequest, HttpResponse, Transport};

/// Executes logical API calls over a [`Transport`].
pub struct RequestEngine<T> {
    config: ClientConfig,
    transport: T,
    classifier: Arc<dyn ErrorClassifier>,
}

impl<T: Clone> Clone for RequestEngine<T> {
    fn clone(&self) -> Self {
        Self {
            config: self.config.clone(),
            transport: self.transport.clone(),
            classifier: Arc::clone(&self.classifier),
        }
    }
}

impl<T> std::fmt::Debug for RequestEngine<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestEngine")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl<T: Transport> RequestEngine<T> {
    /// Creates an engine with the [`StandardClassifier`].
    pub fn new(config: ClientConfig, transport: T) -> Self {
        Self {
            config,
            transport,
            classifier: Arc::new(StandardClassifier),
        }
    }

    /// Replaces the error classifier.
    #[must_use]
    pub fn with_classifier(mut self, classifier: impl ErrorClassifier + 'static) -> Self {
        self.classifier = Arc::new(classifier);
        self
    }

    /// Returns the configuration.
    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Returns the underlying transport.
    pub const fn transport(&self) -> &T {
        &self.transport
    }

    /// Executes one logical call and returns the decoded response body.
    ///
    /// `body` is sent as JSON when present. All pending-protocol attempts
    /// reuse the same request, idempotence key included.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError`] for transport failures, undecodable bodies,
    /// rejected requests, or an exhausted pending policy.
    #[cfg_attr(
        feature = "telemetry",
        tracing::instrument(name = "yookassa.execute", skip_all, fields(method = %method, path = %path), err)
    )]
    pub async fn execute(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
        idempotence_key: Option<IdempotenceKey>,
    ) -> Result<Value, GatewayError> {
        let request = self.prepare(method, path, body, idempotence_key)?;

        if self.config.debug_logging() {
            tracing::info!(method = %request.method, url = %request.url, "{}: {}", request.method, request.url);
        } else {
            tracing::debug!(method = %request.method, url = %request.url, "Sending request");
        }

        let policy = self.config.pending();
        let mut attempts = 0u32;
        let mut waited = Duration::ZERO;

        loop {
            attempts += 1;
            let response = self.transport.send(&request).await?;

            if response.status != StatusCode::ACCEPTED {
                if attempts > 1 {
                    tracing::debug!(attempts, "Pending operation completed");
                }
                return self.finish(response);
            }

            let delay = retry_after(&response.body, policy);
            if attempts >= policy.max_attempts.max(1) || waited + delay > policy.max_wait {
                tracing::warn!(
                    attempts,
                    waited_ms = waited.as_millis(),
                    idempotence_key = %request.idempotence_key,
                    "Giving up on pending operation"
                );
                return Err(GatewayError::PendingTimeout { attempts, waited });
            }

            tracing::debug!(
                attempt = attempts,
                retry_after_ms = delay.as_millis(),
                idempotence_key = %request.idempotence_key,
                "Operation pending, retrying"
            );
            tokio::time::sleep(delay).await;
            waited += delay;
        }
    }

    /// Builds the single HTTP request shared by every attempt of a logical call.
    fn prepare(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
        idempotence_key: Option<IdempotenceKey>,
    ) -> Result<HttpRequest, GatewayError> {
        let url = self
            .config
            .base_url()
            .join(path)
            .map_err(|source| GatewayError::Url {
                context: "failed to join request path onto base URL",
                source,
            })?;

        Ok(HttpRequest {
            method,
            url,
            body,
            idempotence_key: idempotence_key.unwrap_or_else(IdempotenceKey::generate),
            auth: BasicAuth {
                username: self.config.shop_id().to_owned(),
                password: self.config.secret_key().to_owned(),
            },
            timeout: self.config.timeout(),
        })
    }

    fn finish(&self, response: HttpResponse) -> Result<Value, GatewayError> {
        let HttpResponse { status, body } = response;

        if !status.is_success() {
            let err = self.classifier.classify(status, &body);
            tracing::debug!(%status, error = %err, "Request rejected");
            return Err(err);
        }

        if body.trim().is_empty() {
            return Ok(Value::Null);
        }

        serde_json::from_str(&body).map_err(|source| {
            GatewayError::Decode(DecodeError::new(
                Some(status),
                "malformed success response body",
                body,
                source,
            ))
        })
    }
}

/// Reads the delay requested by a `202 Accepted` body.
///
/// Accepts an integer or fractional number of milliseconds, bare or as a
/// numeric string; anything else falls back to
/// [`PendingPolicy::default_retry_after`].
fn retry_after(body: &str, policy: &PendingPolicy) -> Duration {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|value| match value.get(RETRY_AFTER_FIELD)? {
            Value::Number(n) => n
                .as_u64()
                .map(Duration::from_millis)
                .or_else(|| n.as_f64().and_then(fractional_millis)),
            Value::String(s) => {
                let s = s.trim();
                s.parse()
                    .ok()
                    .map(Duration::from_millis)
                    .or_else(|| s.parse().ok().and_then(fractional_millis))
            }
            _ => None,
        })
        .unwrap_or(policy.default_retry_after)
}

fn fractional_millis(ms: f64) -> Option<Duration> {
    if ms.is_finite() && ms >= 0.0 {
        Duration::try_from_secs_f64(ms / 1000.0).ok()
    } else {
        None
    }
}
