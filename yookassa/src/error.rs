//! Error types for the YooKassa client.
//!
//! Every failed logical call surfaces as exactly one [`GatewayError`]. Structured
//! rejections from the gateway carry an [`ApiError`] with the fields of the
//! error body; lower-level failures carry the raw status, body, or transport
//! error that caused them.

use std::fmt;
use std::time::Duration;

use http::StatusCode;
use serde::Deserialize;

/// Errors returned by every client operation.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// Credentials were rejected (`invalid_credentials`, `forbidden`).
    #[error("authentication failed: {0}")]
    Authentication(ApiError),

    /// The request was rejected as invalid (`invalid_request`).
    #[error("validation failed: {0}")]
    Validation(ApiError),

    /// Any other structured rejection (rate limiting, internal errors, ...).
    #[error("request rejected: {0}")]
    Rejected(ApiError),

    /// The resource does not exist; the raw response is kept as-is.
    #[error("not found: {0}")]
    NotFound(StatusError),

    /// The HTTP exchange itself failed.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// A response body could not be decoded.
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),

    /// The gateway kept answering `202 Accepted` past the pending policy bounds.
    #[error("operation still pending after {attempts} attempts ({waited:?} waited)")]
    PendingTimeout {
        /// Number of attempts issued for the logical call.
        attempts: u32,
        /// Total time spent waiting between attempts.
        waited: Duration,
    },

    /// The request payload could not be encoded as JSON.
    #[error("failed to serialize request body: {0}")]
    Serialize(#[source] serde_json::Error),

    /// The request URL could not be built.
    #[error("URL error: {context}: {source}")]
    Url {
        /// Human-readable context.
        context: &'static str,
        /// The underlying parse error.
        #[source]
        source: url::ParseError,
    },

    /// A resource id that cannot address a resource (empty, `.` or `..`).
    #[error("resource id {id:?} cannot be used as a path segment")]
    InvalidId {
        /// The rejected id.
        id: String,
    },
}

impl GatewayError {
    /// Returns the structured error body, if the gateway sent one.
    #[must_use]
    pub const fn api_error(&self) -> Option<&ApiError> {
        match self {
            Self::Authentication(e) | Self::Validation(e) | Self::Rejected(e) => Some(e),
            _ => None,
        }
    }

    /// Returns the HTTP status that caused the error, if any.
    #[must_use]
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Authentication(e) | Self::Validation(e) | Self::Rejected(e) => Some(e.status),
            Self::NotFound(e) => Some(e.status),
            Self::Decode(e) => e.status,
            _ => None,
        }
    }

    /// Returns `true` for a `404 Not Found` response.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

/// Wire shape of a gateway error body.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiErrorBody {
    #[serde(default, rename = "type")]
    error_type: String,
    #[serde(default)]
    id: String,
    code: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    parameter: Option<String>,
}

/// A structured rejection reported by the gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    /// HTTP status of the response.
    pub status: StatusCode,
    /// Error identifier assigned by the gateway.
    pub id: String,
    /// Body `type` field, normally `"error"`.
    pub error_type: String,
    /// Machine-readable error code (e.g. `invalid_request`).
    pub code: String,
    /// Human-readable description.
    pub description: String,
    /// Name of the offending request parameter, if reported.
    pub parameter: Option<String>,
}

impl ApiError {
    pub(crate) fn from_body(status: StatusCode, body: ApiErrorBody) -> Self {
        Self {
            status,
            id: body.id,
            error_type: body.error_type,
            code: body.code,
            description: body.description,
            parameter: body.parameter,
        }
    }

    /// Classifies a validation failure by its description and parameter.
    #[must_use]
    pub fn validation_kind(&self) -> ValidationKind {
        let description = self.description.to_ascii_lowercase();
        if description.starts_with("idempotence key") {
            if description.contains("duplicat") {
                return ValidationKind::DuplicateIdempotenceKey;
            }
            if description.contains("empty") || description.contains("missing") {
                return ValidationKind::MissingIdempotenceKey;
            }
        }
        if description.starts_with("missing") {
            ValidationKind::MissingField
        } else if self.parameter.is_some() {
            ValidationKind::InvalidParameter
        } else {
            ValidationKind::Other
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}): {}", self.code, self.status, self.description)?;
        if let Some(parameter) = &self.parameter {
            write!(f, " [parameter: {parameter}]")?;
        }
        Ok(())
    }
}

/// Sub-kind of a [`GatewayError::Validation`] failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationKind {
    /// The `Idempotence-Key` header was empty or absent.
    MissingIdempotenceKey,
    /// The key was already used for a different request.
    DuplicateIdempotenceKey,
    /// A required business field was missing.
    MissingField,
    /// A named parameter had an invalid value.
    InvalidParameter,
    /// Anything else.
    Other,
}

/// A raw non-success response that was not normalized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusError {
    /// HTTP status of the response.
    pub status: StatusCode,
    /// Response body as received.
    pub body: String,
}

impl fmt::Display for StatusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HTTP {}: {}", self.status, self.body)
    }
}

impl std::error::Error for StatusError {}

/// Broad category of a [`TransportError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportErrorKind {
    /// The connection could not be established.
    Connect,
    /// The attempt exceeded the configured timeout.
    Timeout,
    /// The response body could not be read.
    Body,
    /// Any other request failure.
    Other,
}

/// Failure of a single HTTP attempt below the HTTP status level.
#[derive(Debug, thiserror::Error)]
#[error("{kind:?}: {source}")]
pub struct TransportError {
    kind: TransportErrorKind,
    #[source]
    source: Box<dyn std::error::Error + Send + Sync>,
}

impl TransportError {
    /// Wraps a transport-level failure.
    pub fn new(
        kind: TransportErrorKind,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self {
            kind,
            source: source.into(),
        }
    }

    /// Returns the failure category.
    #[must_use]
    pub const fn kind(&self) -> TransportErrorKind {
        self.kind
    }

    /// Returns `true` if the attempt timed out.
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        self.kind == TransportErrorKind::Timeout
    }
}

/// A body that was not valid JSON of the expected shape.
#[derive(Debug, thiserror::Error)]
#[error("{context}: {source}")]
pub struct DecodeError {
    /// HTTP status of the response, when the body came from one.
    pub status: Option<StatusCode>,
    /// Human-readable context.
    pub context: &'static str,
    /// Response body as received.
    pub body: String,
    /// The underlying JSON error.
    #[source]
    pub source: serde_json::Error,
}

impl DecodeError {
    pub(crate) fn new(
        status: Option<StatusCode>,
        context: &'static str,
        body: impl Into<String>,
        source: serde_json::Error,
    ) -> Self {
        Self {
            status,
            context,
            body: body.into(),
            source,
        }
    }
}
