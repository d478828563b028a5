//! Translation of failed HTTP exchanges into [`GatewayError`]s.
//!
//! The request engine calls its [`ErrorClassifier`] for every non-success,
//! non-pending response. Classification is pure: no I/O, no retries.
//!
//! [`StandardClassifier`] implements the gateway's documented error shape:
//!
//! | Status | Body | Result |
//! |---|---|---|
//! | 404 | anything | [`GatewayError::NotFound`] with the raw body |
//! | other | structured error | [`GatewayError::Authentication`], [`GatewayError::Validation`] or [`GatewayError::Rejected`] |
//! | other | not a structured error | [`GatewayError::Decode`] |
//!
//! Not-found responses are deliberately left unnormalized; callers match on
//! [`GatewayError::NotFound`] instead of an error code.

use http::StatusCode;

use crate::error::{ApiError, ApiErrorBody, DecodeError, GatewayError, StatusError};

/// Maps a non-success response to exactly one [`GatewayError`].
pub trait ErrorClassifier: Send + Sync {
    /// Classifies a response with the given status and raw body.
    fn classify(&self, status: StatusCode, body: &str) -> GatewayError;
}

/// The default classifier for YooKassa error bodies.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardClassifier;

impl ErrorClassifier for StandardClassifier {
    fn classify(&self, status: StatusCode, body: &str) -> GatewayError {
        if status == StatusCode::NOT_FOUND {
            return GatewayError::NotFound(StatusError {
                status,
                body: body.to_owned(),
            });
        }

        match serde_json::from_str::<ApiErrorBody>(body) {
            Ok(parsed) => route(ApiError::from_body(status, parsed)),
            Err(source) => GatewayError::Decode(DecodeError::new(
                Some(status),
                "error response is not a gateway error body",
                body,
                source,
            )),
        }
    }
}

fn route(error: ApiError) -> GatewayError {
    match error.code.as_str() {
        "invalid_credentials" | "forbidden" => GatewayError::Authentication(error),
        "invalid_request" => GatewayError::Validation(error),
        _ => match error.status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => GatewayError::Authentication(error),
            StatusCode::BAD_REQUEST => GatewayError::Validation(error),
            _ => GatewayError::Rejected(error),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationKind;
    use serde_json::json;

    fn classify(status: u16, body: &serde_json::Value) -> GatewayError {
        StandardClassifier.classify(StatusCode::from_u16(status).unwrap(), &body.to_string())
    }

    #[test]
    fn test_authentication_failed() {
        let err = classify(
            401,
            &json!({
                "type": "error",
                "id": "8c2a4d0e-1f6b-4d3a-9a57-0e5f7f1b2c3d",
                "code": "invalid_credentials",
                "description": "Basic authentication failed",
            }),
        );
        let GatewayError::Authentication(api) = err else {
            panic!("expected authentication error");
        };
        assert_eq!(api.code, "invalid_credentials");
        assert_eq!(api.description, "Basic authentication failed");
        assert_eq!(api.id, "8c2a4d0e-1f6b-4d3a-9a57-0e5f7f1b2c3d");
        assert_eq!(api.error_type, "error");
        assert_eq!(api.parameter, None);
    }

    #[test]
    fn test_duplicate_key_is_validation() {
        let err = classify(
            400,
            &json!({
                "type": "error",
                "id": "c1",
                "code": "invalid_request",
                "description": "Idempotence key duplicated",
            }),
        );
        let GatewayError::Validation(api) = err else {
            panic!("expected validation error");
        };
        assert_eq!(api.code, "invalid_request");
        assert_eq!(api.validation_kind(), ValidationKind::DuplicateIdempotenceKey);
    }

    #[test]
    fn test_missing_field_keeps_parameter() {
        let err = classify(
            400,
            &json!({
                "type": "error",
                "id": "c2",
                "code": "invalid_request",
                "description": "Missing confirmation type for payment method type: bank_card",
                "parameter": "confirmation.type",
            }),
        );
        let api = err.api_error().unwrap();
        assert_eq!(api.parameter.as_deref(), Some("confirmation.type"));
        assert_eq!(api.validation_kind(), ValidationKind::MissingField);
    }

    #[test]
    fn test_not_found_is_not_normalized() {
        let body = json!({
            "type": "error",
            "id": "c3",
            "code": "not_found",
            "description": "Payment not found or forbidden",
        });
        let err = classify(404, &body);
        let GatewayError::NotFound(raw) = err else {
            panic!("expected raw not-found error");
        };
        assert_eq!(raw.status, StatusCode::NOT_FOUND);
        assert_eq!(raw.body, body.to_string());
    }

    #[test]
    fn test_other_codes_are_rejected() {
        let err = classify(
            429,
            &json!({
                "type": "error",
                "id": "c4",
                "code": "too_many_requests",
                "description": "Too many requests",
            }),
        );
        assert!(matches!(err, GatewayError::Rejected(ref api) if api.code == "too_many_requests"));
    }

    #[test]
    fn test_status_fallback_for_unknown_code() {
        let err = classify(403, &json!({ "code": "something_new" }));
        assert!(matches!(err, GatewayError::Authentication(_)));
    }

    #[test]
    fn test_unstructured_body_is_decode_error() {
        let err = StandardClassifier.classify(StatusCode::BAD_GATEWAY, "<html>bad gateway</html>");
        let GatewayError::Decode(decode) = err else {
            panic!("expected decode error");
        };
        assert_eq!(decode.status, Some(StatusCode::BAD_GATEWAY));
        assert_eq!(decode.body, "<html>bad gateway</html>");
    }
}
