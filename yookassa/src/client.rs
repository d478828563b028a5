//! The gateway client.
//!
//! [`Client`] maps each gateway operation to one (method, path, body) triple
//! and runs it through the [`RequestEngine`]. Every operation comes in two
//! flavours: a `*_raw` method returning the decoded JSON body, and a wrapped
//! method returning a [`Payment`] or [`Refund`] bound to the client.
//!
//! ```no_run
//! # async fn demo() -> Result<(), yookassa::GatewayError> {
//! use serde_json::json;
//! use yookassa::Client;
//!
//! let client = Client::new("your_shop_id", "your_secret_key");
//! let mut payment = client
//!     .create_payment(
//!         &json!({
//!             "amount": { "value": "2.00", "currency": "RUB" },
//!             "payment_method_data": { "type": "bank_card" },
//!             "confirmation": { "type": "redirect", "return_url": "https://example.com" }
//!         }),
//!         None,
//!     )
//!     .await?;
//! payment.reload().await?;
//! # Ok(())
//! # }
//! ```

use http::Method;
use serde::Serialize;
use serde_json::{Value, json};

use crate::classifier::ErrorClassifier;
use crate::config::ClientConfig;
use crate::engine::RequestEngine;
use crate::error::GatewayError;
use crate::idempotence::IdempotenceKey;
use crate::resource::{Amount, Payment, Refund};
use crate::transport::{ReqwestTransport, Transport};

/// Client for the YooKassa API.
///
/// Cloning is cheap when the transport is; the default [`ReqwestTransport`]
/// shares its connection pool between clones.
pub struct Client<T = ReqwestTransport> {
    engine: RequestEngine<T>,
}

impl<T: Clone> Clone for Client<T> {
    fn clone(&self) -> Self {
        Self {
            engine: self.engine.clone(),
        }
    }
}

impl<T> std::fmt::Debug for Client<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client").field("engine", &self.engine).finish()
    }
}

impl Client {
    /// Creates a client for the production endpoint with default settings.
    #[must_use]
    pub fn new(shop_id: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self::from_config(ClientConfig::new(shop_id, secret_key))
    }

    /// Creates a client from a prepared configuration.
    #[must_use]
    pub fn from_config(config: ClientConfig) -> Self {
        Self::with_transport(config, ReqwestTransport::new())
    }
}

impl<T: Transport> Client<T> {
    /// Creates a client over a custom [`Transport`].
    pub fn with_transport(config: ClientConfig, transport: T) -> Self {
        Self {
            engine: RequestEngine::new(config, transport),
        }
    }

    /// Replaces the error classifier.
    #[must_use]
    pub fn with_classifier(self, classifier: impl ErrorClassifier + 'static) -> Self {
        Self {
            engine: self.engine.with_classifier(classifier),
        }
    }

    /// Returns the configuration.
    pub const fn config(&self) -> &ClientConfig {
        self.engine.config()
    }

    /// Returns the request engine.
    pub const fn engine(&self) -> &RequestEngine<T> {
        &self.engine
    }

    /// Creates a payment from a caller-supplied payload.
    ///
    /// The payload is sent as-is; the gateway validates it.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Serialize`] if the payload cannot be
    /// serialized, otherwise any error of the call.
    pub async fn create_payment<P>(
        &self,
        payload: &P,
        idempotence_key: Option<IdempotenceKey>,
    ) -> Result<Payment<'_, T>, GatewayError>
    where
        P: Serialize + Sync + ?Sized,
    {
        let body = self.create_payment_raw(payload, idempotence_key).await?;
        Payment::from_body(self, body)
    }

    /// Like [`create_payment`](Self::create_payment), returning the raw body.
    ///
    /// # Errors
    ///
    /// See [`create_payment`](Self::create_payment).
    #[cfg_attr(
        feature = "telemetry",
        tracing::instrument(name = "yookassa.create_payment", skip_all, err)
    )]
    pub async fn create_payment_raw<P>(
        &self,
        payload: &P,
        idempotence_key: Option<IdempotenceKey>,
    ) -> Result<Value, GatewayError>
    where
        P: Serialize + Sync + ?Sized,
    {
        let body = serde_json::to_value(payload).map_err(GatewayError::Serialize)?;
        self.engine
            .execute(Method::POST, "payments", Some(body), idempotence_key)
            .await
    }

    /// Retrieves a payment.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::NotFound`] for unknown ids, otherwise any
    /// error of the call.
    pub async fn get_payment(
        &self,
        payment_id: &str,
        idempotence_key: Option<IdempotenceKey>,
    ) -> Result<Payment<'_, T>, GatewayError> {
        let body = self.get_payment_raw(payment_id, idempotence_key).await?;
        Payment::from_body(self, body)
    }

    /// Like [`get_payment`](Self::get_payment), returning the raw body.
    ///
    /// # Errors
    ///
    /// See [`get_payment`](Self::get_payment).
    #[cfg_attr(
        feature = "telemetry",
        tracing::instrument(name = "yookassa.get_payment", skip(self, idempotence_key), err)
    )]
    pub async fn get_payment_raw(
        &self,
        payment_id: &str,
        idempotence_key: Option<IdempotenceKey>,
    ) -> Result<Value, GatewayError> {
        let path = format!("payments/{}", encode_segment(payment_id)?);
        self.engine
            .execute(Method::GET, &path, None, idempotence_key)
            .await
    }

    /// Captures a payment awaiting capture.
    ///
    /// Without an amount the gateway captures the full authorized amount.
    ///
    /// # Errors
    ///
    /// Returns any error of the call.
    pub async fn capture_payment(
        &self,
        payment_id: &str,
        amount: Option<&Amount>,
        idempotence_key: Option<IdempotenceKey>,
    ) -> Result<Payment<'_, T>, GatewayError> {
        let amount = amount.map(Amount::to_value);
        let body = self
            .capture_payment_raw(payment_id, amount.as_ref(), idempotence_key)
            .await?;
        Payment::from_body(self, body)
    }

    /// Like [`capture_payment`](Self::capture_payment), taking the amount as
    /// raw JSON and returning the raw body.
    ///
    /// # Errors
    ///
    /// See [`capture_payment`](Self::capture_payment).
    #[cfg_attr(
        feature = "telemetry",
        tracing::instrument(name = "yookassa.capture_payment", skip(self, amount, idempotence_key), err)
    )]
    pub async fn capture_payment_raw(
        &self,
        payment_id: &str,
        amount: Option<&Value>,
        idempotence_key: Option<IdempotenceKey>,
    ) -> Result<Value, GatewayError> {
        let path = format!("payments/{}/capture", encode_segment(payment_id)?);
        let body = amount.map_or_else(|| json!({}), |amount| json!({ "amount": amount }));
        self.engine
            .execute(Method::POST, &path, Some(body), idempotence_key)
            .await
    }

    /// Cancels a payment.
    ///
    /// # Errors
    ///
    /// Returns any error of the call.
    pub async fn cancel_payment(
        &self,
        payment_id: &str,
        idempotence_key: Option<IdempotenceKey>,
    ) -> Result<Payment<'_, T>, GatewayError> {
        let body = self.cancel_payment_raw(payment_id, idempotence_key).await?;
        Payment::from_body(self, body)
    }

    /// Like [`cancel_payment`](Self::cancel_payment), returning the raw body.
    ///
    /// # Errors
    ///
    /// See [`cancel_payment`](Self::cancel_payment).
    #[cfg_attr(
        feature = "telemetry",
        tracing::instrument(name = "yookassa.cancel_payment", skip(self, idempotence_key), err)
    )]
    pub async fn cancel_payment_raw(
        &self,
        payment_id: &str,
        idempotence_key: Option<IdempotenceKey>,
    ) -> Result<Value, GatewayError> {
        let path = format!("payments/{}/cancel", encode_segment(payment_id)?);
        self.engine
            .execute(Method::POST, &path, Some(json!({})), idempotence_key)
            .await
    }

    /// Refunds a payment, fully or partially.
    ///
    /// # Errors
    ///
    /// Returns any error of the call.
    pub async fn create_refund(
        &self,
        payment_id: &str,
        amount: Option<&Amount>,
        idempotence_key: Option<IdempotenceKey>,
    ) -> Result<Refund<'_, T>, GatewayError> {
        let amount = amount.map(Amount::to_value);
        let body = self
            .create_refund_raw(payment_id, amount.as_ref(), idempotence_key)
            .await?;
        Refund::from_body(self, body)
    }

    /// Like [`create_refund`](Self::create_refund), taking the amount as raw
    /// JSON and returning the raw body.
    ///
    /// # Errors
    ///
    /// See [`create_refund`](Self::create_refund).
    #[cfg_attr(
        feature = "telemetry",
        tracing::instrument(name = "yookassa.create_refund", skip(self, amount, idempotence_key), err)
    )]
    pub async fn create_refund_raw(
        &self,
        payment_id: &str,
        amount: Option<&Value>,
        idempotence_key: Option<IdempotenceKey>,
    ) -> Result<Value, GatewayError> {
        let mut body = json!({ "payment_id": payment_id });
        if let (Some(amount), Value::Object(map)) = (amount, &mut body) {
            map.insert("amount".to_owned(), amount.clone());
        }
        self.engine
            .execute(Method::POST, "refunds", Some(body), idempotence_key)
            .await
    }

    /// Retrieves a refund.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::NotFound`] for unknown ids, otherwise any
    /// error of the call.
    pub async fn get_refund(
        &self,
        refund_id: &str,
        idempotence_key: Option<IdempotenceKey>,
    ) -> Result<Refund<'_, T>, GatewayError> {
        let body = self.get_refund_raw(refund_id, idempotence_key).await?;
        Refund::from_body(self, body)
    }

    /// Like [`get_refund`](Self::get_refund), returning the raw body.
    ///
    /// # Errors
    ///
    /// See [`get_refund`](Self::get_refund).
    #[cfg_attr(
        feature = "telemetry",
        tracing::instrument(name = "yookassa.get_refund", skip(self, idempotence_key), err)
    )]
    pub async fn get_refund_raw(
        &self,
        refund_id: &str,
        idempotence_key: Option<IdempotenceKey>,
    ) -> Result<Value, GatewayError> {
        let path = format!("refunds/{}", encode_segment(refund_id)?);
        self.engine
            .execute(Method::GET, &path, None, idempotence_key)
            .await
    }
}

/// Percent-encodes one path segment.
///
/// Empty, `.` and `..` ids are rejected: URL joining resolves dot segments
/// (escaped or not) as relative references, which would leave the resource
/// path.
fn encode_segment(segment: &str) -> Result<String, GatewayError> {
    if matches!(segment, "" | "." | "..") {
        return Err(GatewayError::InvalidId {
            id: segment.to_owned(),
        });
    }
    // form encoding turns spaces into '+' and escapes a literal '+'
    Ok(url::form_urlencoded::byte_serialize(segment.as_bytes())
        .collect::<String>()
        .replace('+', "%20"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PendingPolicy;
    use crate::error::ValidationKind;
    use http::StatusCode;
    use std::time::Duration;
    use wiremock::matchers::{basic_auth, body_json, header, header_exists, method, path};
    use wiremock::{Mock, MockServer, Request, ResponseTemplate};

    const PAYMENT_ID: &str = "215d8da0-000f-50be-b000-0003308c89be";
    const REFUND_ID: &str = "216749f7-0016-50be-b000-078d43a63ae4";

    fn client(server: &MockServer) -> Client {
        Client::from_config(
            ClientConfig::new("your_shop_id", "your_secret_key")
                .with_base_url(&format!("{}/v3", server.uri()))
                .unwrap()
                .with_pending_policy(
                    PendingPolicy::default()
                        .with_max_attempts(5)
                        .with_default_retry_after(Duration::from_millis(10)),
                ),
        )
    }

    fn payment_payload() -> Value {
        json!({
            "amount": { "value": "2.00", "currency": "RUB" },
            "payment_method_data": { "type": "bank_card" },
            "confirmation": { "type": "redirect", "return_url": "https://www.merchant-website.com/return_url" }
        })
    }

    fn payment_body(status: &str, paid: bool) -> Value {
        json!({
            "id": PAYMENT_ID,
            "status": status,
            "paid": paid,
            "amount": { "value": "2.00", "currency": "RUB" },
            "created_at": "2017-09-27T10:13:52.588Z",
            "metadata": {},
            "payment_method": { "type": "bank_card", "id": PAYMENT_ID, "saved": false },
            "recipient": { "account_id": "your_shop_id", "gateway_id": "gateaway_id" }
        })
    }

    fn api_error(code: &str, description: &str) -> ResponseTemplate {
        let status = if code == "invalid_credentials" { 401 } else { 400 };
        ResponseTemplate::new(status).set_body_json(json!({
            "type": "error",
            "id": "ab5a11cd-13cc-4e33-af8b-75a74e18dd09",
            "code": code,
            "description": description,
        }))
    }

    #[tokio::test]
    async fn test_create_payment() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v3/payments"))
            .and(basic_auth("your_shop_id", "your_secret_key"))
            .and(header_exists("Idempotence-Key"))
            .and(body_json(payment_payload()))
            .respond_with(ResponseTemplate::new(200).set_body_json(payment_body("pending", false)))
            .expect(1)
            .mount(&server)
            .await;

        let client = client(&server);
        let payment = client.create_payment(&payment_payload(), None).await.unwrap();

        assert_eq!(payment.id(), PAYMENT_ID);
        assert_eq!(payment.status(), Some("pending"));
        assert_eq!(payment.paid(), Some(false));
        assert_eq!(payment.amount(), Some(Amount::new("2.00", "RUB")));
        assert_eq!(payment.payment_method().unwrap()["type"], "bank_card");
        assert_eq!(payment.recipient().unwrap()["account_id"], "your_shop_id");
        assert_eq!(payment.metadata(), Some(&json!({})));
        assert_eq!(payment.created_at(), Some("2017-09-27T10:13:52.588Z"));
    }

    #[tokio::test]
    async fn test_get_payment() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(format!("/v3/payments/{PAYMENT_ID}")))
            .respond_with(ResponseTemplate::new(200).set_body_json(payment_body("waiting_for_capture", true)))
            .expect(1)
            .mount(&server)
            .await;

        let client = client(&server);
        let payment = client.get_payment(PAYMENT_ID, None).await.unwrap();

        assert_eq!(payment.id(), PAYMENT_ID);
        assert_eq!(payment.status(), Some("waiting_for_capture"));
    }

    #[tokio::test]
    async fn test_capture_payment() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(format!("/v3/payments/{PAYMENT_ID}/capture")))
            .and(body_json(json!({ "amount": { "value": "2.00", "currency": "RUB" } })))
            .respond_with(ResponseTemplate::new(200).set_body_json(payment_body("succeeded", true)))
            .expect(1)
            .mount(&server)
            .await;

        let client = client(&server);
        let payment = client
            .capture_payment(PAYMENT_ID, Some(&Amount::new("2.00", "RUB")), None)
            .await
            .unwrap();

        assert_eq!(payment.status(), Some("succeeded"));
        assert_eq!(payment.paid(), Some(true));
    }

    #[tokio::test]
    async fn test_capture_without_amount_sends_empty_object() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(format!("/v3/payments/{PAYMENT_ID}/capture")))
            .and(body_json(json!({})))
            .respond_with(ResponseTemplate::new(200).set_body_json(payment_body("succeeded", true)))
            .expect(1)
            .mount(&server)
            .await;

        let body = client(&server)
            .capture_payment_raw(PAYMENT_ID, None, None)
            .await
            .unwrap();
        assert_eq!(body["status"], "succeeded");
    }

    #[tokio::test]
    async fn test_cancel_payment() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(format!("/v3/payments/{PAYMENT_ID}/cancel")))
            .and(body_json(json!({})))
            .respond_with(ResponseTemplate::new(200).set_body_json(payment_body("canceled", true)))
            .expect(1)
            .mount(&server)
            .await;

        let client = client(&server);
        let payment = client.cancel_payment(PAYMENT_ID, None).await.unwrap();

        assert_eq!(payment.status(), Some("canceled"));
    }

    #[tokio::test]
    async fn test_create_and_get_refund() {
        let server = MockServer::start().await;
        let refund = json!({
            "id": REFUND_ID,
            "status": "succeeded",
            "amount": { "value": "2.00", "currency": "RUB" },
            "created_at": "2017-10-04T19:27:51.407Z",
            "payment_id": PAYMENT_ID
        });

        Mock::given(method("POST"))
            .and(path("/v3/refunds"))
            .and(body_json(json!({
                "amount": { "value": "2.00", "currency": "RUB" },
                "payment_id": PAYMENT_ID
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(&refund))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path(format!("/v3/refunds/{REFUND_ID}")))
            .respond_with(ResponseTemplate::new(200).set_body_json(&refund))
            .expect(1)
            .mount(&server)
            .await;

        let client = client(&server);
        let created = client
            .create_refund(PAYMENT_ID, Some(&Amount::new("2.00", "RUB")), None)
            .await
            .unwrap();
        assert_eq!(created.payment_id(), Some(PAYMENT_ID));
        assert_eq!(created.status(), Some("succeeded"));

        let fetched = client.get_refund(created.id(), None).await.unwrap();
        assert_eq!(fetched.id(), REFUND_ID);
        assert_eq!(fetched.amount(), Some(Amount::new("2.00", "RUB")));
        assert_eq!(fetched.created_at(), Some("2017-10-04T19:27:51.407Z"));
    }

    #[tokio::test]
    async fn test_invalid_credentials() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(format!("/v3/payments/{PAYMENT_ID}")))
            .respond_with(api_error("invalid_credentials", "Basic authentication failed"))
            .mount(&server)
            .await;

        let err = client(&server).get_payment(PAYMENT_ID, None).await.unwrap_err();

        let GatewayError::Authentication(api) = err else {
            panic!("expected authentication error");
        };
        assert_eq!(api.code, "invalid_credentials");
        assert_eq!(api.description, "Basic authentication failed");
    }

    #[tokio::test]
    async fn test_unknown_payment_and_refund_are_raw_not_found() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v3/payments/wrong-id"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "type": "error",
                "code": "not_found",
                "description": "Payment not found or forbidden"
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v3/refunds/wrong-id"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "type": "error",
                "code": "not_found",
                "description": "Refund not found or forbidden"
            })))
            .mount(&server)
            .await;

        let client = client(&server);

        let err = client.get_payment("wrong-id", None).await.unwrap_err();
        let GatewayError::NotFound(raw) = err else {
            panic!("expected not found");
        };
        assert_eq!(raw.status, StatusCode::NOT_FOUND);
        assert!(raw.body.contains("Payment not found or forbidden"));

        let err = client.get_refund("wrong-id", None).await.unwrap_err();
        assert!(err.is_not_found());
        assert!(matches!(err, GatewayError::NotFound(ref raw) if raw.body.contains("Refund not found")));
    }

    #[tokio::test]
    async fn test_idempotence_key_errors() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v3/payments"))
            .and(|req: &Request| {
                req.headers
                    .get("Idempotence-Key")
                    .is_some_and(|value| value.is_empty())
            })
            .respond_with(api_error("invalid_request", "Idempotence key is empty"))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/v3/payments"))
            .and(header("Idempotence-Key", "used-key"))
            .respond_with(api_error("invalid_request", "Idempotence key duplicated"))
            .mount(&server)
            .await;

        let client = client(&server);

        let err = client
            .create_payment(&payment_payload(), Some(IdempotenceKey::from("")))
            .await
            .unwrap_err();
        let api = err.api_error().unwrap();
        assert!(matches!(err, GatewayError::Validation(_)));
        assert_eq!(api.code, "invalid_request");
        assert_eq!(api.validation_kind(), ValidationKind::MissingIdempotenceKey);

        let err = client
            .create_payment(&payment_payload(), Some(IdempotenceKey::from("used-key")))
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::Validation(_)));
        assert_eq!(
            err.api_error().unwrap().validation_kind(),
            ValidationKind::DuplicateIdempotenceKey
        );
    }

    #[tokio::test]
    async fn test_missing_confirmation_type() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v3/payments"))
            .respond_with(api_error(
                "invalid_request",
                "Missing confirmation type for payment method type: bank_card",
            ))
            .mount(&server)
            .await;

        let payload = json!({
            "amount": { "value": "2.00", "currency": "RUB" },
            "payment_method_data": { "type": "bank_card" }
        });
        let err = client(&server).create_payment(&payload, None).await.unwrap_err();

        let GatewayError::Validation(api) = err else {
            panic!("expected validation error");
        };
        assert_eq!(
            api.description,
            "Missing confirmation type for payment method type: bank_card"
        );
    }

    #[tokio::test]
    async fn test_pending_then_success_reuses_idempotence_key() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v3/payments"))
            .respond_with(
                ResponseTemplate::new(202).set_body_json(json!({ "type": "processing", "retry_after": 20 })),
            )
            .up_to_n_times(2)
            .expect(2)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/v3/payments"))
            .respond_with(ResponseTemplate::new(200).set_body_json(payment_body("pending", false)))
            .expect(1)
            .mount(&server)
            .await;

        let client = client(&server);
        let payment = client.create_payment(&payment_payload(), None).await.unwrap();
        assert_eq!(payment.id(), PAYMENT_ID);

        let requests: Vec<Request> = server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 3);
        let keys: Vec<_> = requests
            .iter()
            .map(|r| r.headers.get("Idempotence-Key").unwrap().to_str().unwrap().to_owned())
            .collect();
        assert!(keys.iter().all(|k| k == &keys[0]));
        assert!(requests.iter().all(|r| r.body == requests[0].body));
    }

    #[tokio::test]
    async fn test_distinct_calls_use_distinct_keys() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(format!("/v3/payments/{PAYMENT_ID}")))
            .respond_with(ResponseTemplate::new(200).set_body_json(payment_body("pending", false)))
            .mount(&server)
            .await;

        let client = client(&server);
        client.get_payment_raw(PAYMENT_ID, None).await.unwrap();
        client.get_payment_raw(PAYMENT_ID, None).await.unwrap();

        let requests = server.received_requests().await.unwrap();
        assert_ne!(
            requests[0].headers.get("Idempotence-Key"),
            requests[1].headers.get("Idempotence-Key")
        );
    }

    #[tokio::test]
    async fn test_wrapping_non_object_is_decode_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(format!("/v3/payments/{PAYMENT_ID}")))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([1, 2, 3])))
            .mount(&server)
            .await;

        let client = client(&server);
        assert!(client.get_payment_raw(PAYMENT_ID, None).await.unwrap().is_array());
        assert!(matches!(
            client.get_payment(PAYMENT_ID, None).await,
            Err(GatewayError::Decode(_))
        ));
    }

    #[test]
    fn test_encode_segment() {
        assert_eq!(encode_segment(PAYMENT_ID).unwrap(), PAYMENT_ID);
        assert_eq!(encode_segment("a/b c+d").unwrap(), "a%2Fb%20c%2Bd");
        assert_eq!(encode_segment("...").unwrap(), "...");
        assert_eq!(encode_segment("%2e%2e").unwrap(), "%252e%252e");
    }

    #[tokio::test]
    async fn test_dot_segment_ids_are_rejected_before_sending() {
        let server = MockServer::start().await;
        let client = client(&server);

        for id in ["", ".", ".."] {
            let err = client.get_payment(id, None).await.unwrap_err();
            assert!(matches!(err, GatewayError::InvalidId { id: ref rejected } if rejected == id));
        }
        assert!(matches!(
            client.get_refund("..", None).await,
            Err(GatewayError::InvalidId { .. })
        ));
        assert!(matches!(
            client.cancel_payment(".", None).await,
            Err(GatewayError::InvalidId { .. })
        ));

        assert!(server.received_requests().await.unwrap().is_empty());
    }
}
