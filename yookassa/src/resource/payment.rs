//! The [`Payment`] wrapper.

use serde_json::{Map, Value};

use super::{Amount, Refund, amount_field, overlay, resource_object, str_field};
use crate::client::Client;
use crate::error::GatewayError;
use crate::idempotence::IdempotenceKey;
use crate::transport::{ReqwestTransport, Transport};

/// A payment as last reported by the gateway.
///
/// Status values (`pending`, `waiting_for_capture`, `succeeded`, `canceled`)
/// are reported verbatim; the gateway decides which transitions are legal.
pub struct Payment<'c, T = ReqwestTransport> {
    client: &'c Client<T>,
    data: Map<String, Value>,
}

impl<T> std::fmt::Debug for Payment<'_, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Payment").field("data", &self.data).finish_non_exhaustive()
    }
}

impl<'c, T: Transport> Payment<'c, T> {
    pub(crate) fn from_body(client: &'c Client<T>, body: Value) -> Result<Self, GatewayError> {
        Ok(Self {
            client,
            data: resource_object(body, "payment response is not a payment object")?,
        })
    }

    /// Payment identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        str_field(&self.data, "id").unwrap_or_default()
    }

    /// Current status.
    #[must_use]
    pub fn status(&self) -> Option<&str> {
        str_field(&self.data, "status")
    }

    /// Whether the payment has been paid.
    #[must_use]
    pub fn paid(&self) -> Option<bool> {
        self.data.get("paid").and_then(Value::as_bool)
    }

    /// Payment amount.
    #[must_use]
    pub fn amount(&self) -> Option<Amount> {
        amount_field(&self.data)
    }

    /// Payment method details.
    #[must_use]
    pub fn payment_method(&self) -> Option<&Value> {
        self.data.get("payment_method")
    }

    /// Recipient (shop account and gateway) details.
    #[must_use]
    pub fn recipient(&self) -> Option<&Value> {
        self.data.get("recipient")
    }

    /// Confirmation details, including the redirect URL when present.
    #[must_use]
    pub fn confirmation(&self) -> Option<&Value> {
        self.data.get("confirmation")
    }

    /// Merchant metadata attached at creation.
    #[must_use]
    pub fn metadata(&self) -> Option<&Value> {
        self.data.get("metadata")
    }

    /// Creation timestamp as reported by the gateway.
    #[must_use]
    pub fn created_at(&self) -> Option<&str> {
        str_field(&self.data, "created_at")
    }

    /// Returns any top-level field.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.data.get(field)
    }

    /// Returns the cached JSON object.
    #[must_use]
    pub const fn data(&self) -> &Map<String, Value> {
        &self.data
    }

    /// Releases the client borrow and returns the cached JSON object.
    #[must_use]
    pub fn into_data(self) -> Map<String, Value> {
        self.data
    }

    /// Re-fetches the payment and overlays the result.
    ///
    /// # Errors
    ///
    /// Propagates the [`GatewayError`] of the underlying call; the wrapper
    /// is left unchanged.
    pub async fn reload(&mut self) -> Result<(), GatewayError> {
        let body = self.client.get_payment_raw(self.id(), None).await?;
        self.apply(body)
    }

    /// Captures the payment, defaulting to its current amount.
    ///
    /// # Errors
    ///
    /// Propagates the [`GatewayError`] of the underlying call; the wrapper
    /// is left unchanged.
    pub async fn capture(&mut self, amount: Option<&Amount>) -> Result<(), GatewayError> {
        self.capture_with_key(amount, None).await
    }

    /// Like [`capture`](Self::capture), with an explicit idempotence key.
    ///
    /// # Errors
    ///
    /// Propagates the [`GatewayError`] of the underlying call.
    pub async fn capture_with_key(
        &mut self,
        amount: Option<&Amount>,
        idempotence_key: Option<IdempotenceKey>,
    ) -> Result<(), GatewayError> {
        let amount = self.requested_amount(amount);
        let body = self
            .client
            .capture_payment_raw(self.id(), amount.as_ref(), idempotence_key)
            .await?;
        self.apply(body)
    }

    /// Cancels the payment.
    ///
    /// # Errors
    ///
    /// Propagates the [`GatewayError`] of the underlying call; the wrapper
    /// is left unchanged.
    pub async fn cancel(&mut self) -> Result<(), GatewayError> {
        self.cancel_with_key(None).await
    }

    /// Like [`cancel`](Self::cancel), with an explicit idempotence key.
    ///
    /// # Errors
    ///
    /// Propagates the [`GatewayError`] of the underlying call.
    pub async fn cancel_with_key(
        &mut self,
        idempotence_key: Option<IdempotenceKey>,
    ) -> Result<(), GatewayError> {
        let body = self.client.cancel_payment_raw(self.id(), idempotence_key).await?;
        self.apply(body)
    }

    /// Refunds the payment, defaulting to its current amount.
    ///
    /// Returns the new refund; the payment itself is not modified.
    ///
    /// # Errors
    ///
    /// Propagates the [`GatewayError`] of the underlying call.
    pub async fn refund(&self, amount: Option<&Amount>) -> Result<Refund<'c, T>, GatewayError> {
        self.refund_with_key(amount, None).await
    }

    /// Like [`refund`](Self::refund), with an explicit idempotence key.
    ///
    /// # Errors
    ///
    /// Propagates the [`GatewayError`] of the underlying call.
    pub async fn refund_with_key(
        &self,
        amount: Option<&Amount>,
        idempotence_key: Option<IdempotenceKey>,
    ) -> Result<Refund<'c, T>, GatewayError> {
        let amount = self.requested_amount(amount);
        let body = self
            .client
            .create_refund_raw(self.id(), amount.as_ref(), idempotence_key)
            .await?;
        Refund::from_body(self.client, body)
    }

    /// An explicit amount, or the cached `amount` field exactly as received.
    fn requested_amount(&self, amount: Option<&Amount>) -> Option<Value> {
        amount.map_or_else(|| self.data.get("amount").cloned(), |a| Some(a.to_value()))
    }

    fn apply(&mut self, body: Value) -> Result<(), GatewayError> {
        let update = resource_object(body, "payment response is not a payment object")?;
        overlay(&mut self.data, update);
        Ok(())
    }
}
