//! The [`Refund`] wrapper.
//!
//! Refunds are immutable once created, so the wrapper has no actions of its
//! own. It still keeps the client borrow like [`Payment`](super::Payment)
//! does: [`Refund::client`] lets follow-up calls, such as fetching the
//! refunded payment, run on the same client and configuration.

use serde_json::{Map, Value};

use super::{Amount, amount_field, resource_object, str_field};
use crate::client::Client;
use crate::error::GatewayError;
use crate::transport::{ReqwestTransport, Transport};

/// A refund as last reported by the gateway.
pub struct Refund<'c, T = ReqwestTransport> {
    client: &'c Client<T>,
    data: Map<String, Value>,
}

impl<T> std::fmt::Debug for Refund<'_, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Refund").field("data", &self.data).finish_non_exhaustive()
    }
}

impl<'c, T: Transport> Refund<'c, T> {
    pub(crate) fn from_body(client: &'c Client<T>, body: Value) -> Result<Self, GatewayError> {
        Ok(Self {
            client,
            data: resource_object(body, "refund response is not a refund object")?,
        })
    }

    /// Refund identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        str_field(&self.data, "id").unwrap_or_default()
    }

    /// Current status.
    #[must_use]
    pub fn status(&self) -> Option<&str> {
        str_field(&self.data, "status")
    }

    /// Refunded amount.
    #[must_use]
    pub fn amount(&self) -> Option<Amount> {
        amount_field(&self.data)
    }

    /// Identifier of the refunded payment.
    #[must_use]
    pub fn payment_id(&self) -> Option<&str> {
        str_field(&self.data, "payment_id")
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

    /// The client this refund was obtained through.
    ///
    /// The returned borrow lives as long as the client, not the refund.
    #[must_use]
    pub const fn client(&self) -> &'c Client<T> {
        self.client
    }

    /// Releases the client borrow and returns the cached JSON object.
    #[must_use]
    pub fn into_data(self) -> Map<String, Value> {
        self.data
    }
}
