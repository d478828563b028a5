//! Stateful wrappers around gateway resources.
//!
//! A [`Payment`] or [`Refund`] caches the JSON object the gateway last
//! returned for one resource, together with a borrow of the
//! [`Client`](crate::Client) that produced it. Fields are exposed through
//! accessors for the commonly used keys and [`get`](Payment::get) for the
//! rest; the payload is otherwise opaque.
//!
//! Actions on a wrapper (`reload`, `capture`, `cancel`) overlay the fields
//! of the new response onto the cached object: every top-level field in the
//! response replaces the cached one, fields the response omits are kept.
//! A failed action leaves the wrapper untouched.
//!
//! Because a wrapper borrows its client, it cannot outlive it. Use
//! [`Payment::into_data`] to keep the raw JSON beyond that point.

mod payment;
mod refund;

pub use payment::Payment;
pub use refund::Refund;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{DecodeError, GatewayError};

/// A monetary amount as the gateway represents it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Amount {
    /// Decimal value as a string, e.g. `"2.00"`.
    pub value: String,
    /// ISO-4217 currency code, e.g. `"RUB"`.
    pub currency: String,
}

impl Amount {
    /// Creates an amount.
    #[must_use]
    pub fn new(value: impl Into<String>, currency: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            currency: currency.into(),
        }
    }

    /// Returns the JSON object sent on the wire.
    #[must_use]
    pub fn to_value(&self) -> Value {
        serde_json::json!({
            "value": self.value,
            "currency": self.currency,
        })
    }
}

/// Unwraps a response body that must be a JSON object with a string `id`.
pub(crate) fn resource_object(
    body: Value,
    context: &'static str,
) -> Result<Map<String, Value>, GatewayError> {
    match body {
        Value::Object(map) if map.get("id").is_some_and(Value::is_string) => Ok(map),
        other => Err(GatewayError::Decode(DecodeError::new(
            None,
            context,
            other.to_string(),
            serde::de::Error::custom("expected a JSON object with a string `id`"),
        ))),
    }
}

/// Replaces every top-level field of `target` present in `update`.
pub(crate) fn overlay(target: &mut Map<String, Value>, update: Map<String, Value>) {
    for (key, value) in update {
        target.insert(key, value);
    }
}

pub(crate) fn str_field<'a>(data: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    data.get(key).and_then(Value::as_str)
}

pub(crate) fn amount_field(data: &Map<String, Value>) -> Option<Amount> {
    data.get("amount")
        .and_then(|value| Amount::deserialize(value).ok())
}
