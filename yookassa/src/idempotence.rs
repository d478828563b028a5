//! Idempotence keys for logical API calls.
//!
//! The gateway treats every request carrying the same [`IdempotenceKey`] as a
//! repeat of one operation. The request engine generates a fresh key per
//! logical call unless the caller supplies one, and reuses it on every
//! pending-protocol retry of that call.

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An opaque idempotence token sent in the `Idempotence-Key` header.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IdempotenceKey(String);

impl IdempotenceKey {
    /// Creates a key from a caller-supplied token.
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Generates a fresh random v4 UUID key.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Returns the key as sent on the wire.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the key and returns the inner token.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl Display for IdempotenceKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for IdempotenceKey {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for IdempotenceKey {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<Uuid> for IdempotenceKey {
    fn from(value: Uuid) -> Self {
        Self(value.to_string())
    }
}

impl AsRef<str> for IdempotenceKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
