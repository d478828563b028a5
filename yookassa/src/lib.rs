//! Async client for the YooKassa payment gateway.
//!
//! Creates, retrieves, captures and cancels payments, and creates and
//! retrieves refunds. Every call goes through one request engine that
//! attaches Basic credentials and an `Idempotence-Key`, follows the
//! gateway's `202 Accepted` pending protocol with the same key, and turns
//! failures into a single [`GatewayError`] taxonomy.
//!
//! # Modules
//!
//! - [`client`] — the [`Client`] and its per-operation methods
//! - [`resource`] — [`Payment`] and [`Refund`] wrappers with actions
//! - [`engine`] — the request engine and pending protocol
//! - [`classifier`] — mapping of error responses to [`GatewayError`]
//! - [`transport`] — the [`Transport`] seam and its `reqwest` implementation
//! - [`config`] — [`ClientConfig`] and [`PendingPolicy`]
//! - [`error`] — error types
//! - [`idempotence`] — [`IdempotenceKey`]
//! - [`constants`] — defaults, header and environment variable names
//!
//! # Feature Flags
//!
//! - `telemetry` — `tracing` spans on every client operation

#![cfg_attr(docsrs, feature(doc_auto_cfg))]

pub mod classifier;
pub mod client;
pub mod config;
pub mod constants;
pub mod engine;
pub mod error;
pub mod idempotence;
pub mod resource;
pub mod transport;

pub use classifier::{ErrorClassifier, StandardClassifier};
pub use client::Client;
pub use config::{ClientConfig, ConfigError, PendingPolicy};
pub use error::{
    ApiError, DecodeError, GatewayError, StatusError, TransportError, TransportErrorKind,
    ValidationKind,
};
pub use idempotence::IdempotenceKey;
pub use resource::{Amount, Payment, Refund};
pub use transport::{HttpRequest, HttpResponse, ReqwestTransport, Transport};
