//! Core components of the `yfinance-data` crate.
//!
//! - The default transport [`YfClient`] and its builder.
//! - The [`Transport`] / [`ResponseCache`] seams the data accessor talks to.
//! - The primary [`YfError`] type.
//! - Proxy normalization and the process-wide prune toggle.

/// The default HTTP transport (`YfClient`), builder, and configuration.
pub mod client;
/// The primary error type (`YfError`) for the crate.
pub mod error;
/// Proxy specification and its normalization.
pub mod proxy;
/// Process-wide switch controlling response-cache pruning on corrupted pages.
pub mod prune;
/// Transport traits and the request/response types passed across them.
pub mod transport;

#[cfg(feature = "test-mode")]
pub(crate) mod fixtures;

pub(crate) mod net;

pub use client::{YfClient, YfClientBuilder};
pub use error::YfError;
pub use proxy::ProxySpec;
pub use transport::{GetRequest, HttpResponse, ResponseCache, Transport};
