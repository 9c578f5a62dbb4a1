//! The seam between [`TickerData`](crate::TickerData) and whatever performs HTTP.

use crate::core::{YfError, proxy::Proxies};
use futures::future::BoxFuture;
use reqwest::header::HeaderMap;
use std::collections::BTreeMap;
use std::time::Duration;

/// A single GET as seen by a [`Transport`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetRequest {
    /// Target URL, without query parameters.
    pub url: String,
    /// Query parameters appended to `url`.
    pub params: Option<BTreeMap<String, String>>,
    /// Normalized proxy mapping (single `"https"` entry), or `None` for a direct request.
    pub proxies: Option<Proxies>,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Request headers. Replace the transport's own defaults where names collide.
    pub headers: BTreeMap<String, String>,
}

/// A fully-read HTTP response.
///
/// Bodies are buffered so responses can be memoized and handed out more than once.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    /// HTTP status code.
    pub status: u16,
    /// Final URL after redirects.
    pub url: String,
    /// Response headers.
    pub headers: HeaderMap,
    /// Response body decoded as text.
    pub body: String,
}

impl HttpResponse {
    /// The body as text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.body
    }

    /// Returns `true` for 2xx statuses.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }
}

/// Something that can perform an HTTP GET.
///
/// Implemented by [`YfClient`](crate::YfClient); tests and embedders can supply their own.
pub trait Transport: Send + Sync {
    /// Perform one GET. Transport failures (timeouts, connection errors) surface as
    /// [`YfError::Http`]; non-2xx statuses are *not* errors at this level.
    fn get<'a>(&'a self, req: &'a GetRequest) -> BoxFuture<'a, Result<HttpResponse, YfError>>;

    /// The transport's response cache, if it keeps one.
    ///
    /// Callers must check for `None` before trying to invalidate anything.
    fn response_cache(&self) -> Option<&dyn ResponseCache> {
        None
    }
}

/// Response-level cache capability exposed by some transports.
pub trait ResponseCache: Send + Sync {
    /// Forget every cached response for `url`. Missing entries are not an error.
    fn delete_url(&self, url: &str);
}
