//! Per-ticker access to the Yahoo quote page.
//!
//! Internals are split into:
//! - `extract`: cut the `root.App.main` payload out of the HTML and normalize it
//! - `debug`:   optional dump helpers (only with the `debug-dumps` feature)

pub mod extract;

#[cfg(feature = "debug-dumps")]
pub(crate) mod debug;

pub use extract::DataStores;

use crate::core::client::constants::{DEFAULT_SCRAPE_URL, DEFAULT_TIMEOUT, SCRAPER_USER_AGENT};
use crate::core::prune::prune_session_cache_enabled;
use crate::core::{GetRequest, HttpResponse, ProxySpec, Transport, YfClient, YfError};
use crate::memo::{CACHE_MAXSIZE, CacheInfo, CallArgs, Memoized};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Store whose absence marks a page as corrupted.
pub const QUOTE_SUMMARY_STORE: &str = "QuoteSummaryStore";

/// One place to fetch Yahoo data for a single ticker, with every request memoized.
///
/// Two operations are cached independently, each in its own bounded LRU table:
/// [`fetch`](Self::fetch) (keyed by URL, headers, params, proxy and timeout) and
/// [`get_data_stores`](Self::get_data_stores) (keyed by sub-page and proxy).
///
/// The tables are not shared between instances. Results are cloned out of the cache, so
/// callers own what they receive.
///
/// # Example
///
/// ```no_run
/// # use yfinance_data::{ProxySpec, TickerData};
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let data = TickerData::new("MSFT");
/// let holders = data.get_data_stores(Some("holders"), "10.0.0.1:3128").await?;
/// println!("{} stores", holders.len());
/// # Ok(())
/// # }
/// ```
pub struct TickerData {
    ticker: String,
    transport: Arc<dyn Transport>,
    scrape_url: String,
    user_agent_headers: BTreeMap<String, String>,
    fetch_cache: Memoized<HttpResponse>,
    stores_cache: Memoized<DataStores>,
}

impl std::fmt::Debug for TickerData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TickerData")
            .field("ticker", &self.ticker)
            .field("scrape_url", &self.scrape_url)
            .field("fetch_cache", &self.fetch_cache)
            .field("stores_cache", &self.stores_cache)
            .finish_non_exhaustive()
    }
}

impl TickerData {
    /// Accessor backed by a default [`YfClient`] (no response cache).
    pub fn new(ticker: impl Into<String>) -> Self {
        Self::with_transport(ticker, Arc::new(YfClient::default()))
    }

    /// Accessor backed by the given transport.
    pub fn with_transport(ticker: impl Into<String>, transport: Arc<dyn Transport>) -> Self {
        Self::assemble(
            ticker.into(),
            transport,
            DEFAULT_SCRAPE_URL.to_string(),
            default_headers(),
            CACHE_MAXSIZE,
        )
    }

    /// Start a builder for finer control (scrape base, cache size, default headers).
    pub fn builder(ticker: impl Into<String>) -> TickerDataBuilder {
        TickerDataBuilder::new(ticker)
    }

    fn assemble(
        ticker: String,
        transport: Arc<dyn Transport>,
        scrape_url: String,
        user_agent_headers: BTreeMap<String, String>,
        cache_maxsize: usize,
    ) -> Self {
        Self {
            ticker,
            transport,
            scrape_url,
            user_agent_headers,
            fetch_cache: Memoized::new("fetch", cache_maxsize),
            stores_cache: Memoized::new("get_data_stores", cache_maxsize),
        }
    }

    /// The ticker symbol this accessor was created for.
    pub fn ticker(&self) -> &str {
        &self.ticker
    }

    /// The page URL for this ticker, optionally narrowed to a sub-page.
    pub fn page_url(&self, sub_page: Option<&str>) -> String {
        match sub_page.filter(|p| !p.is_empty()) {
            Some(page) => format!("{}/{}/{page}", self.scrape_url, self.ticker),
            None => format!("{}/{}", self.scrape_url, self.ticker),
        }
    }

    /// Perform one memoized HTTP GET.
    ///
    /// `user_agent_headers` replaces the built-in User-Agent header when given and non-empty;
    /// an empty map falls back to the defaults. `proxy` is
    /// normalized to `{"https": address}` before reaching the transport. `timeout`
    /// defaults to 30 seconds.
    ///
    /// The response is returned as the transport produced it; non-2xx statuses are not
    /// errors here. Identical calls are answered from the cache without touching the
    /// network.
    ///
    /// # Errors
    ///
    /// [`YfError::Http`] for transport failures (not retried), [`YfError::Unhashable`] if
    /// the arguments cannot be normalized.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(skip(self, user_agent_headers, params, proxy), err, fields(ticker = %self.ticker))
    )]
    pub async fn fetch(
        &self,
        url: &str,
        user_agent_headers: Option<&HashMap<String, String>>,
        params: Option<&HashMap<String, String>>,
        proxy: impl Into<ProxySpec>,
        timeout: Option<Duration>,
    ) -> Result<HttpResponse, YfError> {
        let proxy: ProxySpec = proxy.into();
        let timeout = timeout.unwrap_or(DEFAULT_TIMEOUT);

        let args = CallArgs::new()
            .arg(url)
            .kwarg("user_agent_headers", &user_agent_headers)
            .kwarg("params", &params)
            .kwarg("proxy", &proxy)
            .kwarg("timeout", &timeout);

        self.fetch_cache
            .call(args, move || async move {
                let req = GetRequest {
                    url: url.to_string(),
                    params: params.map(|p| p.clone().into_iter().collect()),
                    proxies: proxy.normalize(),
                    timeout,
                    headers: user_agent_headers.filter(|h| !h.is_empty()).map_or_else(
                        || self.user_agent_headers.clone(),
                        |h| h.clone().into_iter().collect(),
                    ),
                };
                self.transport.get(&req).await
            })
            .await
    }

    /// Ask the transport to forget its cached response for `url`.
    ///
    /// Best effort and infallible: does nothing when pruning is disabled process-wide or
    /// when the transport keeps no response cache. Returns whether a deletion was issued.
    pub fn invalidate_cached_url(&self, url: &str) -> bool {
        if !prune_session_cache_enabled() {
            return false;
        }
        let Some(cache) = self.transport.response_cache() else {
            return false;
        };

        #[cfg(feature = "tracing")]
        tracing::warn!(ticker = %self.ticker, url, "pruning cached response");

        cache.delete_url(url);
        true
    }

    /// Fetch the ticker's quote page (or one of its sub-pages) and return its data stores.
    ///
    /// Wrapper objects of the form `{"raw": X, "fmt": "..."}` are collapsed to `X` and empty
    /// objects become `null`.
    ///
    /// If the page parses but has no `QuoteSummaryStore`, the page is pruned from the
    /// transport's response cache (see [`invalidate_cached_url`](Self::invalidate_cached_url))
    /// and the partial stores are still returned.
    ///
    /// # Errors
    ///
    /// [`YfError::Http`] if the fetch fails, [`YfError::Unparsable`] if the page does not
    /// contain a readable `root.App.main` payload.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(skip(self, proxy), err, fields(ticker = %self.ticker))
    )]
    pub async fn get_data_stores(
        &self,
        sub_page: Option<&str>,
        proxy: impl Into<ProxySpec>,
    ) -> Result<DataStores, YfError> {
        let sub_page = sub_page.filter(|p| !p.is_empty());
        let proxy: ProxySpec = proxy.into();

        let args = CallArgs::new()
            .kwarg("sub_page", &sub_page)
            .kwarg("proxy", &proxy);

        self.stores_cache
            .call(args, move || self.load_data_stores(sub_page, proxy))
            .await
    }

    async fn load_data_stores(
        &self,
        sub_page: Option<&str>,
        proxy: ProxySpec,
    ) -> Result<DataStores, YfError> {
        let debug = std::env::var("YF_DEBUG").ok().as_deref() == Some("1");
        let url = self.page_url(sub_page);

        let resp = self.fetch(&url, None, None, proxy, None).await?;
        let html = resp.text();

        if debug {
            eprintln!(
                "YF_DEBUG [get_data_stores]: url=`{url}` status={} len={}",
                resp.status,
                html.len()
            );
        }
        #[cfg(feature = "debug-dumps")]
        {
            if debug {
                let _ = debug::debug_dump_html(&self.ticker, sub_page, html);
            }
        }

        let stores = extract::extract_data_stores(html, &url)?;

        #[cfg(feature = "debug-dumps")]
        {
            if debug {
                let _ = debug::debug_dump_stores(&self.ticker, sub_page, &stores);
            }
        }

        if !stores.contains_key(QUOTE_SUMMARY_STORE) {
            if debug {
                eprintln!("YF_DEBUG [get_data_stores]: {QUOTE_SUMMARY_STORE} missing, pruning `{url}`");
            }
            self.invalidate_cached_url(&url);
        }

        Ok(stores)
    }

    /// Statistics for the memoized [`fetch`](Self::fetch).
    pub fn fetch_cache_info(&self) -> CacheInfo {
        self.fetch_cache.cache_info()
    }

    /// Statistics for the memoized [`get_data_stores`](Self::get_data_stores).
    pub fn data_stores_cache_info(&self) -> CacheInfo {
        self.stores_cache.cache_info()
    }

    /// Empty both memo tables and reset their statistics.
    pub fn clear_caches(&self) {
        self.fetch_cache.cache_clear();
        self.stores_cache.cache_clear();
    }
}

fn default_headers() -> BTreeMap<String, String> {
    BTreeMap::from([("User-Agent".to_string(), SCRAPER_USER_AGENT.to_string())])
}

/* ----------------------- Builder ----------------------- */

/// Builder for [`TickerData`].
pub struct TickerDataBuilder {
    ticker: String,
    transport: Option<Arc<dyn Transport>>,
    scrape_url: Option<Url>,
    user_agent_headers: Option<BTreeMap<String, String>>,
    cache_maxsize: usize,
}

impl TickerDataBuilder {
    fn new(ticker: impl Into<String>) -> Self {
        Self {
            ticker: ticker.into(),
            transport: None,
            scrape_url: None,
            user_agent_headers: None,
            cache_maxsize: CACHE_MAXSIZE,
        }
    }

    /// Use this transport instead of a default [`YfClient`].
    #[must_use]
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Override the quote page base (default `https://finance.yahoo.com/quote`).
    #[must_use]
    pub fn scrape_url(mut self, url: Url) -> Self {
        self.scrape_url = Some(url);
        self
    }

    /// Replace the headers sent when a caller passes none.
    #[must_use]
    pub fn user_agent_headers(mut self, headers: BTreeMap<String, String>) -> Self {
        self.user_agent_headers = Some(headers);
        self
    }

    /// Capacity of each memo table. Default 64; `0` disables memoization.
    #[must_use]
    pub const fn cache_maxsize(mut self, size: usize) -> Self {
        self.cache_maxsize = size;
        self
    }

    /// Build the accessor.
    ///
    /// # Errors
    ///
    /// Returns [`YfError::Http`] if no transport was supplied and the default client
    /// cannot be constructed.
    pub fn build(self) -> Result<TickerData, YfError> {
        let transport: Arc<dyn Transport> = match self.transport {
            Some(t) => t,
            None => Arc::new(YfClient::builder().build()?),
        };
        let scrape_url = self.scrape_url.map_or_else(
            || DEFAULT_SCRAPE_URL.to_string(),
            |u| u.as_str().trim_end_matches('/').to_string(),
        );
        Ok(TickerData::assemble(
            self.ticker,
            transport,
            scrape_url,
            self.user_agent_headers.unwrap_or_else(default_headers),
            self.cache_maxsize,
        ))
    }
}
