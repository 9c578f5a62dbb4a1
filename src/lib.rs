//! yfinance-data: memoized access to the data stores embedded in Yahoo Finance quote pages.
//!
//! The crate has two layers:
//! - [`memo`]: a bounded LRU memoization stage keyed by normalized call arguments, so that
//!   calls with structurally equal maps and sequences share one cache entry.
//! - [`data`]: [`TickerData`], a per-ticker accessor that issues memoized HTTP GETs through a
//!   [`Transport`] and extracts the `root.App.main` JSON payload from the quote page.
//!
//! The default transport is [`YfClient`], a thin `reqwest` wrapper with an optional
//! in-memory response cache that can be pruned per URL.
//!
//! # Example
//!
//! ```no_run
//! # use yfinance_data::{ProxySpec, TickerData};
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let data = TickerData::new("AAPL");
//! let stores = data.get_data_stores(None, ProxySpec::None).await?;
//! if let Some(summary) = stores.get("QuoteSummaryStore") {
//!     println!("{}", summary["price"]["regularMarketPrice"]);
//! }
//! # Ok(())
//! # }
//! ```

pub mod core;
pub mod data;
pub mod memo;

pub use crate::core::prune::{
    disable_prune_session_cache, enable_prune_session_cache, prune_session_cache_enabled,
};
pub use crate::core::{
    GetRequest, HttpResponse, ProxySpec, ResponseCache, Transport, YfClient, YfClientBuilder,
    YfError,
};
pub use data::{DataStores, TickerData, TickerDataBuilder};
pub use memo::{CACHE_MAXSIZE, CacheInfo, CallArgs, CallKey, FrozenArg, Memoized};
