//! Centralized constants for default endpoints, headers and timeouts.

use std::time::Duration;

/// Default desktop UA for the transport itself, to avoid trivial bot blocking.
pub(crate) const USER_AGENT: &str = concat!(
    "Mozilla/5.0 (X11; Linux x86_64) ",
    "AppleWebKit/537.36 (KHTML, like Gecko) ",
    "Chrome/122.0.0.0 Safari/537.36"
);

/// UA sent by [`TickerData`](crate::TickerData) when the caller passes no headers.
pub const SCRAPER_USER_AGENT: &str = concat!(
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_10_1) ",
    "AppleWebKit/537.36 (KHTML, like Gecko) ",
    "Chrome/39.0.2171.95 Safari/537.36"
);

/// Yahoo quote HTML base (`/{ticker}[/{sub_page}]` is appended).
pub const DEFAULT_SCRAPE_URL: &str = "https://finance.yahoo.com/quote";

/// Per-request timeout used when the caller does not pass one.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
