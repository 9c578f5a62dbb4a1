use thiserror::Error;

/// The primary error type for all fallible operations in this crate.
#[derive(Debug, Error)]
pub enum YfError {
    /// An error occurred during an HTTP request (connection failure, timeout, bad proxy).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// A provided URL could not be parsed.
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// The quote page could not be turned into data stores.
    ///
    /// Raised when the `root.App.main` assignment is missing, when either JSON parse fails,
    /// or when the payload lacks `context.dispatcher.stores`. Usually means the page layout
    /// changed or the request was blocked.
    #[error("Unparsable response from {url}: {reason}")]
    Unparsable {
        /// The page that was fetched.
        url: String,
        /// What went wrong during extraction.
        reason: String,
    },

    /// A memoized call received an argument that cannot be normalized into a cache key.
    #[error("Unhashable argument: {0}")]
    Unhashable(String),

    /// The data received was in an unexpected format or was missing a required field.
    #[error("Data format unexpected or missing field: {0}")]
    Data(String),
}

impl YfError {
    /// Returns `true` for extraction failures, i.e. the page arrived but its format was not understood.
    #[must_use]
    pub const fn is_unparsable(&self) -> bool {
        matches!(self, Self::Unparsable { .. })
    }

    pub(crate) fn unparsable(url: &str, reason: impl Into<String>) -> Self {
        Self::Unparsable {
            url: url.to_string(),
            reason: reason.into(),
        }
    }
}
