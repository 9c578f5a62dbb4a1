//! Process-wide toggle for pruning the transport's response cache.
//!
//! When a scraped page parses but lacks the quote-summary store, the accessor asks the
//! transport to forget that URL so the next uncached fetch goes back to the network.
//! The toggle starts enabled and is shared by every [`TickerData`](crate::TickerData).

use std::sync::atomic::{AtomicBool, Ordering};

static PRUNE_SESSION_CACHE: AtomicBool = AtomicBool::new(true);

/// Allow accessors to delete corrupted pages from the transport's response cache (default).
pub fn enable_prune_session_cache() {
    PRUNE_SESSION_CACHE.store(true, Ordering::Relaxed);
}

/// Stop accessors from touching the transport's response cache.
pub fn disable_prune_session_cache() {
    PRUNE_SESSION_CACHE.store(false, Ordering::Relaxed);
}

/// Current state of the toggle.
#[must_use]
pub fn prune_session_cache_enabled() -> bool {
    PRUNE_SESSION_CACHE.load(Ordering::Relaxed)
}
