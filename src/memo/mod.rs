//! Memoizing call wrapper.
//!
//! Two stages, usable separately:
//! - [`key`]: normalize arguments into a [`CallKey`].
//! - [`Memoized`]: a bounded LRU cache from `CallKey` to results, with hit/miss statistics.

pub mod key;

pub use key::{CallArgs, CallKey, FrozenArg};

use crate::core::YfError;
use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::{Mutex, PoisonError};

/// Default capacity of every memoized operation.
pub const CACHE_MAXSIZE: usize = 64;

/// Cache statistics, as returned by [`Memoized::cache_info`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CacheInfo {
    pub hits: u64,
    pub misses: u64,
    pub max_size: usize,
    pub current_size: usize,
}

struct State<V> {
    /// `None` when the cache was created with `max_size == 0`.
    entries: Option<LruCache<CallKey, V>>,
    hits: u64,
    misses: u64,
}

/// A bounded, least-recently-used memo table for one operation.
///
/// The lock is never held while the wrapped computation runs, so two concurrent misses
/// on the same key both compute and the later insert wins. Callers that need
/// single-flight behavior must serialize calls themselves.
pub struct Memoized<V> {
    name: &'static str,
    max_size: usize,
    state: Mutex<State<V>>,
}

impl<V> std::fmt::Debug for Memoized<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Memoized")
            .field("name", &self.name)
            .field("info", &self.cache_info())
            .finish()
    }
}

impl<V: Clone> Memoized<V> {
    /// Create a memo table holding at most `max_size` results. `0` disables caching.
    #[must_use]
    pub fn new(name: &'static str, max_size: usize) -> Self {
        Self {
            name,
            max_size,
            state: Mutex::new(State {
                entries: NonZeroUsize::new(max_size).map(LruCache::new),
                hits: 0,
                misses: 0,
            }),
        }
    }

    /// Return the cached result for `key`, or run `f`, cache its `Ok` value and return it.
    ///
    /// Errors from `f` are passed through and never cached.
    ///
    /// # Errors
    ///
    /// Whatever `f` returns.
    pub async fn get_or_try_insert_with<F, Fut, E>(&self, key: CallKey, f: F) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        if let Some(hit) = self.lookup(&key) {
            #[cfg(feature = "tracing")]
            tracing::trace!(memo = self.name, "cache hit");
            return Ok(hit);
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(memo = self.name, "cache miss");

        let value = f().await?;
        self.store(key, value.clone());
        Ok(value)
    }

    /// Normalize `args` and memoize `f` under the resulting key.
    ///
    /// # Errors
    ///
    /// [`YfError::Unhashable`] if an argument cannot be normalized (`f` is not run),
    /// otherwise whatever `f` returns.
    pub async fn call<F, Fut>(&self, args: CallArgs, f: F) -> Result<V, YfError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, YfError>>,
    {
        let key = args.freeze()?;
        self.get_or_try_insert_with(key, f).await
    }

    fn lookup(&self, key: &CallKey) -> Option<V> {
        let mut state = self.lock();
        let hit = state.entries.as_mut().and_then(|e| e.get(key).cloned());
        if hit.is_some() {
            state.hits += 1;
        } else {
            state.misses += 1;
        }
        hit
    }

    fn store(&self, key: CallKey, value: V) {
        if let Some(entries) = self.lock().entries.as_mut() {
            entries.put(key, value);
        }
    }
}

impl<V> Memoized<V> {
    fn lock(&self) -> std::sync::MutexGuard<'_, State<V>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Hits, misses, capacity and current size.
    pub fn cache_info(&self) -> CacheInfo {
        let state = self.lock();
        CacheInfo {
            hits: state.hits,
            misses: state.misses,
            max_size: self.max_size,
            current_size: state.entries.as_ref().map_or(0, LruCache::len),
        }
    }

    /// Drop every cached result and reset the statistics.
    pub fn cache_clear(&self) {
        let mut state = self.lock();
        if let Some(entries) = state.entries.as_mut() {
            entries.clear();
        }
        state.hits = 0;
        state.misses = 0;
    }

    /// Name used in diagnostics.
    pub const fn name(&self) -> &'static str {
        self.name
    }
}
