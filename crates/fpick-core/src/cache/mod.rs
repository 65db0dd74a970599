//! In-memory caches shared across browser sessions.
//!
//! [`ttl::TtlCache`] is the single-owner store. [`SharedCache`] wraps it
//! for sharing between a browser and the background sweeper, and
//! [`BrowserCaches`] bundles the two independent instances the core uses:
//! one for directory listings, one for search results.

pub mod ttl;

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::task::JoinHandle;

use crate::config::CacheConfig;
use crate::fs::entry::FileEntry;

pub use ttl::{CacheEntry, TtlCache};

/// Key probed by the sweeper to force a lazy-expiry check.
pub const SWEEP_SENTINEL: &str = "__cleanup__";

/// A cloneable handle to a [`TtlCache`].
///
/// All operations are synchronous and never block on anything but the
/// short-lived internal lock.
#[derive(Debug)]
pub struct SharedCache<T> {
    inner: Arc<Mutex<TtlCache<T>>>,
}

impl<T> Clone for SharedCache<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> SharedCache<T> {
    pub fn new(cache: TtlCache<T>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(cache)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, TtlCache<T>> {
        // The cache holds no invariant a panicking reader could break.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn get(&self, key: &str) -> Option<T>
    where
        T: Clone,
    {
        self.lock().get(key)
    }

    pub fn has(&self, key: &str) -> bool {
        self.lock().has(key)
    }

    pub fn set(&self, key: impl Into<String>, data: T) {
        self.lock().set(key, data);
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn purge_expired(&self) -> usize {
        self.lock().purge_expired()
    }

    /// Access count of `key` without counting as a read.
    pub fn access_count(&self, key: &str) -> Option<u64> {
        self.lock().peek(key).map(CacheEntry::access_count)
    }
}

impl<T> Default for SharedCache<T> {
    fn default() -> Self {
        Self::new(TtlCache::default())
    }
}

/// Cached listings, keyed by directory path or `"{base}:{query}"`.
pub type ListingCache = SharedCache<Vec<FileEntry>>;

/// The pair of caches a browser reads and writes through.
///
/// Construct once per process and hand clones to every browser; entries
/// outlive any single browser.
#[derive(Debug, Clone, Default)]
pub struct BrowserCaches {
    pub directories: ListingCache,
    pub searches: ListingCache,
}

impl BrowserCaches {
    /// Creates both caches with the limits in `config`.
    pub fn new(config: &CacheConfig) -> Self {
        let make = || {
            SharedCache::new(TtlCache::new(
                config.ttl(),
                config.max_entries,
                config.max_memory_bytes(),
            ))
        };
        Self {
            directories: make(),
            searches: make(),
        }
    }

    /// Spawns the background task that reclaims expired entries every
    /// `interval`. The caller owns the handle; dropping it detaches the
    /// task, aborting it stops the sweeps.
    pub fn spawn_sweeper(&self, interval: Duration) -> JoinHandle<()> {
        let caches = self.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            // The first tick completes immediately; nothing can be stale yet.
            ticker.tick().await;
            loop {
                ticker.tick().await;
                caches.sweep();
            }
        })
    }

    /// One sweeper pass over both caches.
    pub fn sweep(&self) -> usize {
        let mut reclaimed = 0;
        for cache in [&self.directories, &self.searches] {
            cache.get(SWEEP_SENTINEL);
            reclaimed += cache.purge_expired();
        }
        if reclaimed > 0 {
            tracing::debug!(reclaimed, "cache sweep reclaimed expired entries");
        }
        reclaimed
    }
}
