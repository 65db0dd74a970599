//! Bounded key → value store with time-based expiry.

use std::collections::HashMap;
use std::time::Duration;

use tokio::time::Instant;

/// Maximum age of an entry before it is treated as absent.
pub const DEFAULT_TTL: Duration = Duration::from_secs(5 * 60);
/// Entry bound enforced after every [`TtlCache::set`].
pub const DEFAULT_MAX_ENTRIES: usize = 100;
/// Approximate memory bound, in bytes.
pub const DEFAULT_MAX_MEMORY_BYTES: usize = 50 * 1024 * 1024;
/// Flat per-entry size assumed by [`TtlCache::estimated_bytes`].
const ESTIMATED_ENTRY_BYTES: usize = 1024;
/// Share of `max_entries` dropped when eviction by access count kicks in.
const EVICTION_PERCENT: usize = 30;

/// A cached value together with its bookkeeping.
#[derive(Debug, Clone)]
pub struct CacheEntry<T> {
    data: T,
    created_at: Instant,
    access_count: u64,
}

impl<T> CacheEntry<T> {
    fn is_expired(&self, now: Instant, ttl: Duration) -> bool {
        now.saturating_duration_since(self.created_at) > ttl
    }

    /// Number of successful reads plus one for the initial write.
    pub fn access_count(&self) -> u64 {
        self.access_count
    }
}

/// A string-keyed cache with TTL expiry and frequency-ranked eviction.
///
/// Expiry is lazy: [`get`](Self::get) and [`has`](Self::has) delete an
/// expired entry when they see it, and [`purge_expired`](Self::purge_expired)
/// reclaims everything at once. When a [`set`](Self::set) finds the cache at
/// capacity, expired entries go first; if that is not enough, the entries
/// with the lowest access counts are dropped (30% of capacity).
///
/// Time is read from [`tokio::time::Instant`], so paused-clock tests can
/// advance it deterministically.
#[derive(Debug)]
pub struct TtlCache<T> {
    entries: HashMap<String, CacheEntry<T>>,
    ttl: Duration,
    max_entries: usize,
    max_memory_bytes: usize,
}

impl<T> Default for TtlCache<T> {
    fn default() -> Self {
        Self::new(DEFAULT_TTL, DEFAULT_MAX_ENTRIES, DEFAULT_MAX_MEMORY_BYTES)
    }
}

impl<T> TtlCache<T> {
    /// Creates an empty cache. `max_entries` is raised to at least 1.
    pub fn new(ttl: Duration, max_entries: usize, max_memory_bytes: usize) -> Self {
        Self {
            entries: HashMap::new(),
            ttl,
            max_entries: max_entries.max(1),
            max_memory_bytes,
        }
    }

    /// Returns a clone of the live value for `key`, bumping its access count.
    pub fn get(&mut self, key: &str) -> Option<T>
    where
        T: Clone,
    {
        let now = Instant::now();
        let expired = self.entries.get(key)?.is_expired(now, self.ttl);
        if expired {
            self.entries.remove(key);
            return None;
        }
        let entry = self.entries.get_mut(key)?;
        entry.access_count += 1;
        Some(entry.data.clone())
    }

    /// Returns `true` if a live entry exists. Does not count as an access.
    pub fn has(&mut self, key: &str) -> bool {
        let now = Instant::now();
        match self.entries.get(key) {
            None => false,
            Some(entry) if entry.is_expired(now, self.ttl) => {
                self.entries.remove(key);
                false
            }
            Some(_) => true,
        }
    }

    /// Inserts or replaces `key`, evicting first if the cache is full.
    pub fn set(&mut self, key: impl Into<String>, data: T) {
        if self.entries.len() >= self.max_entries || self.estimated_bytes() > self.max_memory_bytes
        {
            self.evict();
        }
        self.entries.insert(
            key.into(),
            CacheEntry {
                data,
                created_at: Instant::now(),
                access_count: 1,
            },
        );
    }

    /// Removes every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of stored entries, live or not yet reclaimed.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Deletes all expired entries and returns how many were removed.
    pub fn purge_expired(&mut self) -> usize {
        let now = Instant::now();
        let ttl = self.ttl;
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_expired(now, ttl));
        before - self.entries.len()
    }

    /// Rough memory footprint: a flat 1 KiB per entry.
    pub fn estimated_bytes(&self) -> usize {
        self.entries.len() * ESTIMATED_ENTRY_BYTES
    }

    /// Borrowing view of an entry's bookkeeping without touching its count.
    pub fn peek(&self, key: &str) -> Option<&CacheEntry<T>> {
        self.entries.get(key)
    }

    fn evict(&mut self) {
        let expired = self.purge_expired();
        if self.entries.len() < self.max_entries {
            tracing::debug!(expired, "cache eviction reclaimed expired entries");
            return;
        }

        let mut ranked: Vec<(String, u64, Instant)> = self
            .entries
            .iter()
            .map(|(key, entry)| (key.clone(), entry.access_count, entry.created_at))
            .collect();
        // Oldest first among equal counts so the order is deterministic.
        ranked.sort_by(|a, b| a.1.cmp(&b.1).then(a.2.cmp(&b.2)));

        let drop_count = (self.max_entries * EVICTION_PERCENT / 100).max(1);
        for (key, _, _) in ranked.into_iter().take(drop_count) {
            self.entries.remove(&key);
        }
        tracing::debug!(
            expired,
            dropped = drop_count,
            remaining = self.entries.len(),
            "cache eviction dropped least-accessed entries"
        );
    }
}
