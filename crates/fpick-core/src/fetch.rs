//! Stale-while-revalidate fetching of a single provider call.
//!
//! A [`Fetcher`] owns one displayed [`ResultSet`] and at most one in-flight
//! provider call. [`Fetcher::resolve`] shows a cached listing immediately
//! and races the fresh call against a timeout on a background task. The
//! outcome comes back as a [`Message::Fetched`] and is applied with
//! [`Fetcher::settle`]; only the most recently started fetch may commit.

use std::collections::HashSet;
use std::fmt;
use std::future::Future;
use std::time::Duration;

use tokio::sync::mpsc::UnboundedSender;
use tokio::task::AbortHandle;

use crate::cache::ListingCache;
use crate::config::{DirectoryConfig, SearchConfig};
use crate::error::{CoreError, CoreResult, ProviderError};
use crate::event::Message;
use crate::fs::entry::FileEntry;

/// Which provider operation a fetcher drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchKind {
    Directory,
    Search,
}

impl FetchKind {
    /// Human-readable operation name, used in errors and events.
    pub fn operation(self) -> &'static str {
        match self {
            Self::Directory => "directory listing",
            Self::Search => "search",
        }
    }
}

/// Time budget and length cap for one kind of fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchPolicy {
    pub timeout: Duration,
    pub max_entries: usize,
}

impl FetchPolicy {
    pub fn directory(config: &DirectoryConfig) -> Self {
        Self {
            timeout: config.timeout(),
            max_entries: config.max_entries,
        }
    }

    pub fn search(config: &SearchConfig) -> Self {
        Self {
            timeout: config.timeout(),
            max_entries: config.max_results,
        }
    }
}

/// Informational message attached to a committed result. Never blocks
/// selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    /// The provider returned more entries than the cap allows.
    Truncated {
        kind: FetchKind,
        shown: usize,
        total: usize,
    },
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Truncated {
                kind: FetchKind::Directory,
                shown,
                total,
            } => write!(
                f,
                "Directory contains {total} items. Showing first {shown} for performance."
            ),
            Self::Truncated {
                kind: FetchKind::Search,
                shown,
                total,
            } => write!(f, "Search returned {total} results. Showing first {shown}."),
        }
    }
}

/// The currently displayed, ordered entries plus their freshness state.
#[derive(Debug, Clone, Default)]
pub struct ResultSet {
    key: Option<String>,
    entries: Vec<FileEntry>,
    showing_cached: bool,
    loading: bool,
    error: Option<String>,
    notice: Option<Notice>,
    revision: u64,
}

impl ResultSet {
    pub fn entries(&self) -> &[FileEntry] {
        &self.entries
    }

    pub fn get(&self, index: usize) -> Option<&FileEntry> {
        self.entries.get(index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Cache key the displayed entries belong to.
    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    /// `true` while the displayed entries are a cache hit awaiting reconciliation.
    pub fn is_showing_cached(&self) -> bool {
        self.showing_cached
    }

    /// `true` while a provider call for this set is in flight.
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// User-visible failure message, set only when no cached data is shown.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn notice(&self) -> Option<Notice> {
        self.notice
    }

    /// Bumped whenever fresh entries arrive or the displayed key or
    /// content changes.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    fn show(&mut self, key: String, entries: Vec<FileEntry>, from_cache: bool) {
        // Re-showing an identical cached copy keeps the revision. Fresh
        // entries always count as a new arrival.
        let unchanged = from_cache
            && self.key.as_deref() == Some(key.as_str())
            && self.entries == entries;
        if !unchanged {
            self.revision += 1;
        }
        self.key = Some(key);
        self.entries = entries;
        self.showing_cached = from_cache;
        self.error = None;
        self.notice = None;
    }

    fn blank(&mut self, key: Option<String>) {
        if self.key != key {
            self.error = None;
            self.revision += 1;
        } else if !self.entries.is_empty() {
            self.revision += 1;
        }
        self.key = key;
        self.entries = Vec::new();
        self.showing_cached = false;
        self.notice = None;
    }
}

/// Result of a provider call, tagged with the generation that started it.
#[derive(Debug)]
pub struct FetchOutcome {
    pub kind: FetchKind,
    pub generation: u64,
    pub key: String,
    pub result: CoreResult<Vec<FileEntry>>,
}

/// What [`Fetcher::settle`] did with an outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Settled {
    /// Fresh entries replaced the display and were written to the cache.
    Committed { count: usize, notice: Option<Notice> },
    /// The call failed. `masked` is `true` when cached data stayed on screen.
    Failed { message: String, masked: bool },
    /// A newer fetch was started after this one; the outcome was dropped.
    Superseded,
}

/// Per-controller stale-while-revalidate orchestrator.
#[derive(Debug)]
pub struct Fetcher {
    kind: FetchKind,
    policy: FetchPolicy,
    cache: ListingCache,
    tx: UnboundedSender<Message>,
    generation: u64,
    in_flight: Option<AbortHandle>,
    result: ResultSet,
}

impl Fetcher {
    pub fn new(
        kind: FetchKind,
        policy: FetchPolicy,
        cache: ListingCache,
        tx: UnboundedSender<Message>,
    ) -> Self {
        Self {
            kind,
            policy,
            cache,
            tx,
            generation: 0,
            in_flight: None,
            result: ResultSet::default(),
        }
    }

    pub fn kind(&self) -> FetchKind {
        self.kind
    }

    pub fn result(&self) -> &ResultSet {
        &self.result
    }

    pub fn cache(&self) -> &ListingCache {
        &self.cache
    }

    /// Generation of the most recently started (or cancelled) fetch.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Displays any cached listing for `key` and starts `op` in the
    /// background, superseding whatever fetch was running.
    ///
    /// Must be called from within a tokio runtime.
    pub fn resolve<F>(&mut self, key: String, op: F)
    where
        F: Future<Output = Result<Vec<FileEntry>, ProviderError>> + Send + 'static,
    {
        self.cancel();
        let generation = self.generation;

        match self.cache.get(&key) {
            Some(cached) => {
                tracing::debug!(
                    operation = self.kind.operation(),
                    %key,
                    count = cached.len(),
                    "showing cached entries while revalidating"
                );
                self.result.show(key.clone(), cached, true);
            }
            None => {
                self.result.blank(Some(key.clone()));
            }
        }
        self.result.loading = true;

        let kind = self.kind;
        let timeout = self.policy.timeout;
        let tx = self.tx.clone();
        let task = tokio::spawn(async move {
            let result = match tokio::time::timeout(timeout, op).await {
                Ok(Ok(entries)) => Ok(entries),
                Ok(Err(err)) => Err(CoreError::Provider(err)),
                Err(_) => Err(CoreError::Timeout {
                    operation: kind.operation(),
                    after: timeout,
                }),
            };
            let _ = tx.send(Message::Fetched(FetchOutcome {
                kind,
                generation,
                key,
                result,
            }));
        });
        self.in_flight = Some(task.abort_handle());
    }

    /// Cancels any in-flight fetch and displays the cached entries for
    /// `key`, if there are any. Returns `true` on a cache hit.
    pub fn show_cached(&mut self, key: &str) -> bool {
        self.cancel();
        match self.cache.get(key) {
            Some(cached) => {
                tracing::debug!(operation = self.kind.operation(), %key, "showing cached entries");
                self.result.show(key.to_string(), cached, true);
                true
            }
            None => false,
        }
    }

    /// Fails `key` without calling the provider, e.g. on invalid input.
    pub fn reject(&mut self, key: String, err: CoreError) -> Settled {
        self.cancel();
        self.fail(key, err)
    }

    /// Applies a finished fetch if it is still the current one.
    pub fn settle(&mut self, outcome: FetchOutcome) -> Settled {
        if outcome.kind != self.kind
            || outcome.generation != self.generation
            || self.in_flight.is_none()
        {
            tracing::debug!(
                operation = self.kind.operation(),
                key = %outcome.key,
                generation = outcome.generation,
                current = self.generation,
                "discarding superseded fetch"
            );
            return Settled::Superseded;
        }
        self.in_flight = None;
        self.result.loading = false;

        match outcome.result.and_then(validate_entries) {
            Ok(entries) => self.commit(outcome.key, entries),
            Err(err) => self.fail(outcome.key, err),
        }
    }

    /// Cancels any in-flight fetch and empties the display.
    pub fn clear(&mut self) {
        self.cancel();
        self.result.blank(None);
        self.result.error = None;
    }

    /// Aborts the in-flight task and invalidates any outcome already queued.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.in_flight.take() {
            handle.abort();
        }
        self.generation += 1;
        self.result.loading = false;
    }

    fn commit(&mut self, key: String, mut entries: Vec<FileEntry>) -> Settled {
        let total = entries.len();
        let notice = if total > self.policy.max_entries {
            entries.truncate(self.policy.max_entries);
            tracing::warn!(
                operation = self.kind.operation(),
                %key,
                total,
                shown = self.policy.max_entries,
                "truncating oversized result"
            );
            Some(Notice::Truncated {
                kind: self.kind,
                shown: self.policy.max_entries,
                total,
            })
        } else {
            None
        };

        let count = entries.len();
        tracing::info!(operation = self.kind.operation(), %key, count, "loaded fresh entries");
        self.cache.set(key.clone(), entries.clone());
        self.result.show(key, entries, false);
        self.result.notice = notice;
        Settled::Committed { count, notice }
    }

    fn fail(&mut self, key: String, err: CoreError) -> Settled {
        let message = err.to_string();
        self.result.loading = false;

        let showing_this_key = self.result.key.as_deref() == Some(key.as_str());
        if showing_this_key && self.result.showing_cached {
            tracing::warn!(operation = self.kind.operation(), %key, error = %message, "fetch failed; keeping cached entries");
            return Settled::Failed {
                message,
                masked: true,
            };
        }
        if let Some(cached) = self.cache.get(&key) {
            tracing::warn!(operation = self.kind.operation(), %key, error = %message, "fetch failed; falling back to cache");
            self.result.show(key, cached, true);
            return Settled::Failed {
                message,
                masked: true,
            };
        }

        tracing::error!(operation = self.kind.operation(), %key, error = %message, "fetch failed");
        self.result.blank(Some(key));
        self.result.error = Some(message.clone());
        Settled::Failed {
            message,
            masked: false,
        }
    }
}

impl Drop for Fetcher {
    fn drop(&mut self) {
        if let Some(handle) = self.in_flight.take() {
            handle.abort();
        }
    }
}

/// Rejects listings with blank paths or names and drops repeated paths.
fn validate_entries(entries: Vec<FileEntry>) -> CoreResult<Vec<FileEntry>> {
    if let Some(bad) = entries.iter().find(|e| !e.is_well_formed()) {
        return Err(ProviderError::Malformed(format!(
            "entry with empty path or name: {:?}",
            bad.path()
        ))
        .into());
    }
    let mut seen = HashSet::with_capacity(entries.len());
    let total = entries.len();
    let unique: Vec<FileEntry> = entries
        .into_iter()
        .filter(|e| seen.insert(e.path().to_string()))
        .collect();
    if unique.len() != total {
        tracing::warn!(dropped = total - unique.len(), "dropping duplicate paths from listing");
    }
    Ok(unique)
}

/// Rejects an empty or whitespace-only directory path.
pub fn validate_path(path: &str) -> CoreResult<()> {
    if path.trim().is_empty() {
        return Err(CoreError::Validation(
            "Invalid directory path provided".to_string(),
        ));
    }
    Ok(())
}

/// Rejects a blank search query or base path.
pub fn validate_query(base_path: &str, query: &str) -> CoreResult<()> {
    if base_path.trim().is_empty() {
        return Err(CoreError::Validation(
            "Invalid base path for search".to_string(),
        ));
    }
    if query.trim().is_empty() {
        return Err(CoreError::Validation("Search query is empty".to_string()));
    }
    Ok(())
}
