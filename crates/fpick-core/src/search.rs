//! Debounced search controller.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc::UnboundedSender;
use tokio::task::AbortHandle;

use crate::cache::ListingCache;
use crate::event::Message;
use crate::fetch::{
    validate_query, FetchKind, FetchOutcome, FetchPolicy, Fetcher, ResultSet, Settled,
};
use crate::provider::Provider;

/// Cache key for a search: `"{base_path}:{query}"`.
pub fn cache_key(base_path: &str, query: &str) -> String {
    format!("{base_path}:{query}")
}

/// Turns query edits into at most one provider call per quiet window.
///
/// Each query change cancels the pending debounce, shows any cached
/// results for the new query at once, and schedules a fresh search after
/// the debounce delay. The delay elapsing is reported as
/// [`Message::SearchDue`] and handled by [`on_due`](Self::on_due).
pub struct SearchController {
    provider: Arc<dyn Provider>,
    base_path: String,
    query: String,
    debounce: Duration,
    fetcher: Fetcher,
    tx: UnboundedSender<Message>,
    ticket: u64,
    pending: Option<AbortHandle>,
}

impl SearchController {
    pub fn new(
        base_path: impl Into<String>,
        provider: Arc<dyn Provider>,
        cache: ListingCache,
        policy: FetchPolicy,
        debounce: Duration,
        tx: UnboundedSender<Message>,
    ) -> Self {
        Self {
            provider,
            base_path: base_path.into(),
            query: String::new(),
            debounce,
            fetcher: Fetcher::new(FetchKind::Search, policy, cache, tx.clone()),
            tx,
            ticket: 0,
            pending: None,
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    /// `true` when the query has non-whitespace content.
    pub fn is_active(&self) -> bool {
        !self.query.trim().is_empty()
    }

    pub fn result(&self) -> &ResultSet {
        self.fetcher.result()
    }

    /// `true` while a debounce window or a provider call is outstanding.
    pub fn is_loading(&self) -> bool {
        self.pending.is_some() || self.fetcher.is_in_flight()
    }

    /// Replaces the query. A blank query clears results immediately
    /// without touching the cache or the provider.
    pub fn set_query(&mut self, query: impl Into<String>) {
        let query = query.into();
        if query == self.query {
            return;
        }
        self.query = query;
        self.cancel_pending();

        if !self.is_active() {
            self.fetcher.clear();
            return;
        }

        // Also drops any in-flight call for the previous query.
        let key = cache_key(&self.base_path, &self.query);
        self.fetcher.show_cached(&key);
        self.schedule();
    }

    /// Handles an elapsed debounce window. Stale tickets are ignored.
    /// Returns the settlement if the search was rejected up front.
    pub fn on_due(&mut self, ticket: u64) -> Option<Settled> {
        if ticket != self.ticket || self.pending.is_none() {
            tracing::debug!(ticket, current = self.ticket, "ignoring stale debounce");
            return None;
        }
        self.pending = None;
        self.perform()
    }

    /// Applies a search outcome.
    pub fn settle(&mut self, outcome: FetchOutcome) -> Settled {
        self.fetcher.settle(outcome)
    }

    /// Cancels the debounce timer and any in-flight search.
    pub fn cancel(&mut self) {
        self.cancel_pending();
        self.fetcher.cancel();
    }

    fn perform(&mut self) -> Option<Settled> {
        let key = cache_key(&self.base_path, &self.query);
        if let Err(err) = validate_query(&self.base_path, &self.query) {
            return Some(self.fetcher.reject(key, err));
        }
        tracing::debug!(base = %self.base_path, query = %self.query, "searching");
        let provider = Arc::clone(&self.provider);
        let base = self.base_path.clone();
        let query = self.query.clone();
        self.fetcher
            .resolve(key, async move { provider.search_files(&base, &query).await });
        None
    }

    fn schedule(&mut self) {
        self.ticket += 1;
        let ticket = self.ticket;
        let delay = self.debounce;
        let tx = self.tx.clone();
        let task = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = tx.send(Message::SearchDue { ticket });
        });
        self.pending = Some(task.abort_handle());
    }

    fn cancel_pending(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}

impl Drop for SearchController {
    fn drop(&mut self) {
        self.cancel_pending();
    }
}
