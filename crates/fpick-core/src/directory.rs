//! Directory listing controller: path history plus a listing fetcher.

use std::sync::Arc;

use tokio::sync::mpsc::UnboundedSender;

use crate::cache::ListingCache;
use crate::event::Message;
use crate::fetch::{
    validate_path, FetchKind, FetchOutcome, FetchPolicy, Fetcher, ResultSet, Settled,
};
use crate::nav::history::PathHistory;
use crate::provider::Provider;

/// Tracks the current directory and keeps its listing fresh.
///
/// Every change of the current path starts a new listing fetch keyed by
/// the path itself; the previous fetch, if any, is superseded.
pub struct DirectoryController {
    provider: Arc<dyn Provider>,
    history: PathHistory,
    fetcher: Fetcher,
}

impl DirectoryController {
    /// Creates a controller at `base_path`. Nothing is fetched until
    /// [`load`](Self::load) is called.
    pub fn new(
        base_path: impl Into<String>,
        provider: Arc<dyn Provider>,
        cache: ListingCache,
        policy: FetchPolicy,
        tx: UnboundedSender<Message>,
    ) -> Self {
        Self {
            provider,
            history: PathHistory::new(base_path),
            fetcher: Fetcher::new(FetchKind::Directory, policy, cache, tx),
        }
    }

    pub fn current_path(&self) -> &str {
        self.history.current()
    }

    pub fn history(&self) -> &PathHistory {
        &self.history
    }

    pub fn result(&self) -> &ResultSet {
        self.fetcher.result()
    }

    pub fn is_loading(&self) -> bool {
        self.fetcher.is_in_flight()
    }

    /// (Re)loads the current path. Returns the settlement when the path is
    /// rejected before any provider call.
    pub fn load(&mut self) -> Option<Settled> {
        let path = self.history.current().to_string();
        if let Err(err) = validate_path(&path) {
            return Some(self.fetcher.reject(path, err));
        }
        tracing::debug!(%path, "loading directory");
        let provider = Arc::clone(&self.provider);
        let target = path.clone();
        self.fetcher
            .resolve(path, async move { provider.list_directory(&target).await });
        None
    }

    /// Pushes `path` onto the history and loads it.
    pub fn navigate_into(&mut self, path: impl Into<String>) -> Option<Settled> {
        self.history = self.history.push(path);
        self.load()
    }

    /// Pops one level of history and loads the new current path.
    ///
    /// Returns `false`, leaving history untouched, when already at the base
    /// or when the previous path lies outside it.
    pub fn navigate_back(&mut self) -> bool {
        match self.history.go_back() {
            Some((history, _)) => {
                self.history = history;
                self.load();
                true
            }
            None => false,
        }
    }

    /// Applies a listing outcome.
    pub fn settle(&mut self, outcome: FetchOutcome) -> Settled {
        self.fetcher.settle(outcome)
    }

    /// Aborts any in-flight listing.
    pub fn cancel(&mut self) {
        self.fetcher.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::SharedCache;
    use crate::config::DirectoryConfig;
    use crate::test_support::{entries, recv_fetch, Call, ScriptedProvider};
    use std::time::Duration;
    use tokio::sync::mpsc::{self, UnboundedReceiver};

    fn controller(
        provider: Arc<ScriptedProvider>,
    ) -> (DirectoryController, UnboundedReceiver<Message>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let c = DirectoryController::new(
            "/root",
            provider,
            SharedCache::default(),
            FetchPolicy::directory(&DirectoryConfig::default()),
            tx,
        );
        (c, rx)
    }

    #[tokio::test(start_paused = true)]
    async fn load_fetches_current_path() {
        let provider = ScriptedProvider::new();
        provider.listing("/root", Duration::from_millis(50), &["a/", "b.txt"]);
        let (mut c, mut rx) = controller(provider.clone());

        assert!(c.load().is_none());
        let outcome = recv_fetch(&mut rx).await;
        c.settle(outcome);

        assert_eq!(c.result().entries(), entries("/root", &["a/", "b.txt"]).as_slice());
        assert_eq!(provider.calls(), vec![Call::List("/root".into())]);
    }

    #[tokio::test(start_paused = true)]
    async fn navigate_into_pushes_and_loads() {
        let provider = ScriptedProvider::new();
        provider.listing("/root/a", Duration::ZERO, &["x.rs"]);
        let (mut c, mut rx) = controller(provider.clone());

        c.navigate_into("/root/a");
        assert_eq!(c.current_path(), "/root/a");
        assert_eq!(c.history().depth(), 2);

        c.settle(recv_fetch(&mut rx).await);
        assert_eq!(c.result().key(), Some("/root/a"));
    }

    #[tokio::test(start_paused = true)]
    async fn navigate_back_at_base_is_noop() {
        let provider = ScriptedProvider::new();
        let (mut c, mut rx) = controller(provider.clone());

        assert!(!c.navigate_back());
        assert_eq!(c.current_path(), "/root");
        assert_eq!(c.history().paths(), ["/root".to_string()]);
        assert!(provider.calls().is_empty());
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn navigate_back_reloads_parent() {
        let provider = ScriptedProvider::new();
        provider.listing("/root", Duration::ZERO, &["a/"]);
        provider.listing("/root/a", Duration::ZERO, &["x"]);
        let (mut c, mut rx) = controller(provider.clone());

        c.load();
        c.settle(recv_fetch(&mut rx).await);
        c.navigate_into("/root/a");
        c.settle(recv_fetch(&mut rx).await);

        assert!(c.navigate_back());
        assert_eq!(c.current_path(), "/root");
        // The earlier listing is cached, so it shows before the refetch lands.
        assert!(c.result().is_showing_cached());
        c.settle(recv_fetch(&mut rx).await);
        assert!(!c.result().is_showing_cached());
    }

    #[tokio::test(start_paused = true)]
    async fn navigating_away_discards_pending_listing() {
        let provider = ScriptedProvider::new();
        provider.listing("/root/slow", Duration::from_secs(2), &["late"]);
        provider.listing("/root/fast", Duration::from_millis(10), &["quick"]);
        let (mut c, mut rx) = controller(provider.clone());

        c.navigate_into("/root/slow");
        c.navigate_into("/root/fast");
        c.settle(recv_fetch(&mut rx).await);

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert!(rx.try_recv().is_err());
        assert_eq!(c.result().entries()[0].name(), "quick");
    }

    #[tokio::test(start_paused = true)]
    async fn empty_path_is_rejected_without_provider_call() {
        let provider = ScriptedProvider::new();
        let (mut c, _rx) = controller(provider.clone());

        let settled = c.navigate_into("  ");
        assert!(matches!(settled, Some(Settled::Failed { masked: false, .. })));
        assert!(c.result().error().is_some());
        assert!(provider.calls().is_empty());
    }
}
