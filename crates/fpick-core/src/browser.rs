//! The mounted browser: directory and search controllers behind one
//! keyboard and pointer surface.
//!
//! A [`Browser`] is driven entirely from one logical thread. The host feeds
//! it [`Command`]s from user input and [`Message`]s from the channel
//! returned by [`Browser::mount`], and reads [`Event`]s from the other
//! channel. Dropping the browser aborts every timer and fetch it started;
//! the shared caches and their sweeper live on.

use std::sync::Arc;

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::cache::BrowserCaches;
use crate::config::Config;
use crate::directory::DirectoryController;
use crate::event::{Command, Event, Message};
use crate::fetch::{FetchKind, FetchOutcome, FetchPolicy, ResultSet, Settled};
use crate::fs::entry::FileEntry;
use crate::nav::cursor::Cursor;
use crate::nav::history::{relative_path, PathHistory};
use crate::nav::keys::{transition, NavKey, Transition};
use crate::provider::Provider;
use crate::search::SearchController;

/// Construction parameters accepted from the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrowserOptions {
    pub base_path: String,
    pub initial_query: Option<String>,
}

impl BrowserOptions {
    pub fn new(base_path: impl Into<String>) -> Self {
        Self {
            base_path: base_path.into(),
            initial_query: None,
        }
    }

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.initial_query = Some(query.into());
        self
    }
}

/// Receiving ends handed to the host at mount time.
#[derive(Debug)]
pub struct BrowserChannels {
    /// Background completions; drain into [`Browser::handle_message`].
    pub messages: UnboundedReceiver<Message>,
    /// Notifications for the host.
    pub events: UnboundedReceiver<Event>,
}

pub struct Browser {
    directory: DirectoryController,
    search: SearchController,
    cursor: Cursor,
    /// `(searching, revision)` of the set the cursor was last reset for.
    shown: (bool, u64),
    events: UnboundedSender<Event>,
}

impl Browser {
    /// Mounts a browser at `options.base_path`, starts the first listing
    /// and applies the initial query.
    ///
    /// Must be called from within a tokio runtime.
    pub fn mount(
        options: BrowserOptions,
        config: &Config,
        provider: Arc<dyn Provider>,
        caches: &BrowserCaches,
    ) -> (Self, BrowserChannels) {
        let (msg_tx, msg_rx) = mpsc::unbounded_channel();
        let (event_tx, event_rx) = mpsc::unbounded_channel();

        let directory = DirectoryController::new(
            options.base_path.clone(),
            Arc::clone(&provider),
            caches.directories.clone(),
            FetchPolicy::directory(&config.directory),
            msg_tx.clone(),
        );
        let search = SearchController::new(
            options.base_path.clone(),
            provider,
            caches.searches.clone(),
            FetchPolicy::search(&config.search),
            config.search.debounce(),
            msg_tx,
        );

        let mut browser = Self {
            directory,
            search,
            cursor: Cursor::new(),
            shown: (false, 0),
            events: event_tx,
        };
        tracing::info!(base = %options.base_path, "mounting browser");

        let settled = browser.directory.load();
        browser.report(FetchKind::Directory, settled);
        if let Some(query) = options.initial_query {
            browser.search.set_query(query);
        }
        browser.sync_cursor();

        (
            browser,
            BrowserChannels {
                messages: msg_rx,
                events: event_rx,
            },
        )
    }

    /// `true` when a non-blank query makes search results the active set.
    pub fn is_searching(&self) -> bool {
        self.search.is_active()
    }

    /// The result set keys and clicks act on.
    pub fn active(&self) -> &ResultSet {
        if self.is_searching() {
            self.search.result()
        } else {
            self.directory.result()
        }
    }

    /// `true` while the active set is waiting on a debounce or a fetch.
    pub fn is_loading(&self) -> bool {
        if self.is_searching() {
            self.search.is_loading()
        } else {
            self.directory.is_loading()
        }
    }

    pub fn selected_index(&self) -> usize {
        self.cursor.index()
    }

    pub fn selected_entry(&self) -> Option<&FileEntry> {
        self.active().get(self.cursor.index())
    }

    pub fn current_path(&self) -> &str {
        self.directory.current_path()
    }

    /// Current path relative to the base path, for display.
    pub fn relative_path(&self) -> String {
        let history = self.directory.history();
        relative_path(history.base(), history.current())
    }

    pub fn history(&self) -> &PathHistory {
        self.directory.history()
    }

    pub fn query(&self) -> &str {
        self.search.query()
    }

    pub fn can_go_back(&self) -> bool {
        self.directory.history().can_go_back()
    }

    pub fn handle_command(&mut self, command: Command) {
        match command {
            Command::Key(key) => self.handle_key(key),
            Command::SetQuery(query) => self.set_query(query),
            Command::Click(index) => self.click(index),
            Command::DoubleClick(index) => self.double_click(index),
            Command::Hover(index) => self.hover(index),
        }
    }

    pub fn handle_key(&mut self, key: NavKey) {
        let step = transition(key, self.cursor, self.active().entries(), self.can_go_back());
        match step {
            Transition::Close => self.emit(Event::Closed),
            Transition::Select(entry) => self.emit(Event::Selected(entry)),
            Transition::Move(cursor) => self.cursor = cursor,
            Transition::Descend(path) => self.descend(path),
            Transition::Ascend => {
                self.directory.navigate_back();
            }
            Transition::Ignore => {}
        }
        self.sync_cursor();
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.search.set_query(query);
        self.sync_cursor();
    }

    /// Selects the entry at `index` and emits it, directory or not.
    pub fn click(&mut self, index: usize) {
        let Some(entry) = self.active().get(index).cloned() else {
            return;
        };
        self.cursor = self.cursor.with_index(index, self.active().len());
        self.emit(Event::Selected(entry));
    }

    /// Descends into the entry at `index` if it is a directory.
    pub fn double_click(&mut self, index: usize) {
        let target = match self.active().get(index) {
            Some(entry) if entry.is_directory() => entry.path().to_string(),
            _ => return,
        };
        self.descend(target);
        self.sync_cursor();
    }

    /// Moves the highlight to `index` without selecting.
    pub fn hover(&mut self, index: usize) {
        if index < self.active().len() {
            self.cursor = self.cursor.with_index(index, self.active().len());
        }
    }

    /// Applies a background completion.
    pub fn handle_message(&mut self, message: Message) {
        match message {
            Message::Fetched(outcome) => self.settle(outcome),
            Message::SearchDue { ticket } => {
                let settled = self.search.on_due(ticket);
                self.report(FetchKind::Search, settled);
            }
        }
        self.sync_cursor();
    }

    fn settle(&mut self, outcome: FetchOutcome) {
        let kind = outcome.kind;
        let settled = match kind {
            FetchKind::Directory => self.directory.settle(outcome),
            FetchKind::Search => self.search.settle(outcome),
        };
        self.report(kind, Some(settled));
    }

    fn descend(&mut self, path: String) {
        let settled = self.directory.navigate_into(path);
        self.report(FetchKind::Directory, settled);
    }

    fn report(&self, kind: FetchKind, settled: Option<Settled>) {
        let event = match settled {
            Some(Settled::Committed { count, .. }) => match kind {
                FetchKind::Directory => Event::DirectoryLoaded {
                    path: self.current_path().to_string(),
                    count,
                },
                FetchKind::Search => Event::SearchCompleted {
                    query: self.query().to_string(),
                    count,
                },
            },
            Some(Settled::Failed { message, .. }) => Event::FetchFailed {
                operation: kind.operation(),
                message,
            },
            Some(Settled::Superseded) | None => return,
        };
        self.emit(event);
    }

    /// Resets the cursor when the active set was replaced, and otherwise
    /// keeps it in bounds.
    fn sync_cursor(&mut self) {
        let stamp = (self.is_searching(), self.active().revision());
        if stamp != self.shown {
            self.shown = stamp;
            self.cursor = self.cursor.reset();
        } else {
            self.cursor = self.cursor.clamped(self.active().len());
        }
    }

    fn emit(&self, event: Event) {
        if self.events.send(event).is_err() {
            tracing::debug!("event receiver dropped");
        }
    }
}

impl Drop for Browser {
    fn drop(&mut self) {
        tracing::debug!(path = %self.current_path(), "unmounting browser");
        self.directory.cancel();
        self.search.cancel();
    }
}
