//! Typed channels between the host, the browser, and its background tasks.
//!
//! The host translates user input into [`Command`]s and feeds them to
//! [`Browser::handle_command`](crate::browser::Browser::handle_command).
//! The browser answers with [`Event`]s on a channel the host subscribes to.
//! Background fetch and debounce tasks report back to the browser with
//! [`Message`]s, which the host drains into
//! [`Browser::handle_message`](crate::browser::Browser::handle_message) on
//! the same logical thread that delivers commands.

use crate::fetch::FetchOutcome;
use crate::fs::entry::FileEntry;
use crate::nav::keys::NavKey;

/// An input the host asks the browser to process.
///
/// Commands flow **Host → Browser**.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// A navigation key press.
    Key(NavKey),
    /// The search query changed to the given text.
    SetQuery(String),
    /// Single click on the entry at this index: selects it.
    Click(usize),
    /// Double click on the entry at this index: descends into directories.
    DoubleClick(usize),
    /// The pointer moved over the entry at this index.
    Hover(usize),
}

/// A notification the browser sends to the host.
///
/// Events flow **Browser → Host**.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// The user picked an entry (file or directory).
    Selected(FileEntry),
    /// The user asked to close the browser.
    Closed,
    /// A fresh directory listing was committed.
    DirectoryLoaded {
        path: String,
        count: usize,
    },
    /// Fresh search results were committed.
    SearchCompleted {
        query: String,
        count: usize,
    },
    /// A fetch failed. Emitted whether or not cached data masked it.
    FetchFailed {
        operation: &'static str,
        message: String,
    },
}

/// Completion of a background task, routed back to its browser.
#[derive(Debug)]
pub enum Message {
    /// A provider call settled (or timed out).
    Fetched(FetchOutcome),
    /// The search debounce window identified by `ticket` elapsed.
    SearchDue { ticket: u64 },
}
