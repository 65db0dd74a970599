//! fpick core library — UI-agnostic directory browsing logic.
//!
//! `fpick-core` provides the data layer of a keyboard-driven file picker:
//! cached, stale-while-revalidate directory listings and debounced search
//! over an abstract [`Provider`]. It is intentionally decoupled from any UI
//! framework; the terminal host (`fpick-tui`) supplies the provider, the
//! input surface and the rendering.
//!
//! # Modules
//!
//! - [`cache`] — TTL caches with entry and memory bounds, plus the background sweeper.
//! - [`fetch`] — Stale-while-revalidate orchestration of a single provider call.
//! - [`directory`] — Current path, path history and its listing.
//! - [`search`] — Debounced search results for the current query.
//! - [`browser`] — The mounted browser tying both controllers to one cursor.
//! - [`nav`] — Path history, selection cursor and keyboard transitions.
//! - [`fs`] — [`FileEntry`], the unit every provider returns.
//! - [`provider`] — The async backend trait.
//! - [`config`] — TOML-based settings.
//! - [`event`] — Command, event and message types for Host ↔ Core communication.
//! - [`error`] — Unified error type ([`CoreError`]) and result alias ([`CoreResult`]).

pub mod browser;
pub mod cache;
pub mod config;
pub mod directory;
pub mod error;
pub mod event;
pub mod fetch;
pub mod fs;
pub mod nav;
pub mod provider;
pub mod search;

#[cfg(test)]
mod test_support;

pub use browser::{Browser, BrowserChannels, BrowserOptions};
pub use cache::{BrowserCaches, ListingCache, SharedCache, TtlCache};
pub use config::Config;
pub use error::{CoreError, CoreResult, ProviderError};
pub use event::{Command, Event, Message};
pub use fetch::{FetchKind, Notice, ResultSet};
pub use fs::{EntryKind, FileEntry};
pub use nav::history::{relative_path, PathHistory};
pub use nav::keys::NavKey;
pub use provider::Provider;

/// Normalises a string to NFC (composed) form.
///
/// macOS stores filenames in NFD (decomposed), which causes Korean Hangul
/// characters to appear as individual Jamo. This helper re-composes them.
pub fn nfc_string(s: &str) -> String {
    use unicode_normalization::UnicodeNormalization;
    s.nfc().collect()
}
