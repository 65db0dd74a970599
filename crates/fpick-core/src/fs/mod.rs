//! File entry types shared between the core and its providers.
//!
//! [`entry::FileEntry`] is the immutable snapshot a provider returns for
//! every listed or matched path.

pub mod entry;

pub use entry::{EntryKind, FileEntry};
