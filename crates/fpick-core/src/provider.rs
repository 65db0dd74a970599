//! The backend boundary: the two async operations the core consumes.

use async_trait::async_trait;

use crate::error::ProviderError;
use crate::fs::entry::FileEntry;

/// A filesystem/search backend.
///
/// Implementations may be slow or unreliable; the core wraps every call in
/// a timeout and never trusts the result length.
#[async_trait]
pub trait Provider: Send + Sync + 'static {
    /// Lists the immediate children of `path`.
    async fn list_directory(&self, path: &str) -> Result<Vec<FileEntry>, ProviderError>;

    /// Fuzzy-searches below `base_path`. Expected, but not guaranteed, to
    /// return at most 50 entries, best match first.
    async fn search_files(
        &self,
        base_path: &str,
        query: &str,
    ) -> Result<Vec<FileEntry>, ProviderError>;
}
