//! Local filesystem provider.
//!
//! Directory reads and the recursive search walk run on tokio's blocking
//! pool. Search ranks every visited name with the skim fuzzy matcher and
//! keeps the best matches.

use std::io;
use std::path::Path;

use async_trait::async_trait;
use fpick_core::{FileEntry, Provider, ProviderError};
use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;

/// Maximum number of search results returned.
pub const MAX_SEARCH_RESULTS: usize = 50;

/// Directory levels below the base path the search descends.
pub const DEFAULT_SEARCH_DEPTH: usize = 8;

/// Upper bound on entries visited by one search walk.
const MAX_VISITED: usize = 50_000;

/// Serves listings and searches from the local disk.
#[derive(Debug, Clone)]
pub struct LocalProvider {
    show_hidden: bool,
    max_depth: usize,
}

impl Default for LocalProvider {
    fn default() -> Self {
        Self {
            show_hidden: false,
            max_depth: DEFAULT_SEARCH_DEPTH,
        }
    }
}

impl LocalProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_hidden(mut self, show_hidden: bool) -> Self {
        self.show_hidden = show_hidden;
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

#[async_trait]
impl Provider for LocalProvider {
    async fn list_directory(&self, path: &str) -> Result<Vec<FileEntry>, ProviderError> {
        let path = path.to_string();
        let show_hidden = self.show_hidden;
        tokio::task::spawn_blocking(move || read_directory(Path::new(&path), show_hidden))
            .await
            .map_err(|e| ProviderError::Unavailable(e.to_string()))?
    }

    async fn search_files(
        &self,
        base_path: &str,
        query: &str,
    ) -> Result<Vec<FileEntry>, ProviderError> {
        let base = base_path.to_string();
        let query = query.trim().to_string();
        let provider = self.clone();
        tokio::task::spawn_blocking(move || provider.search(Path::new(&base), &query))
            .await
            .map_err(|e| ProviderError::Unavailable(e.to_string()))?
    }
}

impl LocalProvider {
    fn search(&self, base: &Path, query: &str) -> Result<Vec<FileEntry>, ProviderError> {
        ensure_directory(base)?;

        let matcher = SkimMatcherV2::default();
        let mut visited = 0;
        let mut scored = Vec::new();
        self.walk(base, self.max_depth, &mut visited, &mut |entry| {
            if let Some(score) = matcher.fuzzy_match(entry.name(), query) {
                scored.push((score, entry));
            }
        });

        // Best score first; shorter paths break ties.
        scored.sort_by(|(sa, a), (sb, b)| {
            sb.cmp(sa)
                .then_with(|| a.path().len().cmp(&b.path().len()))
                .then_with(|| a.path().cmp(b.path()))
        });
        scored.truncate(MAX_SEARCH_RESULTS);
        tracing::debug!(base = %base.display(), %query, visited, matches = scored.len(), "search walk finished");
        Ok(scored.into_iter().map(|(_, entry)| entry).collect())
    }

    fn walk(
        &self,
        dir: &Path,
        depth_remaining: usize,
        visited: &mut usize,
        visit: &mut dyn FnMut(FileEntry),
    ) {
        let read_dir = match std::fs::read_dir(dir) {
            Ok(rd) => rd,
            Err(_) => return,
        };

        for dir_entry in read_dir.flatten() {
            if *visited >= MAX_VISITED {
                return;
            }
            let Ok(metadata) = dir_entry.metadata() else {
                continue;
            };
            let entry = FileEntry::from_metadata(&dir_entry.path(), &metadata);
            if !self.show_hidden && entry.name().starts_with('.') {
                continue;
            }
            *visited += 1;

            let is_dir = entry.is_directory();
            let path = dir_entry.path();
            visit(entry);
            if is_dir && depth_remaining > 0 {
                self.walk(&path, depth_remaining - 1, visited, visit);
            }
        }
    }
}

/// Lists the immediate children of `path`, directories first, then by
/// case-insensitive name.
pub fn read_directory(path: &Path, show_hidden: bool) -> Result<Vec<FileEntry>, ProviderError> {
    ensure_directory(path)?;

    let read_dir = std::fs::read_dir(path).map_err(|e| io_error(path, e))?;
    let mut entries: Vec<FileEntry> = read_dir
        .flatten()
        .filter_map(|dir_entry| {
            let metadata = dir_entry.metadata().ok()?;
            Some(FileEntry::from_metadata(&dir_entry.path(), &metadata))
        })
        .filter(|entry| show_hidden || !entry.name().starts_with('.'))
        .collect();

    entries.sort_by(|a, b| {
        b.is_directory()
            .cmp(&a.is_directory())
            .then_with(|| a.name().to_lowercase().cmp(&b.name().to_lowercase()))
    });
    Ok(entries)
}

fn ensure_directory(path: &Path) -> Result<(), ProviderError> {
    let metadata = std::fs::metadata(path).map_err(|e| io_error(path, e))?;
    if !metadata.is_dir() {
        return Err(ProviderError::NotADirectory(path.display().to_string()));
    }
    Ok(())
}

fn io_error(path: &Path, err: io::Error) -> ProviderError {
    let shown = path.display().to_string();
    match err.kind() {
        io::ErrorKind::NotFound => ProviderError::NotFound(shown),
        io::ErrorKind::PermissionDenied => ProviderError::PermissionDenied(shown),
        _ => ProviderError::Io(format!("{shown}: {err}")),
    }
}
