//! Helpers shared by the crate's async tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::mpsc::UnboundedReceiver;

use crate::error::ProviderError;
use crate::event::Message;
use crate::fetch::FetchOutcome;
use crate::fs::entry::FileEntry;
use crate::provider::Provider;

/// Builds entries under `dir`; names ending in `/` become directories.
pub(crate) fn entries(dir: &str, names: &[&str]) -> Vec<FileEntry> {
    names
        .iter()
        .map(|name| {
            let (name, is_dir) = match name.strip_suffix('/') {
                Some(stripped) => (stripped, true),
                None => (*name, false),
            };
            let path = format!("{}/{}", dir.trim_end_matches('/'), name);
            FileEntry::new(path, name, is_dir, if is_dir { 0 } else { 120 })
        })
        .collect()
}

/// Waits for the next message and expects it to be a fetch outcome.
pub(crate) async fn recv_fetch(rx: &mut UnboundedReceiver<Message>) -> FetchOutcome {
    match rx.recv().await {
        Some(Message::Fetched(outcome)) => outcome,
        other => panic!("expected a fetch outcome, got {other:?}"),
    }
}

#[derive(Debug, Clone)]
struct Script {
    delay: Duration,
    result: Result<Vec<FileEntry>, ProviderError>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Call {
    List(String),
    Search(String, String),
}

/// A provider that replays scripted answers after scripted delays and
/// records every call it receives. Unscripted keys answer `NotFound`.
#[derive(Debug, Default)]
pub(crate) struct ScriptedProvider {
    scripts: Mutex<HashMap<String, Script>>,
    calls: Mutex<Vec<Call>>,
}

impl ScriptedProvider {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub(crate) fn listing(&self, path: &str, delay: Duration, names: &[&str]) {
        self.script(path, delay, Ok(entries(path, names)));
    }

    pub(crate) fn search(&self, base: &str, query: &str, delay: Duration, names: &[&str]) {
        self.script(&format!("{base}:{query}"), delay, Ok(entries(base, names)));
    }

    pub(crate) fn fail(&self, key: &str, delay: Duration, err: ProviderError) {
        self.script(key, delay, Err(err));
    }

    pub(crate) fn script(
        &self,
        key: &str,
        delay: Duration,
        result: Result<Vec<FileEntry>, ProviderError>,
    ) {
        self.scripts
            .lock()
            .unwrap()
            .insert(key.to_string(), Script { delay, result });
    }

    pub(crate) fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    async fn answer(&self, key: String) -> Result<Vec<FileEntry>, ProviderError> {
        let script = self.scripts.lock().unwrap().get(&key).cloned();
        match script {
            Some(script) => {
                tokio::time::sleep(script.delay).await;
                script.result
            }
            None => Err(ProviderError::NotFound(key)),
        }
    }
}

#[async_trait]
impl Provider for ScriptedProvider {
    async fn list_directory(&self, path: &str) -> Result<Vec<FileEntry>, ProviderError> {
        self.calls.lock().unwrap().push(Call::List(path.to_string()));
        self.answer(path.to_string()).await
    }

    async fn search_files(
        &self,
        base_path: &str,
        query: &str,
    ) -> Result<Vec<FileEntry>, ProviderError> {
        self.calls
            .lock()
            .unwrap()
            .push(Call::Search(base_path.to_string(), query.to_string()));
        self.answer(format!("{base_path}:{query}")).await
    }
}
