//! In-memory fetcher for tests and the demo backend.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

use crate::{Fetcher, Result, SourceError};

#[derive(Debug, Default)]
struct InMemoryFetcherState {
    collections: HashMap<String, Vec<Value>>,
    failures: HashMap<String, SourceError>,
    delays: HashMap<String, Duration>,
    requests: HashMap<String, usize>,
}

/// Serves JSON collections from memory.
///
/// `GET <collection>` returns the whole collection and `GET <collection>/<id>`
/// the element whose `id` field matches, or a `404` backend error. Failures
/// and latency can be injected per path, and every request is counted.
#[derive(Debug, Clone, Default)]
pub struct InMemoryFetcher {
    state: Arc<RwLock<InMemoryFetcherState>>,
}

impl InMemoryFetcher {
    /// Creates a fetcher with no collections.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the collection served at `path`.
    pub fn set_collection(&self, path: impl Into<String>, items: Vec<Value>) {
        self.write().collections.insert(path.into(), items);
    }

    /// Serializes `items` and serves them at `path`.
    ///
    /// # Errors
    ///
    /// Returns a decode error if an item cannot be represented as JSON.
    pub fn set_items<T: Serialize>(&self, path: impl Into<String>, items: &[T]) -> Result<()> {
        let values = items
            .iter()
            .map(serde_json::to_value)
            .collect::<std::result::Result<Vec<_>, _>>()?;
        self.set_collection(path, values);
        Ok(())
    }

    /// Makes every request for `path` fail with `error`.
    pub fn fail_path(&self, path: impl Into<String>, error: SourceError) {
        self.write().failures.insert(path.into(), error);
    }

    /// Removes an injected failure.
    pub fn clear_failure(&self, path: &str) {
        self.write().failures.remove(path);
    }

    /// Delays every response for `path`.
    pub fn set_delay(&self, path: impl Into<String>, delay: Duration) {
        self.write().delays.insert(path.into(), delay);
    }

    /// Returns how many requests were made for `path`.
    pub fn request_count(&self, path: &str) -> usize {
        self.read().requests.get(path).copied().unwrap_or(0)
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, InMemoryFetcherState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, InMemoryFetcherState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn resolve(&self, path: &str) -> Result<Value> {
        let state = self.read();
        if let Some(items) = state.collections.get(path) {
            return Ok(Value::Array(items.clone()));
        }

        let not_found =
            || SourceError::backend(404, format!("Http failure response for {path}: 404 Not Found"));
        let (collection, id) = path.rsplit_once('/').ok_or_else(not_found)?;
        let id: u64 = id.parse().map_err(|_| not_found())?;
        state
            .collections
            .get(collection)
            .and_then(|items| items.iter().find(|item| item["id"].as_u64() == Some(id)))
            .cloned()
            .ok_or_else(not_found)
    }
}

#[async_trait]
impl Fetcher for InMemoryFetcher {
    async fn get(&self, path: &str) -> Result<Value> {
        let (delay, failure) = {
            let mut state = self.write();
            *state.requests.entry(path.to_string()).or_insert(0) += 1;
            (
                state.delays.get(path).copied(),
                state.failures.get(path).cloned(),
            )
        };

        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if let Some(error) = failure {
            return Err(error);
        }
        self.resolve(path)
    }
}
