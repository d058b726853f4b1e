//! The fetch capability consumed by the source adapter.

use async_trait::async_trait;
use serde_json::Value;

use crate::Result;

/// Fetches JSON documents from the backend.
///
/// Paths are relative collection paths such as `api/products` or
/// `api/suppliers/5`. Implementations report failures as [`crate::SourceError`]
/// values, never by panicking.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetches the document at `path`.
    async fn get(&self, path: &str) -> Result<Value>;
}
