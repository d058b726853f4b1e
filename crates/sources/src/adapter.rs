//! Source adapter: remote fetches as single-shot observables.

use std::fmt::Display;
use std::sync::Arc;

use dataflow::{Item, Observable, Snapshot, from_future};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::{Diagnostics, Fetcher, Result, SourceError, TracingDiagnostics};

/// Wraps a [`Fetcher`] so that fetches become streams.
///
/// Every observable returned here is cold and single-shot: each subscription
/// performs exactly one fetch, then emits the decoded value and completes, or
/// fails with a [`SourceError`]. Failures are never raised synchronously; they
/// travel through the stream so downstream `catch_error` can intercept them.
#[derive(Clone)]
pub struct SourceAdapter {
    fetcher: Arc<dyn Fetcher>,
    diagnostics: Arc<dyn Diagnostics>,
}

impl SourceAdapter {
    /// Creates an adapter logging through [`TracingDiagnostics`].
    pub fn new(fetcher: Arc<dyn Fetcher>) -> Self {
        Self {
            fetcher,
            diagnostics: Arc::new(TracingDiagnostics),
        }
    }

    /// Replaces the diagnostics hook.
    pub fn with_diagnostics(mut self, diagnostics: Arc<dyn Diagnostics>) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    /// Returns the diagnostics hook shared with the views.
    pub fn diagnostics(&self) -> Arc<dyn Diagnostics> {
        Arc::clone(&self.diagnostics)
    }

    /// Streams the collection at `path` as one snapshot.
    pub fn fetch_collection<T>(&self, path: impl Into<String>) -> Observable<Snapshot<T>, SourceError>
    where
        T: DeserializeOwned + Item,
    {
        self.fetch_decoded::<Vec<T>>(path.into())
            .map(Snapshot::<T>::from)
    }

    /// Streams the element `id` of the collection at `collection`.
    pub fn fetch_by_id<T>(&self, collection: &str, id: impl Display) -> Observable<T, SourceError>
    where
        T: DeserializeOwned + Item,
    {
        self.fetch_decoded(format!("{}/{id}", collection.trim_end_matches('/')))
    }

    fn fetch_decoded<T>(&self, path: String) -> Observable<T, SourceError>
    where
        T: DeserializeOwned + Item,
    {
        let path: Arc<str> = path.into();
        let fetcher = Arc::clone(&self.fetcher);
        let diagnostics = Arc::clone(&self.diagnostics);
        from_future(move || {
            let path = Arc::clone(&path);
            let fetcher = Arc::clone(&fetcher);
            let diagnostics = Arc::clone(&diagnostics);
            async move {
                let payload = fetch(fetcher.as_ref(), diagnostics.as_ref(), &path).await?;
                serde_json::from_value(payload).map_err(|e| {
                    let error = SourceError::from(e);
                    record_failure(diagnostics.as_ref(), &path, &error);
                    error
                })
            }
        })
    }
}

async fn fetch(fetcher: &dyn Fetcher, diagnostics: &dyn Diagnostics, path: &str) -> Result<Value> {
    metrics::counter!("source_fetches_total").increment(1);
    match fetcher.get(path).await {
        Ok(payload) => {
            diagnostics.payload(path, &payload);
            Ok(payload)
        }
        Err(error) => {
            record_failure(diagnostics, path, &error);
            Err(error)
        }
    }
}

fn record_failure(diagnostics: &dyn Diagnostics, path: &str, error: &SourceError) {
    metrics::counter!("source_failures_total").increment(1);
    diagnostics.failure(path, error);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::InMemoryFetcher;
    use domain::{Category, Supplier};
    use futures_util::StreamExt;
    use serde_json::json;

    fn adapter() -> (SourceAdapter, InMemoryFetcher) {
        let fetcher = InMemoryFetcher::new();
        fetcher.set_collection(
            "api/productCategories",
            vec![json!({"id": 1, "name": "Garden"}), json!({"id": 3, "name": "Toolbox"})],
        );
        fetcher.set_collection("api/suppliers", vec![json!({"id": 5, "name": "Acme"})]);
        let adapter = SourceAdapter::new(Arc::new(fetcher.clone()));
        (adapter, fetcher)
    }

    #[tokio::test]
    async fn test_collection_emits_once_then_completes() {
        let (adapter, _) = adapter();
        let mut stream = adapter
            .fetch_collection::<Category>("api/productCategories")
            .into_stream();

        let categories = stream.next().await.unwrap().unwrap();
        assert_eq!(categories.len(), 2);
        assert_eq!(categories[1].name, "Toolbox");
        assert!(stream.next().await.is_none());
    }

    #[tokio::test]
    async fn test_each_subscription_fetches_again() {
        let (adapter, fetcher) = adapter();
        let categories = adapter.fetch_collection::<Category>("api/productCategories");

        let _ = categories.into_stream().next().await;
        let _ = categories.into_stream().next().await;
        assert_eq!(fetcher.request_count("api/productCategories"), 2);
    }

    #[tokio::test]
    async fn test_by_id_fetches_single_element() {
        let (adapter, fetcher) = adapter();
        let mut stream = adapter
            .fetch_by_id::<Supplier>("api/suppliers", 5)
            .into_stream();

        let supplier = stream.next().await.unwrap().unwrap();
        assert_eq!(supplier.name, "Acme");
        assert_eq!(fetcher.request_count("api/suppliers/5"), 1);
    }

    #[tokio::test]
    async fn test_failures_arrive_through_the_stream() {
        let (adapter, fetcher) = adapter();
        fetcher.fail_path("api/productCategories", SourceError::backend(500, "down"));

        let mut stream = adapter
            .fetch_collection::<Category>("api/productCategories")
            .into_stream();
        assert_eq!(
            stream.next().await,
            Some(Err(SourceError::backend(500, "down")))
        );
    }

    #[tokio::test]
    async fn test_wrong_shape_is_a_decode_error() {
        let (adapter, _) = adapter();
        let mut stream = adapter.fetch_collection::<Category>("api/suppliers/5").into_stream();
        let outcome = stream.next().await.unwrap();
        assert!(matches!(outcome, Err(SourceError::Decode { .. })));
    }
}
