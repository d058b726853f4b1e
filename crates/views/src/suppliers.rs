//! Suppliers of the selected product.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use dataflow::{Snapshot, combine_latest, fork_join, never, of};
use domain::{Product, Supplier};
use serde::{Deserialize, Serialize};
use sources::SourceAdapter;

use crate::{ErrorChannel, View, empty_snapshot};

/// How the supplier view obtains supplier records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SupplierStrategy {
    /// One fetch per supplier id of the selected product.
    #[default]
    FanOut,
    /// Pick the product's suppliers out of the full supplier collection.
    Collection,
}

impl fmt::Display for SupplierStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FanOut => f.write_str("fan-out"),
            Self::Collection => f.write_str("collection"),
        }
    }
}

impl FromStr for SupplierStrategy {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "fan-out" | "fanout" => Ok(Self::FanOut),
            "collection" => Ok(Self::Collection),
            other => Err(format!("unknown supplier strategy: {other}")),
        }
    }
}

/// Fetches the suppliers of every selected product.
///
/// Runs only for a selected product; clearing the selection abandons the
/// fetches still in flight and leaves the last list in place. A product without supplier ids yields an empty list
/// without fetching. Otherwise one fetch per id is issued against
/// `suppliers_path` and the list is emitted once all of them completed, in
/// `supplier_ids` order. Selecting another product abandons the fetches still
/// in flight. If any fetch fails the failure is reported to `errors` and the
/// view emits an empty list for that product; later selections still fetch.
pub fn supplier_fan_out(
    adapter: &SourceAdapter,
    suppliers_path: &str,
    selected: &View<Option<Product>>,
    errors: &ErrorChannel,
) -> View<Snapshot<Supplier>> {
    let adapter = adapter.clone();
    let path: Arc<str> = suppliers_path.into();
    let errors = errors.clone();
    selected.switch_map(move |product| {
        let Some(product) = product else {
            return never();
        };
        let ids = product.supplier_ids().to_vec();
        if ids.is_empty() {
            return of(empty_snapshot());
        }

        metrics::counter!("supplier_fanouts_total").increment(1);
        tracing::debug!(suppliers = ids.len(), "fanning out supplier fetches");
        let fetches = ids
            .iter()
            .map(|id| adapter.fetch_by_id::<Supplier>(&path, id))
            .collect();
        let joined = fork_join(fetches).map(Snapshot::<Supplier>::from);
        errors.recover(&joined, empty_snapshot())
    })
}

/// Picks the suppliers of the selected product out of `suppliers`.
///
/// Same triggering rule as [`supplier_fan_out`]: while nothing is selected a
/// new supplier collection emits nothing. Ids missing from the collection are
/// skipped and the rest keep `supplier_ids` order.
pub fn suppliers_from_collection(
    suppliers: &View<Snapshot<Supplier>>,
    selected: &View<Option<Product>>,
) -> View<Snapshot<Supplier>> {
    combine_latest(selected, suppliers)
        .filter(|(product, _)| product.is_some())
        .map(pick_suppliers)
}

fn pick_suppliers((product, suppliers): (Option<Product>, Snapshot<Supplier>)) -> Snapshot<Supplier> {
    let Some(product) = product else {
        return empty_snapshot();
    };
    product
        .supplier_ids()
        .iter()
        .filter_map(|id| suppliers.iter().find(|supplier| supplier.id == *id))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::time::Duration;

    use dataflow::{Store, Subject};
    use futures_util::StreamExt;
    use serde_json::json;
    use sources::{InMemoryFetcher, SilentDiagnostics, SourceError};

    use super::*;

    fn backend() -> InMemoryFetcher {
        let fetcher = InMemoryFetcher::new();
        fetcher.set_collection(
            "api/suppliers",
            [3, 5, 9]
                .into_iter()
                .map(|id| json!({ "id": id, "name": format!("Supplier {id}") }))
                .collect(),
        );
        fetcher
    }

    fn adapter(fetcher: &InMemoryFetcher) -> SourceAdapter {
        SourceAdapter::new(Arc::new(fetcher.clone())).with_diagnostics(Arc::new(SilentDiagnostics))
    }

    fn ids(suppliers: &[Supplier]) -> Vec<u32> {
        suppliers.iter().map(|s| s.id.value()).collect()
    }

    #[test]
    fn test_strategy_parses_from_config_values() {
        assert_eq!("fan-out".parse(), Ok(SupplierStrategy::FanOut));
        assert_eq!(" Collection ".parse(), Ok(SupplierStrategy::Collection));
        assert!("bulk".parse::<SupplierStrategy>().is_err());
        assert_eq!(SupplierStrategy::default().to_string(), "fan-out");
    }

    #[tokio::test]
    async fn test_fan_out_preserves_id_order_whatever_completes_first() {
        let fetcher = backend();
        fetcher.set_delay("api/suppliers/5", Duration::from_millis(30));
        fetcher.set_delay("api/suppliers/3", Duration::from_millis(10));
        let selected = Store::new(Some(Product::new(1, "Rake", "R").supplied_by([5, 3, 9])));

        let view = supplier_fan_out(&adapter(&fetcher), "api/suppliers", &selected.observe(), &ErrorChannel::new());
        let mut stream = view.into_stream();

        let suppliers = stream.next().await.unwrap().unwrap();
        assert_eq!(ids(&suppliers), vec![5, 3, 9]);
    }

    #[tokio::test]
    async fn test_empty_supplier_ids_emit_without_fetching() {
        let fetcher = backend();
        let selected = Store::new(Some(Product::new(1, "Rake", "R")));

        let view = supplier_fan_out(&adapter(&fetcher), "api/suppliers", &selected.observe(), &ErrorChannel::new());
        let mut stream = view.into_stream();

        assert!(stream.next().await.unwrap().unwrap().is_empty());
        assert_eq!(fetcher.request_count("api/suppliers/3"), 0);
    }

    #[tokio::test]
    async fn test_nothing_happens_until_a_product_is_selected() {
        let fetcher = backend();
        let selected: Subject<Option<Product>, SourceError> = Subject::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let _subscription = supplier_fan_out(&adapter(&fetcher), "api/suppliers", &selected.observe(), &ErrorChannel::new())
            .subscribe_next(move |v| sink.lock().unwrap().push(v));

        selected.next(None);
        tokio::task::yield_now().await;

        assert!(seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_one_failed_fetch_fails_the_whole_fan_out() {
        let fetcher = backend();
        fetcher.fail_path("api/suppliers/9", SourceError::backend(500, "down"));
        let errors = ErrorChannel::new();
        let mut messages = errors.messages().into_stream();
        let selected = Store::new(Some(Product::new(1, "Rake", "R").supplied_by([3, 9])));

        let view = supplier_fan_out(&adapter(&fetcher), "api/suppliers", &selected.observe(), &errors);
        let mut stream = view.into_stream();

        assert!(stream.next().await.unwrap().unwrap().is_empty());
        assert_eq!(
            messages.next().await,
            Some(Ok("Backend returned code 500: down".to_string()))
        );

        selected.set(Some(Product::new(2, "Cart", "C").supplied_by([5])));
        assert_eq!(ids(&stream.next().await.unwrap().unwrap()), vec![5]);
    }

    #[tokio::test]
    async fn test_new_selection_abandons_stale_fan_out() {
        let fetcher = backend();
        fetcher.set_delay("api/suppliers/9", Duration::from_millis(50));
        let selected = Store::new(Some(Product::new(1, "Rake", "R").supplied_by([9])));

        let view = supplier_fan_out(&adapter(&fetcher), "api/suppliers", &selected.observe(), &ErrorChannel::new());
        let mut stream = view.into_stream();
        tokio::task::yield_now().await;
        selected.set(Some(Product::new(2, "Cart", "C").supplied_by([3])));

        assert_eq!(ids(&stream.next().await.unwrap().unwrap()), vec![3]);
        tokio::time::sleep(Duration::from_millis(80)).await;
        selected.set(Some(Product::new(3, "Saw", "S").supplied_by([5])));
        assert_eq!(ids(&stream.next().await.unwrap().unwrap()), vec![5]);
    }

    #[tokio::test]
    async fn test_clearing_selection_abandons_in_flight_fan_out() {
        let fetcher = backend();
        fetcher.set_delay("api/suppliers/9", Duration::from_millis(40));
        let selected = Store::new(Some(Product::new(1, "Rake", "R").supplied_by([9])));
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let _subscription = supplier_fan_out(&adapter(&fetcher), "api/suppliers", &selected.observe(), &ErrorChannel::new())
            .subscribe_next(move |v| sink.lock().unwrap().push(ids(&v)));

        tokio::task::yield_now().await;
        selected.set(None);
        tokio::time::sleep(Duration::from_millis(80)).await;

        assert!(seen.lock().unwrap().is_empty());
        assert_eq!(fetcher.request_count("api/suppliers/9"), 1);
    }

    #[tokio::test]
    async fn test_clearing_selection_keeps_last_list() {
        let fetcher = backend();
        let selected = Store::new(Some(Product::new(1, "Rake", "R").supplied_by([3])));
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let _subscription = supplier_fan_out(&adapter(&fetcher), "api/suppliers", &selected.observe(), &ErrorChannel::new())
            .subscribe_next(move |v| sink.lock().unwrap().push(ids(&v)));

        tokio::time::sleep(Duration::from_millis(20)).await;
        selected.set(None);
        tokio::time::sleep(Duration::from_millis(20)).await;

        assert_eq!(*seen.lock().unwrap(), vec![vec![3]]);
    }

    #[test]
    fn test_collection_strategy_ignores_suppliers_while_nothing_selected() {
        let suppliers: Subject<Snapshot<Supplier>, SourceError> = Subject::new();
        let selected = Store::new(Some(Product::new(1, "Rake", "R").supplied_by([3])));
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let _subscription = suppliers_from_collection(&suppliers.observe(), &selected.observe())
            .subscribe_next(move |v| sink.lock().unwrap().push(ids(&v)));

        suppliers.next(Snapshot::from(vec![Supplier::new(3, "Three")]));
        selected.set(None);
        suppliers.next(Snapshot::from(vec![Supplier::new(3, "Three"), Supplier::new(9, "Nine")]));

        assert_eq!(*seen.lock().unwrap(), vec![vec![3]]);
    }

    #[test]
    fn test_collection_strategy_keeps_id_order_and_skips_unknown() {
        let suppliers: Subject<Snapshot<Supplier>, SourceError> = Subject::new();
        let selected = Store::new(Some(Product::new(1, "Rake", "R").supplied_by([9, 4, 3])));
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let _subscription = suppliers_from_collection(&suppliers.observe(), &selected.observe())
            .subscribe_next(move |v| sink.lock().unwrap().push(ids(&v)));

        suppliers.next(Snapshot::from(vec![
            Supplier::new(3, "Three"),
            Supplier::new(9, "Nine"),
        ]));
        selected.set(None);
        selected.set(Some(Product::new(2, "Cart", "C")));

        assert_eq!(*seen.lock().unwrap(), vec![vec![9, 3], vec![]]);
    }
}
