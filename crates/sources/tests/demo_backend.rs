//! Integration tests: the source adapter over the demo backend.

use std::sync::Arc;

use domain::{Category, Product, Supplier};
use futures_util::StreamExt;
use sources::{SilentDiagnostics, SourceAdapter, SourceError, demo_fetcher, paths};

fn adapter() -> SourceAdapter {
    SourceAdapter::new(Arc::new(demo_fetcher())).with_diagnostics(Arc::new(SilentDiagnostics))
}

#[tokio::test]
async fn test_demo_collections_stream_once() {
    let adapter = adapter();

    let mut products = adapter.fetch_collection::<Product>(paths::PRODUCTS).into_stream();
    let products = products.next().await.unwrap().unwrap();
    assert_eq!(products.len(), 5);
    assert!(products.iter().all(|p| p.category.is_none()));

    let mut categories = adapter.fetch_collection::<Category>(paths::CATEGORIES).into_stream();
    let categories = categories.next().await.unwrap().unwrap();
    let names: Vec<&str> = categories.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Garden", "Toolbox", "Gaming"]);
}

#[tokio::test]
async fn test_supplier_details_survive_decoding() {
    let mut supplier = adapter()
        .fetch_by_id::<Supplier>(paths::SUPPLIERS, 6)
        .into_stream();

    let supplier = supplier.next().await.unwrap().unwrap();
    assert_eq!(supplier.name, "Acme Tool Supply");
    assert_eq!(supplier.details["minQuantity"], 24);
}

#[tokio::test]
async fn test_unknown_supplier_is_backend_not_found() {
    let mut supplier = adapter()
        .fetch_by_id::<Supplier>(paths::SUPPLIERS, 99)
        .into_stream();

    let error = supplier.next().await.unwrap().unwrap_err();
    assert_eq!(error.status(), Some(404));
    assert!(matches!(error, SourceError::Backend { .. }));
    assert!(supplier.next().await.is_none());
}
