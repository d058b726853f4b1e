//! Local insertions folded over the canonical product collection.

use std::iter;

use dataflow::{Snapshot, Subject, merge};
use domain::Product;
use sources::SourceError;

use crate::{View, empty_snapshot};

/// One step of the insertion fold.
#[derive(Debug, Clone, PartialEq)]
pub enum CatalogEvent {
    /// A fresh canonical collection; discards everything accumulated so far.
    Replace(Snapshot<Product>),
    /// A locally inserted product, appended to the accumulator.
    Append(Product),
}

/// Applies one event to the accumulated collection.
pub fn fold(accumulated: &Snapshot<Product>, event: CatalogEvent) -> Snapshot<Product> {
    match event {
        CatalogEvent::Replace(collection) => collection,
        CatalogEvent::Append(product) => accumulated
            .iter()
            .cloned()
            .chain(iter::once(product))
            .collect(),
    }
}

/// Hot stream of locally inserted products.
#[derive(Clone, Default)]
pub struct InsertionLog {
    inserted: Subject<Product, SourceError>,
}

impl InsertionLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Emits `product`, or [`Product::placeholder`] when none is given, and
    /// returns what was emitted.
    pub fn insert(&self, product: Option<Product>) -> Product {
        let product = product.unwrap_or_else(Product::placeholder);
        metrics::counter!("catalog_insertions_total").increment(1);
        tracing::info!(product_id = %product.id, name = %product.product_name, "product inserted");
        self.inserted.next(product.clone());
        product
    }

    /// Insertions made from now on.
    pub fn inserted(&self) -> View<Product> {
        self.inserted.observe()
    }

    /// Left-folds `canonical` and the insertions into one running collection.
    ///
    /// Starts from an empty collection. The result depends on how the two
    /// inputs interleave: an insertion only survives until the next canonical
    /// emission.
    pub fn with_insertions(&self, canonical: &View<Snapshot<Product>>) -> View<Snapshot<Product>> {
        let events = merge(
            &canonical.map(CatalogEvent::Replace),
            &self.inserted().map(CatalogEvent::Append),
        );
        events.scan(empty_snapshot(), fold)
    }
}
