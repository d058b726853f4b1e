//! Views combining a collection with a selection.

use common::{CategoryId, ProductId, Selection};
use dataflow::{Snapshot, combine_latest};
use domain::Product;

use crate::View;

/// Keeps the products of the selected category.
///
/// With nothing selected the collection passes through unchanged. Re-emits
/// whenever either the collection or the selection changes.
pub fn filter_by_category(
    products: &View<Snapshot<Product>>,
    selected: &View<Selection<CategoryId>>,
) -> View<Snapshot<Product>> {
    combine_latest(products, selected).map(|(products, selection)| match selection.id() {
        None => products,
        Some(category_id) => products
            .iter()
            .filter(|product| product.belongs_to(category_id))
            .cloned()
            .collect(),
    })
}

/// The selected product, or `None` when nothing matches the selection.
pub fn select_product(
    products: &View<Snapshot<Product>>,
    selected: &View<Selection<ProductId>>,
) -> View<Option<Product>> {
    combine_latest(products, selected).map(|(products, selection)| {
        let id = selection.id()?;
        products.iter().find(|product| product.id == id).cloned()
    })
}
