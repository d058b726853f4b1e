//! The wired catalog graph and its mutators.

use std::sync::Arc;

use common::{CategoryId, ProductId, Selection};
use dataflow::Snapshot;
use domain::{Category, Product, Supplier};
use sources::{Diagnostics, SourceAdapter, paths};

use crate::{
    ErrorChannel, InsertionLog, SelectionState, SupplierStrategy, View, empty_snapshot,
    filter_by_category, join_categories, select_product, supplier_fan_out,
    suppliers_from_collection,
};

/// Collection paths and supplier strategy of a [`ProductCatalog`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogConfig {
    pub products_path: String,
    pub categories_path: String,
    pub suppliers_path: String,
    pub supplier_strategy: SupplierStrategy,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            products_path: paths::PRODUCTS.to_string(),
            categories_path: paths::CATEGORIES.to_string(),
            suppliers_path: paths::SUPPLIERS.to_string(),
            supplier_strategy: SupplierStrategy::default(),
        }
    }
}

impl CatalogConfig {
    /// Sets the supplier strategy.
    pub fn with_supplier_strategy(mut self, strategy: SupplierStrategy) -> Self {
        self.supplier_strategy = strategy;
        self
    }
}

/// The product catalog as a live dataflow graph.
///
/// Building the catalog wires every view but fetches nothing: each source is
/// fetched when its first view gets a subscriber. Fetch failures of the
/// product and category collections are reported to [`Self::error_messages`]
/// and replaced by empty collections, so one failed source never stops the
/// other views. Cloning shares the graph and its state.
#[derive(Clone)]
pub struct ProductCatalog {
    errors: ErrorChannel,
    category_selection: SelectionState<CategoryId>,
    product_selection: SelectionState<ProductId>,
    insertions: InsertionLog,
    categories: View<Snapshot<Category>>,
    products_with_category: View<Snapshot<Product>>,
    products: View<Snapshot<Product>>,
    selected_product: View<Option<Product>>,
    selected_product_suppliers: View<Snapshot<Supplier>>,
    products_with_add: View<Snapshot<Product>>,
}

impl ProductCatalog {
    /// Wires the graph over `adapter`.
    pub fn new(adapter: &SourceAdapter, config: &CatalogConfig) -> Self {
        let errors = ErrorChannel::new();
        let diagnostics = adapter.diagnostics();

        let categories = errors
            .recover(
                &adapter.fetch_collection::<Category>(config.categories_path.as_str()),
                empty_snapshot(),
            )
            .share_replay();
        let raw_products = errors.recover(
            &adapter.fetch_collection::<Product>(config.products_path.as_str()),
            empty_snapshot(),
        );
        let products_with_category = join_categories(&raw_products, &categories, &errors);

        let category_selection = SelectionState::new("category");
        let product_selection = SelectionState::new("product");
        let products = filter_by_category(&products_with_category, &category_selection.selected());

        let selected_product = traced(
            &select_product(&products_with_category, &product_selection.selected()),
            "selected_product",
            &diagnostics,
        )
        .share_replay();

        let suppliers = match config.supplier_strategy {
            SupplierStrategy::FanOut => {
                supplier_fan_out(adapter, &config.suppliers_path, &selected_product, &errors)
            }
            SupplierStrategy::Collection => {
                let all = errors
                    .recover(
                        &adapter.fetch_collection::<Supplier>(config.suppliers_path.as_str()),
                        empty_snapshot(),
                    )
                    .share_replay();
                suppliers_from_collection(&all, &selected_product)
            }
        };
        let selected_product_suppliers =
            traced(&suppliers, "selected_product_suppliers", &diagnostics);

        let insertions = InsertionLog::new();
        let products_with_add = insertions.with_insertions(&products_with_category);

        tracing::debug!(strategy = %config.supplier_strategy, "catalog graph wired");

        Self {
            errors,
            category_selection,
            product_selection,
            insertions,
            categories,
            products_with_category,
            products,
            selected_product,
            selected_product_suppliers,
            products_with_add,
        }
    }

    /// The category collection.
    pub fn categories(&self) -> View<Snapshot<Category>> {
        self.categories.clone()
    }

    /// Products of the selected category, or all of them with none selected.
    pub fn products(&self) -> View<Snapshot<Product>> {
        self.products.clone()
    }

    /// Every product rebuilt against the categories.
    pub fn products_with_category(&self) -> View<Snapshot<Product>> {
        self.products_with_category.clone()
    }

    /// The selected product, `None` when nothing or an unknown id is selected.
    pub fn selected_product(&self) -> View<Option<Product>> {
        self.selected_product.clone()
    }

    /// Suppliers of the selected product.
    pub fn selected_product_suppliers(&self) -> View<Snapshot<Supplier>> {
        self.selected_product_suppliers.clone()
    }

    /// Products with local insertions appended.
    ///
    /// The fold is cold: each subscriber keeps its own accumulator and only
    /// sees insertions made after it subscribed. Hold one long-lived
    /// subscriber (such as a [`crate::LiveView`]) to observe every insertion.
    pub fn products_with_add(&self) -> View<Snapshot<Product>> {
        self.products_with_add.clone()
    }

    /// The error channel every boundary of this graph reports to.
    pub fn errors(&self) -> &ErrorChannel {
        &self.errors
    }

    /// Future error messages.
    pub fn error_messages(&self) -> dataflow::Observable<String, std::convert::Infallible> {
        self.errors.messages()
    }

    /// Selects a category; [`Selection::None`] shows all products.
    pub fn select_category(&self, selection: impl Into<Selection<CategoryId>>) {
        self.category_selection.select(selection);
    }

    /// Selects a product; [`Selection::None`] clears the selection.
    pub fn select_product(&self, selection: impl Into<Selection<ProductId>>) {
        self.product_selection.select(selection);
    }

    /// Inserts `product` locally, or the placeholder product when `None`.
    pub fn insert_product(&self, product: Option<Product>) -> Product {
        self.insertions.insert(product)
    }

    pub fn selected_category_id(&self) -> Selection<CategoryId> {
        self.category_selection.current()
    }

    pub fn selected_product_id(&self) -> Selection<ProductId> {
        self.product_selection.current()
    }
}

fn traced<T: dataflow::Item + std::fmt::Debug>(
    view: &View<T>,
    name: &'static str,
    diagnostics: &Arc<dyn Diagnostics>,
) -> View<T> {
    let diagnostics = Arc::clone(diagnostics);
    view.tap(move |value| diagnostics.derived(name, value))
}

#[cfg(test)]
mod tests {
    use futures_util::StreamExt;
    use sources::{SilentDiagnostics, demo_fetcher};

    use super::*;

    fn catalog(strategy: SupplierStrategy) -> ProductCatalog {
        let adapter = SourceAdapter::new(Arc::new(demo_fetcher()))
            .with_diagnostics(Arc::new(SilentDiagnostics));
        ProductCatalog::new(&adapter, &CatalogConfig::default().with_supplier_strategy(strategy))
    }

    #[test]
    fn test_default_config_points_at_backend_collections() {
        let config = CatalogConfig::default();
        assert_eq!(config.products_path, "api/products");
        assert_eq!(config.categories_path, "api/productCategories");
        assert_eq!(config.suppliers_path, "api/suppliers");
        assert_eq!(config.supplier_strategy, SupplierStrategy::FanOut);
    }

    #[tokio::test]
    async fn test_demo_catalog_rebuilds_products() {
        let catalog = catalog(SupplierStrategy::FanOut);
        let mut products = catalog.products().into_stream();

        let products = products.next().await.unwrap().unwrap();
        let hammer = products.iter().find(|p| p.product_name == "Hammer").unwrap();
        assert_eq!(hammer.category.as_deref(), Some("Toolbox"));
        assert_eq!(hammer.search_key, vec!["Hammer".to_string()]);
    }

    #[tokio::test]
    async fn test_both_supplier_strategies_agree() {
        for strategy in [SupplierStrategy::FanOut, SupplierStrategy::Collection] {
            let catalog = catalog(strategy);
            catalog.select_product(ProductId::new(5));
            let mut suppliers = catalog.selected_product_suppliers().into_stream();

            let suppliers = suppliers.next().await.unwrap().unwrap();
            let ids: Vec<u32> = suppliers.iter().map(|s| s.id.value()).collect();
            assert_eq!(ids, vec![5, 6], "strategy {strategy}");
        }
    }

    #[tokio::test]
    async fn test_late_subscriber_misses_earlier_insertions() {
        let catalog = catalog(SupplierStrategy::FanOut);
        let live = crate::LiveView::attach("products_with_add", &catalog.products_with_add());
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;

        catalog.insert_product(None);
        let mut late = catalog.products_with_add().into_stream();
        let late = late.next().await.unwrap().unwrap();

        assert_eq!(live.get().map(|p| p.len()), Some(late.len() + 1));
        assert!(late.iter().all(|p| p.id != Product::PLACEHOLDER_ID));
    }

    #[test]
    fn test_selections_are_independent() {
        let catalog = catalog(SupplierStrategy::FanOut);
        catalog.select_category(CategoryId::new(3));

        assert!(catalog.selected_category_id().is(CategoryId::new(3)));
        assert!(catalog.selected_product_id().is_none());
    }
}
