//! Catalog view and mutator endpoints.

use std::sync::Arc;

use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use common::{CategoryId, ProductId, Selection};
use dataflow::Snapshot;
use domain::{Category, Product, Supplier};
use futures_util::StreamExt;
use serde::{Deserialize, Serialize};
use views::{ErrorEntry, ErrorLog, LiveView, ProductCatalog, ReadModel};

use crate::error::ApiError;

/// Shared application state accessible from all handlers.
///
/// Every exposed view is materialized once into a [`LiveView`] so handlers
/// read the latest value without subscribing.
pub struct AppState {
    pub catalog: ProductCatalog,
    pub categories: LiveView<Snapshot<Category>>,
    pub products: LiveView<Snapshot<Product>>,
    pub products_with_add: LiveView<Snapshot<Product>>,
    pub selected_product: LiveView<Option<Product>>,
    pub selected_product_suppliers: LiveView<Snapshot<Supplier>>,
    pub errors: ErrorLog,
}

impl AppState {
    /// Materializes the views of `catalog`. Must run inside a tokio runtime.
    pub fn new(catalog: ProductCatalog, error_log_capacity: usize) -> Self {
        let errors = ErrorLog::attach(catalog.errors(), error_log_capacity);
        Self {
            categories: LiveView::attach("categories", &catalog.categories()),
            products: LiveView::attach("products", &catalog.products()),
            products_with_add: LiveView::attach("products_with_add", &catalog.products_with_add()),
            selected_product: LiveView::attach("selected_product", &catalog.selected_product()),
            selected_product_suppliers: LiveView::attach(
                "selected_product_suppliers",
                &catalog.selected_product_suppliers(),
            ),
            errors,
            catalog,
        }
    }

    /// Every read model, for health reporting.
    pub fn read_models(&self) -> Vec<&dyn ReadModel> {
        vec![
            &self.categories,
            &self.products,
            &self.products_with_add,
            &self.selected_product,
            &self.selected_product_suppliers,
            &self.errors,
        ]
    }

    /// Resolves once the product and category collections were loaded,
    /// or replaced after a failed fetch.
    pub async fn loaded(&self) {
        let _ = self.catalog.categories().into_stream().next().await;
        let _ = self.catalog.products_with_category().into_stream().next().await;
    }
}

// -- Request types --

#[derive(Deserialize)]
pub struct SelectionRequest {
    /// Entity id; `0` clears the selection.
    pub id: u32,
}

// -- Response types --

#[derive(Serialize)]
pub struct SelectionResponse {
    pub selected: u32,
}

fn latest<T: dataflow::Item>(view: &LiveView<T>, name: &'static str) -> Result<T, ApiError> {
    view.get().ok_or(ApiError::NotReady(name))
}

// -- Handlers --

/// GET /categories
pub async fn categories(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Category>>, ApiError> {
    Ok(Json(latest(&state.categories, "categories")?.to_vec()))
}

/// GET /products: filtered by the selected category.
pub async fn products(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Product>>, ApiError> {
    Ok(Json(latest(&state.products, "products")?.to_vec()))
}

/// GET /products/with-additions
pub async fn products_with_add(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Product>>, ApiError> {
    Ok(Json(
        latest(&state.products_with_add, "products with additions")?.to_vec(),
    ))
}

/// GET /products/selected: `null` when nothing matches the selection.
pub async fn selected_product(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Option<Product>>, ApiError> {
    Ok(Json(latest(&state.selected_product, "selected product")?))
}

/// GET /products/selected/suppliers: empty until a product is selected.
pub async fn selected_product_suppliers(
    State(state): State<Arc<AppState>>,
) -> Json<Vec<Supplier>> {
    Json(
        state
            .selected_product_suppliers
            .get()
            .map(|suppliers| suppliers.to_vec())
            .unwrap_or_default(),
    )
}

/// GET /errors: recent error messages, oldest first.
pub async fn errors(State(state): State<Arc<AppState>>) -> Json<Vec<ErrorEntry>> {
    Json(state.errors.recent())
}

/// POST /selection/category
pub async fn select_category(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SelectionRequest>,
) -> Json<SelectionResponse> {
    state
        .catalog
        .select_category(Selection::<CategoryId>::from_raw(request.id));
    Json(SelectionResponse {
        selected: state.catalog.selected_category_id().raw(),
    })
}

/// POST /selection/product
pub async fn select_product(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SelectionRequest>,
) -> Json<SelectionResponse> {
    state
        .catalog
        .select_product(Selection::<ProductId>::from_raw(request.id));
    Json(SelectionResponse {
        selected: state.catalog.selected_product_id().raw(),
    })
}

/// POST /products: inserts the body, or the placeholder product when empty.
pub async fn insert_product(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<(StatusCode, Json<Product>), ApiError> {
    let product = if body.iter().all(u8::is_ascii_whitespace) {
        None
    } else {
        let product: Product = serde_json::from_slice(&body)?;
        if product.id.value() == Selection::<ProductId>::SENTINEL {
            return Err(ApiError::BadRequest("product id 0 is reserved".to_string()));
        }
        Some(product)
    };

    let inserted = state.catalog.insert_product(product);
    Ok((StatusCode::CREATED, Json(inserted)))
}

/// Fallback for unknown routes.
pub async fn not_found() -> ApiError {
    ApiError::NotFound("no such route".to_string())
}
