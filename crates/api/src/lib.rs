//! HTTP API server exposing the live catalog views.
//!
//! Serves the latest value of every derived view as JSON, the selection and
//! insertion mutators as POST endpoints, and the error channel as a
//! server-sent events feed, with structured logging (tracing) and Prometheus
//! metrics.

pub mod config;
pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use metrics_exporter_prometheus::PrometheusHandle;
use sources::{Fetcher, HttpFetcher, SourceAdapter};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use views::{CatalogConfig, ProductCatalog};

use config::Config;
use routes::catalog::AppState;

/// Creates the Axum application router with all routes and shared state.
pub fn create_app(state: Arc<AppState>, metrics_handle: PrometheusHandle) -> Router {
    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::get))
        .with_state(metrics_handle);

    Router::new()
        .route("/health", get(routes::health::check))
        .route("/categories", get(routes::catalog::categories))
        .route(
            "/products",
            get(routes::catalog::products).post(routes::catalog::insert_product),
        )
        .route(
            "/products/with-additions",
            get(routes::catalog::products_with_add),
        )
        .route("/products/selected", get(routes::catalog::selected_product))
        .route(
            "/products/selected/suppliers",
            get(routes::catalog::selected_product_suppliers),
        )
        .route("/selection/category", post(routes::catalog::select_category))
        .route("/selection/product", post(routes::catalog::select_product))
        .route("/errors", get(routes::catalog::errors))
        .route("/errors/stream", get(routes::events::error_stream))
        .fallback(routes::catalog::not_found)
        .with_state(state)
        .merge(metrics_router)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}

/// Creates the application state over `fetcher`. Must run inside a tokio runtime.
pub fn create_default_state(fetcher: Arc<dyn Fetcher>, config: &Config) -> Arc<AppState> {
    let adapter = SourceAdapter::new(fetcher);
    let catalog = ProductCatalog::new(
        &adapter,
        &CatalogConfig::default().with_supplier_strategy(config.supplier_strategy),
    );
    Arc::new(AppState::new(catalog, config.error_log_capacity))
}

/// Builds the fetcher `config` asks for: HTTP when a backend URL is set,
/// otherwise the in-memory demo collections.
///
/// # Errors
///
/// Returns an error if the HTTP client cannot be constructed.
pub fn create_fetcher(config: &Config) -> sources::Result<Arc<dyn Fetcher>> {
    let fetcher: Arc<dyn Fetcher> = match &config.backend_url {
        Some(url) => {
            tracing::info!(%url, "fetching catalog from backend");
            Arc::new(HttpFetcher::new(url.clone())?)
        }
        None => {
            tracing::info!("no BACKEND_URL set, serving demo catalog");
            Arc::new(sources::demo_fetcher())
        }
    };
    Ok(fetcher)
}
