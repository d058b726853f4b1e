//! Prometheus metrics endpoint.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use metrics_exporter_prometheus::PrometheusHandle;

/// Registers help text for every counter the catalog records.
///
/// Call once after the recorder is installed.
pub fn describe() {
    metrics::describe_counter!("source_fetches_total", "Fetches issued against the backend");
    metrics::describe_counter!("source_failures_total", "Fetches that failed or returned an unexpected shape");
    metrics::describe_counter!("error_channel_reports_total", "Messages published on the error channel");
    metrics::describe_counter!("catalog_selection_changes_total", "Selection changes, by selection");
    metrics::describe_counter!("catalog_insertions_total", "Products inserted locally");
    metrics::describe_counter!("supplier_fanouts_total", "Supplier fan-outs started");
}

/// GET /metrics: Prometheus text exposition of every recorded metric.
pub async fn get(State(handle): State<PrometheusHandle>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(
            axum::http::header::CONTENT_TYPE,
            "text/plain; version=0.0.4; charset=utf-8",
        )],
        handle.render(),
    )
}
