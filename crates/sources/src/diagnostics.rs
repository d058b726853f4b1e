//! Observability hook for the dataflow boundaries.

use serde_json::Value;

use crate::SourceError;

/// Receives diagnostic events from fetches and derived views.
///
/// Kept apart from the transforms so logging never changes what a view emits.
/// Every method defaults to doing nothing.
pub trait Diagnostics: Send + Sync {
    /// A raw payload was fetched from `path`.
    fn payload(&self, _path: &str, _payload: &Value) {}

    /// A fetch of `path` failed.
    fn failure(&self, _path: &str, _error: &SourceError) {}

    /// A derived view emitted a value worth tracing.
    fn derived(&self, _view: &'static str, _detail: &dyn std::fmt::Debug) {}
}

/// Logs every diagnostic event through `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingDiagnostics;

impl Diagnostics for TracingDiagnostics {
    fn payload(&self, path: &str, payload: &Value) {
        tracing::debug!(path, %payload, "fetched payload");
    }

    fn failure(&self, path: &str, error: &SourceError) {
        tracing::warn!(path, %error, "fetch failed");
    }

    fn derived(&self, view: &'static str, detail: &dyn std::fmt::Debug) {
        tracing::debug!(view, ?detail, "view emitted");
    }
}

/// Discards every diagnostic event.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentDiagnostics;

impl Diagnostics for SilentDiagnostics {}
