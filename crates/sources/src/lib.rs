//! Remote collection sources for the catalog dataflow.
//!
//! This crate owns the boundary between the dataflow graph and the backend:
//! - [`Fetcher`] - the fetch capability (`GET <path>` returning JSON)
//! - [`HttpFetcher`] and [`InMemoryFetcher`] implementations
//! - [`SourceAdapter`] - turns fetches into single-shot observables
//! - [`SourceError`] - the transport/backend failure taxonomy
//! - [`Diagnostics`] - the observability hook invoked around fetches and views

pub mod adapter;
pub mod diagnostics;
pub mod error;
pub mod fetcher;
pub mod http;
pub mod memory;
pub mod paths;
pub mod seed;

pub use adapter::SourceAdapter;
pub use diagnostics::{Diagnostics, SilentDiagnostics, TracingDiagnostics};
pub use error::{Result, SourceError};
pub use fetcher::Fetcher;
pub use http::HttpFetcher;
pub use memory::InMemoryFetcher;
pub use seed::demo_fetcher;
