//! Shared identifier and selection types for the product catalog.

pub mod selection;
pub mod types;

pub use selection::Selection;
pub use types::{CategoryId, EntityId, ProductId, SupplierId};
