//! Catalog domain for the live product views.
//!
//! This crate provides the entities the views are derived from and the pure
//! rules applied when deriving them:
//! - [`Product`], [`Category`], [`Supplier`] with their wire (camelCase JSON) shape
//! - [`rebuild_product`] - denormalizes a product against the category collection
//! - [`Product::placeholder`] - the deterministic product inserted when none is given

pub mod catalog;

pub use catalog::{Category, PRICE_MARKUP, Product, Supplier, rebuild_all, rebuild_product};
pub use common::{CategoryId, ProductId, Selection, SupplierId};
