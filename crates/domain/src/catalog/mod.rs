//! Catalog entities and derivation rules.

pub mod category;
pub mod product;
pub mod rebuild;
pub mod supplier;

pub use category::Category;
pub use product::Product;
pub use rebuild::{PRICE_MARKUP, rebuild_all, rebuild_product};
pub use supplier::Supplier;
