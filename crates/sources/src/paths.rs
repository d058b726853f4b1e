//! Default collection paths.

/// Product collection.
pub const PRODUCTS: &str = "api/products";

/// Category collection.
pub const CATEGORIES: &str = "api/productCategories";

/// Supplier collection; single suppliers live at `api/suppliers/<id>`.
pub const SUPPLIERS: &str = "api/suppliers";
