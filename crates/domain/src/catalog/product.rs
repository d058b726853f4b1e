//! The product entity.

use common::{CategoryId, ProductId, SupplierId};
use serde::{Deserialize, Deserializer, Serialize};

/// A product as served by the backend and shown in the views.
///
/// `category` and `search_key` are derived fields: the backend payload may
/// carry stale values, but every view recomputes them from `category_id` and
/// the current category collection (see [`crate::rebuild_product`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub product_name: String,
    #[serde(default)]
    pub product_code: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_zero")]
    pub price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<CategoryId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default)]
    pub quantity_in_stock: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supplier_ids: Option<Vec<SupplierId>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub search_key: Vec<String>,
}

fn null_as_zero<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    Option::<f64>::deserialize(deserializer).map(Option::unwrap_or_default)
}

impl Product {
    /// Id of the placeholder product.
    pub const PLACEHOLDER_ID: ProductId = ProductId::new(42);

    /// Creates a product with the given identity and no optional data.
    pub fn new(
        id: impl Into<ProductId>,
        product_name: impl Into<String>,
        product_code: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            product_name: product_name.into(),
            product_code: product_code.into(),
            description: String::new(),
            price: 0.0,
            category_id: None,
            category: None,
            quantity_in_stock: 0,
            supplier_ids: None,
            search_key: Vec::new(),
        }
    }

    /// Sets the price.
    pub fn with_price(mut self, price: f64) -> Self {
        self.price = price;
        self
    }

    /// Sets the category foreign key.
    pub fn in_category(mut self, category_id: impl Into<CategoryId>) -> Self {
        self.category_id = Some(category_id.into());
        self
    }

    /// Sets the supplier ids, in order.
    pub fn supplied_by(mut self, supplier_ids: impl IntoIterator<Item = u32>) -> Self {
        self.supplier_ids = Some(supplier_ids.into_iter().map(SupplierId::new).collect());
        self
    }

    /// Sets the description.
    pub fn described(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the stock level.
    pub fn with_stock(mut self, quantity: u32) -> Self {
        self.quantity_in_stock = quantity;
        self
    }

    /// The deterministic product inserted when no product is supplied.
    pub fn placeholder() -> Self {
        Self {
            category: Some("Toolbox".to_string()),
            ..Self::new(Self::PLACEHOLDER_ID, "Another One", "TBX-0042")
                .described("Our new product")
                .with_price(8.9)
                .in_category(3)
                .with_stock(30)
        }
    }

    /// Supplier ids in order; empty when the product lists none.
    pub fn supplier_ids(&self) -> &[SupplierId] {
        self.supplier_ids.as_deref().unwrap_or_default()
    }

    /// Returns true if the product belongs to `category_id`.
    pub fn belongs_to(&self, category_id: CategoryId) -> bool {
        self.category_id == Some(category_id)
    }
}
