//! Suppliers.

use common::SupplierId;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A supplier of one or more products.
///
/// Only the id and name are interpreted; every other field of the payload is
/// carried through untouched in `details`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Supplier {
    pub id: SupplierId,
    #[serde(default)]
    pub name: String,
    #[serde(flatten)]
    pub details: Map<String, Value>,
}

impl Supplier {
    /// Creates a supplier without extra details.
    pub fn new(id: impl Into<SupplierId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            details: Map::new(),
        }
    }

    /// Adds an opaque detail field.
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.details.insert(key.into(), value.into());
        self
    }
}
