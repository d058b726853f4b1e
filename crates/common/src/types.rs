use serde::{Deserialize, Serialize};

/// Common behaviour of the integer identifiers used by catalog entities.
///
/// Valid identifiers are non-zero: `0` is reserved as the "nothing selected"
/// wire value (see [`crate::Selection`]).
pub trait EntityId: Copy + Eq + std::hash::Hash + std::fmt::Debug + Send + Sync + 'static {
    /// Wraps a raw identifier value.
    fn from_raw(raw: u32) -> Self;

    /// Returns the raw identifier value.
    fn raw(self) -> u32;
}

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(u32);

        impl $name {
            /// Creates an identifier from its raw value.
            pub const fn new(raw: u32) -> Self {
                Self(raw)
            }

            /// Returns the raw identifier value.
            pub const fn value(&self) -> u32 {
                self.0
            }
        }

        impl EntityId for $name {
            fn from_raw(raw: u32) -> Self {
                Self(raw)
            }

            fn raw(self) -> u32 {
                self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<u32> for $name {
            fn from(raw: u32) -> Self {
                Self(raw)
            }
        }

        impl From<$name> for u32 {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

entity_id!(
    /// Unique identifier of a product.
    ProductId
);

entity_id!(
    /// Unique identifier of a product category.
    CategoryId
);

entity_id!(
    /// Unique identifier of a supplier.
    SupplierId
);
