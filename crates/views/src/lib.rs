//! Live derived views of the product catalog.
//!
//! Every view is an [`Observable`] that recomputes synchronously whenever one
//! of its inputs emits:
//! - [`ErrorChannel`] - hot feed of human-readable failure messages
//! - [`join_categories`] - products rebuilt against the category collection
//! - [`SelectionState`] - replaying "currently selected" id, starting at none
//! - [`filter_by_category`] / [`select_product`] - selection views
//! - [`supplier_fan_out`] / [`suppliers_from_collection`] - suppliers of the
//!   selected product
//! - [`InsertionLog`] - local insertions folded over the canonical collection
//! - [`ProductCatalog`] - the wired graph and its mutators
//!
//! [`LiveView`] and [`ErrorLog`] materialize views for synchronous readers.

pub mod catalog;
pub mod category_join;
pub mod error_channel;
pub mod error_log;
pub mod insertion_log;
pub mod live;
pub mod read_model;
pub mod selection;
pub mod selection_view;
pub mod suppliers;

use dataflow::{Observable, Snapshot};
use sources::SourceError;

pub use catalog::{CatalogConfig, ProductCatalog};
pub use category_join::join_categories;
pub use error_channel::ErrorChannel;
pub use error_log::{ErrorEntry, ErrorLog};
pub use insertion_log::{CatalogEvent, InsertionLog, fold};
pub use live::LiveView;
pub use read_model::ReadModel;
pub use selection::SelectionState;
pub use selection_view::{filter_by_category, select_product};
pub use suppliers::{SupplierStrategy, supplier_fan_out, suppliers_from_collection};

/// A derived catalog view.
///
/// Views that sit behind an error boundary never fail; the error type only
/// matters upstream of [`ErrorChannel::recover`].
pub type View<T> = Observable<T, SourceError>;

/// Returns a snapshot with no elements.
pub fn empty_snapshot<T>() -> Snapshot<T> {
    Snapshot::<T>::from(Vec::new())
}
