//! Products joined with the category collection.

use dataflow::{Snapshot, combine_latest};
use domain::{Category, Product, rebuild_all};

use crate::{ErrorChannel, View, empty_snapshot};

/// Rebuilds every product against the latest categories.
///
/// Re-emits whenever either input emits, using the most recent value of the
/// other one. Failures reaching this boundary are reported to `errors` and
/// replaced by an empty collection. The result is shared: the rebuild runs
/// once per upstream emission however many views read it, and late readers
/// get the latest snapshot immediately.
pub fn join_categories(
    products: &View<Snapshot<Product>>,
    categories: &View<Snapshot<Category>>,
    errors: &ErrorChannel,
) -> View<Snapshot<Product>> {
    let joined = combine_latest(products, categories)
        .map(|(products, categories)| Snapshot::from(rebuild_all(&products, &categories)));
    errors.recover(&joined, empty_snapshot()).share_replay()
}
