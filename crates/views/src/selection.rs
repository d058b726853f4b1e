//! The "currently selected" id as a live, replaying value.

use common::{EntityId, Selection};
use dataflow::Store;

use crate::View;

/// Holds one selection, starting at [`Selection::None`].
///
/// [`SelectionState::select`] is the only way to change it. Cloning shares
/// the underlying store, so two independent selections need two
/// [`SelectionState::new`] calls.
#[derive(Clone)]
pub struct SelectionState<Id> {
    name: &'static str,
    store: Store<Selection<Id>>,
}

impl<Id: EntityId> SelectionState<Id> {
    /// Creates a selection with nothing selected. `name` labels its logs and metrics.
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            store: Store::new(Selection::None),
        }
    }

    /// Sets the current selection and pushes it to every subscriber.
    pub fn select(&self, selection: impl Into<Selection<Id>>) {
        let selection = selection.into();
        metrics::counter!("catalog_selection_changes_total", "selection" => self.name).increment(1);
        tracing::debug!(selection = self.name, id = selection.raw(), "selection changed");
        self.store.set(selection);
    }

    /// Clears the selection.
    pub fn clear(&self) {
        self.select(Selection::None);
    }

    /// Returns the current selection.
    pub fn current(&self) -> Selection<Id> {
        self.store.get()
    }

    /// Streams the current selection followed by every change.
    pub fn selected(&self) -> View<Selection<Id>> {
        self.store.observe()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use common::{CategoryId, ProductId};

    use super::*;

    #[test]
    fn test_starts_at_sentinel() {
        let state = SelectionState::<CategoryId>::new("category");
        assert!(state.current().is_none());
        assert_eq!(state.current().raw(), 0);
    }

    #[test]
    fn test_late_subscriber_gets_current_then_changes() {
        let state = SelectionState::<ProductId>::new("product");
        state.select(ProductId::new(5));

        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let _subscription = state
            .selected()
            .subscribe_next(move |s| sink.lock().unwrap().push(s.raw()));
        state.select(Selection::from_raw(8));
        state.clear();

        assert_eq!(*seen.lock().unwrap(), vec![5, 8, 0]);
    }

    #[test]
    fn test_separate_states_are_independent() {
        let categories = SelectionState::<CategoryId>::new("category");
        let other = SelectionState::<CategoryId>::new("category");
        let shared = categories.clone();

        shared.select(CategoryId::new(3));

        assert!(categories.current().is(CategoryId::new(3)));
        assert!(other.current().is_none());
    }
}
