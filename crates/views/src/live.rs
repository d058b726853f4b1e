//! Latest value of a live view, readable without subscribing.

use std::sync::{Arc, Mutex, PoisonError, RwLock};

use chrono::{DateTime, Utc};
use dataflow::{Item, Notification, Snapshot, Subscription};

use crate::View;
use crate::read_model::ReadModel;

/// Number of entries a materialized value holds.
pub trait Entries {
    fn entries(&self) -> usize;
}

impl<T> Entries for Snapshot<T> {
    fn entries(&self) -> usize {
        self.len()
    }
}

impl<T> Entries for Option<T> {
    fn entries(&self) -> usize {
        usize::from(self.is_some())
    }
}

struct Latest<T> {
    value: Option<T>,
    updated_at: Option<DateTime<Utc>>,
    emissions: u64,
}

/// Keeps the most recent emission of a view.
///
/// The view stays subscribed for as long as any clone of the `LiveView`
/// exists. Until the first emission [`LiveView::get`] returns `None`.
#[derive(Clone)]
pub struct LiveView<T> {
    name: &'static str,
    latest: Arc<RwLock<Latest<T>>>,
    /// Never locked: the mutex only makes the held subscription `Sync`.
    _subscription: Arc<Mutex<Subscription>>,
}

impl<T: Item> LiveView<T> {
    /// Subscribes to `view` and starts recording its values.
    pub fn attach(name: &'static str, view: &View<T>) -> Self {
        let latest = Arc::new(RwLock::new(Latest {
            value: None,
            updated_at: None,
            emissions: 0,
        }));
        let sink = Arc::clone(&latest);
        let subscription = view.subscribe(move |notification| match notification {
            Notification::Next(value) => {
                let mut latest = sink.write().unwrap_or_else(PoisonError::into_inner);
                latest.value = Some(value);
                latest.updated_at = Some(Utc::now());
                latest.emissions += 1;
            }
            Notification::Error(error) => tracing::warn!(view = name, %error, "live view failed"),
            Notification::Complete => tracing::debug!(view = name, "live view completed"),
        });
        Self {
            name,
            latest,
            _subscription: Arc::new(Mutex::new(subscription)),
        }
    }

    /// Returns the latest value, if the view emitted yet.
    pub fn get(&self) -> Option<T> {
        self.read(|latest| latest.value.clone())
    }

    /// Returns true once the view emitted at least once.
    pub fn is_ready(&self) -> bool {
        self.read(|latest| latest.value.is_some())
    }

    /// When the latest value arrived.
    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.read(|latest| latest.updated_at)
    }

    /// How many values the view emitted so far.
    pub fn emissions(&self) -> u64 {
        self.read(|latest| latest.emissions)
    }

    fn read<R>(&self, f: impl FnOnce(&Latest<T>) -> R) -> R {
        f(&self.latest.read().unwrap_or_else(PoisonError::into_inner))
    }
}

impl<T: Item + Entries> ReadModel for LiveView<T> {
    fn name(&self) -> &'static str {
        self.name
    }

    fn count(&self) -> usize {
        self.read(|latest| latest.value.as_ref().map_or(0, Entries::entries))
    }
}
