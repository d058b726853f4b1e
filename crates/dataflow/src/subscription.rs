//! Teardown handles.

/// Handle to an active subscription.
///
/// Dropping the handle tears the subscription down: the subscriber stops
/// receiving notifications and upstream resources (child subscriptions,
/// in-flight fetches) are released.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    teardown: Option<Box<dyn FnOnce() + Send>>,
}

impl Subscription {
    /// Creates a subscription that runs `teardown` once when released.
    pub fn new(teardown: impl FnOnce() + Send + 'static) -> Self {
        Self {
            teardown: Some(Box::new(teardown)),
        }
    }

    /// A subscription with nothing to release.
    pub fn empty() -> Self {
        Self { teardown: None }
    }

    /// Combines several subscriptions into one released together.
    pub fn all(children: Vec<Subscription>) -> Self {
        Self::new(move || drop(children))
    }

    /// Releases the subscription now.
    pub fn unsubscribe(self) {
        drop(self);
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(teardown) = self.teardown.take() {
            teardown();
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.teardown.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_teardown_runs_once_on_drop() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let subscription = Subscription::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        subscription.unsubscribe();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_composite_releases_every_child() {
        let calls = Arc::new(AtomicUsize::new(0));
        let children = (0..3)
            .map(|_| {
                let counter = Arc::clone(&calls);
                Subscription::new(move || {
                    counter.fetch_add(1, Ordering::SeqCst);
                })
            })
            .collect();
        drop(Subscription::all(children));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }
}
