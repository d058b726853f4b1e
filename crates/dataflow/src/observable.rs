//! Cold observables and their basic constructors.

use std::future::Future;
use std::sync::Arc;

use crate::{Item, Notification, Subscriber, Subscription};

type SubscribeFn<T, E> = dyn Fn(Subscriber<T, E>) -> Subscription + Send + Sync;

/// A cold producer of values.
///
/// Nothing runs until a subscriber attaches; each subscription executes the
/// producer independently. Use [`Observable::share_replay`] to share one
/// execution between several subscribers.
pub struct Observable<T, E> {
    subscribe_fn: Arc<SubscribeFn<T, E>>,
}

impl<T, E> Clone for Observable<T, E> {
    fn clone(&self) -> Self {
        Self {
            subscribe_fn: Arc::clone(&self.subscribe_fn),
        }
    }
}

impl<T: Item, E: Item> Observable<T, E> {
    /// Creates an observable from its subscribe function.
    ///
    /// The function receives the subscriber for one execution and returns the
    /// subscription releasing whatever that execution holds.
    pub fn new(
        subscribe_fn: impl Fn(Subscriber<T, E>) -> Subscription + Send + Sync + 'static,
    ) -> Self {
        Self {
            subscribe_fn: Arc::new(subscribe_fn),
        }
    }

    /// Runs the producer for `subscriber`.
    ///
    /// Releasing the returned subscription closes `subscriber` before the
    /// producer's own teardown runs, so no notification can slip through
    /// while upstream resources are being released.
    pub fn subscribe_with(&self, subscriber: Subscriber<T, E>) -> Subscription {
        let guard = subscriber.clone();
        let inner = (self.subscribe_fn)(subscriber);
        Subscription::new(move || {
            guard.close();
            drop(inner);
        })
    }

    /// Subscribes with a handler receiving every notification.
    pub fn subscribe(
        &self,
        handler: impl Fn(Notification<T, E>) + Send + Sync + 'static,
    ) -> Subscription {
        self.subscribe_with(Subscriber::new(handler))
    }

    /// Subscribes to values only, ignoring failure and completion.
    pub fn subscribe_next(&self, on_next: impl Fn(T) + Send + Sync + 'static) -> Subscription {
        self.subscribe(move |notification| {
            if let Notification::Next(value) = notification {
                on_next(value);
            }
        })
    }
}

/// Emits `value` and completes.
pub fn of<T: Item, E: Item>(value: T) -> Observable<T, E> {
    Observable::new(move |subscriber| {
        subscriber.next(value.clone());
        subscriber.complete();
        Subscription::empty()
    })
}

/// Completes without emitting.
pub fn empty<T: Item, E: Item>() -> Observable<T, E> {
    Observable::new(|subscriber| {
        subscriber.complete();
        Subscription::empty()
    })
}

/// Never emits, fails or completes.
pub fn never<T: Item, E: Item>() -> Observable<T, E> {
    Observable::new(|_subscriber| Subscription::empty())
}

/// Fails immediately with `error`.
pub fn throw<T: Item, E: Item>(error: E) -> Observable<T, E> {
    Observable::new(move |subscriber| {
        subscriber.error(error.clone());
        Subscription::empty()
    })
}

/// Emits the outcome of a future produced per subscription.
///
/// Every subscription calls `factory` and spawns the future on the current
/// tokio runtime; `Ok` is emitted followed by completion, `Err` fails the
/// stream. Dropping the subscription aborts the future if it is still pending.
///
/// Must be subscribed from within a tokio runtime.
pub fn from_future<T, E, F, Fut>(factory: F) -> Observable<T, E>
where
    T: Item,
    E: Item,
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<T, E>> + Send + 'static,
{
    Observable::new(move |subscriber| {
        let future = factory();
        let task = tokio::spawn(async move {
            match future.await {
                Ok(value) => {
                    subscriber.next(value);
                    subscriber.complete();
                }
                Err(error) => subscriber.error(error),
            }
        });
        Subscription::new(move || task.abort())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::Recorder;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[test]
    fn test_of_emits_then_completes() {
        let recorder = Recorder::attach(&of::<u32, String>(7));
        assert_eq!(
            recorder.notifications(),
            vec![Notification::Next(7), Notification::Complete]
        );
    }

    #[test]
    fn test_each_subscription_runs_the_producer() {
        let runs = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&runs);
        let source: Observable<u32, String> = Observable::new(move |subscriber| {
            counter.fetch_add(1, Ordering::SeqCst);
            subscriber.next(1);
            Subscription::empty()
        });

        let _a = Recorder::attach(&source);
        let _b = Recorder::attach(&source);
        assert_eq!(runs.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_throw_and_empty() {
        let failed = Recorder::attach(&throw::<u32, String>("nope".to_string()));
        assert_eq!(failed.error(), Some("nope".to_string()));

        let finished = Recorder::attach(&empty::<u32, String>());
        assert!(finished.completed());
        assert!(finished.values().is_empty());
    }

    #[tokio::test]
    async fn test_from_future_emits_resolved_value() {
        let source = from_future(|| async { Ok::<_, String>(11u32) });
        let recorder = Recorder::attach(&source);

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(recorder.values(), vec![11]);
        assert!(recorder.completed());
    }

    #[tokio::test]
    async fn test_from_future_surfaces_failure_through_the_stream() {
        let source = from_future(|| async { Err::<u32, _>("offline".to_string()) });
        let recorder = Recorder::attach(&source);

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(recorder.error(), Some("offline".to_string()));
    }

    #[tokio::test]
    async fn test_dropping_the_subscription_abandons_the_future() {
        let delivered = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&delivered);
        let source = from_future(|| async {
            tokio::time::sleep(Duration::from_millis(30)).await;
            Ok::<_, String>(1u32)
        });

        let subscription = source.subscribe(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        subscription.unsubscribe();

        tokio::time::sleep(Duration::from_millis(60)).await;
        assert_eq!(delivered.load(Ordering::SeqCst), 0);
    }
}
