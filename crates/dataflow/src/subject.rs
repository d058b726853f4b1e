//! Hot sources: [`Subject`] and [`Store`].

use std::sync::{Arc, Mutex};

use crate::sync::lock;
use crate::{Item, Notification, Observable, Subscriber, Subscription};

struct SubjectState<T, E> {
    observers: Vec<(u64, Subscriber<T, E>)>,
    next_id: u64,
    terminal: Option<Notification<T, E>>,
}

/// A hot multicast channel.
///
/// Every value pushed with [`Subject::next`] reaches the subscribers attached
/// at that moment; late subscribers see only later values. After a terminal
/// notification new subscribers receive that notification immediately.
pub struct Subject<T, E> {
    state: Arc<Mutex<SubjectState<T, E>>>,
}

impl<T, E> Clone for Subject<T, E> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
        }
    }
}

impl<T: Item, E: Item> Default for Subject<T, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Item, E: Item> Subject<T, E> {
    /// Creates a subject with no subscribers.
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(SubjectState {
                observers: Vec::new(),
                next_id: 0,
                terminal: None,
            })),
        }
    }

    /// Pushes a value to every current subscriber.
    pub fn next(&self, value: T) {
        for observer in self.snapshot_observers() {
            observer.next(value.clone());
        }
    }

    /// Fails the subject for all current and future subscribers.
    pub fn error(&self, error: E) {
        self.terminate(Notification::Error(error));
    }

    /// Completes the subject for all current and future subscribers.
    pub fn complete(&self) {
        self.terminate(Notification::Complete);
    }

    /// Returns the number of attached subscribers.
    pub fn observer_count(&self) -> usize {
        lock(&self.state).observers.len()
    }

    /// Exposes the subject as a subscribable stream.
    pub fn observe(&self) -> Observable<T, E> {
        let state = Arc::clone(&self.state);
        Observable::new(move |subscriber| {
            let id = {
                let mut guard = lock(&state);
                if let Some(terminal) = guard.terminal.clone() {
                    drop(guard);
                    subscriber.notify(terminal);
                    return Subscription::empty();
                }
                let id = guard.next_id;
                guard.next_id += 1;
                guard.observers.push((id, subscriber));
                id
            };
            let state = Arc::clone(&state);
            Subscription::new(move || {
                let removed = {
                    let mut guard = lock(&state);
                    let index = guard.observers.iter().position(|(other, _)| *other == id);
                    index.map(|index| guard.observers.remove(index))
                };
                drop(removed);
            })
        })
    }

    fn snapshot_observers(&self) -> Vec<Subscriber<T, E>> {
        lock(&self.state)
            .observers
            .iter()
            .map(|(_, observer)| observer.clone())
            .collect()
    }

    fn terminate(&self, notification: Notification<T, E>) {
        let observers = {
            let mut guard = lock(&self.state);
            if guard.terminal.is_some() {
                return;
            }
            guard.terminal = Some(notification.clone());
            std::mem::take(&mut guard.observers)
        };
        for (_, observer) in observers {
            observer.notify(notification.clone());
        }
    }
}

type Listener<T> = Arc<dyn Fn(T) + Send + Sync>;

struct StoreState<T> {
    value: T,
    listeners: Vec<(u64, Listener<T>)>,
    next_id: u64,
}

/// A single value that replays itself to every new subscriber.
///
/// The store always holds a value, starting with the one given to
/// [`Store::new`]. Every [`Store::set`] is pushed to current subscribers and
/// becomes the value new subscribers receive first. A store never fails or
/// completes, so it can be observed with any error type.
///
/// Hand out [`Store::observe`] streams freely but keep writes behind one
/// owner; the store itself does not arbitrate between writers.
pub struct Store<T> {
    state: Arc<Mutex<StoreState<T>>>,
}

impl<T> Clone for Store<T> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
        }
    }
}

impl<T: Item> Store<T> {
    /// Creates a store holding `initial`.
    pub fn new(initial: T) -> Self {
        Self {
            state: Arc::new(Mutex::new(StoreState {
                value: initial,
                listeners: Vec::new(),
                next_id: 0,
            })),
        }
    }

    /// Returns the current value.
    pub fn get(&self) -> T {
        lock(&self.state).value.clone()
    }

    /// Replaces the value and pushes it to every subscriber.
    pub fn set(&self, value: T) {
        let listeners: Vec<Listener<T>> = {
            let mut guard = lock(&self.state);
            guard.value = value.clone();
            guard
                .listeners
                .iter()
                .map(|(_, listener)| Arc::clone(listener))
                .collect()
        };
        for listener in listeners {
            listener(value.clone());
        }
    }

    /// Returns the number of attached subscribers.
    pub fn observer_count(&self) -> usize {
        lock(&self.state).listeners.len()
    }

    /// Streams the current value followed by every later one.
    pub fn observe<E: Item>(&self) -> Observable<T, E> {
        let state = Arc::clone(&self.state);
        Observable::new(move |subscriber: Subscriber<T, E>| {
            let target = subscriber.clone();
            let listener: Listener<T> = Arc::new(move |value| target.next(value));
            let (id, current) = {
                let mut guard = lock(&state);
                let id = guard.next_id;
                guard.next_id += 1;
                guard.listeners.push((id, listener));
                (id, guard.value.clone())
            };
            subscriber.next(current);

            let state = Arc::clone(&state);
            Subscription::new(move || {
                let removed = {
                    let mut guard = lock(&state);
                    let index = guard.listeners.iter().position(|(other, _)| *other == id);
                    index.map(|index| guard.listeners.remove(index))
                };
                drop(removed);
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::Recorder;

    #[test]
    fn test_subject_late_subscribers_miss_history() {
        let subject: Subject<u32, String> = Subject::new();
        let early = Recorder::attach(&subject.observe());
        subject.next(1);
        let late = Recorder::attach(&subject.observe());
        subject.next(2);

        assert_eq!(early.values(), vec![1, 2]);
        assert_eq!(late.values(), vec![2]);
    }

    #[test]
    fn test_subject_replays_terminal_to_late_subscribers() {
        let subject: Subject<u32, String> = Subject::new();
        subject.complete();
        subject.next(1);

        let late = Recorder::attach(&subject.observe());
        assert!(late.completed());
        assert!(late.values().is_empty());
    }

    #[test]
    fn test_subject_forgets_released_subscribers() {
        let subject: Subject<u32, String> = Subject::new();
        let recorder = Recorder::attach(&subject.observe());
        assert_eq!(subject.observer_count(), 1);
        drop(recorder);
        assert_eq!(subject.observer_count(), 0);
    }

    #[test]
    fn test_store_replays_current_value() {
        let store = Store::new(0u32);
        store.set(4);
        let recorder = Recorder::attach(&store.observe::<String>());
        store.set(5);

        assert_eq!(recorder.values(), vec![4, 5]);
        assert_eq!(store.get(), 5);
    }

    #[test]
    fn test_store_starts_with_initial_value() {
        let store = Store::new("none".to_string());
        let recorder = Recorder::attach(&store.observe::<()>());
        assert_eq!(recorder.values(), vec!["none".to_string()]);
        assert!(!recorder.completed());
    }

    #[test]
    fn test_store_clones_share_the_value() {
        let store = Store::new(1u32);
        let handle = store.clone();
        handle.set(2);
        assert_eq!(store.get(), 2);
    }
}
