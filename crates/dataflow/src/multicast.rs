//! Reference-counted multicast with replay of the latest value.

use std::sync::{Arc, Mutex, Weak};

use crate::sync::lock;
use crate::{Item, Notification, Observable, Subscriber, Subscription};

struct ShareState<T, E> {
    subscribers: Vec<(u64, Subscriber<T, E>)>,
    next_id: u64,
    latest: Option<T>,
    completed: bool,
    connection: Option<Subscription>,
    connected: bool,
    /// Bumped on every reset so notifications from a released connection are ignored.
    epoch: u64,
}

struct Shared<T, E> {
    source: Observable<T, E>,
    state: Mutex<ShareState<T, E>>,
}

impl<T: Item, E: Item> Shared<T, E> {
    fn attach(self: &Arc<Self>, subscriber: Subscriber<T, E>) -> Subscription {
        let (id, replay, completed, connect_epoch) = {
            let mut state = lock(&self.state);
            let id = state.next_id;
            state.next_id += 1;
            if !state.completed {
                state.subscribers.push((id, subscriber.clone()));
            }
            let connect_epoch = if state.connected || state.completed {
                None
            } else {
                state.connected = true;
                Some(state.epoch)
            };
            (id, state.latest.clone(), state.completed, connect_epoch)
        };

        if let Some(value) = replay {
            subscriber.next(value);
        }
        if completed {
            subscriber.complete();
            return Subscription::empty();
        }

        if let Some(epoch) = connect_epoch {
            tracing::trace!(epoch, "multicast connecting upstream");
            let shared: Weak<Self> = Arc::downgrade(self);
            let connection = self.source.subscribe(move |notification| {
                if let Some(shared) = shared.upgrade() {
                    shared.broadcast(epoch, notification);
                }
            });
            let stale = {
                let mut state = lock(&self.state);
                if state.epoch == epoch && state.connected {
                    state.connection.replace(connection)
                } else {
                    Some(connection)
                }
            };
            drop(stale);
        }

        let shared = Arc::clone(self);
        Subscription::new(move || shared.detach(id))
    }

    fn broadcast(&self, epoch: u64, notification: Notification<T, E>) {
        let (targets, released): (Vec<Subscriber<T, E>>, Option<Subscription>) = {
            let mut state = lock(&self.state);
            if state.epoch != epoch {
                return;
            }
            match &notification {
                Notification::Next(value) => {
                    state.latest = Some(value.clone());
                    let targets = state.subscribers.iter().map(|(_, s)| s.clone()).collect();
                    (targets, None)
                }
                Notification::Complete => {
                    state.completed = true;
                    let targets = std::mem::take(&mut state.subscribers);
                    (targets.into_iter().map(|(_, s)| s).collect(), None)
                }
                Notification::Error(_) => {
                    let released = Self::reset(&mut state);
                    let targets = std::mem::take(&mut state.subscribers);
                    (targets.into_iter().map(|(_, s)| s).collect(), released)
                }
            }
        };
        for target in targets {
            target.notify(notification.clone());
        }
        drop(released);
    }

    fn detach(&self, id: u64) {
        let released = {
            let mut state = lock(&self.state);
            state.subscribers.retain(|(other, _)| *other != id);
            if state.subscribers.is_empty() && !state.completed {
                Self::reset(&mut state)
            } else {
                None
            }
        };
        if released.is_some() {
            tracing::trace!("multicast released upstream");
        }
        drop(released);
    }

    fn reset(state: &mut ShareState<T, E>) -> Option<Subscription> {
        state.epoch += 1;
        state.latest = None;
        state.connected = false;
        state.connection.take()
    }
}

impl<T: Item, E: Item> Observable<T, E> {
    /// Shares one upstream execution between all subscribers and replays the
    /// latest value to each new one.
    ///
    /// The upstream is subscribed when the first subscriber attaches and
    /// released when the last one detaches; the cached value is dropped with
    /// it, so the next subscriber starts a fresh execution. A failure also
    /// resets the cache. Once the upstream completes, its last value and the
    /// completion are replayed to later subscribers without re-executing.
    pub fn share_replay(&self) -> Self {
        let shared = Arc::new(Shared {
            source: self.clone(),
            state: Mutex::new(ShareState {
                subscribers: Vec::new(),
                next_id: 0,
                latest: None,
                completed: false,
                connection: None,
                connected: false,
                epoch: 0,
            }),
        });
        Observable::new(move |subscriber| shared.attach(subscriber))
    }
}
