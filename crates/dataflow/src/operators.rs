//! Single-source operators.

use std::sync::{Arc, Mutex};

use crate::sync::lock;
use crate::{Item, Notification, Observable, Subscription};

impl<T: Item, E: Item> Observable<T, E> {
    /// Transforms every value with `f`.
    pub fn map<U: Item>(&self, f: impl Fn(T) -> U + Send + Sync + 'static) -> Observable<U, E> {
        let source = self.clone();
        let f = Arc::new(f);
        Observable::new(move |downstream| {
            let f = Arc::clone(&f);
            source.subscribe(move |notification| match notification {
                Notification::Next(value) => downstream.next(f(value)),
                Notification::Error(error) => downstream.error(error),
                Notification::Complete => downstream.complete(),
            })
        })
    }

    /// Forwards only the values matching `predicate`.
    pub fn filter(&self, predicate: impl Fn(&T) -> bool + Send + Sync + 'static) -> Self {
        let source = self.clone();
        let predicate = Arc::new(predicate);
        Observable::new(move |downstream| {
            let predicate = Arc::clone(&predicate);
            source.subscribe(move |notification| match notification {
                Notification::Next(value) if !predicate(&value) => {}
                other => downstream.notify(other),
            })
        })
    }

    /// Runs `effect` on every value without changing the stream.
    pub fn tap(&self, effect: impl Fn(&T) + Send + Sync + 'static) -> Self {
        let source = self.clone();
        let effect = Arc::new(effect);
        Observable::new(move |downstream| {
            let effect = Arc::clone(&effect);
            source.subscribe(move |notification| {
                if let Notification::Next(value) = &notification {
                    effect(value);
                }
                downstream.notify(notification);
            })
        })
    }

    /// Left-folds the stream, emitting every intermediate accumulator.
    ///
    /// Each subscription starts from its own copy of `seed`.
    pub fn scan<A: Item>(
        &self,
        seed: A,
        step: impl Fn(&A, T) -> A + Send + Sync + 'static,
    ) -> Observable<A, E> {
        let source = self.clone();
        let step = Arc::new(step);
        Observable::new(move |downstream| {
            let step = Arc::clone(&step);
            let accumulator = Mutex::new(seed.clone());
            source.subscribe(move |notification| match notification {
                Notification::Next(value) => {
                    let next = {
                        let mut acc = lock(&accumulator);
                        let next = step(&acc, value);
                        *acc = next.clone();
                        next
                    };
                    downstream.next(next);
                }
                Notification::Error(error) => downstream.error(error),
                Notification::Complete => downstream.complete(),
            })
        })
    }

    /// Replaces a failure with the stream returned by `handler`.
    ///
    /// Values emitted before the failure are kept; after it the subscriber
    /// continues on the replacement stream.
    pub fn catch_error(
        &self,
        handler: impl Fn(E) -> Observable<T, E> + Send + Sync + 'static,
    ) -> Self {
        let source = self.clone();
        let handler = Arc::new(handler);
        Observable::new(move |downstream| {
            let handler = Arc::clone(&handler);
            let fallback: Arc<Mutex<Option<Subscription>>> = Arc::new(Mutex::new(None));
            let slot = Arc::clone(&fallback);
            let upstream = source.subscribe(move |notification| match notification {
                Notification::Error(error) => {
                    let replacement = handler(error).subscribe_with(downstream.clone());
                    let previous = lock(&slot).replace(replacement);
                    drop(previous);
                }
                other => downstream.notify(other),
            });
            Subscription::new(move || {
                drop(upstream);
                let replacement = lock(&fallback).take();
                drop(replacement);
            })
        })
    }

    /// Maps every value to an inner stream and mirrors only the latest one.
    ///
    /// A new outer value releases the previous inner subscription, abandoning
    /// whatever it had in flight; late notifications from a released inner
    /// stream are discarded. Completes once the outer stream and the current
    /// inner stream have both completed.
    pub fn switch_map<U: Item>(
        &self,
        project: impl Fn(T) -> Observable<U, E> + Send + Sync + 'static,
    ) -> Observable<U, E> {
        let source = self.clone();
        let project = Arc::new(project);
        Observable::new(move |downstream| {
            let project = Arc::clone(&project);
            let state = Arc::new(Mutex::new(SwitchState::default()));
            let outer_state = Arc::clone(&state);
            let outer = source.subscribe(move |notification| match notification {
                Notification::Next(value) => {
                    let inner_source = project(value);
                    let (epoch, previous) = {
                        let mut state = lock(&outer_state);
                        state.epoch += 1;
                        state.inner_active = true;
                        (state.epoch, state.inner.take())
                    };
                    drop(previous);

                    let inner_state = Arc::clone(&outer_state);
                    let inner_downstream = downstream.clone();
                    let inner = inner_source.subscribe(move |notification| {
                        if lock(&inner_state).epoch != epoch {
                            return;
                        }
                        match notification {
                            Notification::Complete => {
                                let finished = {
                                    let mut state = lock(&inner_state);
                                    state.inner_active = false;
                                    state.outer_done
                                };
                                if finished {
                                    inner_downstream.complete();
                                }
                            }
                            other => inner_downstream.notify(other),
                        }
                    });

                    let stale = {
                        let mut state = lock(&outer_state);
                        if state.epoch == epoch {
                            state.inner.replace(inner)
                        } else {
                            Some(inner)
                        }
                    };
                    drop(stale);
                }
                Notification::Error(error) => downstream.error(error),
                Notification::Complete => {
                    let finished = {
                        let mut state = lock(&outer_state);
                        state.outer_done = true;
                        !state.inner_active
                    };
                    if finished {
                        downstream.complete();
                    }
                }
            });
            Subscription::new(move || {
                drop(outer);
                let inner = lock(&state).inner.take();
                drop(inner);
            })
        })
    }
}

#[derive(Default)]
struct SwitchState {
    epoch: u64,
    inner: Option<Subscription>,
    inner_active: bool,
    outer_done: bool,
}
