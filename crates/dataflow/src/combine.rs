//! Multi-source combinators.

use std::sync::{Arc, Mutex};

use crate::sync::lock;
use crate::{Item, Notification, Observable, Subscription};

struct Latest<A, B> {
    left: Option<A>,
    right: Option<B>,
    left_done: bool,
    right_done: bool,
}

/// Pairs the latest value of each input every time either one emits.
///
/// Nothing is emitted until both inputs have produced a value. From then on
/// each emission from either side yields exactly one pair built with the most
/// recent value of the other side. A failure on either side fails the result;
/// the result completes when both inputs have completed, or as soon as one
/// completes without ever emitting.
pub fn combine_latest<A: Item, B: Item, E: Item>(
    left: &Observable<A, E>,
    right: &Observable<B, E>,
) -> Observable<(A, B), E> {
    let left = left.clone();
    let right = right.clone();
    Observable::new(move |downstream| {
        let state = Arc::new(Mutex::new(Latest::<A, B> {
            left: None,
            right: None,
            left_done: false,
            right_done: false,
        }));

        let left_state = Arc::clone(&state);
        let left_downstream = downstream.clone();
        let left_subscription = left.subscribe(move |notification| match notification {
            Notification::Next(value) => {
                let pair = {
                    let mut state = lock(&left_state);
                    state.left = Some(value.clone());
                    state.right.clone().map(|right| (value, right))
                };
                if let Some(pair) = pair {
                    left_downstream.next(pair);
                }
            }
            Notification::Error(error) => left_downstream.error(error),
            Notification::Complete => {
                let finished = {
                    let mut state = lock(&left_state);
                    state.left_done = true;
                    state.right_done || state.left.is_none()
                };
                if finished {
                    left_downstream.complete();
                }
            }
        });

        let right_state = Arc::clone(&state);
        let right_downstream = downstream;
        let right_subscription = right.subscribe(move |notification| match notification {
            Notification::Next(value) => {
                let pair = {
                    let mut state = lock(&right_state);
                    state.right = Some(value.clone());
                    state.left.clone().map(|left| (left, value))
                };
                if let Some(pair) = pair {
                    right_downstream.next(pair);
                }
            }
            Notification::Error(error) => right_downstream.error(error),
            Notification::Complete => {
                let finished = {
                    let mut state = lock(&right_state);
                    state.right_done = true;
                    state.left_done || state.right.is_none()
                };
                if finished {
                    right_downstream.complete();
                }
            }
        });

        Subscription::all(vec![left_subscription, right_subscription])
    })
}

/// Interleaves two streams of the same type in arrival order.
///
/// Fails on the first failure and completes once both inputs complete.
pub fn merge<T: Item, E: Item>(
    first: &Observable<T, E>,
    second: &Observable<T, E>,
) -> Observable<T, E> {
    let sources = [first.clone(), second.clone()];
    Observable::new(move |downstream| {
        let remaining = Arc::new(Mutex::new(sources.len()));
        let subscriptions = sources
            .iter()
            .map(|source| {
                let remaining = Arc::clone(&remaining);
                let downstream = downstream.clone();
                source.subscribe(move |notification| match notification {
                    Notification::Complete => {
                        let finished = {
                            let mut remaining = lock(&remaining);
                            *remaining -= 1;
                            *remaining == 0
                        };
                        if finished {
                            downstream.complete();
                        }
                    }
                    other => downstream.notify(other),
                })
            })
            .collect();
        Subscription::all(subscriptions)
    })
}

struct Joined<T> {
    values: Vec<Option<T>>,
    remaining: usize,
}

/// Waits for every input to complete and emits their last values in input order.
///
/// All-or-nothing: the first failure fails the result and releases the other
/// inputs, abandoning their in-flight work. An input completing without a
/// value completes the result without emitting. With no inputs the result
/// completes immediately.
pub fn fork_join<T: Item, E: Item>(sources: Vec<Observable<T, E>>) -> Observable<Vec<T>, E> {
    Observable::new(move |downstream| {
        if sources.is_empty() {
            downstream.complete();
            return Subscription::empty();
        }

        let state = Arc::new(Mutex::new(Joined {
            values: vec![None; sources.len()],
            remaining: sources.len(),
        }));
        let live: Arc<Mutex<Vec<Subscription>>> = Arc::new(Mutex::new(Vec::new()));

        for (index, source) in sources.iter().enumerate() {
            let state = Arc::clone(&state);
            let siblings = Arc::clone(&live);
            let downstream = downstream.clone();
            let subscription = source.subscribe(move |notification| match notification {
                Notification::Next(value) => {
                    lock(&state).values[index] = Some(value);
                }
                Notification::Error(error) => {
                    let released = std::mem::take(&mut *lock(&siblings));
                    downstream.error(error);
                    drop(released);
                }
                Notification::Complete => {
                    let outcome = {
                        let mut state = lock(&state);
                        if state.values[index].is_none() {
                            Some(None)
                        } else {
                            state.remaining -= 1;
                            (state.remaining == 0).then(|| {
                                state.values.iter_mut().map(Option::take).collect::<Option<Vec<T>>>()
                            })
                        }
                    };
                    match outcome {
                        Some(Some(values)) => {
                            downstream.next(values);
                            downstream.complete();
                        }
                        Some(None) => downstream.complete(),
                        None => {}
                    }
                }
            });
            lock(&live).push(subscription);
        }

        if downstream.is_closed() {
            let released = std::mem::take(&mut *lock(&live));
            drop(released);
            return Subscription::empty();
        }
        Subscription::new(move || {
            let released = std::mem::take(&mut *lock(&live));
            drop(released);
        })
    })
}
