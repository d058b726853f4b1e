//! The consuming end of a stream.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// A single event pushed to a subscriber.
#[derive(Debug, Clone, PartialEq)]
pub enum Notification<T, E> {
    /// A value.
    Next(T),
    /// The stream failed; nothing follows.
    Error(E),
    /// The stream finished; nothing follows.
    Complete,
}

impl<T, E> Notification<T, E> {
    /// Returns true for `Error` and `Complete`.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Next(_))
    }
}

type Handler<T, E> = dyn Fn(Notification<T, E>) + Send + Sync;

struct Inner<T, E> {
    handler: Box<Handler<T, E>>,
    closed: AtomicBool,
}

/// Receives the notifications of one subscription.
///
/// A subscriber closes itself on the first terminal notification and when its
/// subscription is torn down; anything pushed after that is dropped. Clones
/// share the same handler and closed flag.
pub struct Subscriber<T, E> {
    inner: Arc<Inner<T, E>>,
}

impl<T, E> Clone for Subscriber<T, E> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T, E> Subscriber<T, E> {
    /// Creates a subscriber dispatching every notification to `handler`.
    pub fn new(handler: impl Fn(Notification<T, E>) + Send + Sync + 'static) -> Self {
        Self {
            inner: Arc::new(Inner {
                handler: Box::new(handler),
                closed: AtomicBool::new(false),
            }),
        }
    }

    /// Pushes a value.
    pub fn next(&self, value: T) {
        if !self.is_closed() {
            (self.inner.handler)(Notification::Next(value));
        }
    }

    /// Fails the stream.
    pub fn error(&self, error: E) {
        if !self.inner.closed.swap(true, Ordering::AcqRel) {
            (self.inner.handler)(Notification::Error(error));
        }
    }

    /// Completes the stream.
    pub fn complete(&self) {
        if !self.inner.closed.swap(true, Ordering::AcqRel) {
            (self.inner.handler)(Notification::Complete);
        }
    }

    /// Delivers an arbitrary notification.
    pub fn notify(&self, notification: Notification<T, E>) {
        match notification {
            Notification::Next(value) => self.next(value),
            Notification::Error(error) => self.error(error),
            Notification::Complete => self.complete(),
        }
    }

    /// Returns true once the subscriber no longer accepts notifications.
    pub fn is_closed(&self) -> bool {
        self.inner.closed.load(Ordering::Acquire)
    }

    /// Stops delivery without notifying the handler.
    pub fn close(&self) {
        self.inner.closed.store(true, Ordering::Release);
    }
}
