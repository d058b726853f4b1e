//! Bridge from push-based observables to pull-based async streams.

use std::pin::Pin;
use std::task::{Context, Poll};

use futures_core::Stream;
use tokio::sync::mpsc;

use crate::{Item, Notification, Observable, Subscription};

/// An [`Observable`] consumed as a [`futures_core::Stream`].
///
/// Yields `Ok` for every value and a final `Err` if the observable fails; ends
/// after completion or failure. Dropping the stream releases the subscription.
pub struct ObservableStream<T, E> {
    receiver: mpsc::UnboundedReceiver<Notification<T, E>>,
    _subscription: Subscription,
    finished: bool,
}

impl<T: Item, E: Item> Observable<T, E> {
    /// Subscribes and buffers notifications for async consumption.
    pub fn into_stream(&self) -> ObservableStream<T, E> {
        let (sender, receiver) = mpsc::unbounded_channel();
        let subscription = self.subscribe(move |notification| {
            // Receiver gone means the stream was dropped; its subscription goes with it.
            let _ = sender.send(notification);
        });
        ObservableStream {
            receiver,
            _subscription: subscription,
            finished: false,
        }
    }
}

impl<T, E> Unpin for ObservableStream<T, E> {}

impl<T, E> Stream for ObservableStream<T, E> {
    type Item = Result<T, E>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        if self.finished {
            return Poll::Ready(None);
        }
        match self.receiver.poll_recv(cx) {
            Poll::Ready(Some(Notification::Next(value))) => Poll::Ready(Some(Ok(value))),
            Poll::Ready(Some(Notification::Error(error))) => {
                self.finished = true;
                Poll::Ready(Some(Err(error)))
            }
            Poll::Ready(Some(Notification::Complete)) | Poll::Ready(None) => {
                self.finished = true;
                Poll::Ready(None)
            }
            Poll::Pending => Poll::Pending,
        }
    }
}
