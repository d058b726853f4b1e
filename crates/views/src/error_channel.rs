//! Process-wide sink for human-readable failure messages.

use std::convert::Infallible;

use dataflow::{Item, Observable, Subject, of};
use sources::SourceError;

use crate::View;

/// Hot multicast channel of error messages.
///
/// Late subscribers only see messages reported after they attached. Cloning
/// the channel shares it.
#[derive(Clone, Default)]
pub struct ErrorChannel {
    subject: Subject<String, Infallible>,
}

impl ErrorChannel {
    /// Creates a channel with no subscribers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Publishes `message` to every current subscriber.
    pub fn report(&self, message: impl Into<String>) {
        let message = message.into();
        metrics::counter!("error_channel_reports_total").increment(1);
        tracing::warn!(%message, "error reported");
        self.subject.next(message);
    }

    /// Publishes the user-facing rendering of `error`.
    pub fn report_source_error(&self, error: &SourceError) {
        self.report(error.user_message());
    }

    /// Future error messages.
    pub fn messages(&self) -> Observable<String, Infallible> {
        self.subject.observe()
    }

    /// Intercepts failures of `source`: reports them here and continues with
    /// `neutral` so siblings of `source` keep running.
    pub fn recover<T: Item>(&self, source: &View<T>, neutral: T) -> View<T> {
        let channel = self.clone();
        source.catch_error(move |error| {
            channel.report_source_error(&error);
            of(neutral.clone())
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use dataflow::{Subject, throw};

    use super::*;

    fn collect_messages(channel: &ErrorChannel) -> (Arc<Mutex<Vec<String>>>, dataflow::Subscription) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let subscription = channel
            .messages()
            .subscribe_next(move |message| sink.lock().unwrap().push(message));
        (seen, subscription)
    }

    #[test]
    fn test_late_subscribers_miss_earlier_messages() {
        let channel = ErrorChannel::new();
        channel.report("before");

        let (seen, _subscription) = collect_messages(&channel);
        channel.report("after");

        assert_eq!(*seen.lock().unwrap(), vec!["after".to_string()]);
    }

    #[test]
    fn test_source_errors_are_rendered_for_users() {
        let channel = ErrorChannel::new();
        let (seen, _subscription) = collect_messages(&channel);

        channel.report_source_error(&SourceError::backend(500, "boom"));
        channel.report_source_error(&SourceError::transport("offline"));

        assert_eq!(
            *seen.lock().unwrap(),
            vec![
                "Backend returned code 500: boom".to_string(),
                "An error occurred: offline".to_string(),
            ]
        );
    }

    #[test]
    fn test_recover_substitutes_neutral_value() {
        let channel = ErrorChannel::new();
        let (messages, _a) = collect_messages(&channel);

        let failing: View<Vec<u32>> = throw(SourceError::backend(404, "missing"));
        let values = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&values);
        let _b = channel
            .recover(&failing, Vec::new())
            .subscribe_next(move |v| sink.lock().unwrap().push(v));

        assert_eq!(*values.lock().unwrap(), vec![Vec::<u32>::new()]);
        assert_eq!(messages.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_recover_passes_values_through() {
        let channel = ErrorChannel::new();
        let source: Subject<u32, SourceError> = Subject::new();
        let values = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&values);
        let _subscription = channel
            .recover(&source.observe(), 0)
            .subscribe_next(move |v| sink.lock().unwrap().push(v));

        source.next(7);
        source.error(SourceError::transport("reset"));
        source.next(8);

        assert_eq!(*values.lock().unwrap(), vec![7, 0]);
    }
}
