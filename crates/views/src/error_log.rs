//! Recent error messages with the time they were reported.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use chrono::{DateTime, Utc};
use dataflow::Subscription;
use serde::Serialize;

use crate::ErrorChannel;
use crate::read_model::ReadModel;

/// Default number of messages an [`ErrorLog`] keeps.
pub const DEFAULT_CAPACITY: usize = 50;

/// One reported error message.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorEntry {
    pub message: String,
    pub reported_at: DateTime<Utc>,
}

/// Bounded log of the messages reported to an [`ErrorChannel`].
///
/// Only messages reported after [`ErrorLog::attach`] are recorded; once
/// `capacity` is reached the oldest entry is dropped.
#[derive(Clone)]
pub struct ErrorLog {
    entries: Arc<RwLock<VecDeque<ErrorEntry>>>,
    /// Never locked: the mutex only makes the held subscription `Sync`.
    _subscription: Arc<Mutex<Subscription>>,
}

impl ErrorLog {
    /// Starts recording the messages of `channel`.
    pub fn attach(channel: &ErrorChannel, capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let entries = Arc::new(RwLock::new(VecDeque::with_capacity(capacity)));
        let sink = Arc::clone(&entries);
        let subscription = channel.messages().subscribe_next(move |message| {
            let mut entries = sink.write().unwrap_or_else(PoisonError::into_inner);
            if entries.len() == capacity {
                entries.pop_front();
            }
            entries.push_back(ErrorEntry {
                message,
                reported_at: Utc::now(),
            });
        });
        Self {
            entries,
            _subscription: Arc::new(Mutex::new(subscription)),
        }
    }

    /// Recorded entries, oldest first.
    pub fn recent(&self) -> Vec<ErrorEntry> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .cloned()
            .collect()
    }

    /// The most recent message, if any.
    pub fn latest(&self) -> Option<ErrorEntry> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .back()
            .cloned()
    }
}

impl ReadModel for ErrorLog {
    fn name(&self) -> &'static str {
        "ErrorLog"
    }

    fn count(&self) -> usize {
        self.entries.read().unwrap_or_else(PoisonError::into_inner).len()
    }
}
