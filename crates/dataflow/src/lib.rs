//! Push-based stream engine for live derived views.
//!
//! This crate provides the minimal reactive core the catalog is built on:
//! - [`Observable`] - a cold, subscribable producer of values
//! - [`Subscriber`] / [`Subscription`] - the consuming end and its teardown handle
//! - [`Subject`] - a hot multicast channel, late subscribers only see future values
//! - [`Store`] - a single replaying value with `get`/`set`/`observe`
//! - combinators: [`combine_latest`], [`merge`], [`fork_join`] and the operator
//!   methods on [`Observable`] (`map`, `filter`, `tap`, `scan`, `catch_error`,
//!   `switch_map`, `share_replay`)
//!
//! Recomputation is synchronous: an upstream emission runs every downstream
//! transform before returning. The only suspension point is [`from_future`],
//! which parks a future on the tokio runtime and pushes its outcome when it
//! resolves.

pub mod combine;
pub mod multicast;
pub mod observable;
pub mod operators;
pub mod stream;
pub mod subject;
pub mod subscriber;
pub mod subscription;
mod sync;

use std::sync::Arc;

pub use combine::{combine_latest, fork_join, merge};
pub use observable::{empty, from_future, never, of, throw};
pub use stream::ObservableStream;
pub use subject::{Store, Subject};
pub use subscriber::{Notification, Subscriber};
pub use subscription::Subscription;

pub use observable::Observable;

/// Bound shared by every value and error travelling through a stream.
pub trait Item: Clone + Send + Sync + 'static {}

impl<T: Clone + Send + Sync + 'static> Item for T {}

/// An immutable, cheaply shared collection snapshot.
///
/// Each recomputation produces a new snapshot; emitted snapshots are never
/// mutated, so every reader sees a complete collection.
pub type Snapshot<T> = Arc<[T]>;
