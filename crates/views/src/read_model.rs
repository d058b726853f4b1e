//! Read model trait for materialized views.

/// A materialized view that synchronous readers can query.
///
/// Read models subscribe to a live view once and keep what it last emitted,
/// so readers never wait on the dataflow.
pub trait ReadModel: Send + Sync {
    /// Returns the name of this read model.
    fn name(&self) -> &'static str;

    /// Returns the number of entries in this read model.
    fn count(&self) -> usize;
}
