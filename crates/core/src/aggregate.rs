//! Aggregate root trait.

/// Aggregate root marker + minimal interface.
///
/// Every consistency-relevant mutation of the aggregate and of the entities it
/// owns goes through the root. Loading, saving and serializing access across
/// callers are left to whoever holds the aggregate.
pub trait AggregateRoot {
    /// Strongly-typed aggregate identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the aggregate identifier.
    fn id(&self) -> &Self::Id;

    /// Number of successful mutations applied since creation.
    ///
    /// Persistence layers can compare this against the version they loaded.
    fn version(&self) -> u64;
}
