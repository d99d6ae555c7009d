//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects have no identity and never change after construction. To
/// "modify" one, build a new value. Two value objects holding the same
/// attributes are equal, so they can be shared and compared freely.
///
/// ```ignore
/// #[derive(Debug, Clone, PartialEq, Eq)]
/// struct Address {
///     street: String,
///     number: String,
/// }
///
/// impl ValueObject for Address {}
/// ```
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
