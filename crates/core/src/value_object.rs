//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects have no identity: two instances with the same attribute
/// values are the same value. They are immutable; "modifying" one means
/// building a new one.
///
/// ```ignore
/// #[derive(Debug, Clone, PartialEq, Eq)]
/// struct UnitOfMeasure(String);
///
/// impl ValueObject for UnitOfMeasure {}
/// ```
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
