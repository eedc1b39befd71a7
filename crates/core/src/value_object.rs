//! Value object trait: equality by value, not identity.

/// Marker trait for immutable domain values compared by their attributes.
///
/// Two value objects with the same attribute values are the same value: a
/// vehicle `Color` or an `ImageRef` has no identity of its own. To "change"
/// one, build a new value.
///
/// Requires `Clone + PartialEq + Debug` so values copy cheaply, compare by
/// content and show up in logs and assertions.
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
