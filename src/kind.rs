//! Kind markers for identifiers.
//!
//! This module defines zero-sized marker types that encode, at compile time,
//! what an [`Identifier`](crate::Identifier) names. An `Identifier<Field>`
//! cannot be passed where an `Identifier<Object>` is expected.

use std::fmt;

/// Runtime tag for the kind of an identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IdentifierKind {
    /// An object (table) name
    Object,
    /// A field (column) name
    Field,
    /// A sort direction keyword
    SortDirection,
}

impl fmt::Display for IdentifierKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdentifierKind::Object => write!(f, "object"),
            IdentifierKind::Field => write!(f, "field"),
            IdentifierKind::SortDirection => write!(f, "sortDirection"),
        }
    }
}

mod sealed {
    pub trait Sealed {}
}

/// Implemented by the identifier kind markers. Sealed.
pub trait Kind: sealed::Sealed {
    /// The runtime tag for this marker.
    const KIND: IdentifierKind;
}

/// Marker for object names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Object {
    _private: (),
}

/// Marker for field names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    _private: (),
}

/// Marker for sort directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sort {
    _private: (),
}

impl sealed::Sealed for Object {}
impl sealed::Sealed for Field {}
impl sealed::Sealed for Sort {}

impl Kind for Object {
    const KIND: IdentifierKind = IdentifierKind::Object;
}

impl Kind for Field {
    const KIND: IdentifierKind = IdentifierKind::Field;
}

impl Kind for Sort {
    const KIND: IdentifierKind = IdentifierKind::SortDirection;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_markers_are_zero_sized() {
        assert_eq!(std::mem::size_of::<Object>(), 0);
        assert_eq!(std::mem::size_of::<Field>(), 0);
        assert_eq!(std::mem::size_of::<Sort>(), 0);
    }

    #[test]
    fn markers_map_to_runtime_tags() {
        assert_eq!(Object::KIND, IdentifierKind::Object);
        assert_eq!(Field::KIND, IdentifierKind::Field);
        assert_eq!(Sort::KIND, IdentifierKind::SortDirection);
    }

    #[test]
    fn kind_display_matches_wire_names() {
        assert_eq!(IdentifierKind::Object.to_string(), "object");
        assert_eq!(IdentifierKind::Field.to_string(), "field");
        assert_eq!(IdentifierKind::SortDirection.to_string(), "sortDirection");
    }
}
