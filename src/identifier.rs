use std::fmt;
use std::marker::PhantomData;

use crate::kind::{Field, IdentifierKind, Kind, Sort};

/// A name that has passed whitelist validation and may appear literally in a
/// query template.
///
/// `Identifier<K>` is the only way a name gets into a
/// [`QueryTemplate`](crate::QueryTemplate). The kind parameter `K` records at
/// compile time whether it names an object, a field or a sort direction.
///
/// # Construction Invariants
///
/// There is no public constructor and no `From<String>` implementation.
/// Only the [`Validator`](crate::Validator) creates identifiers, after an
/// exact membership check against the registry or the fixed sort keywords.
///
/// ```compile_fail
/// use query_guard::{Identifier, kind::Object};
///
/// // No public constructor:
/// let forged: Identifier<Object> = Identifier::new_unchecked("Account".to_string(), None);
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct Identifier<K: Kind> {
    name: String,
    // Owning object, set for field identifiers only
    object: Option<String>,
    _kind: PhantomData<K>,
}

impl<K: Kind> Identifier<K> {
    /// Wraps a name without checking it.
    ///
    /// Callers must have matched `name` against the registry (or the sort
    /// keywords) immediately before calling this.
    pub(crate) fn new_unchecked(name: String, object: Option<String>) -> Self {
        Self {
            name,
            object,
            _kind: PhantomData,
        }
    }

    /// Returns the trusted name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the runtime kind tag.
    pub fn kind(&self) -> IdentifierKind {
        K::KIND
    }
}

impl Identifier<Field> {
    /// Returns the object this field was validated against.
    pub fn object(&self) -> &str {
        self.object.as_deref().unwrap_or_default()
    }
}

impl Identifier<Sort> {
    /// Returns the sort direction this identifier stands for.
    pub fn direction(&self) -> SortDirection {
        if self.name == SortDirection::Desc.keyword() {
            SortDirection::Desc
        } else {
            SortDirection::Asc
        }
    }
}

impl From<SortDirection> for Identifier<Sort> {
    fn from(direction: SortDirection) -> Self {
        Identifier::new_unchecked(direction.keyword().to_string(), None)
    }
}

impl<K: Kind> AsRef<str> for Identifier<K> {
    fn as_ref(&self) -> &str {
        &self.name
    }
}

impl<K: Kind> fmt::Display for Identifier<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl<K: Kind> fmt::Debug for Identifier<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("Identifier");
        s.field("kind", &K::KIND).field("name", &self.name);
        if let Some(object) = &self.object {
            s.field("object", object);
        }
        s.finish()
    }
}

/// One of the two accepted sort directions.
///
/// Every value of this enum is trusted, so it converts into an
/// `Identifier<Sort>` without validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SortDirection {
    /// Ascending order
    #[default]
    Asc,
    /// Descending order
    Desc,
}

impl SortDirection {
    /// The keyword emitted into query templates.
    pub fn keyword(self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }

    /// Matches a candidate case-insensitively against `ASC` and `DESC`.
    ///
    /// Surrounding whitespace is not ignored: `" ASC"` does not match.
    pub fn parse(candidate: &str) -> Option<Self> {
        if candidate.eq_ignore_ascii_case("ASC") {
            Some(SortDirection::Asc)
        } else if candidate.eq_ignore_ascii_case("DESC") {
            Some(SortDirection::Desc)
        } else {
            None
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// Shorthand used in tests across the crate.
#[cfg(test)]
pub(crate) fn object_ident(name: &str) -> Identifier<crate::kind::Object> {
    Identifier::new_unchecked(name.to_string(), None)
}

#[cfg(test)]
pub(crate) fn field_ident(object: &str, name: &str) -> Identifier<Field> {
    Identifier::new_unchecked(name.to_string(), Some(object.to_string()))
}
