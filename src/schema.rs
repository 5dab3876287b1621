//! Schema metadata collaborator.
//!
//! The registry is not hard-coded. It is read from whatever knows the live
//! schema (a metadata API, an `information_schema` query, a config file),
//! behind the [`SchemaProvider`] trait.

use std::collections::{BTreeMap, BTreeSet};

use crate::error::SchemaError;

/// Source of object and field names for building a [`Registry`](crate::Registry).
///
/// Implementations are supplied by the embedding application. The core only
/// calls these two methods, once per object, when a registry is built or
/// refreshed.
pub trait SchemaProvider {
    /// Returns every object name the application may query.
    fn object_names(&self) -> Result<Vec<String>, SchemaError>;

    /// Returns the field names of one object.
    fn field_names(&self, object: &str) -> Result<Vec<String>, SchemaError>;
}

/// An in-memory [`SchemaProvider`] for tests and fixed schemas.
///
/// # Examples
///
/// ```
/// use query_guard::{Registry, StaticSchema};
///
/// let schema = StaticSchema::new()
///     .object("Account", ["Id", "Name", "Industry"])
///     .object("Contact", ["Id", "FirstName", "LastName"]);
///
/// let registry = Registry::from_provider(&schema).expect("static schema never fails");
/// assert!(registry.contains_object("Contact"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct StaticSchema {
    objects: BTreeMap<String, BTreeSet<String>>,
}

impl StaticSchema {
    /// Creates an empty schema.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an object and its fields, merging with any fields already present.
    pub fn object<I, S>(mut self, name: impl Into<String>, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.objects
            .entry(name.into())
            .or_default()
            .extend(fields.into_iter().map(Into::into));
        self
    }
}

impl SchemaProvider for StaticSchema {
    fn object_names(&self) -> Result<Vec<String>, SchemaError> {
        Ok(self.objects.keys().cloned().collect())
    }

    fn field_names(&self, object: &str) -> Result<Vec<String>, SchemaError> {
        self.objects
            .get(object)
            .map(|fields| fields.iter().cloned().collect())
            .ok_or_else(|| SchemaError::new(format!("object '{}' not described", object)))
    }
}
