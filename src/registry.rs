use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, PoisonError, RwLock};

use crate::error::SchemaError;
use crate::schema::SchemaProvider;

/// Immutable whitelist of object names and their field names.
///
/// Membership checks are exact and case-sensitive. There is no wildcard or
/// prefix matching: `"account"` is not `"Account"`, and `"Account "` is not
/// either.
///
/// A `Registry` is never modified after it is built. To pick up schema
/// changes at runtime, build a new one and publish it through a
/// [`SharedRegistry`].
///
/// # Examples
///
/// ```
/// use query_guard::Registry;
///
/// let registry = Registry::builder()
///     .object("Account", ["Id", "Name"])
///     .object("Contact", ["Id", "Email"])
///     .build();
///
/// assert!(registry.contains_object("Account"));
/// assert!(registry.contains_field("Contact", "Email"));
/// assert!(!registry.contains_field("Account", "Email"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Registry {
    objects: BTreeMap<String, BTreeSet<String>>,
}

impl Registry {
    /// Starts building a registry by hand.
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    /// Builds a registry from a schema collaborator.
    ///
    /// # Errors
    ///
    /// Returns the first `SchemaError` the provider reports. No partial
    /// registry is returned.
    pub fn from_provider(provider: &dyn SchemaProvider) -> Result<Self, SchemaError> {
        let mut objects = BTreeMap::new();
        for object in provider.object_names()? {
            let fields: BTreeSet<String> = provider.field_names(&object)?.into_iter().collect();
            objects.insert(object, fields);
        }
        tracing::debug!(objects = objects.len(), "registry built from schema provider");
        Ok(Self { objects })
    }

    /// Returns `true` if `object` is a known object name.
    pub fn contains_object(&self, object: &str) -> bool {
        self.objects.contains_key(object)
    }

    /// Returns `true` if `field` is a known field of `object`.
    pub fn contains_field(&self, object: &str, field: &str) -> bool {
        self.objects
            .get(object)
            .is_some_and(|fields| fields.contains(field))
    }

    /// Iterates over object names in sorted order.
    pub fn objects(&self) -> impl Iterator<Item = &str> {
        self.objects.keys().map(String::as_str)
    }

    /// Iterates over the fields of `object` in sorted order, or `None` if the
    /// object is unknown.
    pub fn fields(&self, object: &str) -> Option<impl Iterator<Item = &str>> {
        self.objects
            .get(object)
            .map(|fields| fields.iter().map(String::as_str))
    }

    /// Number of objects.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Returns `true` if no objects are registered.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

/// Builder for [`Registry`].
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    objects: BTreeMap<String, BTreeSet<String>>,
}

impl RegistryBuilder {
    /// Adds an object and its fields, merging with fields already added.
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

    /// Freezes the registry.
    pub fn build(self) -> Registry {
        Registry {
            objects: self.objects,
        }
    }
}

/// A shareable handle to the current registry snapshot.
///
/// Readers take an `Arc<Registry>` snapshot and validate against it for the
/// whole query-build call. Writers replace the snapshot wholesale, so a
/// reader sees either the old registry or the new one, never a mix.
///
/// Cloning the handle shares the same slot.
///
/// The `RwLock` is held only long enough to clone or replace the `Arc`.
/// Validation runs against the snapshot with no lock held, and a poisoned
/// lock is recovered since the slot always holds a complete registry.
///
/// # Examples
///
/// ```
/// use query_guard::{Registry, SharedRegistry};
///
/// let shared = SharedRegistry::new(Registry::builder().object("Account", ["Id"]).build());
/// let before = shared.snapshot();
///
/// shared.publish(Registry::builder().object("Contact", ["Id"]).build());
///
/// // The old snapshot is untouched
/// assert!(before.contains_object("Account"));
/// assert!(shared.snapshot().contains_object("Contact"));
/// ```
#[derive(Debug, Clone)]
pub struct SharedRegistry {
    current: Arc<RwLock<Arc<Registry>>>,
}

impl SharedRegistry {
    /// Creates a handle holding `registry` as the first snapshot.
    pub fn new(registry: Registry) -> Self {
        Self {
            current: Arc::new(RwLock::new(Arc::new(registry))),
        }
    }

    /// Returns the current snapshot.
    pub fn snapshot(&self) -> Arc<Registry> {
        // The slot only ever holds a complete Arc, so a poisoned lock is still
        // consistent.
        let guard = self.current.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&*guard)
    }

    /// Replaces the current snapshot.
    pub fn publish(&self, registry: Registry) {
        let next = Arc::new(registry);
        let mut guard = self
            .current
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        *guard = next;
        tracing::debug!(objects = guard.len(), "registry snapshot published");
    }

    /// Rebuilds the registry from `provider` and publishes it.
    ///
    /// # Errors
    ///
    /// On a provider error the current snapshot is left in place.
    pub fn refresh(&self, provider: &dyn SchemaProvider) -> Result<(), SchemaError> {
        let registry = Registry::from_provider(provider)?;
        self.publish(registry);
        Ok(())
    }
}

impl From<Registry> for SharedRegistry {
    fn from(registry: Registry) -> Self {
        Self::new(registry)
    }
}
