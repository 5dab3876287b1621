use std::fmt;

use crate::config::GuardConfig;
use crate::error::Error;
use crate::query::{Comparison, Query, QueryBuilder};
use crate::registry::SharedRegistry;
use crate::sanitizer::Sanitizer;
use crate::tainted::Tainted;
use crate::validator::Validator;
use crate::value::Value;

/// A caller's request for a dynamic query, with every name still untrusted.
///
/// Names are [`Tainted`] and are only read by the guard. Filter values are
/// plain [`Value`]s: they are always bound, never interpolated, so their
/// content does not matter.
///
/// # Examples
///
/// ```
/// use query_guard::{Comparison, QueryRequest, Tainted};
///
/// let request = QueryRequest::new(Tainted::new("Account".to_string()))
///     .field(Tainted::new("Name".to_string()))
///     .filter(Tainted::new("Name".to_string()), Comparison::Eq, "Acme")
///     .sort(Tainted::new("Name".to_string()), Tainted::new("desc".to_string()))
///     .limit(50);
/// ```
#[derive(Clone)]
pub struct QueryRequest {
    object: Tainted<String>,
    fields: Vec<Tainted<String>>,
    filters: Vec<(Tainted<String>, Comparison, Value)>,
    sort: Option<(Tainted<String>, Tainted<String>)>,
    limit: Option<u32>,
}

impl QueryRequest {
    /// Starts a request on a (still untrusted) object name.
    pub fn new(object: Tainted<String>) -> Self {
        Self {
            object,
            fields: Vec::new(),
            filters: Vec::new(),
            sort: None,
            limit: None,
        }
    }

    /// Adds a field to the projection.
    pub fn field(mut self, field: Tainted<String>) -> Self {
        self.fields.push(field);
        self
    }

    /// Adds a filter condition.
    pub fn filter(
        mut self,
        field: Tainted<String>,
        op: Comparison,
        value: impl Into<Value>,
    ) -> Self {
        self.filters.push((field, op, value.into()));
        self
    }

    /// Sets the sort field and direction.
    pub fn sort(mut self, field: Tainted<String>, direction: Tainted<String>) -> Self {
        self.sort = Some((field, direction));
        self
    }

    /// Caps the number of rows.
    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }
}

// Filter values are caller data too; show only their types.
impl fmt::Debug for QueryRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let filters: Vec<(Comparison, &str)> = self
            .filters
            .iter()
            .map(|(_, op, value)| (*op, value.type_name()))
            .collect();
        f.debug_struct("QueryRequest")
            .field("object", &self.object)
            .field("fields", &self.fields.len())
            .field("filters", &filters)
            .field("sort", &self.sort.is_some())
            .field("limit", &self.limit)
            .finish()
    }
}

/// The query builder guard.
///
/// `QueryGuard` ties the three policies together for a whole request: names
/// go through the [`Validator`] against the current registry snapshot, values
/// go through the binder, and the result is composed into a [`Query`]. The
/// [`Sanitizer`] is available as a separate fallback.
///
/// Each call works on one registry snapshot from start to finish, so a
/// concurrent refresh cannot make half of a request validate against the old
/// schema and half against the new one.
///
/// # Examples
///
/// ```
/// use query_guard::{
///     Comparison, Error, GuardConfig, InvalidReason, QueryGuard, QueryRequest, Registry, Tainted,
/// };
///
/// let registry = Registry::builder()
///     .object("Account", ["Id", "Name", "Industry"])
///     .build();
/// let guard = QueryGuard::new(registry.into(), GuardConfig::default());
///
/// let request = QueryRequest::new(Tainted::new("Account".to_string()))
///     .field(Tainted::new("Name".to_string()))
///     .filter(Tainted::new("Name".to_string()), Comparison::Eq, "O'Reilly Company");
/// let query = guard.build(&request).expect("valid request");
///
/// assert_eq!(query.template().as_str(), "SELECT Name FROM Account WHERE Name = :p0");
///
/// let hostile = QueryRequest::new(Tainted::new("Account; DROP TABLE Account; --".to_string()));
/// match guard.build(&hostile) {
///     Err(Error::InvalidIdentifier(e)) => assert_eq!(e.reason, InvalidReason::UnknownObject),
///     other => panic!("unexpected: {:?}", other),
/// }
/// ```
#[derive(Debug, Clone)]
pub struct QueryGuard {
    registry: SharedRegistry,
    config: GuardConfig,
    sanitizer: Sanitizer,
}

impl QueryGuard {
    /// Creates a guard over a registry handle.
    pub fn new(registry: SharedRegistry, config: GuardConfig) -> Self {
        Self {
            registry,
            config,
            sanitizer: Sanitizer::default(),
        }
    }

    /// Replaces the fallback sanitizer.
    pub fn with_sanitizer(mut self, sanitizer: Sanitizer) -> Self {
        self.sanitizer = sanitizer;
        self
    }

    /// The registry handle, for publishing refreshed snapshots.
    pub fn registry(&self) -> &SharedRegistry {
        &self.registry
    }

    /// The configuration.
    pub fn config(&self) -> &GuardConfig {
        &self.config
    }

    /// Validates, binds and composes a request.
    ///
    /// Components are checked in order: object, projection fields, filter
    /// fields, sort field, sort direction. The first failure is returned.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidIdentifier`] if any name is not whitelisted, or if
    ///   the sort direction is unknown under `SortPolicy::Reject`
    /// - [`Error::Compose`] is not expected here, since every field is
    ///   validated against the same object, but is passed through if it occurs
    pub fn build(&self, request: &QueryRequest) -> Result<Query, Error> {
        let registry = self.registry.snapshot();
        let validator = Validator::new(&registry).with_sort_policy(self.config.sort_policy());

        let object = validator.object(request.object.expose())?;
        let mut builder = QueryBuilder::with_style(&object, self.config.placeholder_style());

        for field in &request.fields {
            let field = validator.field(&object, field.expose())?;
            builder = builder.select(&field);
        }

        for (field, op, value) in &request.filters {
            let field = validator.field(&object, field.expose())?;
            builder = builder.filter(&field, *op, value.clone());
        }

        if let Some((field, direction)) = &request.sort {
            let field = validator.field(&object, field.expose())?;
            let direction = validator.sort(direction.expose())?;
            builder = builder.order_by(&field, &direction);
        }

        if let Some(limit) = request.limit {
            builder = builder.limit(limit);
        }

        let query = builder.build()?;
        tracing::debug!(
            object = object.name(),
            params = query.params().len(),
            "guarded query built"
        );
        Ok(query)
    }

    /// Runs the fallback sanitizer over tainted text.
    ///
    /// Use only where the text can be neither whitelisted nor bound.
    pub fn sanitize(&self, input: &Tainted<String>) -> String {
        self.sanitizer.sanitize(input.expose().as_str())
    }
}
