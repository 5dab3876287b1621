use crate::config::SortPolicy;
use crate::error::{InvalidIdentifier, InvalidReason};
use crate::identifier::{Identifier, SortDirection};
use crate::kind::{Field, IdentifierKind, Object, Sort};
use crate::registry::Registry;

/// The whitelist gate for names.
///
/// `Validator` is the only way to obtain an [`Identifier`]. Object and field
/// names are accepted by exact membership in the [`Registry`]; sort
/// directions by a case-insensitive match against `ASC`/`DESC`. Nothing is
/// trimmed, pattern-matched or partially matched.
///
/// Names cannot be passed as bound parameters in most query languages, so
/// this check is what keeps them from carrying injected syntax.
///
/// # Examples
///
/// ```
/// use query_guard::{Registry, Validator};
///
/// let registry = Registry::builder()
///     .object("Account", ["Id", "Name"])
///     .object("Contact", ["Id", "Email"])
///     .build();
/// let validator = Validator::new(&registry);
///
/// let account = validator.object("Account").expect("known object");
/// let name = validator.field(&account, "Name").expect("known field");
/// assert_eq!(name.object(), "Account");
///
/// assert!(validator.object("Account; DROP TABLE Account; --").is_err());
/// assert!(validator.field(&account, "Email").is_err());
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Validator<'r> {
    registry: &'r Registry,
    sort_policy: SortPolicy,
}

impl<'r> Validator<'r> {
    /// Creates a validator over `registry` with the default sort policy
    /// (substitute `ASC`).
    pub fn new(registry: &'r Registry) -> Self {
        Self {
            registry,
            sort_policy: SortPolicy::default(),
        }
    }

    /// Replaces the sort policy.
    pub fn with_sort_policy(mut self, policy: SortPolicy) -> Self {
        self.sort_policy = policy;
        self
    }

    /// Validates an object name.
    ///
    /// # Errors
    ///
    /// `InvalidIdentifier { kind: object, reason: UnknownObject }` unless
    /// `candidate` is a key of the registry.
    pub fn object(&self, candidate: &str) -> Result<Identifier<Object>, InvalidIdentifier> {
        if !self.registry.contains_object(candidate) {
            return Err(reject(IdentifierKind::Object, InvalidReason::UnknownObject, candidate));
        }
        tracing::debug!(object = candidate, "object name accepted");
        Ok(Identifier::new_unchecked(candidate.to_string(), None))
    }

    /// Validates a field name against an already validated object.
    ///
    /// # Errors
    ///
    /// `InvalidIdentifier { kind: field, reason: UnknownField }` unless
    /// `candidate` is in the field set of `object`. This includes the case
    /// where `object` came from an older registry snapshot that no longer
    /// lists it.
    pub fn field(
        &self,
        object: &Identifier<Object>,
        candidate: &str,
    ) -> Result<Identifier<Field>, InvalidIdentifier> {
        if !self.registry.contains_field(object.name(), candidate) {
            return Err(reject(IdentifierKind::Field, InvalidReason::UnknownField, candidate));
        }
        tracing::debug!(object = object.name(), field = candidate, "field name accepted");
        Ok(Identifier::new_unchecked(
            candidate.to_string(),
            Some(object.name().to_string()),
        ))
    }

    /// Validates a sort directive.
    ///
    /// `asc`, `Asc`, `DESC` and so on are accepted. Anything else is handled
    /// by the sort policy: [`SortPolicy::Reject`] fails, and
    /// [`SortPolicy::Default`] returns the configured direction. The
    /// candidate text itself is never returned.
    ///
    /// # Errors
    ///
    /// `InvalidIdentifier { kind: sortDirection, reason: UnknownSortDirection }`
    /// under `SortPolicy::Reject`.
    pub fn sort(&self, candidate: &str) -> Result<Identifier<Sort>, InvalidIdentifier> {
        if let Some(direction) = SortDirection::parse(candidate) {
            return Ok(direction.into());
        }
        match self.sort_policy {
            SortPolicy::Reject => Err(reject(
                IdentifierKind::SortDirection,
                InvalidReason::UnknownSortDirection,
                candidate,
            )),
            SortPolicy::Default(direction) => {
                tracing::warn!(
                    kind = %IdentifierKind::SortDirection,
                    candidate_len = candidate.len(),
                    substitute = %direction,
                    "sort direction not recognised, using default"
                );
                Ok(direction.into())
            }
        }
    }
}

// Logs only the length of the rejected candidate.
fn reject(kind: IdentifierKind, reason: InvalidReason, candidate: &str) -> InvalidIdentifier {
    tracing::warn!(
        kind = %kind,
        reason = %reason,
        candidate_len = candidate.len(),
        "identifier rejected"
    );
    InvalidIdentifier::new(kind, reason)
}
