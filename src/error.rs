use std::fmt;

use crate::kind::IdentifierKind;

/// Errors that can occur while building a guarded query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A candidate name failed whitelist validation
    InvalidIdentifier(InvalidIdentifier),
    /// Trusted parts could not be assembled into a template
    Compose(ComposeError),
    /// The schema collaborator could not produce a registry
    Schema(SchemaError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidIdentifier(e) => write!(f, "Invalid identifier: {}", e),
            Error::Compose(e) => write!(f, "Query composition failed: {}", e),
            Error::Schema(e) => write!(f, "Schema unavailable: {}", e),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::InvalidIdentifier(e) => Some(e),
            Error::Compose(e) => Some(e),
            Error::Schema(e) => Some(e),
        }
    }
}

impl From<InvalidIdentifier> for Error {
    fn from(e: InvalidIdentifier) -> Self {
        Error::InvalidIdentifier(e)
    }
}

impl From<ComposeError> for Error {
    fn from(e: ComposeError) -> Self {
        Error::Compose(e)
    }
}

impl From<SchemaError> for Error {
    fn from(e: SchemaError) -> Self {
        Error::Schema(e)
    }
}

/// A candidate name was not found in the whitelist for its kind.
///
/// The rejected text is deliberately not part of this error. Callers that
/// surface it to end users or logs cannot leak the hostile input back out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidIdentifier {
    /// Which kind of identifier was being validated
    pub kind: IdentifierKind,
    /// Why the candidate was rejected
    pub reason: InvalidReason,
}

impl InvalidIdentifier {
    /// Creates a new invalid identifier error.
    pub fn new(kind: IdentifierKind, reason: InvalidReason) -> Self {
        Self { kind, reason }
    }
}

impl fmt::Display for InvalidIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.reason, self.kind)
    }
}

impl std::error::Error for InvalidIdentifier {}

/// The reason an identifier was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidReason {
    /// Not a key of the registry
    UnknownObject,
    /// Not in the field set of the validated object
    UnknownField,
    /// Neither `ASC` nor `DESC`
    UnknownSortDirection,
}

impl fmt::Display for InvalidReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvalidReason::UnknownObject => write!(f, "unknown object"),
            InvalidReason::UnknownField => write!(f, "unknown field"),
            InvalidReason::UnknownSortDirection => write!(f, "unknown sort direction"),
        }
    }
}

/// Trusted parts that do not fit together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComposeError {
    /// A field identifier was validated against a different object
    ForeignField {
        /// The trusted field name
        field: String,
        /// The object the field belongs to
        owner: String,
        /// The object being queried
        object: String,
    },
    /// Two bound values share a placeholder, usually because they came from
    /// different binders
    DuplicatePlaceholder {
        /// The placeholder token that appeared twice
        placeholder: String,
    },
}

impl fmt::Display for ComposeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComposeError::ForeignField {
                field,
                owner,
                object,
            } => write!(
                f,
                "field '{}' belongs to '{}', not '{}'",
                field, owner, object
            ),
            ComposeError::DuplicatePlaceholder { placeholder } => {
                write!(f, "placeholder '{}' bound more than once", placeholder)
            }
        }
    }
}

impl std::error::Error for ComposeError {}

/// Failure reported by a [`SchemaProvider`](crate::SchemaProvider).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaError {
    message: String,
}

impl SchemaError {
    /// Creates a new schema error.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Returns the error message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for SchemaError {}
