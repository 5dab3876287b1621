//! Safe dynamic query construction.
//!
//! Building a query from user input is safe when no untrusted text ever
//! reaches the query string. This crate enforces that with three policies:
//! - **Identifier validation**: object, field and sort names are accepted
//!   only by exact membership in a [`Registry`] (or `ASC`/`DESC`)
//! - **Value binding**: values become placeholders and travel next to the
//!   template as parameters
//! - **Sanitization**: a lossy, best-effort text filter for the rare case
//!   where neither of the above applies
//!
//! # Core Types
//!
//! - [`Registry`] / [`SharedRegistry`]: Immutable whitelist and its swappable handle
//! - [`Validator`]: The only producer of [`Identifier`]s
//! - [`Identifier<K>`]: A trusted name, typed by [`kind`]
//! - [`Binder`] / [`BoundValue`]: Placeholder allocation for values
//! - [`compose`] / [`QueryBuilder`]: Template assembly from trusted parts
//! - [`QueryGuard`]: The whole flow for a [`QueryRequest`] of [`Tainted`] names
//! - [`Sanitizer`]: The fallback filter
//!
//! # Examples
//!
//! ```
//! use query_guard::{Comparison, GuardConfig, QueryGuard, QueryRequest, Registry, Tainted};
//!
//! let registry = Registry::builder()
//!     .object("Account", ["Id", "Name"])
//!     .object("Contact", ["Id", "Email"])
//!     .build();
//! let guard = QueryGuard::new(registry.into(), GuardConfig::default());
//!
//! let request = QueryRequest::new(Tainted::new("Account".to_string()))
//!     .field(Tainted::new("Id".to_string()))
//!     .filter(Tainted::new("Name".to_string()), Comparison::Eq, "x' OR Name != '");
//!
//! let query = guard.build(&request).expect("whitelisted names");
//! assert_eq!(query.template().as_str(), "SELECT Id FROM Account WHERE Name = :p0");
//! assert_eq!(query.params().len(), 1);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod binder;
mod config;
mod error;
mod guard;
mod identifier;
pub mod kind;
pub mod like;
mod query;
mod registry;
mod sanitizer;
mod schema;
mod tainted;
mod validator;
mod value;

#[cfg(test)]
mod test_utils;

pub use binder::{Binder, BoundValue, PlaceholderStyle};
pub use config::{GuardConfig, SortPolicy};
pub use error::{ComposeError, Error, InvalidIdentifier, InvalidReason, SchemaError};
pub use guard::{QueryGuard, QueryRequest};
pub use identifier::{Identifier, SortDirection};
pub use kind::IdentifierKind;
pub use query::{compose, Comparison, Condition, OrderBy, Query, QueryBuilder, QueryTemplate};
pub use registry::{Registry, RegistryBuilder, SharedRegistry};
pub use sanitizer::{
    escape_quotes, sanitize, Blocked, Sanitizer, SanitizerConfig, DEFAULT_BLOCKED_CHARS,
    DEFAULT_KEYWORDS,
};
pub use schema::{SchemaProvider, StaticSchema};
pub use tainted::Tainted;
pub use validator::Validator;
pub use value::Value;
