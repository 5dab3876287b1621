use std::fmt;

use crate::value::Value;

/// How placeholder tokens are written into the template.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PlaceholderStyle {
    /// Named bind variables: `:p0`, `:p1`, ...
    #[default]
    Named,
    /// Numbered parameters: `$1`, `$2`, ...
    Numbered,
}

impl PlaceholderStyle {
    // Numbered parameters count from one, and their names follow suit so
    // that `p1` and `$1` are the same parameter.
    fn number(self, index: usize) -> usize {
        match self {
            PlaceholderStyle::Named => index,
            PlaceholderStyle::Numbered => index + 1,
        }
    }

    fn token(self, number: usize) -> String {
        match self {
            PlaceholderStyle::Named => format!(":p{}", number),
            PlaceholderStyle::Numbered => format!("${}", number),
        }
    }
}

/// A value paired with the placeholder that stands for it in the template.
///
/// The value is never written into the template text. It travels next to
/// the template to the execution collaborator, which hands it to the engine
/// as a parameter.
#[derive(Clone, PartialEq)]
pub struct BoundValue {
    name: String,
    placeholder: String,
    value: Value,
}

impl BoundValue {
    /// Parameter name, e.g. `p0` for `:p0` or `p1` for `$1`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Token emitted into the template, e.g. `:p0` or `$1`.
    pub fn placeholder(&self) -> &str {
        &self.placeholder
    }

    /// The bound value.
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Consumes the binding and returns the value.
    pub fn into_value(self) -> Value {
        self.value
    }
}

// Values are caller data; keep them out of Debug so a logged binding only
// shows its placeholder and type.
impl fmt::Debug for BoundValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundValue")
            .field("placeholder", &self.placeholder)
            .field("type", &self.value.type_name())
            .finish()
    }
}

/// Hands out placeholders for one query-build call.
///
/// Binding never fails and never inspects the value. Every call gets a fresh
/// placeholder, even for a value that was bound before, so each placeholder
/// maps to exactly one value.
///
/// # Examples
///
/// ```
/// use query_guard::{Binder, PlaceholderStyle};
///
/// let mut binder = Binder::new(PlaceholderStyle::Named);
/// let a = binder.bind("O'Reilly Company");
/// let b = binder.bind("O'Reilly Company");
///
/// assert_eq!(a.placeholder(), ":p0");
/// assert_eq!(b.placeholder(), ":p1");
/// ```
#[derive(Debug, Clone, Default)]
pub struct Binder {
    style: PlaceholderStyle,
    next: usize,
}

impl Binder {
    /// Creates a binder that renders placeholders in `style`.
    pub fn new(style: PlaceholderStyle) -> Self {
        Self { style, next: 0 }
    }

    /// Returns the placeholder style.
    pub fn style(&self) -> PlaceholderStyle {
        self.style
    }

    /// Binds a value to the next placeholder.
    pub fn bind(&mut self, value: impl Into<Value>) -> BoundValue {
        let number = self.style.number(self.next);
        self.next += 1;
        BoundValue {
            name: format!("p{}", number),
            placeholder: self.style.token(number),
            value: value.into(),
        }
    }

    /// Number of values bound so far.
    pub fn len(&self) -> usize {
        self.next
    }

    /// Returns `true` if nothing has been bound.
    pub fn is_empty(&self) -> bool {
        self.next == 0
    }
}
