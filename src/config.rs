use crate::binder::PlaceholderStyle;
use crate::identifier::SortDirection;

/// What the validator does with a sort directive that is neither `ASC` nor
/// `DESC`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortPolicy {
    /// Fail with `InvalidIdentifier { kind: sortDirection, .. }`.
    Reject,
    /// Substitute the given direction and log a warning.
    Default(SortDirection),
}

impl Default for SortPolicy {
    fn default() -> Self {
        SortPolicy::Default(SortDirection::Asc)
    }
}

/// Settings for a [`QueryGuard`](crate::QueryGuard).
///
/// # Examples
///
/// ```
/// use query_guard::{GuardConfig, PlaceholderStyle, SortPolicy};
///
/// let config = GuardConfig::default()
///     .with_sort_policy(SortPolicy::Reject)
///     .with_placeholder_style(PlaceholderStyle::Numbered);
///
/// assert_eq!(config.sort_policy(), SortPolicy::Reject);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GuardConfig {
    sort_policy: SortPolicy,
    placeholder_style: PlaceholderStyle,
}

impl GuardConfig {
    /// Sets the sort direction policy.
    pub fn with_sort_policy(mut self, policy: SortPolicy) -> Self {
        self.sort_policy = policy;
        self
    }

    /// Sets how placeholders are rendered.
    pub fn with_placeholder_style(mut self, style: PlaceholderStyle) -> Self {
        self.placeholder_style = style;
        self
    }

    /// Returns the sort direction policy.
    pub fn sort_policy(&self) -> SortPolicy {
        self.sort_policy
    }

    /// Returns the placeholder style.
    pub fn placeholder_style(&self) -> PlaceholderStyle {
        self.placeholder_style
    }
}
