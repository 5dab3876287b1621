use std::fmt;

/// A wrapper for untrusted caller input that must be validated before use.
///
/// `Tainted<T>` marks names coming from requests, URLs, form fields and the
/// like. Code outside this crate cannot read the wrapped value back; the only
/// way to use it is to hand it to the [`QueryGuard`](crate::QueryGuard), which
/// checks it against the registry.
///
/// # Security Properties
///
/// - Does NOT implement `Deref`, `AsRef`, `Display` or any conversion into `T`
/// - `Debug` output never contains the wrapped value, so a tainted value can
///   sit in a logged struct without echoing hostile input into the log
///
/// # Examples
///
/// ```
/// use query_guard::Tainted;
///
/// let user_input = Tainted::new("Account; DROP TABLE Account; --".to_string());
///
/// assert_eq!(format!("{:?}", user_input), "Tainted(<redacted>)");
///
/// // Cannot be used as a string:
/// // let query = format!("SELECT Id FROM {}", user_input); // Won't compile!
/// ```
#[derive(Clone)]
pub struct Tainted<T> {
    // Must stay private, see the type-level docs.
    inner: T,
}

impl<T> Tainted<T> {
    /// Wraps an untrusted value.
    pub fn new(value: T) -> Self {
        Self { inner: value }
    }

    /// Borrows the raw value for validation. Crate-internal only.
    pub(crate) fn expose(&self) -> &T {
        &self.inner
    }
}

impl<T> fmt::Debug for Tainted<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Tainted(<redacted>)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tainted_debug_redacts_value() {
        let user_input = Tainted::new("'; DROP TABLE users; --".to_string());
        let debug_output = format!("{:?}", user_input);

        assert_eq!(debug_output, "Tainted(<redacted>)");
        assert!(!debug_output.contains("DROP"));
    }

    #[test]
    fn tainted_cannot_be_used_as_t() {
        let tainted_str = Tainted::new("unsafe".to_string());

        #[allow(dead_code)]
        fn takes_string(_s: String) {}

        // This would not compile if uncommented:
        // takes_string(tainted_str);

        assert_eq!(tainted_str.expose(), "unsafe");
    }

    mod proptests {
        use super::*;
        use crate::test_utils::arb_hostile_string;
        use proptest::prelude::*;

        proptest! {
            /// Property: no input ever shows up in Debug output
            #[test]
            fn proptest_tainted_debug_never_leaks(input in arb_hostile_string()) {
                let tainted = Tainted::new(input.clone());
                let debug_output = format!("{:?}", tainted);
                prop_assert_eq!(debug_output.as_str(), "Tainted(<redacted>)");
                let copy = tainted.clone();
                prop_assert_eq!(copy.expose(), &input);
            }
        }
    }
}
