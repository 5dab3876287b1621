//! Integration property tests for query-guard.
//!
//! These tests check the guarantees that hold across the validator, binder,
//! composer and sanitizer, using property-based testing.

use query_guard::{
    sanitize, Comparison, GuardConfig, QueryGuard, QueryRequest, Registry, Sanitizer, Tainted,
    Validator,
};
use proptest::prelude::*;

fn registry() -> Registry {
    Registry::builder()
        .object("Account", ["Id", "Name", "Industry"])
        .object("Contact", ["Id", "FirstName", "LastName"])
        .build()
}

// Strategy: values an attacker would try to smuggle into a query
fn arb_payload() -> impl Strategy<Value = String> {
    let piece = prop_oneof![
        prop::string::string_regex("[A-Za-z]{3,10}").unwrap(),
        Just("'".to_string()),
        Just(";".to_string()),
        Just(" OR 1=1".to_string()),
        Just("--".to_string()),
        Just("UNION SELECT Id FROM User".to_string()),
        Just("DROP TABLE Account".to_string()),
    ];
    prop::collection::vec(piece, 1..6).prop_map(|parts| format!("zz{}zz", parts.concat()))
}

proptest! {
    /// Property: only exact registry keys validate as objects
    #[test]
    fn proptest_object_whitelist_sound(candidate in "\\PC{0,40}") {
        let registry = registry();
        let result = Validator::new(&registry).object(&candidate);
        prop_assert_eq!(result.is_ok(), candidate == "Account" || candidate == "Contact");
    }

    /// Property: a value's text never appears in the template
    #[test]
    fn proptest_values_never_interpolated(payload in arb_payload()) {
        let guard = QueryGuard::new(registry().into(), GuardConfig::default());
        let request = QueryRequest::new(Tainted::new("Account".to_string()))
            .field(Tainted::new("Name".to_string()))
            .filter(Tainted::new("Name".to_string()), Comparison::Eq, payload.clone())
            .filter(Tainted::new("Industry".to_string()), Comparison::NotEq, payload.clone());

        let query = guard.build(&request).unwrap();
        let text = query.template().as_str();

        prop_assert!(!text.contains(&payload));
        prop_assert!(!text.contains("zz"));
        prop_assert_eq!(text, "SELECT Name FROM Account WHERE Name = :p0 AND Industry != :p1");
        prop_assert_eq!(query.params().len(), 2);
        for param in query.params() {
            prop_assert_eq!(param.value().as_text(), Some(payload.as_str()));
        }
    }

    /// Property: sanitize is total and returns nothing blocked
    #[test]
    fn proptest_sanitize_total(input in any::<String>()) {
        let cleaned = sanitize(input.as_str());
        prop_assert_eq!(cleaned.trim(), cleaned.as_str());
        prop_assert!(Sanitizer::default().is_clean(&cleaned));
    }

    /// Property: text without blocked content is only trimmed
    #[test]
    fn proptest_sanitize_clean_input(input in "[ a-z0-9]{0,10}( [a-z0-9]{1,5}){0,4} {0,3}") {
        prop_assume!(Sanitizer::default().is_clean(&input));
        prop_assert_eq!(sanitize(input.as_str()), input.trim());
    }
}
