//! Shared proptest strategies for unit tests.

use proptest::prelude::*;

/// Strings built only from letters, digits, spaces and punctuation the
/// sanitizer leaves alone, with no blocked keyword inside.
pub(crate) fn arb_clean_string(max_len: usize) -> impl Strategy<Value = String> {
    prop::string::string_regex(&format!("[a-zA-Z0-9 ,.&()-]{{0,{}}}", max_len))
        .expect("valid regex")
        .prop_filter("contains a blocked keyword", |s| {
            !crate::sanitizer::DEFAULT_KEYWORDS
                .iter()
                .any(|k| s.to_ascii_uppercase().contains(k))
        })
}

/// Strings that mix ordinary text with quote characters, statement
/// separators, comment markers and keywords.
pub(crate) fn arb_hostile_string() -> impl Strategy<Value = String> {
    let fragment = prop_oneof![
        prop::string::string_regex("[a-zA-Z0-9 ]{0,8}").expect("valid regex"),
        Just("'".to_string()),
        Just("\"".to_string()),
        Just(";".to_string()),
        Just("\\".to_string()),
        Just("--".to_string()),
        Just("/*".to_string()),
        Just("*/".to_string()),
        Just(" OR 1=1".to_string()),
        Just("DROP TABLE".to_string()),
        Just("union select".to_string()),
        Just("ExEcUtE".to_string()),
    ];
    prop::collection::vec(fragment, 1..8).prop_map(|parts| parts.concat())
}

/// A keyword with another keyword split around it, repeated `1..max_depth`
/// levels deep: `DRDRDROPOPOP`, `SELSELECTECT`, and mixes of the two.
pub(crate) fn arb_nested_keywords(max_depth: usize) -> impl Strategy<Value = String> {
    let shell = prop_oneof![
        Just(("DR", "OP")),
        Just(("dr", "op")),
        Just(("SEL", "ECT")),
        Just(("Un", "ion")),
        Just(("EXE", "CUTE")),
    ];
    let core = prop_oneof![Just("DROP"), Just("select"), Just("--"), Just("ExEcUtE")];
    (prop::collection::vec(shell, 1..max_depth), core).prop_map(|(shells, core)| {
        let mut text = core.to_string();
        for (open, close) in shells {
            text = format!("{}{}{}", open, text, close);
        }
        text
    })
}
