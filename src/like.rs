//! LIKE pattern helpers.
//!
//! Binding a search term stops it from changing the query's structure, but a
//! bound `%` or `_` still acts as a wildcard inside a `LIKE` comparison. These
//! helpers escape the wildcard characters (and the escape character itself)
//! with a backslash before adding the intended wildcards.
//!
//! ```
//! use query_guard::like;
//!
//! assert_eq!(like::contains("100%_off"), "%100\\%\\_off%");
//! assert_eq!(like::starts_with("Acme"), "Acme%");
//! ```

/// Escapes `\`, `%` and `_`.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '\\' | '%' | '_') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Pattern matching `text` anywhere.
pub fn contains(text: &str) -> String {
    format!("%{}%", escape(text))
}

/// Pattern matching values that begin with `text`.
pub fn starts_with(text: &str) -> String {
    format!("{}%", escape(text))
}

/// Pattern matching values that end with `text`.
pub fn ends_with(text: &str) -> String {
    format!("%{}", escape(text))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escape_leaves_plain_text_alone() {
        assert_eq!(escape("Normal Company Name"), "Normal Company Name");
        assert_eq!(escape(""), "");
    }

    #[test]
    fn escape_wildcards_and_backslash() {
        assert_eq!(escape("a%b_c\\d"), "a\\%b\\_c\\\\d");
    }

    #[test]
    fn wrappers_add_wildcards() {
        assert_eq!(contains("Acme"), "%Acme%");
        assert_eq!(starts_with("Acme"), "Acme%");
        assert_eq!(ends_with("Ltd"), "%Ltd");
        assert_eq!(contains("%"), "%\\%%");
    }
}
