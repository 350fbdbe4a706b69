//! Cell text normalization.
//!
//! Keys must match byte-for-byte across tables, so they lose all whitespace
//! and footnote markers. Free text only collapses whitespace.

use std::sync::LazyLock;

use regex::Regex;

static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid whitespace pattern"));
static KEY_NOISE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+|\[[^\s\]]+\]").expect("valid key pattern"));

/// Normalizes a definition or field name: trims, then removes all whitespace
/// and bracketed footnote markers such as `[1]`.
#[must_use]
pub fn clean_key(text: &str) -> String {
    KEY_NOISE.replace_all(text.trim(), "").into_owned()
}

/// Normalizes free text: trims and collapses whitespace runs to one space.
#[must_use]
pub fn clean_text(text: &str) -> String {
    WHITESPACE.replace_all(text.trim(), " ").into_owned()
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;

    #[test_case("  /req/core/Base  ", "/req/core/Base"; "trimmed")]
    #[test_case("/req/core/\n  Base", "/req/core/Base"; "internal whitespace")]
    #[test_case("/req/core/Base[1]", "/req/core/Base"; "footnote marker")]
    #[test_case("Requirements Class", "RequirementsClass"; "field name")]
    #[test_case("/req/core/Base\u{a0}[12]", "/req/core/Base"; "non breaking space")]
    fn cleans_keys(input: &str, expected: &str) {
        assert_eq!(clean_key(input), expected);
    }

    #[test_case("  Must do X  ", "Must do X"; "trimmed")]
    #[test_case("Must\n\tdo    X", "Must do X"; "collapsed")]
    #[test_case("Keep [1] markers", "Keep [1] markers"; "markers kept")]
    fn cleans_text(input: &str, expected: &str) {
        assert_eq!(clean_text(input), expected);
    }

    #[test]
    fn cleaning_is_idempotent() {
        let key = clean_key(" /req/a [x] ");
        assert_eq!(clean_key(&key), key);
        let text = clean_text(" a \n b ");
        assert_eq!(clean_text(&text), text);
    }
}
