//! Text cleanup before synthesis.

use std::sync::LazyLock;

use regex::Regex;

static PARENTHESIZED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\([^)]+\)").expect("static regex is valid"));

/// Remove parenthesized asides such as `(laughs)` and trim the result.
///
/// Only ASCII parentheses with at least one character inside are removed.
///
/// ```
/// use murmur_tts::filter_bracket_content;
/// assert_eq!(filter_bracket_content("(smiles) Hello there"), "Hello there");
/// ```
#[must_use]
pub fn filter_bracket_content(text: &str) -> String {
    PARENTHESIZED.replace_all(text, "").trim().to_string()
}
