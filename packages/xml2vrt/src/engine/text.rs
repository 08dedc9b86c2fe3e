//! Free-text normalization.

use std::sync::LazyLock;

use regex::Regex;

/// A run of line breaks together with the horizontal whitespace around it.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static LINE_BREAKS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[ \t]*[\r\n]+\s*").expect("valid regex"));

/// Check whether text consists of whitespace only.
pub fn is_whitespace(text: &str) -> bool {
    text.chars().all(char::is_whitespace)
}

/// Normalize free text into a single output line.
///
/// Each run of line breaks collapses into one space and the result is
/// trimmed. Other internal whitespace is left as found.
///
/// # Examples
/// ```
/// use xml2vrt::engine::normalize_free_text;
///
/// assert_eq!(normalize_free_text("\n  Chapter\n   one  \n"), "Chapter one");
/// ```
pub fn normalize_free_text(text: &str) -> String {
    LINE_BREAKS.replace_all(text, " ").trim().to_string()
}
