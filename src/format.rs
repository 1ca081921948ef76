//! Syntax of domain names.

use once_cell::sync::Lazy;
use regex::Regex;
use std::any::Any;

// One or more labels followed by a dot, then the final label. Labels are 1–63
// characters, start and end alphanumeric, and may carry hyphens inside; the
// letters æ, ø, å are allowed inside all but the final label.
static DOMAIN_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\A(?:[a-zA-Z0-9](?:[a-zA-Z0-9æøåÆØÅ-]{0,61}[a-zA-Z0-9])?\.)+[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?\z",
    )
    .unwrap()
});

const LOCALHOST: &str = "localhost";

/// Returns whether the given string is a syntactically valid domain name.
///
/// Any string containing `localhost` (in any letter case, anywhere) is
/// accepted as is. Otherwise, the whole string must be a sequence of at least
/// two dot-separated labels; surrounding whitespace, a leading or trailing dot,
/// or a URL scheme prefix make the string invalid.
///
/// # Examples
///
/// ```
/// use viadomain::is_valid_format;
///
/// assert!(is_valid_format("www.example.com"));
/// assert!(is_valid_format("blåbær.example.no"));
/// assert!(is_valid_format("LOCALHOST"));
///
/// assert!(!is_valid_format("example"));
/// assert!(!is_valid_format("example.com."));
/// assert!(!is_valid_format("https://example.com"));
/// ```
pub fn is_valid_format(s: &str) -> bool {
    contains_localhost(s) || DOMAIN_NAME.is_match(s)
}

/// Returns whether the given dynamically typed value is a syntactically valid
/// domain name.
///
/// Only string values (`String`, `&str`, `Box<str>`) can be valid; values of
/// any other type are rejected.
pub fn is_valid_format_value(value: &dyn Any) -> bool {
    as_str(value).map_or(false, is_valid_format)
}

pub(crate) fn as_str(value: &dyn Any) -> Option<&str> {
    if let Some(s) = value.downcast_ref::<String>() {
        Some(s.as_str())
    } else if let Some(s) = value.downcast_ref::<&str>() {
        Some(*s)
    } else if let Some(s) = value.downcast_ref::<Box<str>>() {
        Some(s.as_ref())
    } else {
        None
    }
}

fn contains_localhost(s: &str) -> bool {
    s.len() >= LOCALHOST.len() && s.to_ascii_lowercase().contains(LOCALHOST)
}
