//! Shared validation helpers.

use std::sync::LazyLock;

use regex::Regex;

/// Plain JavaScript identifier (no unicode escapes).
static JS_IDENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_$][A-Za-z0-9_$]*$").unwrap());

/// URL scheme per RFC 3986.
static SCHEME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z][a-z0-9+.-]*$").unwrap());

const RESERVED_SCHEMES: &[&str] = &["http", "https", "file", "about", "data", "javascript"];

/// Push an error if `value` is outside `[min, max]`.
pub(crate) fn validate_range(errors: &mut Vec<String>, name: &str, value: u32, min: u32, max: u32) {
    if value < min || value > max {
        errors.push(format!("{name} = {value} is out of range [{min}, {max}]"));
    }
}

/// Push an error unless `value` can be used as `window.<value>`.
pub(crate) fn validate_js_identifier(errors: &mut Vec<String>, name: &str, value: &str) {
    if !JS_IDENT_RE.is_match(value) {
        errors.push(format!("{name} = {value:?} is not a valid JavaScript identifier"));
    }
}

/// Push an error unless `value` is a lowercase custom scheme.
pub(crate) fn validate_scheme(errors: &mut Vec<String>, name: &str, value: &str) {
    if !SCHEME_RE.is_match(value) {
        errors.push(format!("{name} = {value:?} is not a valid URL scheme"));
    } else if RESERVED_SCHEMES.contains(&value) {
        errors.push(format!("{name} = {value:?} is reserved"));
    }
}
