use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};
use std::borrow::Cow;

static ANSI_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\x1b\[[0-9;]*[a-zA-Z]").expect("valid ANSI pattern"));

/// Remove ANSI escape sequences from a string.
///
/// Returns the input borrowed when it contains no escape character, so the
/// common case allocates nothing. Escape fragments that do not form a
/// complete CSI sequence are left untouched.
pub fn strip_ansi(s: &str) -> Cow<'_, str> {
    if !s.contains('\x1b') {
        return Cow::Borrowed(s);
    }
    ANSI_PATTERN.replace_all(s, "")
}

/// Strip ANSI escape sequences from every string value of a raw record,
/// in place.
///
/// Nested objects are traversed recursively. For arrays only string
/// elements are sanitized; element order is preserved and non-string
/// elements are left untouched.
pub fn clean_raw(map: &mut Map<String, Value>) {
    for value in map.values_mut() {
        match value {
            Value::String(s) => sanitize_in_place(s),
            Value::Object(nested) => clean_raw(nested),
            Value::Array(items) => {
                for item in items.iter_mut() {
                    if let Value::String(s) = item {
                        sanitize_in_place(s);
                    }
                }
            }
            _ => {}
        }
    }
}

fn sanitize_in_place(s: &mut String) {
    if s.contains('\x1b') {
        *s = ANSI_PATTERN.replace_all(s, "").into_owned();
    }
}
