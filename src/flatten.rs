use opentelemetry::KeyValue;
use serde_json::{Map, Value};

/// Flatten a nested raw record into string-valued span attributes.
///
/// Nested objects contribute dot-joined keys (`a.b.c`). Arrays contribute
/// the first element only, and only when it is a string; empty arrays and
/// arrays of non-strings contribute nothing. Numbers are rendered with zero
/// fractional digits — the GitLab API encodes all numeric fields as whole
/// numbers, and a genuine fractional part is truncated. Nulls become the
/// literal string "None".
///
/// Duplicate keys are never deduplicated; the result is an accumulation
/// list, not a map.
pub fn flatten_map(prefix: &str, map: &Map<String, Value>) -> Vec<KeyValue> {
    let mut attrs = Vec::new();
    for (k, v) in map {
        let key = if prefix.is_empty() {
            k.clone()
        } else {
            format!("{prefix}.{k}")
        };

        match v {
            Value::Object(nested) => attrs.extend(flatten_map(&key, nested)),
            Value::Array(items) => {
                if let Some(Value::String(first)) = items.first() {
                    attrs.push(KeyValue::new(key, first.clone()));
                }
            }
            Value::String(s) => attrs.push(KeyValue::new(key, s.clone())),
            Value::Number(n) => {
                attrs.push(KeyValue::new(key, format!("{:.0}", n.as_f64().unwrap_or(0.0))));
            }
            Value::Bool(b) => attrs.push(KeyValue::new(key, b.to_string())),
            Value::Null => attrs.push(KeyValue::new(key, "None")),
        }
    }
    attrs
}
