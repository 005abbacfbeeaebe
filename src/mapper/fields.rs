//! Ordered accessor chains over raw upstream JSON.
//!
//! Every canonical field resolves through an explicit key list evaluated in
//! priority order with early termination, instead of per-field chains of
//! inline conditionals. Values coerce to text: numbers render in their JSON
//! form, string arrays join with ", ". Empty strings count as absent so a
//! blank primary key falls through to the next alternative, matching the
//! upstream's own fallback behavior.

use serde_json::Value;

/// First present value among `keys`, coerced to text.
pub(crate) fn text_field(raw: &Value, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| raw.get(key).and_then(coerce_text))
}

/// Like [`text_field`], with a default for the all-absent case.
pub(crate) fn text_field_or(raw: &Value, keys: &[&str], default: &str) -> String {
    text_field(raw, keys).unwrap_or_else(|| default.to_string())
}

/// First value among `keys` that parses as a small integer.
pub(crate) fn number_field(raw: &Value, keys: &[&str]) -> Option<u32> {
    keys.iter().find_map(|key| raw.get(key).and_then(coerce_number))
}

fn coerce_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Array(items) => {
            let joined = items
                .iter()
                .filter_map(Value::as_str)
                .collect::<Vec<_>>()
                .join(", ");
            (!joined.is_empty()).then_some(joined)
        }
        _ => None,
    }
}

fn coerce_number(value: &Value) -> Option<u32> {
    match value {
        Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
