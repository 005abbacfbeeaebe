//! Lenient deserializers for the schema-inconsistent upstream, which
//! alternates between numbers and strings (ids, ratings, years) and between
//! strings and arrays (genres) across otherwise identical payloads.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Accept a string or a number; anything else becomes an empty string.
pub fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        _ => String::new(),
    })
}

/// Accept a string, a number, or an array of strings joined with ", ".
pub fn joined_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        Value::Array(items) => items
            .iter()
            .filter_map(Value::as_str)
            .collect::<Vec<_>>()
            .join(", "),
        _ => String::new(),
    })
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Deserialize)]
    struct Probe {
        #[serde(default, deserialize_with = "super::string_or_number")]
        id: String,
        #[serde(default, deserialize_with = "super::joined_text")]
        genre: String,
    }

    #[test]
    fn numbers_become_strings() {
        let probe: Probe = serde_json::from_value(json!({"id": 7, "genre": 2024})).unwrap();
        assert_eq!(probe.id, "7");
        assert_eq!(probe.genre, "2024");
    }

    #[test]
    fn arrays_join_and_junk_degrades_to_empty() {
        let probe: Probe =
            serde_json::from_value(json!({"id": {"nested": true}, "genre": ["Action", "Sci-Fi"]}))
                .unwrap();
        assert_eq!(probe.id, "");
        assert_eq!(probe.genre, "Action, Sci-Fi");
    }
}
