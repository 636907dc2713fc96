//! Multi-line string fields.
//!
//! Notebook files store long text either as one string or as a list of line
//! fragments that concatenate to the full text.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

#[derive(Deserialize)]
#[serde(untagged)]
enum MultiLine {
    Text(String),
    Lines(Vec<String>),
}

/// Deserialize a text field stored either way. `null` reads as empty.
pub(crate) fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match Option::<MultiLine>::deserialize(deserializer)? {
        Some(MultiLine::Text(text)) => text,
        Some(MultiLine::Lines(lines)) => lines.concat(),
        None => String::new(),
    })
}

/// Join a JSON string or list of strings into one string.
///
/// Returns `None` for any other JSON type.
pub(crate) fn join(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Array(parts) => {
            let mut joined = String::new();
            for part in parts {
                joined.push_str(part.as_str()?);
            }
            Some(joined)
        }
        _ => None,
    }
}

/// Like [`join`], but serializes non-text values as compact JSON.
pub(crate) fn join_lossy(value: &Value) -> String {
    join(value).unwrap_or_else(|| value.to_string())
}
