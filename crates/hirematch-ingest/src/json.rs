//! Raw JSON source loading.
//!
//! Each source document is a top-level mapping from entity id to a nested
//! attribute object. A missing or malformed file degrades to an empty
//! mapping: the pipeline proceeds on whatever data is readable, and
//! downstream stages must tolerate fewer rows than expected.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde_json::Value;
use tracing::warn;

/// Load a JSON document as an id -> object mapping.
///
/// Returns an empty map when the file cannot be read, parsed, or is not an
/// object at the top level. The failure is logged, never raised.
pub fn load_json_map(path: &Path) -> BTreeMap<String, Value> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(error) => {
            warn!(path = %path.display(), %error, "source unreadable, using empty data");
            return BTreeMap::new();
        }
    };
    let value: Value = match serde_json::from_str(&text) {
        Ok(value) => value,
        Err(error) => {
            warn!(path = %path.display(), %error, "source malformed, using empty data");
            return BTreeMap::new();
        }
    };
    match value {
        Value::Object(map) => map.into_iter().collect(),
        _ => {
            warn!(path = %path.display(), "source is not a JSON object, using empty data");
            BTreeMap::new()
        }
    }
}

/// Render a JSON scalar as a table cell.
///
/// Nulls map to `None`; nested arrays/objects are kept as compact JSON text
/// (they are screened out later by the structured-value feature guard).
pub fn value_to_cell(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(if *b { "1" } else { "0" }.to_string()),
        Value::Number(n) => Some(n.to_string()),
        other => Some(other.to_string()),
    }
}
