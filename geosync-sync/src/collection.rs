//! Shape validation for GeoServer collection listings.
//!
//! A listing looks like `{"dataStores": {"dataStore": [{"name": ..}, ..]}}`.
//! GeoServer reports an empty collection inconsistently: the outer key may be
//! missing, `null`, or an empty string, and the inner key may be missing.
//! All of those mean "no members". Anything else that does not match the
//! expected shape is an error, never an empty list.

use serde_json::Value;

/// Extract member names from a collection body keyed by `outer` / `inner`.
pub(crate) fn member_names(body: &str, outer: &str, inner: &str) -> Result<Vec<String>, String> {
    let root: Value = serde_json::from_str(body).map_err(|e| format!("invalid JSON: {e}"))?;
    let Value::Object(root) = root else {
        return Err("expected a JSON object".to_string());
    };

    let collection = match root.get(outer) {
        None | Some(Value::Null) => return Ok(Vec::new()),
        Some(Value::String(s)) if s.is_empty() => return Ok(Vec::new()),
        Some(Value::Object(map)) => map,
        Some(other) => return Err(format!("'{outer}' is {}", kind(other))),
    };

    match collection.get(inner) {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| member_name(item, inner))
            .collect(),
        // Single-member collections are sometimes flattened to one object.
        Some(item @ Value::Object(_)) => Ok(vec![member_name(item, inner)?]),
        Some(other) => Err(format!("'{outer}.{inner}' is {}", kind(other))),
    }
}

fn member_name(item: &Value, inner: &str) -> Result<String, String> {
    item.get("name")
        .and_then(Value::as_str)
        .map(str::to_owned)
        .ok_or_else(|| format!("'{inner}' entry without a string 'name': {item}"))
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a non-empty string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
