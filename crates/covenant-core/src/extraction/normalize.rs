//! Per-component reshaping of recovered model output.
//!
//! Models return the right data in the wrong envelope often enough that each
//! component gets a small pure function that coerces the common variants into
//! the shape its type deserializes from.

use serde_json::{Map, Value};
use tracing::warn;

use super::schema::ComponentKind;

const DATE_FIELDS: [&str; 3] = ["signing_date", "effective_date", "expiration_date"];

/// Normalize a recovered value for its component.
pub fn normalize(kind: ComponentKind, value: Value) -> Value {
    match kind {
        ComponentKind::BasicInfo => normalize_basic_info(value),
        ComponentKind::Parties => Value::Array(normalize_list(value, "parties", &["name", "role"])),
        ComponentKind::Subjects => Value::Array(normalize_list(
            value,
            "subjects",
            &["name", "description"],
        )),
        ComponentKind::Terms => normalize_terms(value),
    }
}

/// Lift non-null dates out of a nested `dates` object and drop `positions`.
pub fn normalize_basic_info(value: Value) -> Value {
    let Value::Object(mut map) = value else {
        return value;
    };

    if let Some(Value::Object(dates)) = map.get("dates").cloned() {
        for field in DATE_FIELDS {
            match dates.get(field) {
                Some(Value::Null) | None => {}
                Some(date) => {
                    map.insert(field.to_string(), date.clone());
                }
            }
        }
        map.remove("dates");
    }
    map.remove("positions");

    Value::Object(map)
}

/// Coerce a list component into a list of element objects.
///
/// Accepts the wrapped form `{key: [...]}`, a bare array, a single element
/// object recognised by any of `typical_fields`, or a map whose values are
/// element objects carrying a `name`.
pub fn normalize_list(value: Value, key: &str, typical_fields: &[&str]) -> Vec<Value> {
    let value = match value {
        Value::Object(mut map) if map.contains_key(key) => map.remove(key).unwrap_or(Value::Null),
        other => other,
    };

    match value {
        Value::Array(items) => items,
        Value::Object(map) => {
            if typical_fields.iter().any(|f| map.contains_key(*f)) {
                vec![Value::Object(map)]
            } else {
                salvage_named_objects(map)
            }
        }
        other => {
            warn!("Unexpected {} data type: {}", key, json_type(&other));
            Vec::new()
        }
    }
}

fn salvage_named_objects(map: Map<String, Value>) -> Vec<Value> {
    map.into_iter()
        .map(|(_, v)| v)
        .filter(|v| v.as_object().map_or(false, |o| o.contains_key("name")))
        .collect()
}

/// Wrap a bare array of terms into the `{terms: [...]}` record shape.
pub fn normalize_terms(value: Value) -> Value {
    match value {
        Value::Array(items) => {
            let mut map = Map::new();
            map.insert("terms".to_string(), Value::Array(items));
            Value::Object(map)
        }
        other => other,
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
