//! JSON Schema → OpenAPI 3.0 Schema Object dialect conversion.
//!
//! The two vocabularies are nearly identical. This transform handles the
//! differences that matter for the generated bundles:
//!
//! 1. `$schema` / `$id` are dropped; they have no meaning inside a component.
//! 2. Numeric `exclusiveMinimum` / `exclusiveMaximum` (draft 2020-12) become
//!    `minimum` / `maximum` plus a boolean `exclusive*: true` (OpenAPI 3.0).
//! 3. The rewrite is applied to `properties` values, object-form `items`, and
//!    object-form `additionalProperties`.
//!
//! `convert` is pure and total: it never fails and never mutates its input.
//! Array-form `items` and boolean `additionalProperties` are left alone.

use serde_json::{Map, Value};

/// Keywords that only make sense at the root of a standalone JSON Schema.
const DOCUMENT_ONLY_KEYWORDS: &[&str] = &["$schema", "$id"];

/// (exclusive keyword, inclusive keyword) pairs.
const EXCLUSIVE_BOUNDS: &[(&str, &str)] = &[
    ("exclusiveMinimum", "minimum"),
    ("exclusiveMaximum", "maximum"),
];

/// Convert a JSON Schema definition into its OpenAPI Schema Object form.
///
/// Non-object values are returned unchanged. Converting an already converted
/// definition is a no-op.
///
/// # Example
/// ```
/// use schema_merge_core::convert;
/// use serde_json::json;
///
/// let out = convert(&json!({"type": "integer", "exclusiveMinimum": 5}));
/// assert_eq!(out, json!({"type": "integer", "minimum": 5, "exclusiveMinimum": true}));
/// ```
pub fn convert(schema: &Value) -> Value {
    let Some(obj) = schema.as_object() else {
        return schema.clone();
    };

    let mut out = rewrite_keywords(obj);

    if let Some(Value::Object(props)) = out.get("properties") {
        let converted: Map<String, Value> = props
            .iter()
            .map(|(name, prop)| (name.clone(), convert(prop)))
            .collect();
        out.insert("properties".to_string(), Value::Object(converted));
    }

    for key in ["items", "additionalProperties"] {
        if let Some(child) = out.get(key).filter(|v| v.is_object()) {
            let converted = convert(child);
            out.insert(key.to_string(), converted);
        }
    }

    Value::Object(out)
}

/// Copy one level of a schema, dropping document-only keywords and rewriting
/// numeric exclusive bounds.
///
/// Bounds are rewritten one pair at a time: the numeric exclusive key is
/// removed, the inclusive key takes its value (keeping its position when it
/// already exists, appended otherwise) and the exclusive key is re-appended
/// as `true`.
fn rewrite_keywords(obj: &Map<String, Value>) -> Map<String, Value> {
    let mut out: Map<String, Value> = obj
        .iter()
        .filter(|(key, _)| !DOCUMENT_ONLY_KEYWORDS.contains(&key.as_str()))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();

    for (exclusive, inclusive) in EXCLUSIVE_BOUNDS {
        if !out.get(*exclusive).is_some_and(Value::is_number) {
            continue;
        }
        if let Some(bound) = out.shift_remove(*exclusive) {
            out.insert((*inclusive).to_string(), bound);
            out.insert((*exclusive).to_string(), Value::Bool(true));
        }
    }

    out
}
