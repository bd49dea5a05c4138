//! Locating and rewriting the secret-bearing element of a document.

use serde_json::{Map, Value, json};

/// Human-readable marker placed next to an injected shard.
pub const SHARD_DESCRIPTION: &str = "ENCRYPTED HOLOGRAPHIC SHARD - UNREADABLE ALONE";

/// What a replaced value is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Replacement {
    /// A `SHARD_V1:` share; the element is marked as a shard.
    Shard,
    /// The recovered secret; any shard marker is removed.
    Restored,
}

/// Finds an element by identifier and reads or rewrites its value.
pub trait DocumentLocator {
    /// Parsed document type.
    type Document: Clone;

    /// Value of the element identified by `id`, as text.
    fn find(&self, doc: &Self::Document, id: &str) -> Option<String>;

    /// Overwrite the value of the element identified by `id`.
    ///
    /// Returns `false` if no such element exists.
    fn replace(
        &self,
        doc: &mut Self::Document,
        id: &str,
        value: &str,
        mode: Replacement,
    ) -> bool;
}

/// Locator for JSON asset documents.
///
/// The target is the first object, depth-first in document order, whose
/// `idShort` equals the id and which has a `value` key.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonLocator;

fn is_target(map: &Map<String, Value>, id: &str) -> bool {
    map.get("idShort").and_then(Value::as_str) == Some(id) && map.contains_key("value")
}

fn find_element<'a>(node: &'a Value, id: &str) -> Option<&'a Map<String, Value>> {
    match node {
        Value::Object(map) if is_target(map, id) => Some(map),
        Value::Object(map) => map.values().find_map(|v| find_element(v, id)),
        Value::Array(items) => items.iter().find_map(|v| find_element(v, id)),
        _ => None,
    }
}

fn find_element_mut<'a>(node: &'a mut Value, id: &str) -> Option<&'a mut Map<String, Value>> {
    match node {
        Value::Object(map) => {
            if is_target(map, id) {
                return Some(map);
            }
            map.values_mut().find_map(|v| find_element_mut(v, id))
        }
        Value::Array(items) => items.iter_mut().find_map(|v| find_element_mut(v, id)),
        _ => None,
    }
}

/// Strings verbatim, anything else as compact JSON.
fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

impl DocumentLocator for JsonLocator {
    type Document = Value;

    fn find(&self, doc: &Value, id: &str) -> Option<String> {
        find_element(doc, id)
            .and_then(|element| element.get("value"))
            .map(value_text)
    }

    fn replace(&self, doc: &mut Value, id: &str, value: &str, mode: Replacement) -> bool {
        let Some(element) = find_element_mut(doc, id) else {
            return false;
        };
        element.insert("value".to_owned(), Value::String(value.to_owned()));
        match mode {
            Replacement::Shard => {
                element.insert(
                    "description".to_owned(),
                    json!([{ "language": "en", "text": SHARD_DESCRIPTION }]),
                );
            }
            Replacement::Restored => {
                element.shift_remove("description");
            }
        }
        true
    }
}
