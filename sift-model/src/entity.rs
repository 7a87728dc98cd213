//! The generic domain object flowing through the mapping engine.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A generic entity handled by the Sift engine.
///
/// All domain data flows through this type. The `data` field holds arbitrary
/// JSON whose structure is described by the type's registered schema;
/// `entity_type` is the fully-qualified (`::`-separated) type name the schema
/// registry is keyed by.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    pub id: String,
    pub entity_type: String,
    pub data: Value,
    pub created_at: i64,
    pub modified_at: i64,
    pub created_by: String,
}

impl Entity {
    /// Creates an empty shell of the given type, as produced during
    /// polymorphic hydration before any values are written.
    pub fn new(entity_type: impl Into<String>) -> Self {
        Self {
            id: String::new(),
            entity_type: entity_type.into(),
            data: Value::Object(Map::new()),
            created_at: 0,
            modified_at: 0,
            created_by: String::new(),
        }
    }

    /// Extract a value from `data` using a JSON pointer (e.g., "/title").
    pub fn get(&self, pointer: &str) -> Option<&Value> {
        self.data.pointer(pointer)
    }

    /// Extract a string value from `data` using a JSON pointer.
    pub fn get_str(&self, pointer: &str) -> Option<&str> {
        self.data.pointer(pointer).and_then(|v| v.as_str())
    }

    /// Extract a boolean value from `data` using a JSON pointer.
    pub fn get_bool(&self, pointer: &str) -> Option<bool> {
        self.data.pointer(pointer).and_then(|v| v.as_bool())
    }

    /// Extract a numeric value from `data` using a JSON pointer.
    pub fn get_number(&self, pointer: &str) -> Option<f64> {
        self.data.pointer(pointer).and_then(|v| v.as_f64())
    }

    /// Writes `value` into `data` at a JSON pointer, creating intermediate
    /// objects as needed. Non-object nodes along the path are replaced;
    /// segments are always treated as object keys, never array indices.
    pub fn set_pointer(&mut self, pointer: &str, value: Value) {
        if pointer.is_empty() {
            self.data = value;
            return;
        }

        let segments: Vec<String> = pointer
            .split('/')
            .skip(1)
            .map(|s| s.replace("~1", "/").replace("~0", "~"))
            .collect();
        let Some((last, parents)) = segments.split_last() else {
            return;
        };

        let mut node = &mut self.data;
        for segment in parents {
            node = ensure_object(node)
                .entry(segment.clone())
                .or_insert(Value::Null);
        }

        ensure_object(node).insert(last.clone(), value);
    }
}

fn ensure_object(node: &mut Value) -> &mut Map<String, Value> {
    if !node.is_object() {
        *node = Value::Object(Map::new());
    }
    match node {
        Value::Object(map) => map,
        _ => unreachable!(),
    }
}
