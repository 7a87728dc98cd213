//! The flat, index-side representation of an entity.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Reserved field carrying the document's type label, used to pick the
/// concrete type when hydrating from a polymorphic base type.
pub const DOCUMENT_NAME_FIELD: &str = "document_name_s";

/// Reserved field carrying the entity identifier.
pub const ID_FIELD: &str = "id";

/// A flat mapping from index field name to scalar or multi-valued field
/// value, plus per-field and document-level boosts.
///
/// The wire encoding the index service expects is owned by the search
/// client; this type only has to serialize cleanly.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Document {
    fields: BTreeMap<String, Value>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    field_boosts: BTreeMap<String, f64>,
    #[serde(default)]
    boost: f64,
}

impl Document {
    /// Creates a document labelled with the given type name.
    pub fn new(document_name: &str) -> Self {
        let mut document = Self::default();
        document.add_field(DOCUMENT_NAME_FIELD, Value::String(document_name.to_string()));
        document
    }

    pub fn add_field(&mut self, name: impl Into<String>, value: Value) {
        self.fields.insert(name.into(), value);
    }

    pub fn add_field_with_boost(&mut self, name: impl Into<String>, value: Value, boost: f64) {
        let name = name.into();
        self.field_boosts.insert(name.clone(), boost);
        self.fields.insert(name, value);
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    pub fn fields(&self) -> &BTreeMap<String, Value> {
        &self.fields
    }

    pub fn field_boost(&self, name: &str) -> Option<f64> {
        self.field_boosts.get(name).copied()
    }

    /// Document-level boost; 0 means none.
    pub fn boost(&self) -> f64 {
        self.boost
    }

    pub fn set_boost(&mut self, boost: f64) {
        self.boost = boost;
    }

    /// The type label written at construction, if any.
    pub fn document_name(&self) -> Option<&str> {
        self.get(DOCUMENT_NAME_FIELD).and_then(|v| v.as_str())
    }

    /// The identifier field value, if present.
    pub fn id(&self) -> Option<&Value> {
        self.get(ID_FIELD)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
