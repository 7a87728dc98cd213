//! One mapped field: its index type, naming, and boost semantics.

use crate::error::SchemaError;
use crate::naming::normalize_field_name;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The index-side type of a mapped field.
///
/// Dynamic fields carry the corresponding type alias as a name suffix so the
/// index can type them without a per-field schema entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    String,
    Text,
    Date,
    Boolean,
    Integer,
    Long,
    Float,
    Double,
    Location,
}

impl FieldKind {
    /// Every supported kind, in declaration order.
    pub const ALL: [FieldKind; 9] = [
        FieldKind::String,
        FieldKind::Text,
        FieldKind::Date,
        FieldKind::Boolean,
        FieldKind::Integer,
        FieldKind::Long,
        FieldKind::Float,
        FieldKind::Double,
        FieldKind::Location,
    ];

    /// Canonical lowercase name used in declarations.
    pub fn as_str(self) -> &'static str {
        match self {
            FieldKind::String => "string",
            FieldKind::Text => "text",
            FieldKind::Date => "date",
            FieldKind::Boolean => "boolean",
            FieldKind::Integer => "integer",
            FieldKind::Long => "long",
            FieldKind::Float => "float",
            FieldKind::Double => "double",
            FieldKind::Location => "location",
        }
    }

    /// Dynamic-field type alias appended to the normalized field name.
    pub fn suffix(self) -> &'static str {
        match self {
            FieldKind::String => "s",
            FieldKind::Text => "t",
            FieldKind::Date => "dt",
            FieldKind::Boolean => "b",
            FieldKind::Integer => "i",
            FieldKind::Long => "l",
            FieldKind::Float => "f",
            FieldKind::Double => "d",
            FieldKind::Location => "co",
        }
    }

    /// Parses a declared type name, rejecting anything outside the supported set.
    pub fn parse(name: &str) -> Result<FieldKind, SchemaError> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == name)
            .ok_or_else(|| SchemaError::UnknownFieldType {
                given: name.to_string(),
                supported: Self::ALL
                    .into_iter()
                    .map(FieldKind::as_str)
                    .collect::<Vec<_>>()
                    .join(", "),
            })
    }
}

/// Where a field's value comes from when reading a live entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldSource {
    /// A JSON pointer into the entity's data payload.
    Data { path: String },
    /// A closure bound on the schema registry at build time.
    Accessor,
}

/// One mapped field of an entity type.
///
/// `value` is populated only when descriptors are read from a live entity;
/// class-level reads share descriptors with `value` unset.
#[derive(Debug, Clone)]
pub struct FieldDescriptor {
    /// Source member name (logical, possibly camel-cased).
    pub name: String,
    pub kind: FieldKind,
    /// Raw declared boost. `Null` means unset.
    pub boost: Value,
    /// Dynamic fields get a type suffix on their index name.
    pub dynamic: bool,
    pub multi_valued: bool,
    pub source: FieldSource,
    pub value: Option<Value>,
}

impl FieldDescriptor {
    /// Creates a dynamic, single-valued descriptor reading `/<name>` from the
    /// entity payload.
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        let name = name.into();
        let path = format!("/{name}");
        Self {
            name,
            kind,
            boost: Value::Null,
            dynamic: true,
            multi_valued: false,
            source: FieldSource::Data { path },
            value: None,
        }
    }

    /// The index-side field name: normalized member name plus, for dynamic
    /// fields, `_<type alias>` and a trailing `m` when multi-valued.
    ///
    /// Non-dynamic fields keep the bare normalized name and must not be
    /// multi-valued (that combination belongs in the index schema itself).
    pub fn index_name(&self) -> Result<String, SchemaError> {
        let mut name = normalize_field_name(&self.name);

        if self.dynamic {
            name.push('_');
            name.push_str(self.kind.suffix());
            if self.multi_valued {
                name.push('m');
            }
        } else if self.multi_valued {
            return Err(SchemaError::MultiValuedRequiresDynamic {
                field: self.name.clone(),
            });
        }

        Ok(name)
    }

    /// Effective boost: `None` for unset or non-positive values, the numeric
    /// value otherwise. Non-numeric declarations are rejected.
    pub fn boost_value(&self) -> Result<Option<f64>, SchemaError> {
        boost_from_value(&self.boost)
    }

    /// JSON pointer for data-backed fields, `None` for accessor-backed ones.
    pub fn data_path(&self) -> Option<&str> {
        match &self.source {
            FieldSource::Data { path } => Some(path),
            FieldSource::Accessor => None,
        }
    }
}

/// Interprets a raw declared boost value.
///
/// Accepts JSON numbers and numeric strings; `Null` counts as unset. Values
/// at or below zero mean "do not apply a boost" and come back as `None`.
pub fn boost_from_value(raw: &Value) -> Result<Option<f64>, SchemaError> {
    let boost = match raw {
        Value::Null => return Ok(None),
        Value::Number(n) => n.as_f64().ok_or_else(|| SchemaError::InvalidBoost {
            value: n.to_string(),
        })?,
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| SchemaError::InvalidBoost { value: s.clone() })?,
        other => {
            return Err(SchemaError::InvalidBoost {
                value: other.to_string(),
            });
        }
    };

    if boost > 0.0 {
        Ok(Some(boost))
    } else {
        Ok(None)
    }
}
