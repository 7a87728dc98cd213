//! Declarative schema surface for mappable entity types.
//!
//! An [`EntityDeclaration`] is plain serde-compatible data, so schemas can be
//! built in code through the shorthand constructors or loaded from JSON
//! sidecar files. Accessor closures and synchronization predicates are bound
//! separately on the registry builder; declarations only name them.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Document-level declaration for one mappable entity type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityDeclaration {
    /// Fully-qualified (`::`-separated) type name the registry is keyed by.
    pub entity_type: String,

    /// Optional repository binding; empty means none.
    #[serde(default)]
    pub repository: String,

    /// Raw document-level boost. Null means unset; numeric strings are
    /// accepted, anything else is rejected when the boost is read.
    #[serde(default)]
    pub boost: Value,

    /// Name of the per-instance predicate deciding whether an entity is
    /// indexed at all. Must be bound on the registry builder.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sync_filter: Option<String>,

    /// Abstract types are never instantiated directly; hydration resolves a
    /// concrete type through the discriminator map.
    #[serde(default)]
    pub is_abstract: bool,

    /// Short type label → concrete type name. Only meaningful when
    /// `is_abstract` is set.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub discriminator_map: BTreeMap<String, String>,

    pub fields: Vec<FieldDeclaration>,
}

impl EntityDeclaration {
    pub fn new(entity_type: impl Into<String>) -> Self {
        Self {
            entity_type: entity_type.into(),
            repository: String::new(),
            boost: Value::Null,
            sync_filter: None,
            is_abstract: false,
            discriminator_map: BTreeMap::new(),
            fields: Vec::new(),
        }
    }

    pub fn field(mut self, field: FieldDeclaration) -> Self {
        self.fields.push(field);
        self
    }

    pub fn with_repository(mut self, repository: impl Into<String>) -> Self {
        self.repository = repository.into();
        self
    }

    pub fn with_boost(mut self, boost: impl Into<Value>) -> Self {
        self.boost = boost.into();
        self
    }

    pub fn with_sync_filter(mut self, name: impl Into<String>) -> Self {
        self.sync_filter = Some(name.into());
        self
    }

    /// Marks the type abstract with the given label → concrete-type map.
    pub fn abstract_over<L, C>(mut self, discriminators: impl IntoIterator<Item = (L, C)>) -> Self
    where
        L: Into<String>,
        C: Into<String>,
    {
        self.is_abstract = true;
        self.discriminator_map = discriminators
            .into_iter()
            .map(|(label, class)| (label.into(), class.into()))
            .collect();
        self
    }
}

/// Field-level declaration attachable to a data member or an accessor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldDeclaration {
    /// Source member name (logical, possibly camel-cased).
    pub name: String,

    /// Declared index type; validated against the supported set when the
    /// registry is built.
    pub field_type: String,

    /// JSON pointer into the entity payload. Defaults to `/<name>`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    /// Raw field-level boost; same semantics as the document-level boost.
    #[serde(default)]
    pub boost: Value,

    #[serde(default = "default_true")]
    pub dynamic: bool,

    #[serde(default)]
    pub multi_valued: bool,

    /// Marks the unique identifying field; exactly one per type.
    #[serde(default)]
    pub identifier: bool,

    /// Value comes from a closure bound on the registry builder instead of
    /// the entity payload.
    #[serde(default)]
    pub accessor: bool,
}

fn default_true() -> bool {
    true
}

impl FieldDeclaration {
    fn typed(name: impl Into<String>, field_type: &str) -> Self {
        Self {
            name: name.into(),
            field_type: field_type.to_string(),
            path: None,
            boost: Value::Null,
            dynamic: true,
            multi_valued: false,
            identifier: false,
            accessor: false,
        }
    }

    /// Shorthand for a string field.
    pub fn string(name: impl Into<String>) -> Self {
        Self::typed(name, "string")
    }

    /// Shorthand for a tokenized text field.
    pub fn text(name: impl Into<String>) -> Self {
        Self::typed(name, "text")
    }

    /// Shorthand for a date field.
    pub fn date(name: impl Into<String>) -> Self {
        Self::typed(name, "date")
    }

    /// Shorthand for a boolean field.
    pub fn boolean(name: impl Into<String>) -> Self {
        Self::typed(name, "boolean")
    }

    /// Shorthand for an integer field.
    pub fn integer(name: impl Into<String>) -> Self {
        Self::typed(name, "integer")
    }

    /// Shorthand for a long field.
    pub fn long(name: impl Into<String>) -> Self {
        Self::typed(name, "long")
    }

    /// Shorthand for a float field.
    pub fn float(name: impl Into<String>) -> Self {
        Self::typed(name, "float")
    }

    /// Shorthand for a double field.
    pub fn double(name: impl Into<String>) -> Self {
        Self::typed(name, "double")
    }

    /// Shorthand for a geographic location field.
    pub fn location(name: impl Into<String>) -> Self {
        Self::typed(name, "location")
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn with_boost(mut self, boost: impl Into<Value>) -> Self {
        self.boost = boost.into();
        self
    }

    /// Marks the field multi-valued (dynamic fields only).
    pub fn multi(mut self) -> Self {
        self.multi_valued = true;
        self
    }

    /// Declares a schema-fixed field: no type suffix on the index name.
    pub fn fixed(mut self) -> Self {
        self.dynamic = false;
        self
    }

    /// Marks the field as the unique identifier.
    pub fn identifying(mut self) -> Self {
        self.identifier = true;
        self
    }

    /// Sources the value from a registered accessor closure.
    pub fn via_accessor(mut self) -> Self {
        self.accessor = true;
        self
    }
}
