//! Metadata discovery over the compiled schema registry.
//!
//! The reader answers the same questions for a bare type name and for a live
//! entity. Type-level reads return the descriptors compiled at registry build
//! time (shared, values unset); instance-level reads produce fresh
//! descriptors with `value` populated from the entity payload or the bound
//! accessor closures.

use crate::error::{MapperError, MapperResult};
use crate::registry::{CompiledSchema, SchemaRegistry};
use sift_model::{Entity, FieldDescriptor, FieldSource, boost_from_value};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;

/// A class-or-instance reference: the reader and factory accept either.
#[derive(Clone, Copy)]
pub enum EntityTarget<'a> {
    /// A fully-qualified type name.
    Type(&'a str),
    /// A live entity; reads populate descriptor values from it.
    Instance(&'a Entity),
}

impl<'a> EntityTarget<'a> {
    pub fn type_name(&self) -> &'a str {
        match self {
            EntityTarget::Type(name) => name,
            EntityTarget::Instance(entity) => &entity.entity_type,
        }
    }

    pub fn instance(&self) -> Option<&'a Entity> {
        match self {
            EntityTarget::Type(_) => None,
            EntityTarget::Instance(entity) => Some(entity),
        }
    }
}

impl<'a> From<&'a Entity> for EntityTarget<'a> {
    fn from(entity: &'a Entity) -> Self {
        EntityTarget::Instance(entity)
    }
}

impl<'a> From<&'a str> for EntityTarget<'a> {
    fn from(name: &'a str) -> Self {
        EntityTarget::Type(name)
    }
}

/// Reads per-type metadata out of the registry.
pub struct MetadataReader {
    registry: Arc<SchemaRegistry>,
}

impl MetadataReader {
    pub fn new(registry: Arc<SchemaRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &Arc<SchemaRegistry> {
        &self.registry
    }

    /// Whether the type carries a document-level declaration at all.
    /// Anything unregistered is simply not indexable.
    pub fn has_document_declaration(&self, entity_type: &str) -> bool {
        self.registry.contains(entity_type)
    }

    /// Field descriptors in declaration order (identifier excluded).
    ///
    /// For a type target the shared compiled descriptors are returned as-is;
    /// repeated calls yield the same allocation. An unregistered type has no
    /// declared fields and yields an empty set.
    pub fn get_fields(&self, target: EntityTarget<'_>) -> MapperResult<Arc<Vec<FieldDescriptor>>> {
        let Some(schema) = self.registry.schema(target.type_name()) else {
            return Ok(Arc::new(Vec::new()));
        };

        match target.instance() {
            None => Ok(Arc::clone(&schema.fields)),
            Some(entity) => {
                let fields = schema
                    .fields
                    .iter()
                    .map(|descriptor| populate(descriptor, schema, entity))
                    .collect();
                Ok(Arc::new(fields))
            }
        }
    }

    /// The unique identifying field. Instance reads carry the entity's id as
    /// the descriptor value.
    pub fn get_identifier(&self, target: EntityTarget<'_>) -> MapperResult<FieldDescriptor> {
        let schema = self.schema_or_missing_identifier(target.type_name())?;

        let mut identifier = schema.identifier.clone();
        if let Some(entity) = target.instance() {
            identifier.value = Some(Value::String(entity.id.clone()));
        }
        Ok(identifier)
    }

    /// Document-level boost; 0 when no declaration exists or the boost is
    /// unset or non-positive.
    pub fn get_entity_boost(&self, target: EntityTarget<'_>) -> MapperResult<f64> {
        let Some(schema) = self.registry.schema(target.type_name()) else {
            return Ok(0.0);
        };

        boost_from_value(&schema.declaration.boost)
            .map(|boost| boost.unwrap_or(0.0))
            .map_err(|source| MapperError::EntityBoost {
                entity_type: target.type_name().to_string(),
                source,
            })
    }

    /// Bound repository reference; empty when undeclared.
    pub fn get_repository(&self, target: EntityTarget<'_>) -> String {
        self.registry
            .schema(target.type_name())
            .map(|schema| schema.declaration.repository.clone())
            .unwrap_or_default()
    }

    /// Index-side field name → source member name, including the reserved
    /// `"id"` entry for the identifier.
    pub fn get_field_mapping(
        &self,
        target: EntityTarget<'_>,
    ) -> MapperResult<Arc<BTreeMap<String, String>>> {
        let schema = self.schema_or_missing_identifier(target.type_name())?;
        Ok(Arc::clone(&schema.field_mapping))
    }

    /// Name of the declared synchronization filter, if any.
    pub fn get_synchronization_callback(&self, target: EntityTarget<'_>) -> Option<String> {
        self.registry
            .schema(target.type_name())
            .and_then(|schema| schema.declaration.sync_filter.clone())
    }

    /// Label → concrete type name map for abstract types; empty otherwise.
    pub fn get_discriminator_map(&self, target: EntityTarget<'_>) -> BTreeMap<String, String> {
        self.registry
            .schema(target.type_name())
            .map(|schema| schema.declaration.discriminator_map.clone())
            .unwrap_or_default()
    }

    /// Whether the declared type is abstract.
    pub fn is_abstract(&self, target: EntityTarget<'_>) -> bool {
        self.registry
            .schema(target.type_name())
            .map(|schema| schema.declaration.is_abstract)
            .unwrap_or(false)
    }

    fn schema_or_missing_identifier(
        &self,
        entity_type: &str,
    ) -> MapperResult<&Arc<CompiledSchema>> {
        self.registry
            .schema(entity_type)
            .ok_or_else(|| MapperError::MissingIdentifier(entity_type.to_string()))
    }
}

fn populate(
    descriptor: &FieldDescriptor,
    schema: &CompiledSchema,
    entity: &Entity,
) -> FieldDescriptor {
    let mut populated = descriptor.clone();
    populated.value = match &descriptor.source {
        FieldSource::Data { path } => entity.get(path).cloned(),
        // Bound at registry build time; a missing entry cannot reach here.
        FieldSource::Accessor => schema
            .accessors
            .get(&descriptor.name)
            .and_then(|accessor| accessor.as_ref()(entity)),
    };
    populated
}
