//! Consolidated per-type metadata produced by the factory.

use sift_model::{Entity, FieldDescriptor};
use std::collections::{BTreeMap, HashMap};

/// Everything the mapper needs to know about one entity type.
///
/// Structurally immutable once built: instances may be cached and shared
/// between mapping operations. The entity slot is bound only when metadata
/// was loaded from a live instance; per-operation state (the concrete entity
/// resolved during polymorphic hydration) lives in the mapping context, never
/// here.
#[derive(Debug)]
pub struct EntityMetadata {
    class_name: String,
    document_name: String,
    identifier: FieldDescriptor,
    fields: HashMap<String, FieldDescriptor>,
    field_mapping: BTreeMap<String, String>,
    repository: String,
    boost: f64,
    synchronization_callback: Option<String>,
    is_abstract: bool,
    discriminator_map: BTreeMap<String, String>,
    entity: Option<Entity>,
}

impl EntityMetadata {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        class_name: String,
        document_name: String,
        identifier: FieldDescriptor,
        fields: HashMap<String, FieldDescriptor>,
        field_mapping: BTreeMap<String, String>,
        repository: String,
        boost: f64,
        synchronization_callback: Option<String>,
        is_abstract: bool,
        discriminator_map: BTreeMap<String, String>,
        entity: Option<Entity>,
    ) -> Self {
        Self {
            class_name,
            document_name,
            identifier,
            fields,
            field_mapping,
            repository,
            boost,
            synchronization_callback,
            is_abstract,
            discriminator_map,
            entity,
        }
    }

    /// Fully-qualified type name.
    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    /// Lowercase unqualified type name; the cross-type label used for
    /// polymorphic matching.
    pub fn document_name(&self) -> &str {
        &self.document_name
    }

    pub fn identifier(&self) -> &FieldDescriptor {
        &self.identifier
    }

    /// Source member name → descriptor.
    pub fn fields(&self) -> &HashMap<String, FieldDescriptor> {
        &self.fields
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.get(name)
    }

    /// Index-side field name → source member name, including `"id"`.
    pub fn field_mapping(&self) -> &BTreeMap<String, String> {
        &self.field_mapping
    }

    pub fn repository(&self) -> &str {
        &self.repository
    }

    /// Document-level boost; 0 means none.
    pub fn boost(&self) -> f64 {
        self.boost
    }

    pub fn synchronization_callback(&self) -> Option<&str> {
        self.synchronization_callback.as_deref()
    }

    pub fn has_synchronization_filter(&self) -> bool {
        self.synchronization_callback.is_some()
    }

    pub fn is_abstract(&self) -> bool {
        self.is_abstract
    }

    pub fn discriminator_map(&self) -> &BTreeMap<String, String> {
        &self.discriminator_map
    }

    /// The live entity this metadata was loaded from, if any.
    pub fn entity(&self) -> Option<&Entity> {
        self.entity.as_ref()
    }

    /// The bound entity's id, or empty when metadata is class-only.
    pub fn entity_id(&self) -> String {
        self.entity
            .as_ref()
            .map(|entity| entity.id.clone())
            .unwrap_or_default()
    }
}
