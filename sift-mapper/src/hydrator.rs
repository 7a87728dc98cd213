//! Pluggable hydration strategies: document → entity.

use crate::error::{MapperError, MapperResult};
use crate::mapper::MappingContext;
use sift_model::{Document, Entity, FieldSource};
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

/// Populates an entity from an index document.
pub trait Hydrator: Send + Sync {
    fn hydrate(&self, document: &Document, context: &MappingContext) -> MapperResult<Entity>;
}

/// Supplies persisted domain objects at the storage boundary.
///
/// Implementations typically wrap the host's entity store; the mapper only
/// needs lookups by type and id plus full scans for batch indexing.
pub trait EntityRepository: Send + Sync {
    fn find(&self, entity_type: &str, id: &str) -> Option<Entity>;
    fn find_all(&self, entity_type: &str) -> Vec<Entity>;
}

/// Index-side hydration: writes document values straight into the entity
/// payload through each field's data path.
///
/// Uses the entity bound in the context (the concrete type resolved for
/// polymorphic documents) or creates a fresh shell for concrete metadata.
/// Accessor-backed fields are one-way projections and are skipped.
#[derive(Debug, Default)]
pub struct ValueHydrator;

impl Hydrator for ValueHydrator {
    fn hydrate(&self, document: &Document, context: &MappingContext) -> MapperResult<Entity> {
        let metadata = context.metadata();

        let mut entity = match context.entity() {
            Some(entity) => entity.clone(),
            None if metadata.is_abstract() => {
                return Err(MapperError::AbstractEntity(
                    metadata.class_name().to_string(),
                ));
            }
            None => Entity::new(metadata.class_name()),
        };

        if let Some(id) = document.id() {
            entity.id = scalar_to_string(id);
        }

        for field in metadata.fields().values() {
            let index_name = field.index_name()?;
            let Some(value) = document.get(&index_name) else {
                continue;
            };

            match &field.source {
                FieldSource::Data { path } => entity.set_pointer(path, value.clone()),
                FieldSource::Accessor => {}
            }
        }

        Ok(entity)
    }
}

/// Domain-side hydration: looks up the persisted entity and merges the
/// document's values onto it, so fields outside the index survive.
pub struct StoredEntityHydrator {
    repository: Arc<dyn EntityRepository>,
}

impl StoredEntityHydrator {
    pub fn new(repository: Arc<dyn EntityRepository>) -> Self {
        Self { repository }
    }
}

impl Hydrator for StoredEntityHydrator {
    fn hydrate(&self, document: &Document, context: &MappingContext) -> MapperResult<Entity> {
        let metadata = context.metadata();

        // The context entity carries the concrete type when the document was
        // polymorphic; fall back to the metadata's own type otherwise.
        let entity_type = context
            .entity()
            .map(|entity| entity.entity_type.clone())
            .unwrap_or_else(|| metadata.class_name().to_string());

        let id = document.id().map(scalar_to_string).unwrap_or_default();

        let stored = self.repository.find(&entity_type, &id).ok_or_else(|| {
            MapperError::EntityNotFound {
                entity_type: entity_type.clone(),
                id: id.clone(),
            }
        })?;

        debug!(entity_type = %entity_type, id = %id, "merging document into persisted entity");
        ValueHydrator.hydrate(document, &context.with_entity(stored))
    }
}

pub(crate) fn scalar_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    }
}
