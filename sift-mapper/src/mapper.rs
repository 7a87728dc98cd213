//! Bidirectional transformation between entities and index documents.

use crate::command::DocumentCommand;
use crate::error::{MapperError, MapperResult};
use crate::factory::MetadataFactory;
use crate::hydrator::Hydrator;
use crate::metadata::EntityMetadata;
use crate::reader::EntityTarget;
use sift_model::{Document, Entity};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

/// Which terminal representation `to_entity` produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HydrationMode {
    /// Stop after index-side hydration: the result mirrors the document.
    Index,
    /// Feed the index-side result into the domain hydrator and return the
    /// reconstructed domain object.
    #[default]
    Domain,
}

/// Per-operation state for one hydration run.
///
/// Carries the resolved entity so shared [`EntityMetadata`] stays immutable
/// while concurrent operations hydrate different instances of the same type.
pub struct MappingContext {
    metadata: Arc<EntityMetadata>,
    entity: Option<Entity>,
}

impl MappingContext {
    pub fn new(metadata: Arc<EntityMetadata>) -> Self {
        Self {
            metadata,
            entity: None,
        }
    }

    pub fn metadata(&self) -> &EntityMetadata {
        &self.metadata
    }

    pub fn entity(&self) -> Option<&Entity> {
        self.entity.as_ref()
    }

    pub fn bind_entity(&mut self, entity: Entity) {
        self.entity = Some(entity);
    }

    /// A sibling context over the same metadata with a different entity
    /// bound; used when a hydrator swaps in the persisted instance.
    pub fn with_entity(&self, entity: Entity) -> MappingContext {
        MappingContext {
            metadata: Arc::clone(&self.metadata),
            entity: Some(entity),
        }
    }
}

/// Orchestrates entity → document and document → entity transformations.
pub struct EntityMapper {
    mapping_command: Option<Box<dyn DocumentCommand>>,
    index_hydrator: Box<dyn Hydrator>,
    domain_hydrator: Box<dyn Hydrator>,
    hydration_mode: HydrationMode,
    factory: MetadataFactory,
    metadata_cache: HashMap<String, Arc<EntityMetadata>>,
}

impl EntityMapper {
    pub fn new(
        factory: MetadataFactory,
        index_hydrator: Box<dyn Hydrator>,
        domain_hydrator: Box<dyn Hydrator>,
    ) -> Self {
        Self {
            mapping_command: None,
            index_hydrator,
            domain_hydrator,
            hydration_mode: HydrationMode::default(),
            factory,
            metadata_cache: HashMap::new(),
        }
    }

    /// Convenience constructor wiring [`crate::ValueHydrator`] on both sides.
    pub fn with_default_hydrators(factory: MetadataFactory) -> Self {
        Self::new(
            factory,
            Box::new(crate::hydrator::ValueHydrator),
            Box::new(crate::hydrator::ValueHydrator),
        )
    }

    pub fn factory(&self) -> &MetadataFactory {
        &self.factory
    }

    /// Binds the pluggable document-construction strategy.
    pub fn set_mapping_command(&mut self, command: Box<dyn DocumentCommand>) {
        self.mapping_command = Some(command);
    }

    pub fn has_mapping_command(&self) -> bool {
        self.mapping_command.is_some()
    }

    pub fn set_hydration_mode(&mut self, mode: HydrationMode) {
        self.hydration_mode = mode;
    }

    pub fn hydration_mode(&self) -> HydrationMode {
        self.hydration_mode
    }

    /// Builds the index document for already-loaded metadata.
    ///
    /// Returns `Ok(None)` when no mapping command is bound.
    pub fn to_document(&self, metadata: &EntityMetadata) -> MapperResult<Option<Document>> {
        match &self.mapping_command {
            Some(command) => command.create_document(metadata).map(Some),
            None => Ok(None),
        }
    }

    /// Hydrates a document back into an entity of the given target type.
    ///
    /// Metadata is cached per mapper instance, keyed by the target reference.
    /// For abstract targets the document's type label picks the concrete type
    /// from the discriminator map before hydration runs.
    pub fn to_entity(&mut self, document: &Document, target: Option<&str>) -> MapperResult<Entity> {
        let target = match target {
            Some(name) if !name.is_empty() => name,
            _ => return Err(MapperError::MissingTargetType),
        };

        let metadata = self.metadata_for(target)?;

        let mut context = MappingContext::new(Arc::clone(&metadata));
        if metadata.is_abstract() {
            match resolve_concrete_type(&metadata, document) {
                Some(concrete) => {
                    debug!(entity_type = %concrete, "discriminator resolved concrete type");
                    context.bind_entity(Entity::new(concrete));
                }
                None => warn!(
                    entity_type = %metadata.class_name(),
                    label = document.document_name().unwrap_or(""),
                    "no discriminator entry matches document type label"
                ),
            }
        }

        // Index-side hydration always runs first.
        let projected = self.index_hydrator.hydrate(document, &context)?;
        if self.hydration_mode == HydrationMode::Index {
            return Ok(projected);
        }

        context.bind_entity(projected);
        self.domain_hydrator.hydrate(document, &context)
    }

    fn metadata_for(&mut self, target: &str) -> MapperResult<Arc<EntityMetadata>> {
        if let Some(metadata) = self.metadata_cache.get(target) {
            return Ok(Arc::clone(metadata));
        }

        let metadata = self
            .factory
            .load_information(EntityTarget::Type(target))?
            .ok_or_else(|| MapperError::NotMapped(target.to_string()))?;

        let metadata = Arc::new(metadata);
        self.metadata_cache
            .insert(target.to_string(), Arc::clone(&metadata));
        Ok(metadata)
    }
}

/// Matches the document's type label against the discriminator map.
///
/// A qualified mapped name is compared by its lowercase unqualified suffix
/// and used verbatim on a match; an unqualified name is compared lowercased
/// and qualified with the abstract type's own namespace prefix.
fn resolve_concrete_type(metadata: &EntityMetadata, document: &Document) -> Option<String> {
    let label = document.document_name()?;

    for mapped in metadata.discriminator_map().values() {
        let (candidate, concrete) = match mapped.rsplit_once("::") {
            Some((_, unqualified)) => (unqualified.to_lowercase(), mapped.clone()),
            None => (
                mapped.to_lowercase(),
                format!("{}{}", namespace_prefix(metadata.class_name()), mapped),
            ),
        };

        if candidate == label {
            return Some(concrete);
        }
    }

    None
}

/// `"app::shapes::Shape"` → `"app::shapes::"`; empty for unqualified names.
fn namespace_prefix(class_name: &str) -> &str {
    match class_name.rfind("::") {
        Some(idx) => &class_name[..idx + 2],
        None => "",
    }
}
