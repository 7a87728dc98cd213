//! Resolves class references into consolidated [`EntityMetadata`].

use crate::error::{MapperError, MapperResult};
use crate::metadata::EntityMetadata;
use crate::reader::{EntityTarget, MetadataReader};
use std::collections::HashMap;
use tracing::debug;

/// Maps short type aliases to fully-qualified type names.
///
/// Consulted only when a string target is neither a live instance nor an
/// already-registered type name.
pub trait ClassnameResolver: Send + Sync {
    fn resolve_full_qualified_classname(&self, alias: &str) -> Option<String>;
}

/// Builds [`EntityMetadata`] from a type name, alias, or live entity.
///
/// The factory performs no caching of its own; callers that map repeatedly
/// (the entity mapper) cache the produced metadata per type.
pub struct MetadataFactory {
    reader: MetadataReader,
    resolver: Option<Box<dyn ClassnameResolver>>,
}

impl MetadataFactory {
    pub fn new(reader: MetadataReader) -> Self {
        Self {
            reader,
            resolver: None,
        }
    }

    pub fn with_resolver(reader: MetadataReader, resolver: Box<dyn ClassnameResolver>) -> Self {
        Self {
            reader,
            resolver: Some(resolver),
        }
    }

    pub fn set_classname_resolver(&mut self, resolver: Box<dyn ClassnameResolver>) {
        self.resolver = Some(resolver);
    }

    pub fn reader(&self) -> &MetadataReader {
        &self.reader
    }

    /// Loads consolidated metadata for a class reference.
    ///
    /// Returns `Ok(None)` when the resolved type carries no document
    /// declaration — "not indexable" is not an error. Instance targets bind
    /// the entity and populate descriptor values.
    pub fn load_information(
        &self,
        target: EntityTarget<'_>,
    ) -> MapperResult<Option<EntityMetadata>> {
        let class_name = self.resolve_class(&target)?;

        if !self.reader.has_document_declaration(&class_name) {
            debug!(entity_type = %class_name, "no document declaration, skipping");
            return Ok(None);
        }

        // Re-target by resolved name so alias targets read the right schema.
        let read_target = match target.instance() {
            Some(entity) => EntityTarget::Instance(entity),
            None => EntityTarget::Type(&class_name),
        };

        let fields = self
            .reader
            .get_fields(read_target)?
            .iter()
            .cloned()
            .map(|descriptor| (descriptor.name.clone(), descriptor))
            .collect::<HashMap<_, _>>();

        let is_abstract = self.reader.is_abstract(read_target);
        let synchronization_callback = if is_abstract {
            // Abstract types are never instantiated for synchronization.
            None
        } else {
            self.reader.get_synchronization_callback(read_target)
        };
        let discriminator_map = if is_abstract {
            self.reader.get_discriminator_map(read_target)
        } else {
            Default::default()
        };

        let metadata = EntityMetadata::new(
            class_name.clone(),
            document_name(&class_name),
            self.reader.get_identifier(read_target)?,
            fields,
            self.reader.get_field_mapping(read_target)?.as_ref().clone(),
            self.reader.get_repository(read_target),
            self.reader.get_entity_boost(read_target)?,
            synchronization_callback,
            is_abstract,
            discriminator_map,
            target.instance().cloned(),
        );

        debug!(entity_type = %class_name, document = %metadata.document_name(), "metadata loaded");
        Ok(Some(metadata))
    }

    fn resolve_class(&self, target: &EntityTarget<'_>) -> MapperResult<String> {
        let name = target.type_name();
        if name.is_empty() {
            return Err(MapperError::MissingTargetType);
        }

        // A live instance carries its runtime type; a registered name already
        // "loads". Only bare aliases go through the resolver.
        if target.instance().is_some() || self.reader.has_document_declaration(name) {
            return Ok(name.to_string());
        }

        let resolver = self
            .resolver
            .as_ref()
            .ok_or_else(|| MapperError::NoResolver(name.to_string()))?;

        resolver
            .resolve_full_qualified_classname(name)
            .ok_or_else(|| MapperError::UnknownAlias(name.to_string()))
    }
}

/// Lowercase unqualified type name: `"app::notes::Note"` → `"note"`.
fn document_name(class_name: &str) -> String {
    class_name
        .rsplit("::")
        .next()
        .unwrap_or(class_name)
        .to_lowercase()
}
