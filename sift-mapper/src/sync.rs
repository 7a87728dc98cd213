//! Batch index synchronization boundary.
//!
//! The host's indexing tool drives this: it loads entities through the
//! repository boundary, maps each one, and submits the documents to the
//! index client. Per-item failures are swallowed and tallied so one bad
//! document never aborts a full run.

use crate::error::{MapperError, MapperResult};
use crate::hydrator::EntityRepository;
use crate::mapper::EntityMapper;
use crate::reader::EntityTarget;
use sift_model::{Document, Entity};
use std::sync::Arc;
use tracing::{info, warn};

/// Accepts mapped documents for indexing. The wire protocol behind this is
/// owned by the search client.
pub trait IndexClient: Send {
    /// Return `Err(message)` to reject the document.
    fn add_document(&mut self, document: &Document) -> Result<(), String>;
}

/// One swallowed per-item failure.
#[derive(Debug, Clone)]
pub struct SyncFailure {
    pub entity_id: String,
    pub message: String,
}

/// Outcome tally of a synchronization run.
#[derive(Debug, Default)]
pub struct SyncReport {
    pub succeeded: usize,
    /// Entities the synchronization filter declined to index.
    pub skipped: usize,
    pub errors: Vec<SyncFailure>,
}

impl SyncReport {
    pub fn errored(&self) -> usize {
        self.errors.len()
    }

    pub fn overall(&self) -> usize {
        self.succeeded + self.skipped + self.errors.len()
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// Maps every persisted entity of a type and submits it to the index.
pub struct IndexSynchronizer {
    mapper: EntityMapper,
    repository: Arc<dyn EntityRepository>,
}

impl IndexSynchronizer {
    pub fn new(mapper: EntityMapper, repository: Arc<dyn EntityRepository>) -> Self {
        Self { mapper, repository }
    }

    pub fn mapper(&self) -> &EntityMapper {
        &self.mapper
    }

    pub fn mapper_mut(&mut self) -> &mut EntityMapper {
        &mut self.mapper
    }

    /// Indexes every entity of `entity_type` (a registered name or alias).
    ///
    /// Fails fast on configuration problems (unmapped type, no mapping
    /// command); individual mapping or client failures are tallied into the
    /// report and the run continues.
    pub fn synchronize(
        &mut self,
        entity_type: &str,
        client: &mut dyn IndexClient,
    ) -> MapperResult<SyncReport> {
        if !self.mapper.has_mapping_command() {
            return Err(MapperError::NoMappingCommand);
        }

        let metadata = self
            .mapper
            .factory()
            .load_information(EntityTarget::Type(entity_type))?
            .ok_or_else(|| MapperError::NotMapped(entity_type.to_string()))?;
        let class_name = metadata.class_name().to_string();

        let predicate = self
            .mapper
            .factory()
            .reader()
            .registry()
            .sync_predicate(&class_name);

        let entities = self.repository.find_all(&class_name);
        let mut report = SyncReport::default();

        for entity in &entities {
            if let Some(predicate) = &predicate {
                if !predicate.as_ref()(entity) {
                    report.skipped += 1;
                    continue;
                }
            }

            match self.index_one(entity, client) {
                Ok(()) => report.succeeded += 1,
                Err(error) => {
                    warn!(entity_id = %entity.id, error = %error, "entity not synchronized");
                    report.errors.push(SyncFailure {
                        entity_id: entity.id.clone(),
                        message: error.to_string(),
                    });
                }
            }
        }

        info!(
            entity_type = %class_name,
            succeeded = report.succeeded,
            skipped = report.skipped,
            errored = report.errored(),
            "synchronization finished"
        );
        Ok(report)
    }

    fn index_one(&self, entity: &Entity, client: &mut dyn IndexClient) -> MapperResult<()> {
        let metadata = self
            .mapper
            .factory()
            .load_information(EntityTarget::Instance(entity))?
            .ok_or_else(|| MapperError::NotMapped(entity.entity_type.clone()))?;

        let document = self
            .mapper
            .to_document(&metadata)?
            .ok_or(MapperError::NoMappingCommand)?;

        client.add_document(&document).map_err(MapperError::Client)
    }
}
