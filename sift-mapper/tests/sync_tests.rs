use serde_json::json;
use sift_mapper::{
    EntityDeclaration, EntityMapper, EntityRepository, FieldDeclaration, IndexClient,
    IndexSynchronizer, MapAllFieldsCommand, MapperError, MetadataFactory, MetadataReader,
    SchemaRegistry,
};
use sift_model::{Document, Entity};
use std::sync::Arc;

fn registry() -> Arc<SchemaRegistry> {
    let note = EntityDeclaration::new("app::notes::Note")
        .with_sync_filter("should_index")
        .field(FieldDeclaration::string("id").identifying())
        .field(FieldDeclaration::string("title"))
        .field(FieldDeclaration::date("publishDate"));

    Arc::new(
        SchemaRegistry::builder()
            .declare(note)
            .sync_predicate("app::notes::Note", "should_index", |entity| {
                entity.get_bool("/draft") != Some(true)
            })
            .build()
            .unwrap(),
    )
}

fn note(id: &str, data: serde_json::Value) -> Entity {
    Entity {
        id: id.to_string(),
        entity_type: "app::notes::Note".to_string(),
        data,
        created_at: 1,
        modified_at: 1,
        created_by: "peer-a".to_string(),
    }
}

struct MemoryRepository {
    entities: Vec<Entity>,
}

impl EntityRepository for MemoryRepository {
    fn find(&self, entity_type: &str, id: &str) -> Option<Entity> {
        self.entities
            .iter()
            .find(|e| e.entity_type == entity_type && e.id == id)
            .cloned()
    }

    fn find_all(&self, entity_type: &str) -> Vec<Entity> {
        self.entities
            .iter()
            .filter(|e| e.entity_type == entity_type)
            .cloned()
            .collect()
    }
}

#[derive(Default)]
struct RecordingClient {
    documents: Vec<Document>,
    reject_ids: Vec<String>,
}

impl IndexClient for RecordingClient {
    fn add_document(&mut self, document: &Document) -> Result<(), String> {
        let id = document
            .id()
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_string();
        if self.reject_ids.contains(&id) {
            return Err(format!("index rejected document '{id}'"));
        }
        self.documents.push(document.clone());
        Ok(())
    }
}

fn synchronizer(entities: Vec<Entity>) -> IndexSynchronizer {
    let mut mapper = EntityMapper::with_default_hydrators(MetadataFactory::new(
        MetadataReader::new(registry()),
    ));
    mapper.set_mapping_command(Box::new(MapAllFieldsCommand));
    IndexSynchronizer::new(mapper, Arc::new(MemoryRepository { entities }))
}

// ── Happy path ───────────────────────────────────────────────────

#[test]
fn synchronizes_every_indexable_entity() {
    let mut synchronizer = synchronizer(vec![
        note("note-1", json!({ "title": "First" })),
        note("note-2", json!({ "title": "Second" })),
    ]);
    let mut client = RecordingClient::default();

    let report = synchronizer.synchronize("app::notes::Note", &mut client).unwrap();

    assert_eq!(report.succeeded, 2);
    assert_eq!(report.skipped, 0);
    assert!(!report.has_errors());
    assert_eq!(report.overall(), 2);
    assert_eq!(client.documents.len(), 2);
    assert!(client.documents.iter().all(|d| d.document_name() == Some("note")));
}

// ── Synchronization filter ───────────────────────────────────────

#[test]
fn filtered_entities_are_skipped_not_errored() {
    let mut synchronizer = synchronizer(vec![
        note("note-1", json!({ "title": "First" })),
        note("note-2", json!({ "title": "Draft", "draft": true })),
    ]);
    let mut client = RecordingClient::default();

    let report = synchronizer.synchronize("app::notes::Note", &mut client).unwrap();

    assert_eq!(report.succeeded, 1);
    assert_eq!(report.skipped, 1);
    assert!(!report.has_errors());
    assert_eq!(client.documents.len(), 1);
}

// ── Per-item failures ────────────────────────────────────────────

#[test]
fn one_bad_document_never_aborts_the_run() {
    let mut synchronizer = synchronizer(vec![
        note("note-1", json!({ "title": "First" })),
        note("note-2", json!({ "title": "Broken", "publishDate": "yesterday" })),
        note("note-3", json!({ "title": "Third" })),
    ]);
    let mut client = RecordingClient::default();

    let report = synchronizer.synchronize("app::notes::Note", &mut client).unwrap();

    assert_eq!(report.succeeded, 2);
    assert_eq!(report.errored(), 1);
    assert_eq!(report.overall(), 3);
    assert_eq!(report.errors[0].entity_id, "note-2");
    assert!(report.errors[0].message.contains("publishDate"));
    assert_eq!(client.documents.len(), 2);
}

#[test]
fn client_rejections_are_tallied() {
    let mut synchronizer = synchronizer(vec![
        note("note-1", json!({ "title": "First" })),
        note("note-2", json!({ "title": "Second" })),
    ]);
    let mut client = RecordingClient {
        reject_ids: vec!["note-1".to_string()],
        ..RecordingClient::default()
    };

    let report = synchronizer.synchronize("app::notes::Note", &mut client).unwrap();

    assert_eq!(report.succeeded, 1);
    assert_eq!(report.errored(), 1);
    assert!(report.errors[0].message.contains("index rejected document 'note-1'"));
}

// ── Configuration failures abort up front ────────────────────────

#[test]
fn unmapped_entity_type_aborts_the_run() {
    let mut synchronizer = synchronizer(vec![]);
    let mut client = RecordingClient::default();

    let err = synchronizer
        .synchronize("app::other::Thing", &mut client)
        .unwrap_err();
    // Unregistered names are treated as unresolvable references.
    assert!(matches!(
        err,
        MapperError::NoResolver(_) | MapperError::NotMapped(_)
    ));
}

#[test]
fn missing_mapping_command_aborts_the_run() {
    let mapper = EntityMapper::with_default_hydrators(MetadataFactory::new(
        MetadataReader::new(registry()),
    ));
    let mut synchronizer =
        IndexSynchronizer::new(mapper, Arc::new(MemoryRepository { entities: vec![] }));
    let mut client = RecordingClient::default();

    let err = synchronizer
        .synchronize("app::notes::Note", &mut client)
        .unwrap_err();
    assert!(matches!(err, MapperError::NoMappingCommand));
}
