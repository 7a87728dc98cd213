use serde_json::json;
use sift_mapper::{
    EntityDeclaration, EntityTarget, FieldDeclaration, MapperError, MetadataReader, SchemaRegistry,
};
use sift_model::Entity;
use std::sync::Arc;

fn note_registry() -> Arc<SchemaRegistry> {
    let declaration = EntityDeclaration::new("app::notes::Note")
        .with_repository("app::notes::NoteRepository")
        .with_boost(json!(1.5))
        .with_sync_filter("should_index")
        .field(FieldDeclaration::string("id").identifying())
        .field(FieldDeclaration::string("title").with_boost(json!(2.0)))
        .field(FieldDeclaration::text("body"))
        .field(FieldDeclaration::date("publishDate"))
        .field(FieldDeclaration::string("tags").multi())
        .field(FieldDeclaration::integer("wordCount").via_accessor());

    Arc::new(
        SchemaRegistry::builder()
            .declare(declaration)
            .accessor("app::notes::Note", "wordCount", |entity| {
                entity
                    .get_str("/body")
                    .map(|body| json!(body.split_whitespace().count()))
            })
            .sync_predicate("app::notes::Note", "should_index", |entity| {
                entity.get_bool("/done") != Some(true)
            })
            .build()
            .unwrap(),
    )
}

fn reader() -> MetadataReader {
    MetadataReader::new(note_registry())
}

fn note() -> Entity {
    Entity {
        id: "note-1".to_string(),
        entity_type: "app::notes::Note".to_string(),
        data: json!({
            "title": "Groceries",
            "body": "milk and eggs",
            "publishDate": "2021-04-03T10:15:30Z",
            "tags": ["errand", "home"],
            "done": false
        }),
        created_at: 1,
        modified_at: 1,
        created_by: "peer-a".to_string(),
    }
}

// ── Type-level reads ─────────────────────────────────────────────

#[test]
fn fields_follow_declaration_order_without_identifier() {
    let fields = reader().get_fields(EntityTarget::Type("app::notes::Note")).unwrap();

    let names: Vec<&str> = fields.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["title", "body", "publishDate", "tags", "wordCount"]);
    assert!(fields.iter().all(|f| f.value.is_none()));
}

#[test]
fn repeated_type_reads_share_the_compiled_descriptors() {
    let reader = reader();
    let first = reader.get_fields(EntityTarget::Type("app::notes::Note")).unwrap();
    let second = reader.get_fields(EntityTarget::Type("app::notes::Note")).unwrap();

    assert!(Arc::ptr_eq(&first, &second));
}

#[test]
fn field_mapping_includes_reserved_id_key() {
    let mapping = reader()
        .get_field_mapping(EntityTarget::Type("app::notes::Note"))
        .unwrap();

    let pairs: Vec<(&str, &str)> = mapping
        .iter()
        .map(|(k, v)| (k.as_str(), v.as_str()))
        .collect();
    assert_eq!(
        pairs,
        vec![
            ("body_t", "body"),
            ("id", "id"),
            ("publish_date_dt", "publishDate"),
            ("tags_sm", "tags"),
            ("title_s", "title"),
            ("word_count_i", "wordCount"),
        ]
    );
}

// ── Instance-level reads ─────────────────────────────────────────

#[test]
fn instance_reads_populate_values() {
    let entity = note();
    let fields = reader().get_fields(EntityTarget::Instance(&entity)).unwrap();

    let value_of = |name: &str| {
        fields
            .iter()
            .find(|f| f.name == name)
            .and_then(|f| f.value.clone())
    };

    assert_eq!(value_of("title"), Some(json!("Groceries")));
    assert_eq!(value_of("tags"), Some(json!(["errand", "home"])));
    // Accessor-backed field computed from the body text.
    assert_eq!(value_of("wordCount"), Some(json!(3)));
}

#[test]
fn missing_payload_members_stay_unset() {
    let mut entity = note();
    entity.data = json!({ "title": "Groceries" });

    let fields = reader().get_fields(EntityTarget::Instance(&entity)).unwrap();
    let body = fields.iter().find(|f| f.name == "body").unwrap();
    assert_eq!(body.value, None);
}

#[test]
fn identifier_carries_the_entity_id() {
    let entity = note();
    let identifier = reader().get_identifier(EntityTarget::Instance(&entity)).unwrap();

    assert_eq!(identifier.name, "id");
    assert_eq!(identifier.value, Some(json!("note-1")));

    let class_only = reader().get_identifier(EntityTarget::Type("app::notes::Note")).unwrap();
    assert_eq!(class_only.value, None);
}

// ── Document-level reads ─────────────────────────────────────────

#[test]
fn entity_boost_and_repository() {
    let reader = reader();
    let target = EntityTarget::Type("app::notes::Note");

    assert_eq!(reader.get_entity_boost(target).unwrap(), 1.5);
    assert_eq!(reader.get_repository(target), "app::notes::NoteRepository");
    assert_eq!(
        reader.get_synchronization_callback(target),
        Some("should_index".to_string())
    );
    assert!(reader.get_discriminator_map(target).is_empty());
    assert!(!reader.is_abstract(target));
}

#[test]
fn non_numeric_entity_boost_is_rejected() {
    let registry = SchemaRegistry::builder()
        .declare(
            EntityDeclaration::new("app::notes::Draft")
                .with_boost(json!("abc"))
                .field(FieldDeclaration::string("id").identifying()),
        )
        .build()
        .unwrap();
    let reader = MetadataReader::new(Arc::new(registry));

    let err = reader
        .get_entity_boost(EntityTarget::Type("app::notes::Draft"))
        .unwrap_err();
    match err {
        MapperError::EntityBoost { entity_type, .. } => {
            assert_eq!(entity_type, "app::notes::Draft");
        }
        other => panic!("unexpected error: {other}"),
    }
}

// ── Unregistered types ───────────────────────────────────────────

#[test]
fn unregistered_types_read_as_undeclared() {
    let reader = reader();
    let target = EntityTarget::Type("app::other::Thing");

    assert!(!reader.has_document_declaration("app::other::Thing"));
    assert!(reader.get_fields(target).unwrap().is_empty());
    assert_eq!(reader.get_entity_boost(target).unwrap(), 0.0);
    assert_eq!(reader.get_repository(target), "");
    assert_eq!(reader.get_synchronization_callback(target), None);
    assert!(reader.get_discriminator_map(target).is_empty());
}

#[test]
fn unregistered_types_have_no_identifier() {
    let reader = reader();

    let err = reader
        .get_identifier(EntityTarget::Type("app::other::Thing"))
        .unwrap_err();
    assert!(matches!(err, MapperError::MissingIdentifier(t) if t == "app::other::Thing"));

    assert!(reader.get_field_mapping(EntityTarget::Type("app::other::Thing")).is_err());
}
