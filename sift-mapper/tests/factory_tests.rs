use serde_json::json;
use sift_mapper::{
    ClassnameResolver, EntityDeclaration, EntityTarget, FieldDeclaration, MapperError,
    MetadataFactory, MetadataReader, SchemaRegistry,
};
use sift_model::Entity;
use std::sync::Arc;

fn registry() -> Arc<SchemaRegistry> {
    let note = EntityDeclaration::new("app::notes::Note")
        .with_repository("app::notes::NoteRepository")
        .with_boost(json!(1.5))
        .with_sync_filter("should_index")
        .field(FieldDeclaration::string("id").identifying())
        .field(FieldDeclaration::string("title"))
        .field(FieldDeclaration::text("body"));

    let shape = EntityDeclaration::new("app::shapes::Shape")
        .abstract_over([("circle", "app::shapes::Circle"), ("square", "Square")])
        .with_sync_filter("sync_shapes")
        .field(FieldDeclaration::string("id").identifying())
        .field(FieldDeclaration::string("name"));

    Arc::new(
        SchemaRegistry::builder()
            .declare(note)
            .declare(shape)
            .sync_predicate("app::notes::Note", "should_index", |_| true)
            .sync_predicate("app::shapes::Shape", "sync_shapes", |_| true)
            .build()
            .unwrap(),
    )
}

fn factory() -> MetadataFactory {
    MetadataFactory::new(MetadataReader::new(registry()))
}

struct AliasResolver;

impl ClassnameResolver for AliasResolver {
    fn resolve_full_qualified_classname(&self, alias: &str) -> Option<String> {
        match alias {
            "note" => Some("app::notes::Note".to_string()),
            "thing" => Some("app::other::Thing".to_string()),
            _ => None,
        }
    }
}

fn note() -> Entity {
    Entity {
        id: "note-1".to_string(),
        entity_type: "app::notes::Note".to_string(),
        data: json!({ "title": "Groceries", "body": "milk and eggs" }),
        created_at: 1,
        modified_at: 1,
        created_by: "peer-a".to_string(),
    }
}

// ── Class resolution ─────────────────────────────────────────────

#[test]
fn loads_metadata_for_a_registered_type_name() {
    let metadata = factory()
        .load_information(EntityTarget::Type("app::notes::Note"))
        .unwrap()
        .unwrap();

    assert_eq!(metadata.class_name(), "app::notes::Note");
    assert_eq!(metadata.document_name(), "note");
    assert!(metadata.entity().is_none());
}

#[test]
fn loads_metadata_through_the_alias_resolver() {
    let factory = MetadataFactory::with_resolver(
        MetadataReader::new(registry()),
        Box::new(AliasResolver),
    );

    let metadata = factory
        .load_information(EntityTarget::Type("note"))
        .unwrap()
        .unwrap();
    assert_eq!(metadata.class_name(), "app::notes::Note");
}

#[test]
fn alias_without_resolver_is_an_error() {
    let err = factory()
        .load_information(EntityTarget::Type("note"))
        .unwrap_err();
    assert!(matches!(err, MapperError::NoResolver(alias) if alias == "note"));
}

#[test]
fn unknown_alias_is_an_error() {
    let factory = MetadataFactory::with_resolver(
        MetadataReader::new(registry()),
        Box::new(AliasResolver),
    );

    let err = factory
        .load_information(EntityTarget::Type("bogus"))
        .unwrap_err();
    assert!(matches!(err, MapperError::UnknownAlias(alias) if alias == "bogus"));
}

#[test]
fn undeclared_resolved_type_is_not_indexable() {
    let factory = MetadataFactory::with_resolver(
        MetadataReader::new(registry()),
        Box::new(AliasResolver),
    );

    // "thing" resolves but carries no document declaration.
    let metadata = factory.load_information(EntityTarget::Type("thing")).unwrap();
    assert!(metadata.is_none());
}

#[test]
fn empty_target_is_rejected() {
    let err = factory().load_information(EntityTarget::Type("")).unwrap_err();
    assert!(matches!(err, MapperError::MissingTargetType));
}

// ── Instance loads ───────────────────────────────────────────────

#[test]
fn instance_loads_bind_the_entity_and_populate_values() {
    let entity = note();
    let metadata = factory()
        .load_information(EntityTarget::Instance(&entity))
        .unwrap()
        .unwrap();

    assert_eq!(metadata.entity_id(), "note-1");
    assert_eq!(
        metadata.field("title").and_then(|f| f.value.clone()),
        Some(json!("Groceries"))
    );
    assert_eq!(metadata.identifier().value, Some(json!("note-1")));
}

#[test]
fn class_only_loads_leave_values_unset() {
    let metadata = factory()
        .load_information(EntityTarget::Type("app::notes::Note"))
        .unwrap()
        .unwrap();

    assert_eq!(metadata.entity_id(), "");
    assert!(metadata.fields().values().all(|f| f.value.is_none()));
}

// ── Consolidated record ──────────────────────────────────────────

#[test]
fn metadata_carries_document_level_attributes() {
    let metadata = factory()
        .load_information(EntityTarget::Type("app::notes::Note"))
        .unwrap()
        .unwrap();

    assert_eq!(metadata.repository(), "app::notes::NoteRepository");
    assert_eq!(metadata.boost(), 1.5);
    assert_eq!(metadata.synchronization_callback(), Some("should_index"));
    assert!(metadata.has_synchronization_filter());
    assert!(!metadata.is_abstract());
    assert!(metadata.has_field("title"));
    assert!(!metadata.has_field("missing"));
    assert_eq!(metadata.field_mapping().get("title_s"), Some(&"title".to_string()));
    assert_eq!(metadata.field_mapping().get("id"), Some(&"id".to_string()));
}

#[test]
fn abstract_types_get_discriminators_but_no_sync_callback() {
    let metadata = factory()
        .load_information(EntityTarget::Type("app::shapes::Shape"))
        .unwrap()
        .unwrap();

    assert!(metadata.is_abstract());
    assert_eq!(
        metadata.discriminator_map().get("circle"),
        Some(&"app::shapes::Circle".to_string())
    );
    assert_eq!(
        metadata.discriminator_map().get("square"),
        Some(&"Square".to_string())
    );
    // Abstract types are never instantiated for synchronization.
    assert_eq!(metadata.synchronization_callback(), None);
    assert!(!metadata.has_synchronization_filter());
}

#[test]
fn non_numeric_document_boost_fails_the_load() {
    let registry = SchemaRegistry::builder()
        .declare(
            EntityDeclaration::new("app::notes::Draft")
                .with_boost(json!("abc"))
                .field(FieldDeclaration::string("id").identifying()),
        )
        .build()
        .unwrap();
    let factory = MetadataFactory::new(MetadataReader::new(Arc::new(registry)));

    let err = factory
        .load_information(EntityTarget::Type("app::notes::Draft"))
        .unwrap_err();
    assert!(matches!(err, MapperError::EntityBoost { .. }));
}
