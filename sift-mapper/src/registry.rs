//! Immutable schema registry built once at startup.
//!
//! The registry replaces runtime reflection: every mappable type is declared
//! up front, compiled into field descriptors at build time, and never changes
//! afterwards, so concurrent reads need no locking. Accessor-backed fields
//! and synchronization filters are resolved to closures here, at build time,
//! rather than looked up per call.

use crate::declaration::{EntityDeclaration, FieldDeclaration};
use crate::error::RegistryError;
use sift_model::{Entity, FieldDescriptor, FieldKind, FieldSource, ID_FIELD};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tracing::debug;

/// Reads a field value from a live entity. Bound for every field declared
/// with `accessor = true`.
pub type AccessorFn = Arc<dyn Fn(&Entity) -> Option<Value> + Send + Sync>;

/// Per-instance predicate deciding whether an entity should be indexed.
pub type SyncPredicate = Arc<dyn Fn(&Entity) -> bool + Send + Sync>;

/// One entity type's compiled schema: declaration plus derived descriptors.
pub(crate) struct CompiledSchema {
    pub declaration: EntityDeclaration,
    /// Field descriptors in declaration order, values unset.
    pub fields: Arc<Vec<FieldDescriptor>>,
    pub identifier: FieldDescriptor,
    /// Index-side field name → source member name, including the reserved
    /// `"id"` entry.
    pub field_mapping: Arc<BTreeMap<String, String>>,
    pub accessors: HashMap<String, AccessorFn>,
    pub sync_predicate: Option<SyncPredicate>,
}

/// Collects declarations and bound closures, then validates and compiles
/// them into a [`SchemaRegistry`].
#[derive(Default)]
pub struct SchemaRegistryBuilder {
    declarations: Vec<EntityDeclaration>,
    accessors: HashMap<(String, String), AccessorFn>,
    predicates: HashMap<(String, String), SyncPredicate>,
}

impl std::fmt::Debug for SchemaRegistryBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SchemaRegistryBuilder")
            .field("declarations", &self.declarations)
            .field("accessors", &self.accessors.len())
            .field("predicates", &self.predicates.len())
            .finish()
    }
}

impl SchemaRegistryBuilder {
    pub fn declare(mut self, declaration: EntityDeclaration) -> Self {
        self.declarations.push(declaration);
        self
    }

    /// Loads a declaration from its JSON sidecar form.
    pub fn declare_json(self, json: &str) -> Result<Self, RegistryError> {
        let declaration: EntityDeclaration = serde_json::from_str(json)?;
        Ok(self.declare(declaration))
    }

    /// Binds the accessor closure backing an `accessor = true` field.
    pub fn accessor(
        mut self,
        entity_type: impl Into<String>,
        member: impl Into<String>,
        f: impl Fn(&Entity) -> Option<Value> + Send + Sync + 'static,
    ) -> Self {
        self.accessors
            .insert((entity_type.into(), member.into()), Arc::new(f));
        self
    }

    /// Binds a named synchronization predicate referenced by a declaration's
    /// `sync_filter`.
    pub fn sync_predicate(
        mut self,
        entity_type: impl Into<String>,
        name: impl Into<String>,
        f: impl Fn(&Entity) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.predicates
            .insert((entity_type.into(), name.into()), Arc::new(f));
        self
    }

    /// Validates every declaration and compiles the immutable registry.
    pub fn build(mut self) -> Result<SchemaRegistry, RegistryError> {
        let mut schemas = HashMap::new();

        for declaration in std::mem::take(&mut self.declarations) {
            let entity_type = declaration.entity_type.clone();
            if schemas.contains_key(&entity_type) {
                return Err(RegistryError::DuplicateType(entity_type));
            }

            let schema = self.compile(declaration)?;
            debug!(entity_type = %entity_type, fields = schema.fields.len(), "schema compiled");
            schemas.insert(entity_type, Arc::new(schema));
        }

        Ok(SchemaRegistry { schemas })
    }

    fn compile(&self, declaration: EntityDeclaration) -> Result<CompiledSchema, RegistryError> {
        let entity_type = &declaration.entity_type;

        let identifier = self.compile_identifier(&declaration)?;

        let mut fields = Vec::new();
        let mut accessors = HashMap::new();
        for field_declaration in declaration.fields.iter().filter(|f| !f.identifier) {
            let descriptor = compile_field(entity_type, field_declaration)?;

            if field_declaration.accessor {
                let key = (entity_type.clone(), field_declaration.name.clone());
                let accessor =
                    self.accessors
                        .get(&key)
                        .ok_or_else(|| RegistryError::AccessorNotBound {
                            entity_type: entity_type.clone(),
                            field: field_declaration.name.clone(),
                        })?;
                accessors.insert(field_declaration.name.clone(), Arc::clone(accessor));
            }

            fields.push(descriptor);
        }

        let mut field_mapping = BTreeMap::new();
        for descriptor in &fields {
            let index_name =
                descriptor
                    .index_name()
                    .map_err(|source| RegistryError::InvalidField {
                        entity_type: entity_type.clone(),
                        field: descriptor.name.clone(),
                        source,
                    })?;
            field_mapping.insert(index_name, descriptor.name.clone());
        }
        field_mapping.insert(ID_FIELD.to_string(), identifier.name.clone());

        let sync_predicate = match &declaration.sync_filter {
            Some(name) => {
                let key = (entity_type.clone(), name.clone());
                let predicate = self.predicates.get(&key).ok_or_else(|| {
                    RegistryError::SyncPredicateNotBound {
                        entity_type: entity_type.clone(),
                        name: name.clone(),
                    }
                })?;
                Some(Arc::clone(predicate))
            }
            None => None,
        };

        Ok(CompiledSchema {
            fields: Arc::new(fields),
            identifier,
            field_mapping: Arc::new(field_mapping),
            accessors,
            sync_predicate,
            declaration,
        })
    }

    fn compile_identifier(
        &self,
        declaration: &EntityDeclaration,
    ) -> Result<FieldDescriptor, RegistryError> {
        let mut identifiers = declaration.fields.iter().filter(|f| f.identifier);

        let first = identifiers
            .next()
            .ok_or_else(|| RegistryError::MissingIdentifier(declaration.entity_type.clone()))?;

        let rest: Vec<&str> = identifiers.map(|f| f.name.as_str()).collect();
        if !rest.is_empty() {
            let mut fields = vec![first.name.as_str()];
            fields.extend(rest);
            return Err(RegistryError::MultipleIdentifiers {
                entity_type: declaration.entity_type.clone(),
                fields: fields.join(", "),
            });
        }

        compile_field(&declaration.entity_type, first)
    }
}

fn compile_field(
    entity_type: &str,
    declaration: &FieldDeclaration,
) -> Result<FieldDescriptor, RegistryError> {
    let kind = FieldKind::parse(&declaration.field_type).map_err(|source| {
        RegistryError::InvalidField {
            entity_type: entity_type.to_string(),
            field: declaration.name.clone(),
            source,
        }
    })?;

    let source = if declaration.accessor {
        FieldSource::Accessor
    } else {
        let path = declaration
            .path
            .clone()
            .unwrap_or_else(|| format!("/{}", declaration.name));
        FieldSource::Data { path }
    };

    Ok(FieldDescriptor {
        name: declaration.name.clone(),
        kind,
        boost: declaration.boost.clone(),
        dynamic: declaration.dynamic,
        multi_valued: declaration.multi_valued,
        source,
        value: None,
    })
}

/// Immutable, build-once registry of compiled entity schemas, keyed by
/// fully-qualified type name.
pub struct SchemaRegistry {
    schemas: HashMap<String, Arc<CompiledSchema>>,
}

impl std::fmt::Debug for SchemaRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SchemaRegistry")
            .field("types", &self.schemas.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl SchemaRegistry {
    pub fn builder() -> SchemaRegistryBuilder {
        SchemaRegistryBuilder::default()
    }

    pub fn contains(&self, entity_type: &str) -> bool {
        self.schemas.contains_key(entity_type)
    }

    /// Registered type names, in no particular order.
    pub fn types(&self) -> impl Iterator<Item = &str> {
        self.schemas.keys().map(String::as_str)
    }

    /// The bound synchronization predicate for a type, if any.
    pub fn sync_predicate(&self, entity_type: &str) -> Option<SyncPredicate> {
        self.schemas
            .get(entity_type)
            .and_then(|schema| schema.sync_predicate.clone())
    }

    pub(crate) fn schema(&self, entity_type: &str) -> Option<&Arc<CompiledSchema>> {
        self.schemas.get(entity_type)
    }
}
