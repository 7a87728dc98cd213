//! Error types for schema registration and mapping.

use sift_model::SchemaError;
use thiserror::Error;

/// Result type alias for mapping operations.
pub type MapperResult<T> = Result<T, MapperError>;

/// Errors raised while building the schema registry.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("entity type '{0}' is already registered")]
    DuplicateType(String),

    #[error("no identifier field declared on '{0}'")]
    MissingIdentifier(String),

    #[error("multiple identifier fields declared on '{entity_type}': {fields}")]
    MultipleIdentifiers { entity_type: String, fields: String },

    #[error("field '{field}' on '{entity_type}': {source}")]
    InvalidField {
        entity_type: String,
        field: String,
        source: SchemaError,
    },

    #[error("accessor field '{field}' on '{entity_type}' has no registered accessor")]
    AccessorNotBound { entity_type: String, field: String },

    #[error("synchronization filter '{name}' on '{entity_type}' has no registered predicate")]
    SyncPredicateNotBound { entity_type: String, name: String },

    #[error("invalid declaration JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors raised while reading metadata or mapping entities and documents.
#[derive(Debug, Error)]
pub enum MapperError {
    #[error("no identifier field declared on '{0}'")]
    MissingIdentifier(String),

    #[error("invalid boost on '{entity_type}': {source}")]
    EntityBoost {
        entity_type: String,
        source: SchemaError,
    },

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error("target entity type must not be empty")]
    MissingTargetType,

    #[error("no classname resolver configured to resolve alias '{0}'")]
    NoResolver(String),

    #[error("alias '{0}' could not be resolved to a known entity type")]
    UnknownAlias(String),

    #[error("entity type '{0}' has no document declaration")]
    NotMapped(String),

    #[error("cannot instantiate abstract entity type '{0}'")]
    AbstractEntity(String),

    #[error("no persisted entity of type '{entity_type}' with id '{id}'")]
    EntityNotFound { entity_type: String, id: String },

    #[error("field '{field}': {message}")]
    InvalidFieldValue { field: String, message: String },

    #[error("no document mapping command bound to the entity mapper")]
    NoMappingCommand,

    #[error("index client error: {0}")]
    Client(String),
}
