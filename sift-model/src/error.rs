//! Error types for the model crate.

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SchemaError {
    #[error("unknown field type \"{given}\", supported types: {supported}")]
    UnknownFieldType { given: String, supported: String },

    #[error(
        "field '{field}' is multi-valued but not dynamic; \
         multi-valued non-dynamic fields must be defined in the index schema itself"
    )]
    MultiValuedRequiresDynamic { field: String },

    #[error("invalid boost value {value}")]
    InvalidBoost { value: String },
}
