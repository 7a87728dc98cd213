//! Error types for query assembly.

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum QueryError {
    #[error(
        "field '{field}' is not mapped on '{entity_type}', available fields: {available}; \
         disable strict field checking to skip unmapped fields instead"
    )]
    FieldNotMapped {
        field: String,
        entity_type: String,
        available: String,
    },
}
