//! Core data model for Sift.
//!
//! Defines the types shared by the mapping engine and the query layer:
//! - [`Entity`] — the generic domain object (id, type name, JSON payload)
//! - [`FieldDescriptor`] / [`FieldKind`] — one mapped field and its index type
//! - [`normalize_field_name`] — the camelCase → snake_case naming policy
//! - [`Document`] — the flat, index-side representation of an entity
//!
//! Schema registration, metadata discovery, and the bidirectional mapper live
//! in `sift-mapper`; this crate stays free of engine state so both sides of
//! the boundary can depend on it.

mod document;
mod entity;
mod error;
mod field;
mod naming;

pub use document::{DOCUMENT_NAME_FIELD, Document, ID_FIELD};
pub use entity::Entity;
pub use error::SchemaError;
pub use field::{FieldDescriptor, FieldKind, FieldSource, boost_from_value};
pub use naming::normalize_field_name;
