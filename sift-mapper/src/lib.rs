//! Schema registry, metadata discovery, and entity/document mapping.
//!
//! The crate turns declared entity schemas into consolidated metadata and
//! uses it to transform domain entities into flat index documents and back:
//! - [`SchemaRegistry`] — build-once registry of [`EntityDeclaration`]s with
//!   bound accessor closures and synchronization predicates
//! - [`MetadataReader`] / [`MetadataFactory`] — per-type metadata discovery
//!   for type names, aliases, and live entities
//! - [`EntityMapper`] — bidirectional transformation with pluggable
//!   [`DocumentCommand`] and [`Hydrator`] strategies, including concrete-type
//!   resolution for abstract types via discriminator maps
//! - [`IndexSynchronizer`] — batch indexing boundary that tallies per-item
//!   failures instead of propagating them
//!
//! All operations are synchronous; the registry is immutable after build, so
//! concurrent mapping of different types needs no locking. Per-operation
//! state lives in [`MappingContext`], never in shared metadata.

mod command;
mod declaration;
mod error;
mod factory;
mod hydrator;
mod mapper;
mod metadata;
mod reader;
mod registry;
mod sync;

pub use command::{DocumentCommand, MapAllFieldsCommand};
pub use declaration::{EntityDeclaration, FieldDeclaration};
pub use error::{MapperError, MapperResult, RegistryError};
pub use factory::{ClassnameResolver, MetadataFactory};
pub use hydrator::{EntityRepository, Hydrator, StoredEntityHydrator, ValueHydrator};
pub use mapper::{EntityMapper, HydrationMode, MappingContext};
pub use metadata::EntityMetadata;
pub use reader::{EntityTarget, MetadataReader};
pub use registry::{AccessorFn, SchemaRegistry, SchemaRegistryBuilder, SyncPredicate};
pub use sync::{IndexClient, IndexSynchronizer, SyncFailure, SyncReport};
