//! Mapped-field query guard for Sift.
//!
//! [`SearchQuery`] validates and translates caller-supplied logical field
//! names against an entity type's field mapping while assembling search
//! predicates, so queries can only reach fields that are actually indexed.

mod error;
mod query;

pub use error::QueryError;
pub use query::{QueryOperator, SearchQuery};
