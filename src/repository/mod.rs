//! Document repository layer.
//!
//! [`DocumentRepository`] exposes partition-scoped CRUD and batch queries for
//! one collection and one record schema; [`IdFilter`] builds the
//! parameterized id-membership filters its batch lookups use; and
//! [`SchemaRegistry`] instantiates repositories from configuration at
//! startup.

pub mod document;
pub mod filter;
pub mod registry;

pub use document::DocumentRepository;
pub use filter::IdFilter;
pub use registry::{RepositorySet, SchemaRegistry};
