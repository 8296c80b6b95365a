//! Domain types for Strata.
//!
//! The domain layer provides:
//! - **Error types** ([`StrataError`], [`StoreError`]) and the [`Result`] alias
//! - **The document contract** ([`DocumentModel`]) with its optional expiry
//!   capability
//! - **Consistency-level resolution** ([`ConsistencyLevel`], [`resolve`])
//!
//! All fallible operations in the crate return [`Result<T>`], and errors never
//! expose backing-SDK types.

pub mod consistency;
pub mod document;
pub mod errors;
pub mod result;

pub use consistency::{resolve, ConsistencyLevel};
pub use document::DocumentModel;
pub use errors::{StoreError, StrataError};
pub use result::Result;
