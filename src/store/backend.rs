//! Backing-store seam.
//!
//! The repository and the provisioner speak to the store through these narrow
//! traits so the SDK stays at the edge of the crate. Production code uses the
//! Cosmos implementations in [`super::cosmos`]; tests substitute in-memory
//! fakes.

use crate::config::DocumentOptions;
use crate::domain::consistency::ConsistencyLevel;
use crate::domain::Result;
use crate::repository::filter::IdFilter;
use crate::setup::throughput::{CurrentThroughput, ThroughputTarget};
use async_trait::async_trait;
use futures::stream::BoxStream;
use serde_json::Value;

/// Scope of a query: one partition, or the whole collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryScope<'a> {
    /// Query a single partition.
    Partition(&'a str),
    /// Query across every partition. Explicit, costlier mode.
    CrossPartition,
}

/// Raw item stream produced by a query.
pub type ItemStream<'a> = BoxStream<'a, Result<Value>>;

/// Record-level operations against one collection.
///
/// Documents cross this seam as JSON values; the repository owns schema
/// typing on either side. A "not found" response is never an error here:
/// reads yield `Ok(None)` and deletes absorb it. Point operations carry the
/// resolved consistency level so the store applies it per request; queries
/// do not, the store's query options carry no such field.
#[async_trait]
pub trait ContainerBackend: Send + Sync {
    /// Point-read one record. `Ok(None)` when the record does not exist.
    async fn read_item(
        &self,
        group: &str,
        id: &str,
        consistency: Option<ConsistencyLevel>,
    ) -> Result<Option<Value>>;

    /// Create or fully replace one record.
    async fn upsert_item(
        &self,
        group: &str,
        document: Value,
        consistency: Option<ConsistencyLevel>,
    ) -> Result<()>;

    /// Physically delete one record. Deleting an absent record is a no-op.
    async fn delete_item(
        &self,
        group: &str,
        id: &str,
        consistency: Option<ConsistencyLevel>,
    ) -> Result<()>;

    /// Run an id filter over the given scope, yielding raw records lazily.
    fn query_items<'a>(&'a self, filter: IdFilter, scope: QueryScope<'a>) -> Result<ItemStream<'a>>;
}

/// Database, collection, and throughput provisioning operations.
#[async_trait]
pub trait ProvisioningBackend: Send + Sync {
    /// Create the logical database if it does not exist. Idempotent.
    async fn ensure_database(&self) -> Result<()>;

    /// Create the collection if it does not exist, with the configured
    /// partition-key path and default TTL policy. Idempotent.
    async fn ensure_collection(&self, options: &DocumentOptions) -> Result<()>;

    /// Read the throughput currently attached to a collection. `Ok(None)`
    /// when the store returns no throughput for it.
    async fn read_throughput(&self, collection: &str) -> Result<Option<CurrentThroughput>>;

    /// Issue a single replace-throughput request.
    async fn replace_throughput(&self, collection: &str, target: ThroughputTarget) -> Result<()>;
}
