//! Generic, schema-parameterized document repository.

use crate::config::{DocumentOptions, StoreConfig};
use crate::domain::consistency::{resolve, ConsistencyLevel};
use crate::domain::errors::StrataError;
use crate::domain::{DocumentModel, Result};
use crate::repository::filter::IdFilter;
use crate::store::backend::{ContainerBackend, QueryScope};
use futures::stream::{BoxStream, StreamExt};
use serde_json::Value;
use std::marker::PhantomData;
use std::sync::Arc;

/// Repository bound at construction to one collection and one record schema.
///
/// Holds no mutable state beyond its construction-time configuration, so
/// concurrent callers require no locking. All operations validate their
/// arguments before any I/O, scope every read and query to the given group
/// (unless a cross-partition query is requested explicitly), and hide
/// tombstoned records when the soft-delete policy is active.
///
/// The soft-delete policy is resolved once, at construction: it is active
/// only when the store enables it *and* the schema declares the expiry
/// capability ([`DocumentModel::SUPPORTS_EXPIRY`]).
pub struct DocumentRepository<T: DocumentModel> {
    collection_name: String,
    backend: Arc<dyn ContainerBackend>,
    soft_delete: bool,
    soft_delete_expiry_seconds: i64,
    default_consistency: Option<ConsistencyLevel>,
    _schema: PhantomData<fn() -> T>,
}

impl<T: DocumentModel> DocumentRepository<T> {
    /// Bind a repository to a collection.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when the collection's configured
    /// partition-key field does not match the schema's
    /// [`DocumentModel::PARTITION_KEY_FIELD`].
    pub fn new(
        backend: Arc<dyn ContainerBackend>,
        config: &StoreConfig,
        options: &DocumentOptions,
    ) -> Result<Self> {
        if options.partition_key_name != T::PARTITION_KEY_FIELD {
            return Err(StrataError::Configuration(format!(
                "Schema '{}' does not carry a partition-key field named '{}' (collection '{}' expects '{}')",
                T::SCHEMA_NAME,
                options.partition_key_name,
                options.name,
                T::PARTITION_KEY_FIELD,
            )));
        }

        Ok(DocumentRepository {
            collection_name: options.name.clone(),
            backend,
            soft_delete: config.enable_soft_delete && T::SUPPORTS_EXPIRY,
            soft_delete_expiry_seconds: config.soft_delete_expiry_seconds,
            default_consistency: resolve(&config.consistency_level),
            _schema: PhantomData,
        })
    }

    /// The collection this repository is bound to.
    pub fn collection_name(&self) -> &str {
        &self.collection_name
    }

    /// Whether deletes are tombstones rather than physical removals.
    pub fn soft_delete_enabled(&self) -> bool {
        self.soft_delete
    }

    /// Fetch one record by group and id.
    ///
    /// A backing "not found" yields `Ok(None)`, never an error. When soft
    /// delete is active a tombstoned record also reads as `Ok(None)`, even
    /// though it is still physically present.
    pub async fn get(
        &self,
        group: &str,
        id: &str,
        consistency: Option<ConsistencyLevel>,
    ) -> Result<Option<T>> {
        require_argument(group, "group")?;
        require_argument(id, "id")?;
        let level = self.effective_consistency(consistency);

        match self.backend.read_item(group, id, level).await {
            Ok(None) => Ok(None),
            Ok(Some(value)) => {
                let document = decode::<T>(value)?;
                Ok(self.visible(document))
            }
            Err(e) => {
                tracing::debug!(
                    collection = %self.collection_name,
                    group = %group,
                    id = %id,
                    operation = "get",
                    consistency = %level_str(level),
                    error = %e,
                    "Store error reading document"
                );
                Err(e)
            }
        }
    }

    /// Fetch every visible record in a group.
    pub async fn get_all(
        &self,
        group: &str,
        consistency: Option<ConsistencyLevel>,
    ) -> Result<Vec<T>> {
        require_argument(group, "group")?;
        self.collect_scoped(IdFilter::unrestricted(), group, "get_all", consistency)
            .await
    }

    /// Fetch the records in a group whose id belongs to `ids`.
    ///
    /// One parameterized membership filter, one scoped query. Absent ids are
    /// silently omitted; each present id is returned at most once. An empty
    /// id list behaves like [`get_all`](Self::get_all).
    pub async fn get_by_ids(
        &self,
        group: &str,
        ids: &[String],
        consistency: Option<ConsistencyLevel>,
    ) -> Result<Vec<T>> {
        require_argument(group, "group")?;
        self.collect_scoped(IdFilter::from_ids(ids), group, "get_by_ids", consistency)
            .await
    }

    /// Lazily stream records, optionally capped at `max_count` documents.
    ///
    /// With `group` given, the query is scoped to that partition. Without it
    /// the query spans the whole collection — an explicit, costlier mode.
    /// Tombstoned records are filtered out of the stream before the cap
    /// applies, so callers receive up to `max_count` visible documents.
    pub fn query<'a>(
        &'a self,
        group: Option<&'a str>,
        max_count: Option<usize>,
    ) -> Result<BoxStream<'a, Result<T>>> {
        let scope = match group {
            Some(group) => QueryScope::Partition(group),
            None => QueryScope::CrossPartition,
        };

        let raw = self.backend.query_items(IdFilter::unrestricted(), scope)?;

        let soft_delete = self.soft_delete;
        let stream = raw
            .map(|item| item.and_then(decode::<T>))
            .filter(move |item| {
                let keep = match item {
                    Ok(document) => !(soft_delete && document.is_tombstoned()),
                    Err(_) => true,
                };
                futures::future::ready(keep)
            });

        Ok(match max_count {
            Some(limit) => stream.take(limit).boxed(),
            None => stream.boxed(),
        })
    }

    /// Create or fully replace a record in a group (upsert by id).
    ///
    /// No concurrency token is checked: concurrent writers to the same id
    /// overwrite each other, last writer wins.
    pub async fn set(
        &self,
        group: &str,
        document: T,
        consistency: Option<ConsistencyLevel>,
    ) -> Result<T> {
        require_argument(group, "group")?;
        require_argument(document.id(), "id")?;
        let level = self.effective_consistency(consistency);

        let value = encode(&document)?;
        self.backend.upsert_item(group, value, level).await.map_err(|e| {
            tracing::debug!(
                collection = %self.collection_name,
                group = %group,
                id = %document.id(),
                operation = "set",
                consistency = %level_str(level),
                error = %e,
                "Store error writing document"
            );
            e
        })?;

        Ok(document)
    }

    /// Remove a record from a group.
    ///
    /// With soft delete active, the record is tombstoned and given the
    /// configured expiry window instead of being removed; deleting an absent
    /// (or already tombstoned) record is a silent no-op. Otherwise the record
    /// is physically deleted, with a backing "not found" absorbed — deleting
    /// twice is not an error.
    pub async fn delete(
        &self,
        group: &str,
        id: &str,
        consistency: Option<ConsistencyLevel>,
    ) -> Result<()> {
        require_argument(group, "group")?;
        require_argument(id, "id")?;

        if self.soft_delete {
            self.soft_delete_document(group, id, consistency).await
        } else {
            self.hard_delete_document(group, id, consistency).await
        }
    }

    /// Remove every record in a group, sequentially, using the same
    /// soft/hard policy as [`delete`](Self::delete).
    ///
    /// Best-effort, not atomic: the first failing delete propagates, records
    /// processed before it stay deleted, and the remainder is untouched.
    pub async fn delete_all(
        &self,
        group: &str,
        consistency: Option<ConsistencyLevel>,
    ) -> Result<()> {
        require_argument(group, "group")?;

        let documents = self.get_all(group, consistency).await?;
        for document in documents {
            self.delete(group, document.id(), consistency).await?;
        }
        Ok(())
    }

    async fn soft_delete_document(
        &self,
        group: &str,
        id: &str,
        consistency: Option<ConsistencyLevel>,
    ) -> Result<()> {
        let Some(mut document) = self.get(group, id, consistency).await? else {
            return Ok(());
        };

        document.tombstone(self.soft_delete_expiry_seconds);
        let value = encode(&document)?;
        let level = self.effective_consistency(consistency);

        self.backend.upsert_item(group, value, level).await.map_err(|e| {
            tracing::debug!(
                collection = %self.collection_name,
                group = %group,
                id = %id,
                operation = "delete",
                consistency = %level_str(level),
                error = %e,
                "Store error tombstoning document"
            );
            e
        })
    }

    async fn hard_delete_document(
        &self,
        group: &str,
        id: &str,
        consistency: Option<ConsistencyLevel>,
    ) -> Result<()> {
        let level = self.effective_consistency(consistency);

        self.backend.delete_item(group, id, level).await.map_err(|e| {
            tracing::debug!(
                collection = %self.collection_name,
                group = %group,
                id = %id,
                operation = "delete",
                consistency = %level_str(level),
                error = %e,
                "Store error deleting document"
            );
            e
        })
    }

    async fn collect_scoped(
        &self,
        filter: IdFilter,
        group: &str,
        operation: &'static str,
        consistency: Option<ConsistencyLevel>,
    ) -> Result<Vec<T>> {
        let level = self.effective_consistency(consistency);
        let mut stream = self
            .backend
            .query_items(filter, QueryScope::Partition(group))?;

        let mut documents = Vec::new();
        while let Some(item) = stream.next().await {
            let value = item.map_err(|e| {
                tracing::debug!(
                    collection = %self.collection_name,
                    group = %group,
                    operation = operation,
                    consistency = %level_str(level),
                    error = %e,
                    "Store error querying documents"
                );
                e
            })?;
            let document = decode::<T>(value)?;
            if let Some(document) = self.visible(document) {
                documents.push(document);
            }
        }
        Ok(documents)
    }

    fn visible(&self, document: T) -> Option<T> {
        if self.soft_delete && document.is_tombstoned() {
            None
        } else {
            Some(document)
        }
    }

    fn effective_consistency(
        &self,
        override_level: Option<ConsistencyLevel>,
    ) -> Option<ConsistencyLevel> {
        override_level.or(self.default_consistency)
    }
}

fn require_argument(value: &str, name: &str) -> Result<()> {
    if value.is_empty() {
        return Err(StrataError::Validation(format!("{name} must not be empty")));
    }
    Ok(())
}

fn level_str(level: Option<ConsistencyLevel>) -> &'static str {
    level.map(|l| l.as_str()).unwrap_or("default")
}

fn encode<T: DocumentModel>(document: &T) -> Result<Value> {
    serde_json::to_value(document)
        .map_err(|e| StrataError::Serialization(format!("Failed to serialize document: {e}")))
}

fn decode<T: DocumentModel>(value: Value) -> Result<T> {
    serde_json::from_value(value)
        .map_err(|e| StrataError::Serialization(format!("Failed to deserialize document: {e}")))
}
