//! Cosmos DB implementations of the store backends.

use crate::config::DocumentOptions;
use crate::domain::consistency::ConsistencyLevel;
use crate::domain::errors::{StoreError, StrataError};
use crate::domain::Result;
use crate::repository::filter::IdFilter;
use crate::setup::throughput::{CurrentThroughput, ThroughputTarget};
use crate::store::backend::{ContainerBackend, ItemStream, ProvisioningBackend, QueryScope};
use async_trait::async_trait;
use azure_data_cosmos::clients::{ContainerClient, DatabaseClient};
use azure_data_cosmos::models::{
    ContainerProperties, IndexingPolicy, PartitionKeyDefinition, PartitionKeyKind,
    ThroughputProperties,
};
use azure_data_cosmos::{
    ConsistencyLevel as SdkConsistencyLevel, CosmosClient, ItemOptions, PartitionKey, Query,
};
use futures::stream::StreamExt;
use serde_json::Value;
use std::borrow::Cow;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;

const SECONDS_PER_DAY: u64 = 86_400;

/// Whether a store error message indicates a missing document or collection.
fn is_not_found(message: &str) -> bool {
    message.contains("404") || message.contains("NotFound")
}

/// Whether a store error message indicates throttling (429).
fn is_throttled(message: &str) -> bool {
    message.contains("429")
        || message.contains("TooManyRequests")
        || message.contains("Request rate is large")
}

/// Translate a configured day count into the store's default-TTL unit.
///
/// The -1 sentinel (and any negative value) means no default expiry policy.
/// Absurd day counts saturate instead of overflowing.
fn default_ttl(time_to_live_days: i64) -> Option<Duration> {
    if time_to_live_days < 0 {
        None
    } else {
        let seconds = (time_to_live_days as u64).saturating_mul(SECONDS_PER_DAY);
        Some(Duration::from_secs(seconds))
    }
}

/// Map the resolved consistency level into the SDK's wire enum.
fn sdk_consistency(level: ConsistencyLevel) -> SdkConsistencyLevel {
    match level {
        ConsistencyLevel::Strong => SdkConsistencyLevel::Strong,
        ConsistencyLevel::BoundedStaleness => SdkConsistencyLevel::BoundedStaleness,
        ConsistencyLevel::Session => SdkConsistencyLevel::Session,
        ConsistencyLevel::ConsistentPrefix => SdkConsistencyLevel::ConsistentPrefix,
        ConsistencyLevel::Eventual => SdkConsistencyLevel::Eventual,
    }
}

/// Snapshot the throughput model into the planner's terms.
fn current_throughput(properties: ThroughputProperties) -> CurrentThroughput {
    CurrentThroughput {
        manual: properties.throughput(),
        autoscale_max: properties.autoscale_maximum(),
        // TODO: map offerReplacePending once the SDK surfaces it on
        // ThroughputProperties.
        replace_pending: false,
    }
}

/// Retry an operation with exponential backoff while it is throttled.
///
/// Fixed attempt budget; the delay starts at one second, doubles, and is
/// capped at `max_wait`. Non-throttling errors return immediately.
async fn with_throttle_retry<T, F, Fut>(
    max_retries: usize,
    max_wait: Duration,
    mut op: F,
) -> std::result::Result<T, azure_core::Error>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = std::result::Result<T, azure_core::Error>>,
{
    let mut retry_count = 0;
    let mut delay = Duration::from_secs(1);

    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(e) if is_throttled(&e.to_string()) && retry_count < max_retries => {
                retry_count += 1;
                tracing::warn!(
                    retry = retry_count,
                    delay_ms = delay.as_millis() as u64,
                    "Request throttled, backing off"
                );
                sleep(delay).await;
                delay = (delay * 2).min(max_wait);
            }
            Err(e) => return Err(e),
        }
    }
}

/// Record-level backend over one Cosmos container.
pub struct CosmosContainerBackend {
    container: ContainerClient,
    collection_name: String,
    max_retries: usize,
    max_retry_wait: Duration,
}

impl CosmosContainerBackend {
    pub(crate) fn new(
        container: ContainerClient,
        collection_name: String,
        max_retry_wait: Duration,
    ) -> Self {
        CosmosContainerBackend {
            container,
            collection_name,
            max_retries: 3,
            max_retry_wait,
        }
    }
}

#[async_trait]
impl ContainerBackend for CosmosContainerBackend {
    async fn read_item(
        &self,
        group: &str,
        id: &str,
        consistency: Option<ConsistencyLevel>,
    ) -> Result<Option<Value>> {
        let partition_key = PartitionKey::from(group.to_string());
        let options = consistency.map(|level| ItemOptions {
            consistency_level: Some(sdk_consistency(level)),
            ..Default::default()
        });

        match self.container.read_item::<Value>(partition_key, id, options).await {
            Ok(response) => {
                let document = response.into_body().map_err(|e| {
                    StrataError::Serialization(format!("Failed to deserialize document: {e}"))
                })?;
                Ok(Some(document))
            }
            Err(e) if is_not_found(&e.to_string()) => Ok(None),
            Err(e) => {
                tracing::debug!(
                    collection = %self.collection_name,
                    group = %group,
                    id = %id,
                    error = %e,
                    "Point read failed"
                );
                Err(StoreError::ReadFailed(e.to_string()).into())
            }
        }
    }

    async fn upsert_item(
        &self,
        group: &str,
        document: Value,
        consistency: Option<ConsistencyLevel>,
    ) -> Result<()> {
        let partition_key = PartitionKey::from(group.to_string());

        with_throttle_retry(self.max_retries, self.max_retry_wait, || {
            let options = consistency.map(|level| ItemOptions {
                consistency_level: Some(sdk_consistency(level)),
                ..Default::default()
            });
            self.container
                .upsert_item(partition_key.clone(), document.clone(), options)
        })
        .await
        .map_err(|e| {
            let message = e.to_string();
            tracing::debug!(
                collection = %self.collection_name,
                group = %group,
                error = %message,
                "Upsert failed"
            );
            if is_throttled(&message) {
                StoreError::Throttled(message)
            } else {
                StoreError::WriteFailed(message)
            }
        })?;

        Ok(())
    }

    async fn delete_item(
        &self,
        group: &str,
        id: &str,
        consistency: Option<ConsistencyLevel>,
    ) -> Result<()> {
        let partition_key = PartitionKey::from(group.to_string());
        let options = consistency.map(|level| ItemOptions {
            consistency_level: Some(sdk_consistency(level)),
            ..Default::default()
        });

        match self.container.delete_item(partition_key, id, options).await {
            Ok(_) => Ok(()),
            Err(e) if is_not_found(&e.to_string()) => {
                tracing::debug!(
                    collection = %self.collection_name,
                    group = %group,
                    id = %id,
                    "Document already absent on delete"
                );
                Ok(())
            }
            Err(e) => {
                tracing::debug!(
                    collection = %self.collection_name,
                    group = %group,
                    id = %id,
                    error = %e,
                    "Delete failed"
                );
                Err(StoreError::DeleteFailed(e.to_string()).into())
            }
        }
    }

    fn query_items<'a>(&'a self, filter: IdFilter, scope: QueryScope<'a>) -> Result<ItemStream<'a>> {
        let mut query = Query::from(filter.text().to_string());
        for (name, value) in filter.parameters() {
            query = query
                .with_parameter(name, value)
                .map_err(|e| StoreError::QueryFailed(format!("Failed to bind parameter: {e}")))?;
        }

        let pager = match scope {
            QueryScope::Partition(group) => self.container.query_items::<Value>(
                query,
                PartitionKey::from(group.to_string()),
                None,
            ),
            QueryScope::CrossPartition => self.container.query_items::<Value>(query, (), None),
        }
        .map_err(|e| StoreError::QueryFailed(format!("Failed to create query: {e}")))?;

        let collection = self.collection_name.clone();
        let stream = pager.map(move |item| {
            item.map_err(|e| {
                tracing::debug!(
                    collection = %collection,
                    error = %e,
                    "Query stream item failed"
                );
                StrataError::from(StoreError::QueryFailed(e.to_string()))
            })
        });

        Ok(stream.boxed())
    }
}

/// Provisioning backend over one Cosmos database.
pub struct CosmosProvisioningBackend {
    client: Arc<CosmosClient>,
    database: DatabaseClient,
    database_name: String,
}

impl CosmosProvisioningBackend {
    pub(crate) fn new(client: Arc<CosmosClient>, database_name: String) -> Self {
        let database = client.database_client(&database_name);
        CosmosProvisioningBackend {
            client,
            database,
            database_name,
        }
    }
}

#[async_trait]
impl ProvisioningBackend for CosmosProvisioningBackend {
    async fn ensure_database(&self) -> Result<()> {
        match self.database.read(None).await {
            Ok(_) => {
                tracing::info!(database = %self.database_name, "Database already exists");
                Ok(())
            }
            Err(_) => {
                tracing::info!(database = %self.database_name, "Creating database");
                self.client
                    .create_database(&self.database_name, None)
                    .await
                    .map_err(|e| StoreError::DatabaseCreationFailed(e.to_string()))?;
                tracing::info!(database = %self.database_name, "Database created");
                Ok(())
            }
        }
    }

    async fn ensure_collection(&self, options: &DocumentOptions) -> Result<()> {
        let container = self.database.container_client(&options.name);

        match container.read(None).await {
            Ok(_) => {
                tracing::info!(collection = %options.name, "Collection already exists");
                Ok(())
            }
            Err(_) => {
                tracing::info!(
                    collection = %options.name,
                    partition_key = %options.partition_key_name,
                    "Creating collection"
                );

                let partition_key_def = PartitionKeyDefinition {
                    paths: vec![format!("/{}", options.partition_key_name)],
                    kind: PartitionKeyKind::Hash,
                    version: None,
                };

                let properties = ContainerProperties {
                    id: Cow::Owned(options.name.clone()),
                    partition_key: partition_key_def,
                    indexing_policy: Some(IndexingPolicy::default()),
                    default_ttl: default_ttl(options.time_to_live_days),
                    ..Default::default()
                };

                self.database
                    .create_container(properties, None)
                    .await
                    .map_err(|e| {
                        StoreError::CollectionCreationFailed(format!(
                            "Failed to create collection {}: {e}",
                            options.name
                        ))
                    })?;

                tracing::info!(collection = %options.name, "Collection created");
                Ok(())
            }
        }
    }

    async fn read_throughput(&self, collection: &str) -> Result<Option<CurrentThroughput>> {
        let container = self.database.container_client(collection);

        let response = container
            .read_throughput(None)
            .await
            .map_err(|e| StoreError::ThroughputFailed(e.to_string()))?;

        match response {
            None => Ok(None),
            Some(response) => {
                let properties = response.into_body().map_err(|e| {
                    StoreError::ThroughputFailed(format!(
                        "Failed to deserialize throughput for {collection}: {e}"
                    ))
                })?;
                Ok(Some(current_throughput(properties)))
            }
        }
    }

    async fn replace_throughput(&self, collection: &str, target: ThroughputTarget) -> Result<()> {
        let container = self.database.container_client(collection);

        let properties = match target {
            ThroughputTarget::Manual(value) => ThroughputProperties::manual(value),
            ThroughputTarget::AutoscaleMax(value) => ThroughputProperties::autoscale(value, None),
        };

        container
            .replace_throughput(properties, None)
            .await
            .map_err(|e| StoreError::ThroughputFailed(e.to_string()))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentinel_means_no_default_expiry_policy() {
        assert_eq!(default_ttl(-1), None);
        assert_eq!(default_ttl(-7), None);
    }

    #[test]
    fn day_counts_translate_to_seconds() {
        assert_eq!(default_ttl(1), Some(Duration::from_secs(86_400)));
        assert_eq!(default_ttl(30), Some(Duration::from_secs(2_592_000)));
    }

    #[test]
    fn absurd_day_counts_saturate_instead_of_overflowing() {
        assert_eq!(default_ttl(i64::MAX), Some(Duration::from_secs(u64::MAX)));
    }

    #[test]
    fn throughput_models_map_to_planner_snapshots() {
        let manual = current_throughput(ThroughputProperties::manual(700));
        assert_eq!(manual.manual, Some(700));
        assert!(!manual.replace_pending);

        let autoscale = current_throughput(ThroughputProperties::autoscale(5000, None));
        assert_eq!(autoscale.autoscale_max, Some(5000));
    }

    #[test]
    fn every_consistency_level_maps_to_the_wire_enum() {
        assert!(matches!(
            sdk_consistency(ConsistencyLevel::Strong),
            SdkConsistencyLevel::Strong
        ));
        assert!(matches!(
            sdk_consistency(ConsistencyLevel::BoundedStaleness),
            SdkConsistencyLevel::BoundedStaleness
        ));
        assert!(matches!(
            sdk_consistency(ConsistencyLevel::Session),
            SdkConsistencyLevel::Session
        ));
        assert!(matches!(
            sdk_consistency(ConsistencyLevel::ConsistentPrefix),
            SdkConsistencyLevel::ConsistentPrefix
        ));
        assert!(matches!(
            sdk_consistency(ConsistencyLevel::Eventual),
            SdkConsistencyLevel::Eventual
        ));
    }

    #[test]
    fn classifies_not_found_messages() {
        assert!(is_not_found("HTTP error: 404"));
        assert!(is_not_found("Entity NotFound"));
        assert!(!is_not_found("HTTP error: 500"));
    }

    #[test]
    fn classifies_throttled_messages() {
        assert!(is_throttled("status 429"));
        assert!(is_throttled("TooManyRequests"));
        assert!(is_throttled("Request rate is large"));
        assert!(!is_throttled("timeout"));
    }

    #[tokio::test]
    async fn retry_gives_up_after_budget() {
        let mut attempts = 0;
        let result: std::result::Result<(), azure_core::Error> =
            with_throttle_retry(2, Duration::from_millis(1), || {
                attempts += 1;
                async {
                    Err(azure_core::Error::with_message(
                        azure_core::error::ErrorKind::Other,
                        "429 TooManyRequests",
                    ))
                }
            })
            .await;
        assert!(result.is_err());
        assert_eq!(attempts, 3);
    }

    #[tokio::test]
    async fn retry_passes_through_other_errors() {
        let mut attempts = 0;
        let result: std::result::Result<(), azure_core::Error> =
            with_throttle_retry(3, Duration::from_millis(1), || {
                attempts += 1;
                async {
                    Err(azure_core::Error::with_message(
                        azure_core::error::ErrorKind::Other,
                        "500 internal",
                    ))
                }
            })
            .await;
        assert!(result.is_err());
        assert_eq!(attempts, 1);
    }
}
