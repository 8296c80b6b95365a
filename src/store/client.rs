//! Store client construction.

use crate::config::{DocumentOptions, StoreConfig};
use crate::domain::errors::{StoreError, StrataError};
use crate::domain::Result;
use crate::store::cosmos::{CosmosContainerBackend, CosmosProvisioningBackend};
use azure_core::credentials::Secret;
use azure_data_cosmos::clients::DatabaseClient;
use azure_data_cosmos::{CosmosClient, CosmosClientOptions};
use std::sync::Arc;
use std::time::Duration;

/// Connection to one document-store account and logical database.
///
/// Construction performs no I/O; the client is safe for concurrent use and
/// hands out per-collection backends for repositories and a provisioning
/// backend for startup setup.
pub struct StoreClient {
    client: Arc<CosmosClient>,
    database: DatabaseClient,
    config: StoreConfig,
}

impl StoreClient {
    /// Build a client from validated configuration.
    ///
    /// # Errors
    ///
    /// Returns a connection error if the underlying client cannot be
    /// created from the endpoint and key.
    pub fn connect(config: StoreConfig) -> Result<Self> {
        use secrecy::ExposeSecret;

        let key_str: String = config.access_key.expose_secret().clone().into();
        let key = Secret::new(key_str);
        let options = Some(CosmosClientOptions::default());

        let client = CosmosClient::with_key(&config.endpoint_uri, key, options).map_err(|e| {
            StrataError::Store(StoreError::ConnectionFailed(format!(
                "Failed to create store client: {e}"
            )))
        })?;
        let client = Arc::new(client);
        let database = client.database_client(&config.database_name);

        // The SDK speaks gateway mode; the connection flags are kept for
        // configuration parity and recorded here.
        tracing::info!(
            endpoint = %config.endpoint_uri,
            database = %config.database_name,
            direct_connection = config.direct_connection,
            bulk_execution = config.bulk_execution_enabled,
            "Store client created"
        );

        Ok(StoreClient {
            client,
            database,
            config,
        })
    }

    /// Verify connectivity by reading the database.
    pub async fn test_connection(&self) -> Result<()> {
        self.database.read(None).await.map_err(|e| {
            StrataError::Store(StoreError::ConnectionFailed(format!(
                "Connection test failed: {e}"
            )))
        })?;
        Ok(())
    }

    /// Record-level backend for one configured collection.
    pub fn container_backend(&self, options: &DocumentOptions) -> CosmosContainerBackend {
        let container = self.database.container_client(&options.name);
        CosmosContainerBackend::new(
            container,
            options.name.clone(),
            Duration::from_secs(self.config.max_retry_wait_seconds),
        )
    }

    /// Provisioning backend for the configured database.
    pub fn provisioning_backend(&self) -> CosmosProvisioningBackend {
        CosmosProvisioningBackend::new(
            Arc::clone(&self.client),
            self.config.database_name.clone(),
        )
    }

    /// The configured database name.
    pub fn database_name(&self) -> &str {
        &self.config.database_name
    }

    /// The loaded configuration.
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{secret_string, LoggingConfig};

    fn test_config() -> StoreConfig {
        StoreConfig {
            endpoint_uri: "https://test.documents.azure.com:443/".to_string(),
            access_key: secret_string("dGVzdC1rZXk=".to_string()),
            database_name: "tenants".to_string(),
            consistency_level: "Session".to_string(),
            direct_connection: false,
            bulk_execution_enabled: false,
            enable_soft_delete: true,
            soft_delete_expiry_seconds: 20,
            max_retry_wait_seconds: 30,
            documents: vec![DocumentOptions {
                name: "profiles".to_string(),
                time_to_live_days: -1,
                partition_key_name: "tenant".to_string(),
                document_schema: "profile".to_string(),
                offered_throughput: 400,
                set_throughput_on_startup: true,
                enable_auto_scale: false,
            }],
            logging: LoggingConfig::default(),
        }
    }

    #[test]
    fn connects_without_io() {
        let client = StoreClient::connect(test_config()).unwrap();
        assert_eq!(client.database_name(), "tenants");
    }

    #[test]
    fn hands_out_container_backends() {
        let client = StoreClient::connect(test_config()).unwrap();
        let options = client.config().documents[0].clone();
        let _backend = client.container_backend(&options);
        let _provisioning = client.provisioning_backend();
    }
}
