//! Configuration schema types.

use crate::config::SecretString;
use secrecy::ExposeSecret;
use serde::Deserialize;
use url::Url;

/// Root store configuration, mapped from the TOML file.
#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    /// Account endpoint, an absolute URI.
    pub endpoint_uri: String,

    /// Account access key.
    pub access_key: SecretString,

    /// Logical database holding all configured collections.
    pub database_name: String,

    /// Requested consistency level token; empty means the account default.
    /// See [`crate::domain::consistency::resolve`].
    #[serde(default)]
    pub consistency_level: String,

    /// Prefer direct connectivity to the store's replicas over the gateway.
    #[serde(default)]
    pub direct_connection: bool,

    /// Allow the client to batch writes for throughput.
    #[serde(default)]
    pub bulk_execution_enabled: bool,

    /// Replace physical deletes with tombstone-plus-expiry for schemas that
    /// support the expiry capability.
    #[serde(default)]
    pub enable_soft_delete: bool,

    /// Seconds a tombstoned record survives before store-side expiry.
    #[serde(default = "default_soft_delete_expiry")]
    pub soft_delete_expiry_seconds: i64,

    /// Maximum wait for the throttling retry policy.
    #[serde(default = "default_max_retry_wait")]
    pub max_retry_wait_seconds: u64,

    /// One entry per collection served by this store.
    pub documents: Vec<DocumentOptions>,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Per-collection descriptor.
#[derive(Debug, Clone, Deserialize)]
pub struct DocumentOptions {
    /// Collection name.
    pub name: String,

    /// Default record time-to-live in days; -1 means no default expiry
    /// policy.
    #[serde(default = "default_time_to_live_days")]
    pub time_to_live_days: i64,

    /// Wire name of the partition-key field, without the leading `/`.
    pub partition_key_name: String,

    /// Registered schema name bound to this collection.
    pub document_schema: String,

    /// Target throughput: manual RU/s, or the autoscale maximum when
    /// `enable_auto_scale` is set.
    #[serde(default = "default_offered_throughput")]
    pub offered_throughput: usize,

    /// Reconcile throughput to the target at startup.
    #[serde(default = "default_true")]
    pub set_throughput_on_startup: bool,

    /// Autoscale between 10% of `offered_throughput` and the maximum instead
    /// of a fixed manual value.
    #[serde(default)]
    pub enable_auto_scale: bool,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, or error.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit JSON-formatted events instead of human-readable output.
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            level: default_log_level(),
            json: false,
        }
    }
}

fn default_soft_delete_expiry() -> i64 {
    20
}

fn default_max_retry_wait() -> u64 {
    30
}

fn default_time_to_live_days() -> i64 {
    -1
}

fn default_offered_throughput() -> usize {
    400
}

fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

impl StoreConfig {
    /// Validate the configuration.
    ///
    /// Fails fast, before any repository or provisioner is constructed, when
    /// a required setting is missing or malformed.
    pub fn validate(&self) -> Result<(), String> {
        if self.endpoint_uri.trim().is_empty() {
            return Err("endpoint_uri is missing".to_string());
        }
        Url::parse(&self.endpoint_uri)
            .map_err(|e| format!("endpoint_uri must be a well-formed absolute URI: {e}"))?;

        if self.database_name.trim().is_empty() {
            return Err("database_name is missing".to_string());
        }

        if self.access_key.expose_secret().is_empty() {
            return Err("access_key is missing".to_string());
        }

        if self.soft_delete_expiry_seconds <= 0 {
            return Err("soft_delete_expiry_seconds must be positive".to_string());
        }

        if self.documents.is_empty() {
            return Err("documents collection is missing or empty".to_string());
        }

        for document in &self.documents {
            document.validate()?;
        }

        Ok(())
    }
}

impl DocumentOptions {
    /// Validate one collection descriptor.
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("documents entry is missing a name".to_string());
        }
        if self.partition_key_name.trim().is_empty() {
            return Err(format!(
                "document '{}' is missing partition_key_name",
                self.name
            ));
        }
        if self.partition_key_name.starts_with('/') {
            return Err(format!(
                "document '{}': partition_key_name must not include the leading '/'",
                self.name
            ));
        }
        if self.document_schema.trim().is_empty() {
            return Err(format!(
                "document '{}' is missing document_schema",
                self.name
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::secret_string;

    fn valid_config() -> StoreConfig {
        StoreConfig {
            endpoint_uri: "https://test.documents.azure.com:443/".to_string(),
            access_key: secret_string("test-key".to_string()),
            database_name: "tenants".to_string(),
            consistency_level: String::new(),
            direct_connection: false,
            bulk_execution_enabled: false,
            enable_soft_delete: false,
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
    fn accepts_valid_config() {
        assert!(valid_config().validate().is_ok());
    }

    #[test]
    fn rejects_relative_endpoint() {
        let mut config = valid_config();
        config.endpoint_uri = "not-a-uri".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.contains("endpoint_uri"));
    }

    #[test]
    fn rejects_empty_documents() {
        let mut config = valid_config();
        config.documents.clear();
        let err = config.validate().unwrap_err();
        assert!(err.contains("documents"));
    }

    #[test]
    fn rejects_missing_database_name() {
        let mut config = valid_config();
        config.database_name = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_partition_key_with_leading_slash() {
        let mut config = valid_config();
        config.documents[0].partition_key_name = "/tenant".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn defaults_apply_when_fields_are_omitted() {
        let toml = r#"
            endpoint_uri = "https://test.documents.azure.com:443/"
            access_key = "test-key"
            database_name = "tenants"

            [[documents]]
            name = "profiles"
            partition_key_name = "tenant"
            document_schema = "profile"
        "#;
        let config: StoreConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.soft_delete_expiry_seconds, 20);
        assert_eq!(config.max_retry_wait_seconds, 30);
        assert!(!config.enable_soft_delete);
        assert_eq!(config.documents[0].time_to_live_days, -1);
        assert_eq!(config.documents[0].offered_throughput, 400);
        assert!(config.documents[0].set_throughput_on_startup);
        assert!(!config.documents[0].enable_auto_scale);
        assert_eq!(config.logging.level, "info");
    }
}
