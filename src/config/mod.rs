//! Configuration management for Strata.
//!
//! TOML-based configuration loading with environment variable substitution
//! (`${VAR_NAME}`), default values for optional settings, and fail-fast
//! validation before any store client is constructed.
//!
//! # Example configuration
//!
//! ```toml
//! endpoint_uri = "https://your-account.documents.azure.com:443/"
//! access_key = "${STRATA_ACCESS_KEY}"
//! database_name = "tenants"
//! consistency_level = "Session"
//! enable_soft_delete = true
//!
//! [logging]
//! level = "info"
//!
//! [[documents]]
//! name = "profiles"
//! partition_key_name = "tenant"
//! document_schema = "profile"
//! time_to_live_days = 30
//! offered_throughput = 400
//! ```
//!
//! # Validation
//!
//! [`StoreConfig::validate`] fails fast when `endpoint_uri` is missing or not
//! an absolute URI, when `database_name` or `access_key` is missing, or when
//! the `documents` list is empty.

pub mod loader;
pub mod schema;
pub mod secret;

pub use loader::load_config;
pub use schema::{DocumentOptions, LoggingConfig, StoreConfig};
pub use secret::{secret_string, SecretString, SecretValue};
