//! Integration tests for configuration loading from real files.

use secrecy::ExposeSecret;
use std::fs;
use std::sync::Mutex;
use strata::config::load_config;
use strata::domain::StrataError;
use tempfile::TempDir;

// Environment mutation is process-global; serialize the tests that touch it.
static ENV_LOCK: Mutex<()> = Mutex::new(());

fn write_config(dir: &TempDir, contents: &str) -> std::path::PathBuf {
    let path = dir.path().join("strata.toml");
    fs::write(&path, contents).unwrap();
    path
}

const FULL_CONFIG: &str = r#"
endpoint_uri = "https://test.documents.azure.com:443/"
access_key = "${STRATA_TEST_ACCESS_KEY}"
database_name = "tenants"
consistency_level = "Session"
direct_connection = true
bulk_execution_enabled = true
enable_soft_delete = true
soft_delete_expiry_seconds = 60
max_retry_wait_seconds = 45

[[documents]]
name = "profiles"
time_to_live_days = 30
partition_key_name = "tenant"
document_schema = "profile"
offered_throughput = 700

[[documents]]
name = "audits"
partition_key_name = "tenant"
document_schema = "audit"
enable_auto_scale = true
offered_throughput = 5000

[logging]
level = "debug"
json = true
"#;

#[test]
fn loads_full_config_with_env_substitution() {
    let _guard = ENV_LOCK.lock().unwrap();
    std::env::set_var("STRATA_TEST_ACCESS_KEY", "file-test-key");

    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, FULL_CONFIG);
    let config = load_config(&path).unwrap();

    std::env::remove_var("STRATA_TEST_ACCESS_KEY");

    assert_eq!(config.endpoint_uri, "https://test.documents.azure.com:443/");
    assert_eq!(config.access_key.expose_secret().as_ref(), "file-test-key");
    assert_eq!(config.database_name, "tenants");
    assert_eq!(config.consistency_level, "Session");
    assert!(config.direct_connection);
    assert!(config.bulk_execution_enabled);
    assert!(config.enable_soft_delete);
    assert_eq!(config.soft_delete_expiry_seconds, 60);
    assert_eq!(config.max_retry_wait_seconds, 45);

    assert_eq!(config.documents.len(), 2);
    let profiles = &config.documents[0];
    assert_eq!(profiles.name, "profiles");
    assert_eq!(profiles.time_to_live_days, 30);
    assert_eq!(profiles.offered_throughput, 700);
    assert!(!profiles.enable_auto_scale);
    let audits = &config.documents[1];
    assert_eq!(audits.time_to_live_days, -1);
    assert!(audits.enable_auto_scale);

    assert_eq!(config.logging.level, "debug");
    assert!(config.logging.json);
}

#[test]
fn missing_env_var_names_the_variable() {
    let _guard = ENV_LOCK.lock().unwrap();
    std::env::remove_var("STRATA_TEST_ACCESS_KEY");

    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, FULL_CONFIG);
    let err = load_config(&path).unwrap_err();

    match err {
        StrataError::Configuration(msg) => assert!(msg.contains("STRATA_TEST_ACCESS_KEY")),
        other => panic!("expected configuration error, got {other:?}"),
    }
}

#[test]
fn missing_file_is_a_configuration_error() {
    let dir = TempDir::new().unwrap();
    let err = load_config(dir.path().join("absent.toml")).unwrap_err();
    assert!(matches!(err, StrataError::Configuration(_)));
    assert!(err.to_string().contains("not found"));
}

#[test]
fn malformed_toml_is_rejected() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "endpoint_uri = [unclosed");
    let err = load_config(&path).unwrap_err();
    assert!(err.to_string().contains("TOML"));
}

#[test]
fn validation_rejects_malformed_endpoint() {
    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        r#"
endpoint_uri = "not a uri"
access_key = "key"
database_name = "tenants"

[[documents]]
name = "profiles"
partition_key_name = "tenant"
document_schema = "profile"
"#,
    );
    let err = load_config(&path).unwrap_err();
    assert!(err.to_string().contains("endpoint_uri"));
}

#[test]
fn validation_rejects_empty_access_key() {
    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        r#"
endpoint_uri = "https://test.documents.azure.com:443/"
access_key = ""
database_name = "tenants"

[[documents]]
name = "profiles"
partition_key_name = "tenant"
document_schema = "profile"
"#,
    );
    let err = load_config(&path).unwrap_err();
    assert!(err.to_string().contains("access_key"));
}

#[test]
fn validation_rejects_config_without_collections() {
    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        r#"
endpoint_uri = "https://test.documents.azure.com:443/"
access_key = "key"
database_name = "tenants"
documents = []
"#,
    );
    let err = load_config(&path).unwrap_err();
    assert!(err.to_string().contains("documents"));
}

#[test]
fn validation_rejects_partition_key_with_leading_slash() {
    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        r#"
endpoint_uri = "https://test.documents.azure.com:443/"
access_key = "key"
database_name = "tenants"

[[documents]]
name = "profiles"
partition_key_name = "/tenant"
document_schema = "profile"
"#,
    );
    let err = load_config(&path).unwrap_err();
    assert!(err.to_string().contains("leading '/'"));
}

#[test]
fn defaults_fill_in_omitted_settings() {
    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        r#"
endpoint_uri = "https://test.documents.azure.com:443/"
access_key = "key"
database_name = "tenants"

[[documents]]
name = "profiles"
partition_key_name = "tenant"
document_schema = "profile"
"#,
    );
    let config = load_config(&path).unwrap();

    assert!(config.consistency_level.is_empty());
    assert!(!config.enable_soft_delete);
    assert_eq!(config.soft_delete_expiry_seconds, 20);
    assert_eq!(config.max_retry_wait_seconds, 30);
    assert_eq!(config.documents[0].offered_throughput, 400);
    assert!(config.documents[0].set_throughput_on_startup);
    assert_eq!(config.logging.level, "info");
    assert!(!config.logging.json);
}
