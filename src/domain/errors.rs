//! Domain error types.
//!
//! All errors are domain-specific and don't expose backing-SDK types. A
//! "not found" response from the store is never an error: read paths surface
//! it as `Ok(None)` and delete paths absorb it.

use thiserror::Error;

/// Main Strata error type.
///
/// This is the primary error type used throughout the crate. It wraps the
/// store-specific error type and provides context for error handling at the
/// service boundary.
#[derive(Debug, Error)]
pub enum StrataError {
    /// Malformed startup configuration, partition-key mismatch, or registry
    /// misuse. Raised before any I/O.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Empty or missing required argument, rejected before any I/O.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Backing-store failure (network, throttling, internal store error).
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Failure provisioning a single collection's existence or throughput.
    /// Contained to that collection, never crashes the process.
    #[error("Setup error: {0}")]
    Setup(String),

    /// Document <-> JSON conversion failure at the store seam.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Backing-store errors.
///
/// Transient and permanent store failures, classified by the operation that
/// produced them. These are logged with structured context at the call site
/// and re-raised to the caller.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Failed to create the store client or reach the account endpoint.
    #[error("Failed to connect to document store: {0}")]
    ConnectionFailed(String),

    /// Database creation failed.
    #[error("Failed to create database: {0}")]
    DatabaseCreationFailed(String),

    /// Collection creation failed.
    #[error("Failed to create collection: {0}")]
    CollectionCreationFailed(String),

    /// Point read failed.
    #[error("Read failed: {0}")]
    ReadFailed(String),

    /// Upsert failed.
    #[error("Write failed: {0}")]
    WriteFailed(String),

    /// Physical delete failed.
    #[error("Delete failed: {0}")]
    DeleteFailed(String),

    /// Query execution failed.
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Throughput read or replace failed.
    #[error("Throughput operation failed: {0}")]
    ThroughputFailed(String),

    /// Request was throttled and retries were exhausted.
    #[error("Request throttled: {0}")]
    Throttled(String),
}
