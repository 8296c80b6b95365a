// Strata - Document repository layer for Azure Cosmos DB
// Copyright (c) 2026 Strata Contributors
// Licensed under the MIT License

//! # Strata
//!
//! Strata is a generic repository layer over Azure Cosmos DB for
//! multi-tenant services that store, query, and retire small JSON records
//! grouped by a partition key ("group").
//!
//! ## Overview
//!
//! The crate provides:
//! - **Partition-scoped CRUD and batch queries** through a generic,
//!   schema-parameterized [`repository::DocumentRepository`]
//! - **Optional soft delete**: tombstone plus expiry window instead of
//!   physical removal, invisible to every read path
//! - **Per-call consistency selection** via
//!   [`domain::consistency::resolve`]
//! - **Safe batch-id filtering** with bound parameters
//!   ([`repository::IdFilter`])
//! - **Idempotent, fault-isolated startup provisioning** of collection
//!   existence and throughput ([`setup::CapacityProvisioner`])
//!
//! ## Architecture
//!
//! - [`domain`] - errors, the document contract, consistency resolution
//! - [`config`] - TOML configuration with fail-fast validation
//! - [`store`] - the backing-store seam and its Cosmos implementation
//! - [`repository`] - repositories, filters, and the schema registry
//! - [`setup`] - startup capacity provisioning
//! - [`logging`] - structured logging initialization
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use serde::{Deserialize, Serialize};
//! use strata::config::load_config;
//! use strata::domain::DocumentModel;
//! use strata::repository::SchemaRegistry;
//! use strata::setup::CapacityProvisioner;
//! use strata::store::StoreClient;
//! use std::sync::Arc;
//!
//! #[derive(Serialize, Deserialize)]
//! struct Profile {
//!     id: String,
//!     tenant: String,
//!     value: String,
//! }
//!
//! impl DocumentModel for Profile {
//!     const SCHEMA_NAME: &'static str = "profile";
//!     const PARTITION_KEY_FIELD: &'static str = "tenant";
//!
//!     fn id(&self) -> &str {
//!         &self.id
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() -> strata::domain::Result<()> {
//!     let config = load_config("strata.toml")?;
//!     strata::logging::init_logging(&config.logging)?;
//!
//!     let client = StoreClient::connect(config)?;
//!
//!     // Bring collections into shape before serving traffic.
//!     let provisioner =
//!         CapacityProvisioner::new(Arc::new(client.provisioning_backend()), client.config());
//!     let (_shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
//!     let summary = provisioner.run(shutdown_rx).await;
//!     tracing::info!(ready = summary.all_succeeded(), "Provisioning pass finished");
//!
//!     let mut registry = SchemaRegistry::new();
//!     registry.register::<Profile>()?;
//!     let repositories = registry.build(&client)?;
//!
//!     let profiles = repositories
//!         .get::<Profile>("profiles")
//!         .expect("collection configured");
//!     let stored = profiles
//!         .set(
//!             "tenant-1",
//!             Profile {
//!                 id: "p-1".to_string(),
//!                 tenant: "tenant-1".to_string(),
//!                 value: "hello".to_string(),
//!             },
//!             None,
//!         )
//!         .await?;
//!     let fetched = profiles.get("tenant-1", stored.id(), None).await?;
//!     assert!(fetched.is_some());
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod domain;
pub mod logging;
pub mod repository;
pub mod setup;
pub mod store;
