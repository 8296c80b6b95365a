//! Startup capacity provisioning.
//!
//! Brings every configured collection into shape before the host considers
//! itself ready: the logical database is ensured once, then each collection
//! is provisioned on its own task. One collection's failure is logged and
//! recorded, never propagated to its siblings.

use crate::config::{DocumentOptions, StoreConfig};
use crate::domain::errors::StrataError;
use crate::domain::Result;
use crate::setup::throughput::{plan, ThroughputDecision};
use crate::store::backend::ProvisioningBackend;
use futures::future::join_all;
use std::sync::Arc;
use tokio::sync::watch;

/// Outcome of provisioning one collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProvisionOutcome {
    /// Existence and (when requested) throughput are in shape.
    Provisioned,
    /// A shutdown signal was observed before this collection completed.
    Cancelled,
    /// Setup failed; the error was logged and contained to this collection.
    Failed(String),
}

/// Result of one provisioning pass.
#[derive(Debug, Clone)]
pub struct SetupSummary {
    /// Whether the shared database-existence step succeeded.
    pub database_ready: bool,
    /// Per-collection outcomes, in configuration order.
    pub collections: Vec<(String, ProvisionOutcome)>,
}

impl SetupSummary {
    /// Whether the database and every collection completed successfully.
    pub fn all_succeeded(&self) -> bool {
        self.database_ready
            && self
                .collections
                .iter()
                .all(|(_, outcome)| *outcome == ProvisionOutcome::Provisioned)
    }

    /// Outcome recorded for a collection.
    pub fn outcome(&self, collection: &str) -> Option<&ProvisionOutcome> {
        self.collections
            .iter()
            .find(|(name, _)| name == collection)
            .map(|(_, outcome)| outcome)
    }

    /// Convert the summary into a result, for hosts that refuse to start on a
    /// failed pass.
    pub fn into_result(self) -> Result<()> {
        if self.all_succeeded() {
            return Ok(());
        }

        if !self.database_ready {
            return Err(StrataError::Setup(
                "database was not brought into shape".to_string(),
            ));
        }

        let failed: Vec<&str> = self
            .collections
            .iter()
            .filter(|(_, outcome)| *outcome != ProvisionOutcome::Provisioned)
            .map(|(name, _)| name.as_str())
            .collect();
        Err(StrataError::Setup(format!(
            "collections not provisioned: {}",
            failed.join(", ")
        )))
    }
}

/// Startup-time reconciliation of collection existence and throughput.
pub struct CapacityProvisioner {
    backend: Arc<dyn ProvisioningBackend>,
    database_name: String,
    documents: Vec<DocumentOptions>,
}

impl CapacityProvisioner {
    /// Build a provisioner for every configured collection.
    pub fn new(backend: Arc<dyn ProvisioningBackend>, config: &StoreConfig) -> Self {
        CapacityProvisioner {
            backend,
            database_name: config.database_name.clone(),
            documents: config.documents.clone(),
        }
    }

    /// Run one provisioning pass.
    ///
    /// Ensures the database once, then fans out one task per collection and
    /// joins on all of them. Shutdown is cooperative: the signal is observed
    /// between steps, and an in-flight store call runs to completion.
    pub async fn run(&self, shutdown: watch::Receiver<bool>) -> SetupSummary {
        if *shutdown.borrow() {
            tracing::warn!(database = %self.database_name, "Shutdown requested before setup started");
            return SetupSummary {
                database_ready: false,
                collections: self
                    .documents
                    .iter()
                    .map(|options| (options.name.clone(), ProvisionOutcome::Cancelled))
                    .collect(),
            };
        }

        if let Err(e) = self.backend.ensure_database().await {
            tracing::error!(database = %self.database_name, error = %e, "Database setup failed");
            return SetupSummary {
                database_ready: false,
                collections: self
                    .documents
                    .iter()
                    .map(|options| {
                        (
                            options.name.clone(),
                            ProvisionOutcome::Failed(format!("database setup failed: {e}")),
                        )
                    })
                    .collect(),
            };
        }

        let tasks: Vec<_> = self
            .documents
            .iter()
            .map(|options| {
                let backend = Arc::clone(&self.backend);
                let options = options.clone();
                let shutdown = shutdown.clone();
                tokio::spawn(provision_collection(backend, options, shutdown))
            })
            .collect();

        let outcomes = join_all(tasks).await;
        let collections = self
            .documents
            .iter()
            .zip(outcomes)
            .map(|(options, joined)| {
                let outcome = joined.unwrap_or_else(|e| {
                    ProvisionOutcome::Failed(format!("setup task panicked: {e}"))
                });
                (options.name.clone(), outcome)
            })
            .collect();

        SetupSummary {
            database_ready: true,
            collections,
        }
    }
}

/// Provision one collection: existence, then throughput reconciliation.
///
/// Errors are logged with db/collection context and turned into a
/// [`ProvisionOutcome::Failed`]; they never cross to sibling collections.
async fn provision_collection(
    backend: Arc<dyn ProvisioningBackend>,
    options: DocumentOptions,
    shutdown: watch::Receiver<bool>,
) -> ProvisionOutcome {
    if *shutdown.borrow() {
        tracing::warn!(collection = %options.name, "Shutdown requested, skipping collection setup");
        return ProvisionOutcome::Cancelled;
    }

    if let Err(e) = backend.ensure_collection(&options).await {
        tracing::error!(collection = %options.name, error = %e, "Collection setup failed");
        return ProvisionOutcome::Failed(e.to_string());
    }

    if *shutdown.borrow() {
        tracing::warn!(collection = %options.name, "Shutdown requested, skipping throughput reconciliation");
        return ProvisionOutcome::Cancelled;
    }

    if options.set_throughput_on_startup {
        if let Err(e) = reconcile_throughput(backend.as_ref(), &options).await {
            tracing::error!(collection = %options.name, error = %e, "Throughput reconciliation failed");
            return ProvisionOutcome::Failed(e.to_string());
        }
    }

    ProvisionOutcome::Provisioned
}

async fn reconcile_throughput(
    backend: &dyn ProvisioningBackend,
    options: &DocumentOptions,
) -> Result<()> {
    let Some(current) = backend.read_throughput(&options.name).await? else {
        tracing::error!(collection = %options.name, "Store returned no throughput for collection");
        return Ok(());
    };

    match plan(options, &current) {
        ThroughputDecision::Skip(reason) => {
            tracing::info!(
                collection = %options.name,
                reason = ?reason,
                "Throughput already in shape, no action taken"
            );
        }
        ThroughputDecision::Replace(target) => {
            tracing::info!(
                collection = %options.name,
                target = ?target,
                auto_scale = options.enable_auto_scale,
                "Updating throughput settings"
            );
            backend.replace_throughput(&options.name, target).await?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_requires_database_and_every_collection() {
        let summary = SetupSummary {
            database_ready: true,
            collections: vec![
                ("a".to_string(), ProvisionOutcome::Provisioned),
                ("b".to_string(), ProvisionOutcome::Failed("boom".to_string())),
            ],
        };
        assert!(!summary.all_succeeded());
        assert_eq!(summary.outcome("a"), Some(&ProvisionOutcome::Provisioned));
        assert_eq!(summary.outcome("missing"), None);
    }

    #[test]
    fn failed_summary_converts_to_setup_error_naming_collections() {
        let summary = SetupSummary {
            database_ready: true,
            collections: vec![
                ("a".to_string(), ProvisionOutcome::Provisioned),
                ("b".to_string(), ProvisionOutcome::Failed("boom".to_string())),
            ],
        };
        match summary.into_result() {
            Err(StrataError::Setup(msg)) => assert!(msg.contains('b')),
            other => panic!("expected setup error, got {other:?}"),
        }

        let ok = SetupSummary {
            database_ready: true,
            collections: vec![("a".to_string(), ProvisionOutcome::Provisioned)],
        };
        assert!(ok.into_result().is_ok());
    }
}
