//! Startup provisioning.
//!
//! [`CapacityProvisioner`] reconciles collection existence and throughput at
//! process startup; [`throughput`] holds the pure planning logic it executes.

pub mod provisioner;
pub mod throughput;

pub use provisioner::{CapacityProvisioner, ProvisionOutcome, SetupSummary};
pub use throughput::{
    plan, target_for, CurrentThroughput, SkipReason, ThroughputDecision, ThroughputTarget,
};
