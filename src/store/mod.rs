//! Backing-store integration.
//!
//! [`StoreClient`] owns the connection to the document-store account. The
//! repository and provisioner never touch the SDK directly; they speak
//! through the [`ContainerBackend`] and [`ProvisioningBackend`] seams, whose
//! Cosmos implementations live in [`cosmos`].

pub mod backend;
pub mod client;
pub mod cosmos;

pub use backend::{ContainerBackend, ItemStream, ProvisioningBackend, QueryScope};
pub use client::StoreClient;
pub use cosmos::{CosmosContainerBackend, CosmosProvisioningBackend};
