//! VMware vSphere adapter for FIT2CLOUD
//!
//! Implements [`f2c_cloud::InventoryAdapter`] and
//! [`f2c_cloud::LifecycleAdapter`] on top of a [`VimSession`].
//!
//! # Features
//!
//! - Virtual machine, template, content-library and disk listing
//! - Cluster, host, network and resource pool queries
//! - Power operations and disk create/enlarge
//!
//! # Requirements
//!
//! - A [`f2c_cloud::Connector`] producing [`VimSession`]s for a vCenter
//!
//! # Example
//!
//! ```ignore
//! use f2c_cloud::InventoryAdapter;
//! use f2c_cloud_vsphere::{VsphereCredential, VsphereProvider};
//!
//! let credential = VsphereCredential::new("10.1.240.10", "administrator@vsphere.local", password);
//! let provider = VsphereProvider::new(connector, credential);
//!
//! let hosts = provider.get_hosts(Some("cluster-a")).await?;
//! ```

pub mod credential;
pub mod disk;
pub mod error;
pub mod inventory;
pub mod lifecycle;
pub mod mapping;
pub mod provider;
pub mod vim;

#[cfg(test)]
mod fake;

pub use credential::VsphereCredential;
pub use disk::AUTO_PLACEMENT_DATASTORE;
pub use error::{Result, VsphereError};
pub use inventory::TEMPLATE_DEFAULT_NETWORK_ID;
pub use provider::VsphereProvider;
pub use vim::VimSession;
