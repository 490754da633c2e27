//! FIT2CLOUD provider adapter core
//!
//! Vendor adapters normalize heterogeneous cloud APIs into one set of
//! entities ([`F2CVirtualMachine`], [`F2CDisk`], [`F2CImage`], [`CloudBill`]
//! and friends) and manage the vendor's session lifecycle.
//!
//! # Supported Providers
//!
//! - **VMware vSphere**: inventory, power lifecycle, disks (`f2c-cloud-vsphere`)
//! - **Huawei Cloud**: billing import (`f2c-cloud-huawei`)
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │        controllers / jobs (external)             │
//! └─────────────────┬───────────────────────────────┘
//!                   │
//! ┌─────────────────▼───────────────────────────────┐
//! │                  f2c-cloud                       │
//! │  ┌──────────────────────────────────────────┐   │
//! │  │ InventoryAdapter / LifecycleAdapter /     │   │
//! │  │ BillingAdapter                            │   │
//! │  └──────────────────────────────────────────┘   │
//! │  ┌──────────────┐  ┌──────────────┐            │
//! │  │   mapping    │  │   session    │            │
//! │  └──────────────┘  └──────────────┘            │
//! └───────┬─────────────────┬───────────────────────┘
//!         │                 │
//! ┌───────▼───────┐ ┌───────▼───────┐
//! │    vsphere    │ │    huawei     │
//! │    adapter    │ │    adapter    │
//! └───────────────┘ └───────────────┘
//! ```

pub mod adapter;
pub mod bill;
pub mod config;
pub mod entity;
pub mod error;
pub mod mapping;
pub mod session;
pub mod telemetry;

// Re-exports
pub use adapter::{
    BillingAdapter, CreateDisksRequest, InventoryAdapter, LastError, LifecycleAdapter,
    NetworkQuery, PowerAction, ResizeDiskRequest,
};
pub use bill::{BillBatch, BillMode, CloudBill, RejectedRecord};
pub use config::{AdapterConfig, HttpClientConfig, LogConfig};
pub use entity::{
    F2CCluster, F2CDisk, F2CHost, F2CImage, F2CLocation, F2CNetwork, F2CResourcePool,
    F2CVirtualMachine, PowerState, Provider,
};
pub use error::{CloudError, Result};
pub use session::{Connector, SessionGuard, VendorSession, with_session};
