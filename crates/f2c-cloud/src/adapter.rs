//! Capability contracts every vendor adapter implements

use crate::bill::{BillBatch, CloudBill};
use crate::entity::{
    F2CCluster, F2CDisk, F2CHost, F2CImage, F2CLocation, F2CNetwork, F2CResourcePool,
    F2CVirtualMachine, Provider,
};
use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Mutex;

/// Placement value selecting automatic (DRS) placement
pub const LOCATION_DRS: &str = "drs";

/// Placement value selecting every compute resource of a cluster
pub const LOCATION_ALL_COMPUTE_RESOURCES: &str = "all";

/// Placement kind: pick explicit hosts
pub const LOCATION_HOST: &str = "host";

/// Placement kind: pick a resource pool
pub const LOCATION_POOL: &str = "pool";

/// Which networks to list
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NetworkQuery {
    pub cluster: Option<String>,

    /// [`LOCATION_HOST`], [`LOCATION_POOL`], ...
    pub location: Option<String>,

    /// Host names, or one of the placement sentinels
    pub hosts: Vec<String>,
}

impl NetworkQuery {
    pub fn for_cluster(cluster: impl Into<String>) -> Self {
        Self {
            cluster: Some(cluster.into()),
            ..Default::default()
        }
    }

    pub fn on_hosts(cluster: impl Into<String>, hosts: Vec<String>) -> Self {
        Self {
            cluster: Some(cluster.into()),
            location: Some(LOCATION_HOST.to_string()),
            hosts,
        }
    }

    /// Whether only the listed hosts should be scanned
    pub fn targets_explicit_hosts(&self) -> bool {
        !self.hosts.is_empty()
            && self.location.as_deref() == Some(LOCATION_HOST)
            && !self
                .hosts
                .iter()
                .any(|h| h == LOCATION_DRS || h == LOCATION_ALL_COMPUTE_RESOURCES)
    }
}

/// Add disks to a virtual machine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateDisksRequest {
    pub instance_uuid: String,
    pub disks: Vec<F2CDisk>,
}

/// Grow one disk of a virtual machine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResizeDiskRequest {
    pub instance_uuid: String,
    pub disk_id: String,
    /// GB
    pub new_size: u64,
}

/// Power mutation applied to one instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PowerAction {
    PowerOn,
    /// Hard power off
    PowerOff,
    /// Guest OS shutdown
    Shutdown,
    /// Guest OS reboot
    Reboot,
    /// Hard reset
    HardReboot,
    Delete,
}

impl std::fmt::Display for PowerAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PowerAction::PowerOn => write!(f, "power-on"),
            PowerAction::PowerOff => write!(f, "power-off"),
            PowerAction::Shutdown => write!(f, "shutdown"),
            PowerAction::Reboot => write!(f, "reboot"),
            PowerAction::HardReboot => write!(f, "hard-reboot"),
            PowerAction::Delete => write!(f, "delete"),
        }
    }
}

/// Most recent failure swallowed by a lifecycle operation, per instance
///
/// Concurrent operations on different instances never overwrite each other.
#[derive(Debug, Default)]
pub struct LastError(Mutex<HashMap<String, String>>);

impl LastError {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, instance_uuid: &str, message: impl Into<String>) {
        if let Ok(mut errors) = self.0.lock() {
            errors.insert(instance_uuid.to_string(), message.into());
        }
    }

    pub fn clear(&self, instance_uuid: &str) {
        if let Ok(mut errors) = self.0.lock() {
            errors.remove(instance_uuid);
        }
    }

    pub fn get(&self, instance_uuid: &str) -> Option<String> {
        self.0
            .lock()
            .ok()
            .and_then(|errors| errors.get(instance_uuid).cloned())
    }
}

/// Read-only inventory queries
#[async_trait]
pub trait InventoryAdapter: Send + Sync {
    fn provider(&self) -> Provider;

    async fn list_virtual_machines(&self) -> Result<Vec<F2CVirtualMachine>>;

    async fn list_images(&self) -> Result<Vec<F2CImage>>;

    async fn list_disks(&self) -> Result<Vec<F2CDisk>>;

    /// Disks of a single virtual machine
    async fn list_vm_disks(&self, instance_uuid: &str) -> Result<Vec<F2CDisk>>;

    async fn get_clusters(&self) -> Result<Vec<F2CCluster>>;

    async fn get_networks(&self, query: &NetworkQuery) -> Result<Vec<F2CNetwork>>;

    async fn get_hosts(&self, cluster: Option<&str>) -> Result<Vec<F2CHost>>;

    async fn get_resource_pools(&self, cluster: Option<&str>) -> Result<Vec<F2CResourcePool>>;

    /// Placement kinds available for new machines in `cluster`
    async fn get_locations(&self, cluster: &str) -> Vec<F2CLocation>;
}

/// Mutating operations
///
/// Power operations return `false` on failure instead of an error; the cause
/// is logged and kept in [`LifecycleAdapter::last_error`]. Disk operations
/// return typed errors.
#[async_trait]
pub trait LifecycleAdapter: Send + Sync {
    async fn power(&self, instance_uuid: &str, action: PowerAction) -> bool;

    /// Cause of the latest failed power operation on `instance_uuid`
    ///
    /// A later success on the same instance clears it.
    fn last_error(&self, instance_uuid: &str) -> Option<String>;

    async fn create_disks(&self, request: &CreateDisksRequest) -> Result<Vec<F2CDisk>>;

    async fn enlarge_disk(&self, request: &ResizeDiskRequest) -> Result<()>;

    async fn power_on(&self, instance_uuid: &str) -> bool {
        self.power(instance_uuid, PowerAction::PowerOn).await
    }

    async fn power_off(&self, instance_uuid: &str) -> bool {
        self.power(instance_uuid, PowerAction::PowerOff).await
    }

    async fn shutdown(&self, instance_uuid: &str) -> bool {
        self.power(instance_uuid, PowerAction::Shutdown).await
    }

    async fn reboot(&self, instance_uuid: &str) -> bool {
        self.power(instance_uuid, PowerAction::Reboot).await
    }

    async fn hard_reboot(&self, instance_uuid: &str) -> bool {
        self.power(instance_uuid, PowerAction::HardReboot).await
    }

    async fn delete(&self, instance_uuid: &str) -> bool {
        self.power(instance_uuid, PowerAction::Delete).await
    }
}

/// Billing import
#[async_trait]
pub trait BillingAdapter: Send + Sync {
    /// Vendor-native billing line item
    type Record: Send + Sync;

    fn provider(&self) -> Provider;

    /// Map one line item; fails only for that record
    fn to_cloud_bill(&self, record: &Self::Record) -> Result<CloudBill>;

    /// Pull every line item of a billing cycle (`yyyy-MM`)
    async fn fetch_bills(&self, cycle: &str) -> Result<BillBatch>;
}
