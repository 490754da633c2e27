//! vSphere object model boundary
//!
//! Records mirror the vim25 managed-object properties the adapter reads.
//! The transport behind [`VimSession`] (SOAP SDK, REST gateway, ...) lives
//! outside this crate; the adapter only relies on this trait.

use crate::error::Result;
use async_trait::async_trait;
use f2c_cloud::{PowerAction, VendorSession};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Managed object reference (`MOR`): type plus server-side id
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ManagedObjectRef {
    #[serde(rename = "type")]
    pub kind: String,
    pub value: String,
}

impl ManagedObjectRef {
    pub fn new(kind: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            value: value.into(),
        }
    }

    /// Standard vSwitch network, as opposed to a distributed portgroup
    pub fn is_standard_network(&self) -> bool {
        self.kind.eq_ignore_ascii_case("network")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum VmPowerState {
    PoweredOn,
    PoweredOff,
    Suspended,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VirtualDisk {
    pub key: i32,
    /// Backing object uuid, stable across reconfigurations
    pub uuid: String,
    /// `[datastore1] vm-01/vm-01.vmdk`
    pub file_name: String,
    pub capacity_in_kb: u64,
    pub datastore: Option<ManagedObjectRef>,
    pub thin_provisioned: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VirtualMachineConfig {
    pub uuid: String,
    pub instance_uuid: String,
    pub template: bool,
    pub guest_full_name: Option<String>,
    pub annotation: Option<String>,
    pub num_cpu: u32,
    pub memory_mb: u64,
    pub disks: Vec<VirtualDisk>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VirtualMachine {
    pub mor: ManagedObjectRef,
    pub name: String,
    /// Missing while the VM is being registered or is inaccessible
    pub config: Option<VirtualMachineConfig>,
    pub power_state: VmPowerState,
    pub host: Option<ManagedObjectRef>,
    pub resource_pool: Option<ManagedObjectRef>,
    pub datacenter: Option<String>,
    pub networks: Vec<ManagedObjectRef>,
    pub ip_addresses: Vec<String>,
    pub guest_host_name: Option<String>,
    pub custom_values: BTreeMap<String, String>,
}

impl VirtualMachine {
    pub fn is_template(&self) -> bool {
        self.config.as_ref().is_some_and(|c| c.template)
    }

    pub fn instance_uuid(&self) -> Option<&str> {
        self.config.as_ref().map(|c| c.instance_uuid.as_str())
    }

    pub fn disks(&self) -> &[VirtualDisk] {
        self.config.as_ref().map(|c| c.disks.as_slice()).unwrap_or(&[])
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HostHardware {
    /// Bytes
    pub memory_size: u64,
    pub cpu_mhz: u32,
    pub num_cpu_cores: u16,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HostQuickStats {
    /// MHz
    pub overall_cpu_usage: u64,
    /// MB
    pub overall_memory_usage: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HostSystem {
    pub mor: ManagedObjectRef,
    pub name: String,
    /// Name of the parent cluster, `None` for standalone hosts
    pub cluster: Option<String>,
    pub datacenter: Option<String>,
    pub hardware: HostHardware,
    pub quick_stats: HostQuickStats,
    pub vms: Vec<ManagedObjectRef>,
    pub networks: Vec<ManagedObjectRef>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Datastore {
    pub mor: ManagedObjectRef,
    pub name: String,
    pub datacenter: Option<String>,
    /// Bytes
    pub capacity: u64,
    /// Bytes
    pub free_space: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Network {
    pub mor: ManagedObjectRef,
    pub name: String,
}

/// Portgroup entry of a host's environment-browser config target
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DistributedVirtualPortgroupInfo {
    pub portgroup_name: String,
    pub portgroup_key: String,
    pub uplink_portgroup: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DrsBehavior {
    Manual,
    PartiallyAutomated,
    FullyAutomated,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterDrsConfig {
    pub enabled: bool,
    pub default_vm_behavior: DrsBehavior,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterComputeResource {
    pub mor: ManagedObjectRef,
    pub name: String,
    pub drs_config: ClusterDrsConfig,
    pub hosts: Vec<ManagedObjectRef>,
    /// Root (invisible) resource pool of the cluster
    pub resource_pool: Option<ManagedObjectRef>,
}

/// `ResourcePoolResourceUsage`; cpu in MHz, memory in bytes
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourcePoolUsage {
    pub reservation_used_for_vm: u64,
    pub unreserved_for_vm: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourcePool {
    pub mor: ManagedObjectRef,
    pub name: String,
    pub parent: Option<ManagedObjectRef>,
    pub children: Vec<ManagedObjectRef>,
    pub cpu: ResourcePoolUsage,
    pub memory: ResourcePoolUsage,
}

/// Item of a content library
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentLibraryItem {
    pub id: String,
    /// `None` when the OVF descriptor could not be resolved
    pub name: Option<String>,
    pub description: Option<String>,
    pub library_name: String,
    pub item_type: String,
    pub guest_os: Option<String>,
    /// Bytes
    pub size: u64,
}

/// One entry of a disk reconfiguration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiskSpec {
    /// Uuid of an existing disk to grow, `None` to add a disk
    pub existing_uuid: Option<String>,
    pub capacity_in_kb: u64,
    /// `None` places the disk next to the VM's files
    pub datastore: Option<ManagedObjectRef>,
    pub thin_provisioned: bool,
}

/// Authenticated vCenter session
///
/// Listing methods return raw records; the provided lookups are built on top
/// of them.
#[async_trait]
pub trait VimSession: VendorSession {
    /// Every virtual machine, templates included
    async fn list_virtual_machines(&self) -> Result<Vec<VirtualMachine>>;

    async fn list_hosts(&self) -> Result<Vec<HostSystem>>;

    async fn list_datastores(&self) -> Result<Vec<Datastore>>;

    async fn list_clusters(&self) -> Result<Vec<ClusterComputeResource>>;

    async fn list_resource_pools(&self) -> Result<Vec<ResourcePool>>;

    async fn list_content_library_items(&self) -> Result<Vec<ContentLibraryItem>>;

    async fn host_networks(&self, host: &HostSystem) -> Result<Vec<Network>>;

    /// `EnvironmentBrowser.QueryConfigTarget` portgroups for `host`
    async fn query_portgroups(&self, host: &HostSystem)
    -> Result<Vec<DistributedVirtualPortgroupInfo>>;

    async fn find_datastore(&self, name: &str, datacenter: Option<&str>)
    -> Result<Option<Datastore>>;

    /// Run one power task and wait for it
    async fn power(&self, vm: &ManagedObjectRef, action: PowerAction) -> Result<()>;

    /// `ReconfigVM_Task` with disk device changes
    async fn reconfigure_disks(&self, vm: &ManagedObjectRef, specs: &[DiskSpec]) -> Result<()>;

    async fn list_templates(&self) -> Result<Vec<VirtualMachine>> {
        let vms = self.list_virtual_machines().await?;
        Ok(vms.into_iter().filter(|vm| vm.is_template()).collect())
    }

    async fn find_vm_by_uuid(&self, instance_uuid: &str) -> Result<Option<VirtualMachine>> {
        let vms = self.list_virtual_machines().await?;
        Ok(vms
            .into_iter()
            .find(|vm| vm.instance_uuid() == Some(instance_uuid)))
    }

    async fn find_cluster(&self, name: &str) -> Result<Option<ClusterComputeResource>> {
        let clusters = self.list_clusters().await?;
        Ok(clusters.into_iter().find(|c| c.name == name))
    }

    async fn cluster_hosts(&self, cluster: &ClusterComputeResource) -> Result<Vec<HostSystem>> {
        let hosts = self.list_hosts().await?;
        Ok(hosts
            .into_iter()
            .filter(|h| cluster.hosts.contains(&h.mor))
            .collect())
    }
}
