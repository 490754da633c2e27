//! Normalized, vendor-agnostic resource entities
//!
//! Every entity here is built fresh by an adapter call and handed to the
//! persistence or search layer as plain data.

use crate::error::CloudError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;

/// Cloud platform an adapter talks to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Provider {
    #[serde(rename = "fit2cloud_vsphere_platform")]
    Vsphere,
    #[serde(rename = "fit2cloud_huawei_platform")]
    Huawei,
}

impl Provider {
    /// Platform key stored alongside every normalized record
    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::Vsphere => "fit2cloud_vsphere_platform",
            Provider::Huawei => "fit2cloud_huawei_platform",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Provider::Vsphere => "VMware vSphere",
            Provider::Huawei => "Huawei Cloud",
        }
    }
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Provider {
    type Err = CloudError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "fit2cloud_vsphere_platform" | "vsphere" => Ok(Provider::Vsphere),
            "fit2cloud_huawei_platform" | "huawei" => Ok(Provider::Huawei),
            other => Err(CloudError::ProviderNotFound(other.to_string())),
        }
    }
}

/// Power state of a virtual machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PowerState {
    Running,
    Stopped,
    Suspended,
    Unknown,
}

impl std::fmt::Display for PowerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PowerState::Running => write!(f, "running"),
            PowerState::Stopped => write!(f, "stopped"),
            PowerState::Suspended => write!(f, "suspended"),
            PowerState::Unknown => write!(f, "unknown"),
        }
    }
}

/// Virtual machine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct F2CVirtualMachine {
    /// Instance UUID, the identifier lifecycle operations take
    pub instance_uuid: String,

    pub name: String,

    /// Datacenter name
    pub region: Option<String>,

    /// Cluster name
    pub zone: Option<String>,

    pub host_id: Option<String>,
    pub host_name: Option<String>,
    pub resource_pool_id: Option<String>,

    pub power_state: PowerState,

    pub cpu: u32,

    /// Memory in GB
    pub memory: u64,

    pub os: Option<String>,
    pub hostname: Option<String>,
    pub ip_addresses: Vec<String>,
    pub network_ids: Vec<String>,
    pub disks: Vec<F2CDisk>,
    pub tags: BTreeMap<String, String>,
}

/// Virtual disk attached to a virtual machine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct F2CDisk {
    pub disk_id: String,

    /// Size in GB
    pub size: u64,

    pub datastore_id: Option<String>,
    pub datastore_name: Option<String>,

    /// Instance UUID of the owning virtual machine
    pub instance_uuid: Option<String>,

    pub host_id: Option<String>,
    pub region: Option<String>,
    pub zone: Option<String>,

    /// Backing file path as reported by the vendor
    pub device: Option<String>,

    pub disk_type: Option<String>,
    pub bootable: bool,
    pub delete_with_instance: bool,
}

impl F2CDisk {
    /// A disk to be created with the given size on a named datastore
    pub fn new(size: u64, datastore_name: impl Into<String>) -> Self {
        Self {
            disk_id: String::new(),
            size,
            datastore_id: None,
            datastore_name: Some(datastore_name.into()),
            instance_uuid: None,
            host_id: None,
            region: None,
            zone: None,
            device: None,
            disk_type: None,
            bootable: false,
            delete_with_instance: true,
        }
    }
}

/// Machine image (VM template or content-library item)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct F2CImage {
    pub id: String,

    /// `None` when the vendor entry could not be resolved to a name
    pub name: Option<String>,

    pub description: String,
    pub os: String,
    pub region: Option<String>,

    /// Total disk size in GB
    pub disk_size: u64,

    /// Vendor disk layout serialized as JSON
    pub disk_infos: Option<String>,
}

/// Network a virtual machine can attach to
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct F2CNetwork {
    pub id: String,
    pub name: String,
    pub description: String,
}

impl F2CNetwork {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: description.into(),
        }
    }
}

/// Compute host with capacity figures
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct F2CHost {
    pub id: String,
    pub name: String,
    /// MHz
    pub total_cpu: u64,
    /// MHz
    pub used_cpu: u64,
    /// GB
    pub total_memory: u64,
    /// GB
    pub used_memory: u64,
}

/// Resource pool; `name` is the slash-joined path from the cluster root
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct F2CResourcePool {
    pub id: String,
    pub name: String,
    pub total_cpu: u64,
    pub used_cpu: u64,
    pub total_memory: u64,
    pub used_memory: u64,
}

/// Compute cluster with a human readable scheduling status
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct F2CCluster {
    pub name: String,
    pub description: String,
    pub value: String,
}

/// Placement kind offered when creating a virtual machine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct F2CLocation {
    pub name: String,
    pub value: String,
}

impl F2CLocation {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}
