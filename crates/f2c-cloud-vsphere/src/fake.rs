//! In-memory vCenter used by the adapter tests

use crate::credential::VsphereCredential;
use crate::error::{Result, VsphereError};
use crate::vim::{
    ClusterComputeResource, ClusterDrsConfig, ContentLibraryItem, Datastore, DiskSpec,
    DistributedVirtualPortgroupInfo, DrsBehavior, HostHardware, HostQuickStats, HostSystem,
    ManagedObjectRef, Network, ResourcePool, ResourcePoolUsage, VimSession, VirtualDisk,
    VirtualMachine, VirtualMachineConfig, VmPowerState,
};
use async_trait::async_trait;
use f2c_cloud::mapping::{BYTES_PER_GB, KB_PER_GB};
use f2c_cloud::{Connector, PowerAction, VendorSession};
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Debug, Clone, Default)]
pub struct Inventory {
    pub vms: Vec<VirtualMachine>,
    pub hosts: Vec<HostSystem>,
    pub datastores: Vec<Datastore>,
    pub clusters: Vec<ClusterComputeResource>,
    pub pools: Vec<ResourcePool>,
    pub library_items: Vec<ContentLibraryItem>,
    /// Keyed by host id
    pub host_networks: HashMap<String, Vec<Network>>,
    /// Keyed by host id
    pub portgroups: HashMap<String, Vec<DistributedVirtualPortgroupInfo>>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Mutation {
    Power(String, PowerAction),
    Reconfigure(String, Vec<DiskSpec>),
}

#[derive(Default)]
struct State {
    inventory: Inventory,
    connects: usize,
    logouts: usize,
    mutations: Vec<Mutation>,
    fail_on: Option<String>,
    refuse_login: bool,
    next_disk: usize,
}

#[derive(Clone, Default)]
pub struct FakeVcenter {
    state: Arc<Mutex<State>>,
}

impl FakeVcenter {
    pub fn new(inventory: Inventory) -> Self {
        let vcenter = Self::default();
        vcenter.lock().inventory = inventory;
        vcenter
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap()
    }

    /// Make the named session method fail with a vSphere fault
    pub fn fail_on(&self, method: &str) {
        self.lock().fail_on = Some(method.to_string());
    }

    pub fn clear_failure(&self) {
        self.lock().fail_on = None;
    }

    pub fn refuse_login(&self) {
        self.lock().refuse_login = true;
    }

    pub fn connects(&self) -> usize {
        self.lock().connects
    }

    pub fn logouts(&self) -> usize {
        self.lock().logouts
    }

    pub fn mutations(&self) -> Vec<Mutation> {
        self.lock().mutations.clone()
    }

    pub fn inventory(&self) -> Inventory {
        self.lock().inventory.clone()
    }

    fn check(&self, method: &str) -> Result<()> {
        if self.lock().fail_on.as_deref() == Some(method) {
            return Err(VsphereError::Fault(format!("{} failed: InvalidState", method)));
        }
        Ok(())
    }
}

#[async_trait]
impl Connector for FakeVcenter {
    type Credential = VsphereCredential;
    type Session = FakeSession;

    async fn connect(&self, credential: &VsphereCredential) -> f2c_cloud::Result<FakeSession> {
        let mut state = self.lock();
        state.connects += 1;
        if state.refuse_login {
            return Err(VsphereError::LoginFailed(format!(
                "Cannot complete login due to an incorrect user name or password: {}",
                credential.v_user_name
            ))
            .into());
        }
        Ok(FakeSession {
            vcenter: self.clone(),
            endpoint: credential.endpoint(),
        })
    }
}

pub struct FakeSession {
    vcenter: FakeVcenter,
    endpoint: String,
}

#[async_trait]
impl VendorSession for FakeSession {
    fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn logout(&self) -> f2c_cloud::Result<()> {
        self.vcenter.lock().logouts += 1;
        Ok(())
    }
}

#[async_trait]
impl VimSession for FakeSession {
    async fn list_virtual_machines(&self) -> Result<Vec<VirtualMachine>> {
        self.vcenter.check("list_virtual_machines")?;
        Ok(self.vcenter.lock().inventory.vms.clone())
    }

    async fn list_hosts(&self) -> Result<Vec<HostSystem>> {
        self.vcenter.check("list_hosts")?;
        Ok(self.vcenter.lock().inventory.hosts.clone())
    }

    async fn list_datastores(&self) -> Result<Vec<Datastore>> {
        self.vcenter.check("list_datastores")?;
        Ok(self.vcenter.lock().inventory.datastores.clone())
    }

    async fn list_clusters(&self) -> Result<Vec<ClusterComputeResource>> {
        self.vcenter.check("list_clusters")?;
        Ok(self.vcenter.lock().inventory.clusters.clone())
    }

    async fn list_resource_pools(&self) -> Result<Vec<ResourcePool>> {
        self.vcenter.check("list_resource_pools")?;
        Ok(self.vcenter.lock().inventory.pools.clone())
    }

    async fn list_content_library_items(&self) -> Result<Vec<ContentLibraryItem>> {
        self.vcenter.check("list_content_library_items")?;
        Ok(self.vcenter.lock().inventory.library_items.clone())
    }

    async fn host_networks(&self, host: &HostSystem) -> Result<Vec<Network>> {
        self.vcenter.check("host_networks")?;
        let state = self.vcenter.lock();
        Ok(state
            .inventory
            .host_networks
            .get(&host.mor.value)
            .cloned()
            .unwrap_or_default())
    }

    async fn query_portgroups(
        &self,
        host: &HostSystem,
    ) -> Result<Vec<DistributedVirtualPortgroupInfo>> {
        self.vcenter.check("query_portgroups")?;
        let state = self.vcenter.lock();
        Ok(state
            .inventory
            .portgroups
            .get(&host.mor.value)
            .cloned()
            .unwrap_or_default())
    }

    async fn find_datastore(
        &self,
        name: &str,
        datacenter: Option<&str>,
    ) -> Result<Option<Datastore>> {
        self.vcenter.check("find_datastore")?;
        let state = self.vcenter.lock();
        Ok(state
            .inventory
            .datastores
            .iter()
            .find(|d| {
                d.name == name && (datacenter.is_none() || d.datacenter.as_deref() == datacenter)
            })
            .cloned())
    }

    async fn power(&self, vm: &ManagedObjectRef, action: PowerAction) -> Result<()> {
        self.vcenter.check("power")?;
        let mut state = self.vcenter.lock();
        state
            .mutations
            .push(Mutation::Power(vm.value.clone(), action));

        let vms = &mut state.inventory.vms;
        let index = vms
            .iter()
            .position(|v| v.mor == *vm)
            .ok_or_else(|| VsphereError::VmNotFound(vm.value.clone()))?;
        match action {
            PowerAction::PowerOn | PowerAction::Reboot | PowerAction::HardReboot => {
                vms[index].power_state = VmPowerState::PoweredOn;
            }
            PowerAction::PowerOff | PowerAction::Shutdown => {
                vms[index].power_state = VmPowerState::PoweredOff;
            }
            PowerAction::Delete => {
                vms.remove(index);
            }
        }
        Ok(())
    }

    async fn reconfigure_disks(&self, vm: &ManagedObjectRef, specs: &[DiskSpec]) -> Result<()> {
        self.vcenter.check("reconfigure_disks")?;
        let mut state = self.vcenter.lock();
        state
            .mutations
            .push(Mutation::Reconfigure(vm.value.clone(), specs.to_vec()));

        let mut next_disk = state.next_disk;
        let config = state
            .inventory
            .vms
            .iter_mut()
            .find(|v| v.mor == *vm)
            .and_then(|v| v.config.as_mut())
            .ok_or_else(|| VsphereError::VmNotFound(vm.value.clone()))?;

        for spec in specs {
            match &spec.existing_uuid {
                Some(uuid) => {
                    let disk = config
                        .disks
                        .iter_mut()
                        .find(|d| &d.uuid == uuid)
                        .ok_or_else(|| VsphereError::DiskNotFound(uuid.clone()))?;
                    disk.capacity_in_kb = spec.capacity_in_kb;
                }
                None => {
                    next_disk += 1;
                    let key = 2000 + config.disks.len() as i32;
                    config.disks.push(VirtualDisk {
                        key,
                        uuid: format!("disk-new-{}", next_disk),
                        file_name: format!("[auto] {}/{}_{}.vmdk", vm.value, vm.value, next_disk),
                        capacity_in_kb: spec.capacity_in_kb,
                        datastore: spec.datastore.clone(),
                        thin_provisioned: spec.thin_provisioned,
                    });
                }
            }
        }
        state.next_disk = next_disk;
        Ok(())
    }
}

fn mor(kind: &str, value: &str) -> ManagedObjectRef {
    ManagedObjectRef::new(kind, value)
}

fn disk(uuid: &str, size_gb: u64, datastore: &str) -> VirtualDisk {
    VirtualDisk {
        key: 2000,
        uuid: uuid.to_string(),
        file_name: format!("[{}] {}.vmdk", datastore, uuid),
        capacity_in_kb: size_gb * KB_PER_GB,
        datastore: Some(mor("Datastore", datastore)),
        thin_provisioned: true,
    }
}

fn vm(
    id: &str,
    name: &str,
    instance_uuid: &str,
    host: &str,
    template: bool,
    disks: Vec<VirtualDisk>,
) -> VirtualMachine {
    VirtualMachine {
        mor: mor("VirtualMachine", id),
        name: name.to_string(),
        config: Some(VirtualMachineConfig {
            uuid: format!("42{}", instance_uuid),
            instance_uuid: instance_uuid.to_string(),
            template,
            guest_full_name: Some("CentOS 7 (64-bit)".to_string()),
            annotation: None,
            num_cpu: 2,
            memory_mb: 4096,
            disks,
        }),
        power_state: if template {
            VmPowerState::PoweredOff
        } else {
            VmPowerState::PoweredOn
        },
        host: Some(mor("HostSystem", host)),
        resource_pool: Some(mor("ResourcePool", "resgroup-2")),
        datacenter: Some("dc-1".to_string()),
        networks: vec![mor("Network", "network-12")],
        ip_addresses: vec![],
        guest_host_name: None,
        custom_values: BTreeMap::new(),
    }
}

fn host(id: &str, name: &str, cluster: Option<&str>, vms: &[&str]) -> HostSystem {
    HostSystem {
        mor: mor("HostSystem", id),
        name: name.to_string(),
        cluster: cluster.map(str::to_string),
        datacenter: Some("dc-1".to_string()),
        hardware: HostHardware {
            memory_size: 128 * BYTES_PER_GB,
            cpu_mhz: 2000,
            num_cpu_cores: 16,
        },
        quick_stats: HostQuickStats {
            overall_cpu_usage: 4000,
            overall_memory_usage: 32 * 1024,
        },
        vms: vms.iter().map(|v| mor("VirtualMachine", v)).collect(),
        networks: vec![],
    }
}

fn pool(id: &str, name: &str, parent: Option<&str>, children: &[&str]) -> ResourcePool {
    ResourcePool {
        mor: mor("ResourcePool", id),
        name: name.to_string(),
        parent: parent.map(|p| mor("ResourcePool", p)),
        children: children.iter().map(|c| mor("ResourcePool", c)).collect(),
        cpu: ResourcePoolUsage {
            reservation_used_for_vm: 500,
            unreserved_for_vm: 1500,
        },
        memory: ResourcePoolUsage {
            reservation_used_for_vm: BYTES_PER_GB,
            unreserved_for_vm: 3 * BYTES_PER_GB,
        },
    }
}

fn network(kind: &str, id: &str, name: &str) -> Network {
    Network {
        mor: mor(kind, id),
        name: name.to_string(),
    }
}

/// Small lab: one DRS cluster with two hosts, one standalone host
pub fn lab() -> Inventory {
    let mut second = disk("disk-b", 100, "datastore-12");
    second.key = 2001;

    let shared_networks = vec![
        network("Network", "network-12", "VM Network"),
        network("DistributedVirtualPortgroup", "dvportgroup-20", "prod-vlan20"),
        network("DistributedVirtualPortgroup", "dvportgroup-21", "DSwitch-DVUplinks"),
    ];
    let shared_portgroups = vec![
        DistributedVirtualPortgroupInfo {
            portgroup_name: "prod-vlan20".to_string(),
            portgroup_key: "dvportgroup-20".to_string(),
            uplink_portgroup: false,
        },
        DistributedVirtualPortgroupInfo {
            portgroup_name: "DSwitch-DVUplinks".to_string(),
            portgroup_key: "dvportgroup-21".to_string(),
            uplink_portgroup: true,
        },
    ];

    Inventory {
        vms: vec![
            vm(
                "vm-1",
                "web-01",
                "5001",
                "host-10",
                false,
                vec![disk("disk-a", 40, "datastore-11"), second],
            ),
            vm(
                "vm-2",
                "tpl-centos",
                "5002",
                "host-10",
                true,
                vec![disk("disk-t", 20, "datastore-11")],
            ),
            vm(
                "vm-3",
                "db-01",
                "5003",
                "host-11",
                false,
                vec![disk("disk-c", 200, "datastore-12")],
            ),
        ],
        hosts: vec![
            host("host-10", "esxi-01.lab", Some("cluster-a"), &["vm-1", "vm-2"]),
            host("host-11", "esxi-02.lab", Some("cluster-a"), &["vm-3"]),
            host("host-20", "esxi-03.lab", None, &[]),
        ],
        datastores: vec![
            Datastore {
                mor: mor("Datastore", "datastore-11"),
                name: "ssd-01".to_string(),
                datacenter: Some("dc-1".to_string()),
                capacity: 2048 * BYTES_PER_GB,
                free_space: 1024 * BYTES_PER_GB,
            },
            Datastore {
                mor: mor("Datastore", "datastore-12"),
                name: "hdd-01".to_string(),
                datacenter: Some("dc-1".to_string()),
                capacity: 8192 * BYTES_PER_GB,
                free_space: 4096 * BYTES_PER_GB,
            },
        ],
        clusters: vec![
            ClusterComputeResource {
                mor: mor("ClusterComputeResource", "domain-c7"),
                name: "cluster-a".to_string(),
                drs_config: ClusterDrsConfig {
                    enabled: true,
                    default_vm_behavior: DrsBehavior::FullyAutomated,
                },
                hosts: vec![mor("HostSystem", "host-10"), mor("HostSystem", "host-11")],
                resource_pool: Some(mor("ResourcePool", "resgroup-1")),
            },
            ClusterComputeResource {
                mor: mor("ClusterComputeResource", "domain-c9"),
                name: "cluster-b".to_string(),
                drs_config: ClusterDrsConfig {
                    enabled: false,
                    default_vm_behavior: DrsBehavior::Manual,
                },
                hosts: vec![],
                resource_pool: None,
            },
        ],
        pools: vec![
            pool("resgroup-1", "Resources", None, &["resgroup-2"]),
            pool("resgroup-2", "prod", Some("resgroup-1"), &["resgroup-2", "resgroup-3"]),
            pool("resgroup-3", "web", Some("resgroup-2"), &[]),
        ],
        library_items: vec![
            ContentLibraryItem {
                id: "lib-item-1".to_string(),
                name: Some("alpine-3.18".to_string()),
                description: Some("from catalog".to_string()),
                library_name: "golden".to_string(),
                item_type: "ovf".to_string(),
                guest_os: None,
                size: 2 * BYTES_PER_GB,
            },
            ContentLibraryItem {
                id: "lib-item-2".to_string(),
                name: None,
                description: None,
                library_name: "golden".to_string(),
                item_type: "ovf".to_string(),
                guest_os: None,
                size: 0,
            },
        ],
        host_networks: HashMap::from([
            ("host-10".to_string(), shared_networks.clone()),
            ("host-11".to_string(), shared_networks),
            (
                "host-20".to_string(),
                vec![network("Network", "network-30", "isolated")],
            ),
        ]),
        portgroups: HashMap::from([
            ("host-10".to_string(), shared_portgroups.clone()),
            ("host-11".to_string(), shared_portgroups),
        ]),
    }
}

pub fn credential() -> VsphereCredential {
    VsphereCredential::new("10.1.240.10", "administrator@vsphere.local", "secret")
}
