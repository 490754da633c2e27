//! vSphere records to normalized entities
//!
//! Lookup caches are plain maps built once per adapter call and borrowed by
//! the mappers; nothing here talks to vCenter.

use crate::error::Result;
use crate::vim::{
    ClusterComputeResource, ClusterDrsConfig, ContentLibraryItem, Datastore, DrsBehavior,
    DistributedVirtualPortgroupInfo, HostSystem, ManagedObjectRef, Network, ResourcePool,
    VirtualMachine, VmPowerState,
};
use f2c_cloud::mapping::{bytes_to_gb, kb_to_gb, mb_to_gb};
use f2c_cloud::{
    F2CCluster, F2CDisk, F2CHost, F2CImage, F2CNetwork, F2CResourcePool, F2CVirtualMachine,
    PowerState,
};
use std::collections::HashMap;

/// Hosts keyed by managed object id
pub type HostCache<'a> = HashMap<&'a str, &'a HostSystem>;

/// Datastores keyed by managed object id
pub type DatastoreCache<'a> = HashMap<&'a str, &'a Datastore>;

/// Virtual machines keyed by managed object id
pub type VmCache<'a> = HashMap<&'a str, &'a VirtualMachine>;

/// Resource pools keyed by managed object id
pub type PoolIndex<'a> = HashMap<&'a str, &'a ResourcePool>;

const DEFAULT_OS: &str = "linux";
const DVSWITCH: &str = "dvSwitch";

pub fn host_cache(hosts: &[HostSystem]) -> HostCache<'_> {
    hosts.iter().map(|h| (h.mor.value.as_str(), h)).collect()
}

pub fn datastore_cache(datastores: &[Datastore]) -> DatastoreCache<'_> {
    datastores.iter().map(|d| (d.mor.value.as_str(), d)).collect()
}

pub fn vm_cache(vms: &[VirtualMachine]) -> VmCache<'_> {
    vms.iter().map(|vm| (vm.mor.value.as_str(), vm)).collect()
}

pub fn pool_index(pools: &[ResourcePool]) -> PoolIndex<'_> {
    pools.iter().map(|p| (p.mor.value.as_str(), p)).collect()
}

pub fn to_power_state(state: VmPowerState) -> PowerState {
    match state {
        VmPowerState::PoweredOn => PowerState::Running,
        VmPowerState::PoweredOff => PowerState::Stopped,
        VmPowerState::Suspended => PowerState::Suspended,
    }
}

/// Normalize a virtual machine; templates and VMs without config yield `None`
pub fn to_f2c_instance(
    vm: &VirtualMachine,
    hosts: &HostCache<'_>,
    datastores: &DatastoreCache<'_>,
) -> Option<F2CVirtualMachine> {
    let config = vm.config.as_ref()?;
    if config.template {
        return None;
    }

    let host = vm
        .host
        .as_ref()
        .and_then(|h| hosts.get(h.value.as_str()).copied());

    Some(F2CVirtualMachine {
        instance_uuid: config.instance_uuid.clone(),
        name: vm.name.clone(),
        region: vm
            .datacenter
            .clone()
            .or_else(|| host.and_then(|h| h.datacenter.clone())),
        zone: host.and_then(|h| h.cluster.clone()),
        host_id: vm.host.as_ref().map(|h| h.value.clone()),
        host_name: host.map(|h| h.name.clone()),
        resource_pool_id: vm.resource_pool.as_ref().map(|p| p.value.clone()),
        power_state: to_power_state(vm.power_state),
        cpu: config.num_cpu,
        memory: mb_to_gb(config.memory_mb),
        os: config.guest_full_name.clone(),
        hostname: vm.guest_host_name.clone(),
        ip_addresses: vm.ip_addresses.clone(),
        network_ids: vm.networks.iter().map(|n| n.value.clone()).collect(),
        disks: to_f2c_disks(vm, vm.host.as_ref(), hosts, datastores),
        tags: vm.custom_values.clone(),
    })
}

/// Normalize every disk of `vm`; the first disk is the boot disk
pub fn to_f2c_disks(
    vm: &VirtualMachine,
    host: Option<&ManagedObjectRef>,
    hosts: &HostCache<'_>,
    datastores: &DatastoreCache<'_>,
) -> Vec<F2CDisk> {
    let cached_host = host.and_then(|h| hosts.get(h.value.as_str()).copied());

    vm.disks()
        .iter()
        .enumerate()
        .map(|(index, disk)| {
            let datastore = disk
                .datastore
                .as_ref()
                .and_then(|d| datastores.get(d.value.as_str()).copied());

            F2CDisk {
                disk_id: disk.uuid.clone(),
                size: kb_to_gb(disk.capacity_in_kb),
                datastore_id: disk.datastore.as_ref().map(|d| d.value.clone()),
                datastore_name: datastore.map(|d| d.name.clone()),
                instance_uuid: vm.instance_uuid().map(str::to_string),
                host_id: host.map(|h| h.value.clone()),
                region: vm
                    .datacenter
                    .clone()
                    .or_else(|| cached_host.and_then(|h| h.datacenter.clone())),
                zone: cached_host.and_then(|h| h.cluster.clone()),
                device: Some(disk.file_name.clone()),
                disk_type: Some(disk_type(disk.thin_provisioned).to_string()),
                bootable: index == 0,
                delete_with_instance: true,
            }
        })
        .collect()
}

fn disk_type(thin_provisioned: bool) -> &'static str {
    if thin_provisioned { "THIN" } else { "THICK" }
}

/// Template to image; the template name doubles as the image id
pub fn template_to_image(vm: &VirtualMachine) -> Result<F2CImage> {
    let config = vm.config.as_ref();
    let disks = vm.disks();
    let total_kb: u64 = disks.iter().map(|d| d.capacity_in_kb).sum();

    Ok(F2CImage {
        id: vm.name.clone(),
        name: Some(vm.name.clone()),
        description: config
            .and_then(|c| c.annotation.clone())
            .unwrap_or_default(),
        os: config
            .and_then(|c| c.guest_full_name.clone())
            .unwrap_or_else(|| DEFAULT_OS.to_string()),
        region: vm.datacenter.clone(),
        disk_size: kb_to_gb(total_kb),
        disk_infos: Some(serde_json::to_string(disks)?),
    })
}

pub fn library_item_to_image(item: &ContentLibraryItem) -> F2CImage {
    F2CImage {
        id: item.id.clone(),
        name: item.name.clone(),
        description: item.description.clone().unwrap_or_default(),
        os: item
            .guest_os
            .clone()
            .unwrap_or_else(|| DEFAULT_OS.to_string()),
        region: None,
        disk_size: bytes_to_gb(item.size),
        disk_infos: None,
    }
}

/// Networks visible from one host, uplink portgroups removed
pub fn to_f2c_networks(
    networks: &[Network],
    portgroups: &[DistributedVirtualPortgroupInfo],
) -> Vec<F2CNetwork> {
    networks
        .iter()
        .filter(|network| {
            !portgroups
                .iter()
                .any(|pg| pg.uplink_portgroup && pg.portgroup_name == network.name)
        })
        .map(|network| {
            let description = if network.mor.is_standard_network() {
                ""
            } else {
                DVSWITCH
            };
            F2CNetwork::new(&network.mor.value, &network.name, description)
        })
        .collect()
}

/// Human readable DRS status shown next to each cluster
pub fn drs_status(config: &ClusterDrsConfig) -> String {
    if !config.enabled {
        return "DRS disabled".to_string();
    }
    let level = match config.default_vm_behavior {
        DrsBehavior::Manual => "manual",
        DrsBehavior::PartiallyAutomated => "partially automated",
        DrsBehavior::FullyAutomated => "fully automated",
    };
    format!("DRS enabled [{}]", level)
}

pub fn to_f2c_cluster(cluster: &ClusterComputeResource) -> F2CCluster {
    F2CCluster {
        name: cluster.name.clone(),
        description: drs_status(&cluster.drs_config),
        value: cluster.name.clone(),
    }
}

pub fn to_f2c_host(host: &HostSystem) -> F2CHost {
    let hw = &host.hardware;
    F2CHost {
        id: host.mor.value.clone(),
        name: host.name.clone(),
        total_cpu: u64::from(hw.cpu_mhz) * u64::from(hw.num_cpu_cores),
        used_cpu: host.quick_stats.overall_cpu_usage,
        total_memory: bytes_to_gb(hw.memory_size),
        used_memory: mb_to_gb(host.quick_stats.overall_memory_usage),
    }
}

pub fn to_f2c_resource_pool(pool: &ResourcePool, path: String) -> F2CResourcePool {
    F2CResourcePool {
        id: pool.mor.value.clone(),
        name: path,
        total_cpu: pool.cpu.reservation_used_for_vm + pool.cpu.unreserved_for_vm,
        used_cpu: pool.cpu.reservation_used_for_vm,
        total_memory: bytes_to_gb(
            pool.memory.reservation_used_for_vm + pool.memory.unreserved_for_vm,
        ),
        used_memory: bytes_to_gb(pool.memory.reservation_used_for_vm),
    }
}

/// Whether `child` really hangs below `pool`
///
/// vCenter can list a pool among its own children; such entries, and
/// entries whose parent points elsewhere, are not descended into.
fn is_child_of(child: &ResourcePool, pool: &ResourcePool) -> bool {
    child.mor.value != pool.mor.value
        && child
            .parent
            .as_ref()
            .is_some_and(|parent| parent.value == pool.mor.value)
}

/// Flatten the pool tree rooted at `pool`, depth first
pub fn walk_resource_pools(
    pool: &ResourcePool,
    parent_path: &str,
    pools: &PoolIndex<'_>,
) -> Vec<F2CResourcePool> {
    let path = if parent_path.is_empty() {
        pool.name.clone()
    } else {
        format!("{}/{}", parent_path, pool.name)
    };

    let mut result = vec![to_f2c_resource_pool(pool, path.clone())];
    for child_ref in &pool.children {
        let Some(child) = pools.get(child_ref.value.as_str()) else {
            continue;
        };
        if is_child_of(child, pool) {
            result.extend(walk_resource_pools(child, &path, pools));
        }
    }
    result
}

/// Pools below a cluster's root pool; the root itself is not listed
pub fn cluster_resource_pools(root: &ResourcePool, pools: &PoolIndex<'_>) -> Vec<F2CResourcePool> {
    root.children
        .iter()
        .filter_map(|child_ref| pools.get(child_ref.value.as_str()).copied())
        .filter(|child| is_child_of(child, root))
        .flat_map(|child| walk_resource_pools(child, "", pools))
        .collect()
}
