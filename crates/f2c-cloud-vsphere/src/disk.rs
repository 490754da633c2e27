//! Disk creation and growth
//!
//! vCenter does not report the ids of disks added by `ReconfigVM_Task`, so
//! creation snapshots the disk ids before the edit and returns whatever
//! appeared afterwards.

use crate::error::{Result, VsphereError};
use crate::mapping::{datastore_cache, host_cache, to_f2c_disks};
use crate::vim::{Datastore, DiskSpec, VimSession, VirtualMachine};
use f2c_cloud::mapping::KB_PER_GB;
use f2c_cloud::{CreateDisksRequest, F2CDisk, ResizeDiskRequest};
use std::collections::{HashMap, HashSet};

/// Datastore name asking vCenter to place the disk next to the VM's files
pub const AUTO_PLACEMENT_DATASTORE: &str = "__auto__";

pub(crate) async fn find_vm<S: VimSession>(
    session: &S,
    instance_uuid: &str,
) -> Result<VirtualMachine> {
    session
        .find_vm_by_uuid(instance_uuid)
        .await?
        .ok_or_else(|| VsphereError::VmNotFound(instance_uuid.to_string()))
}

/// Normalized disks of `vm` as currently attached
pub(crate) async fn current_disks<S: VimSession>(
    session: &S,
    vm: &VirtualMachine,
) -> Result<Vec<F2CDisk>> {
    let hosts = session.list_hosts().await?;
    let datastores = session.list_datastores().await?;
    Ok(to_f2c_disks(
        vm,
        vm.host.as_ref(),
        &host_cache(&hosts),
        &datastore_cache(&datastores),
    ))
}

fn capacity_in_kb(size_in_gb: u64) -> Result<u64> {
    size_in_gb.checked_mul(KB_PER_GB).ok_or_else(|| {
        VsphereError::InvalidDiskRequest(format!("disk size {} GB is out of range", size_in_gb))
    })
}

fn is_thin(disk: &F2CDisk) -> bool {
    !disk
        .disk_type
        .as_deref()
        .is_some_and(|t| t.eq_ignore_ascii_case("THICK"))
}

/// Datastore lookups done within one edit, keyed by name
struct DatastoreResolver<'a, S> {
    session: &'a S,
    datacenter: Option<&'a str>,
    resolved: HashMap<String, Datastore>,
}

impl<'a, S: VimSession> DatastoreResolver<'a, S> {
    fn new(session: &'a S, vm: &'a VirtualMachine) -> Self {
        Self {
            session,
            datacenter: vm.datacenter.as_deref(),
            resolved: HashMap::new(),
        }
    }

    async fn resolve(&mut self, name: &str) -> Result<Datastore> {
        if let Some(datastore) = self.resolved.get(name) {
            return Ok(datastore.clone());
        }
        let datastore = self
            .session
            .find_datastore(name, self.datacenter)
            .await?
            .ok_or_else(|| {
                VsphereError::InvalidDiskRequest(format!("Datastore not found: {}", name))
            })?;
        self.resolved.insert(name.to_string(), datastore.clone());
        Ok(datastore)
    }
}

/// Translate normalized disks into device changes and apply them
///
/// Disks with an id grow the existing device; disks without one are added.
/// A new disk needs a datastore name, [`AUTO_PLACEMENT_DATASTORE`] included.
/// Every datastore is resolved before the single reconfigure call.
pub(crate) async fn edit_disks<S: VimSession>(
    session: &S,
    vm: &VirtualMachine,
    disks: &[F2CDisk],
) -> Result<()> {
    if disks.is_empty() {
        return Err(VsphereError::InvalidDiskRequest(
            "at least one disk must be specified".to_string(),
        ));
    }

    let mut resolver = DatastoreResolver::new(session, vm);
    let mut specs = Vec::with_capacity(disks.len());
    for disk in disks {
        let existing_uuid = Some(disk.disk_id.clone()).filter(|id| !id.is_empty());
        let name = disk
            .datastore_name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty());

        let datastore = match name {
            Some(AUTO_PLACEMENT_DATASTORE) => None,
            Some(name) => Some(resolver.resolve(name).await?.mor),
            None if existing_uuid.is_some() => None,
            None => {
                return Err(VsphereError::InvalidDiskRequest(
                    "Datastore not specified".to_string(),
                ));
            }
        };

        specs.push(DiskSpec {
            existing_uuid,
            capacity_in_kb: capacity_in_kb(disk.size)?,
            datastore,
            thin_provisioned: is_thin(disk),
        });
    }

    tracing::info!(vm = %vm.name, changes = specs.len(), "Reconfiguring virtual machine disks");
    session.reconfigure_disks(&vm.mor, &specs).await
}

pub(crate) async fn create_disks<S: VimSession>(
    session: &S,
    request: &CreateDisksRequest,
) -> Result<Vec<F2CDisk>> {
    let vm = find_vm(session, &request.instance_uuid).await?;
    let before: HashSet<String> = vm.disks().iter().map(|d| d.uuid.clone()).collect();

    let new_disks: Vec<F2CDisk> = request
        .disks
        .iter()
        .cloned()
        .map(|mut disk| {
            disk.disk_id.clear();
            disk
        })
        .collect();
    edit_disks(session, &vm, &new_disks).await?;

    let vm = find_vm(session, &request.instance_uuid).await?;
    let after = current_disks(session, &vm).await?;
    Ok(after
        .into_iter()
        .filter(|d| !before.contains(&d.disk_id))
        .collect())
}

/// Grow one disk to `new_size` GB
///
/// Compared in KB against the vendor capacity; the new capacity never falls
/// below it.
pub(crate) async fn enlarge_disk<S: VimSession>(
    session: &S,
    request: &ResizeDiskRequest,
) -> Result<()> {
    let vm = find_vm(session, &request.instance_uuid).await?;
    let current_kb = vm
        .disks()
        .iter()
        .find(|d| d.uuid.eq_ignore_ascii_case(&request.disk_id))
        .map(|d| d.capacity_in_kb)
        .ok_or_else(|| VsphereError::DiskNotFound(request.disk_id.clone()))?;
    let mut disk = current_disks(session, &vm)
        .await?
        .into_iter()
        .find(|d| d.disk_id.eq_ignore_ascii_case(&request.disk_id))
        .ok_or_else(|| VsphereError::DiskNotFound(request.disk_id.clone()))?;

    if capacity_in_kb(request.new_size)? < current_kb {
        return Err(VsphereError::InvalidDiskRequest(format!(
            "disk {} cannot shrink from {} KB to {} GB",
            disk.disk_id, current_kb, request.new_size
        )));
    }

    disk.size = request.new_size;
    edit_disks(session, &vm, std::slice::from_ref(&disk)).await
}
