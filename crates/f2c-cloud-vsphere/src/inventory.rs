//! Inventory queries against vCenter

use crate::credential::VsphereCredential;
use crate::disk::{current_disks, find_vm};
use crate::error::{Result, VsphereError};
use crate::mapping::{
    cluster_resource_pools, datastore_cache, host_cache, library_item_to_image, pool_index,
    template_to_image, to_f2c_cluster, to_f2c_disks, to_f2c_host, to_f2c_instance,
    to_f2c_networks, vm_cache,
};
use crate::provider::VsphereProvider;
use crate::vim::{HostSystem, VimSession};
use async_trait::async_trait;
use f2c_cloud::adapter::{LOCATION_DRS, LOCATION_HOST, LOCATION_POOL};
use f2c_cloud::mapping::{dedup_networks, merge_images};
use f2c_cloud::{
    CloudError, Connector, F2CCluster, F2CDisk, F2CHost, F2CImage, F2CLocation, F2CNetwork,
    F2CResourcePool, F2CVirtualMachine, InventoryAdapter, NetworkQuery, Provider,
};

/// Leading network entry meaning "keep the template's NIC settings"
pub const TEMPLATE_DEFAULT_NETWORK_ID: &str = "template-default";
const TEMPLATE_DEFAULT_NETWORK_NAME: &str = "Template default";

fn template_default_network() -> F2CNetwork {
    F2CNetwork::new(TEMPLATE_DEFAULT_NETWORK_ID, TEMPLATE_DEFAULT_NETWORK_NAME, "")
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

async fn virtual_machines<S: VimSession>(session: &S) -> Result<Vec<F2CVirtualMachine>> {
    let vms = session.list_virtual_machines().await?;
    if vms.is_empty() {
        return Ok(Vec::new());
    }
    let hosts = session.list_hosts().await?;
    let datastores = session.list_datastores().await?;

    let hosts = host_cache(&hosts);
    let datastores = datastore_cache(&datastores);
    Ok(vms
        .iter()
        .filter_map(|vm| to_f2c_instance(vm, &hosts, &datastores))
        .collect())
}

async fn images<S: VimSession>(session: &S, use_content_library: bool) -> Result<Vec<F2CImage>> {
    let templates = session
        .list_templates()
        .await?
        .iter()
        .map(template_to_image)
        .collect::<Result<Vec<_>>>()?;

    let catalog = if use_content_library {
        match session.list_content_library_items().await {
            Ok(items) => items.iter().map(library_item_to_image).collect(),
            Err(e) => {
                tracing::warn!(error = %e, "Content library unavailable, listing templates only");
                Vec::new()
            }
        }
    } else {
        Vec::new()
    };

    Ok(merge_images(templates, catalog))
}

async fn disks<S: VimSession>(session: &S) -> Result<Vec<F2CDisk>> {
    let vms = session.list_virtual_machines().await?;
    let hosts = session.list_hosts().await?;
    let datastores = session.list_datastores().await?;

    let host_index = host_cache(&hosts);
    let datastore_index = datastore_cache(&datastores);
    let vm_index = vm_cache(&vms);

    let mut result = Vec::new();
    for host in &hosts {
        for vm_ref in &host.vms {
            let Some(vm) = vm_index.get(vm_ref.value.as_str()) else {
                continue;
            };
            if vm.is_template() {
                continue;
            }
            result.extend(to_f2c_disks(
                vm,
                Some(&host.mor),
                &host_index,
                &datastore_index,
            ));
        }
    }
    Ok(result)
}

async fn vm_disks<S: VimSession>(session: &S, instance_uuid: &str) -> Result<Vec<F2CDisk>> {
    let vm = find_vm(session, instance_uuid).await?;
    current_disks(session, &vm).await
}

async fn clusters<S: VimSession>(session: &S) -> Result<Vec<F2CCluster>> {
    let clusters = session.list_clusters().await?;
    Ok(clusters.iter().map(to_f2c_cluster).collect())
}

async fn scan_networks<S: VimSession>(
    session: &S,
    hosts: &[&HostSystem],
) -> Result<Vec<F2CNetwork>> {
    let mut networks = Vec::new();
    for host in hosts {
        let host_networks = session.host_networks(host).await?;
        let portgroups = session.query_portgroups(host).await?;
        networks.extend(to_f2c_networks(&host_networks, &portgroups));
    }
    Ok(networks)
}

async fn networks<S: VimSession>(session: &S, query: &NetworkQuery) -> Result<Vec<F2CNetwork>> {
    let mut result = vec![template_default_network()];
    let all_hosts = session.list_hosts().await?;

    if query.targets_explicit_hosts() {
        let selected: Vec<&HostSystem> = query
            .hosts
            .iter()
            .filter_map(|wanted| {
                let found = all_hosts
                    .iter()
                    .find(|h| h.name == *wanted || h.mor.value == *wanted);
                if found.is_none() {
                    tracing::debug!(host = %wanted, "Requested host not found, skipping");
                }
                found
            })
            .collect();
        result.extend(scan_networks(session, &selected).await?);
    } else if let Some(name) = non_blank(query.cluster.as_deref()) {
        match session.find_cluster(name).await? {
            Some(cluster) => {
                let selected: Vec<&HostSystem> = all_hosts
                    .iter()
                    .filter(|h| cluster.hosts.contains(&h.mor))
                    .collect();
                result.extend(scan_networks(session, &selected).await?);
            }
            None => tracing::debug!(cluster = name, "Cluster not found, no networks scanned"),
        }
    }

    Ok(dedup_networks(result))
}

async fn hosts<S: VimSession>(session: &S, cluster: Option<&str>) -> Result<Vec<F2CHost>> {
    let hosts = match non_blank(cluster) {
        Some(name) => {
            let cluster = session
                .find_cluster(name)
                .await?
                .ok_or_else(|| VsphereError::ClusterNotFound(name.to_string()))?;
            session.cluster_hosts(&cluster).await?
        }
        None => session.list_hosts().await?,
    };
    Ok(hosts.iter().map(to_f2c_host).collect())
}

async fn resource_pools<S: VimSession>(
    session: &S,
    cluster: Option<&str>,
) -> Result<Vec<F2CResourcePool>> {
    let Some(name) = non_blank(cluster) else {
        return Ok(Vec::new());
    };
    let cluster = session
        .find_cluster(name)
        .await?
        .ok_or_else(|| VsphereError::ClusterNotFound(name.to_string()))?;
    let Some(root_ref) = cluster.resource_pool.as_ref() else {
        return Ok(Vec::new());
    };

    let pools = session.list_resource_pools().await?;
    let index = pool_index(&pools);
    Ok(index
        .get(root_ref.value.as_str())
        .map(|root| cluster_resource_pools(root, &index))
        .unwrap_or_default())
}

async fn drs_enabled<S: VimSession>(session: &S, cluster: &str) -> Result<bool> {
    let Some(cluster) = non_blank(Some(cluster)) else {
        return Ok(false);
    };
    Ok(session
        .find_cluster(cluster)
        .await?
        .is_some_and(|c| c.drs_config.enabled))
}

#[async_trait]
impl<C> InventoryAdapter for VsphereProvider<C>
where
    C: Connector<Credential = VsphereCredential>,
    C::Session: VimSession,
{
    fn provider(&self) -> Provider {
        Provider::Vsphere
    }

    async fn list_virtual_machines(&self) -> f2c_cloud::Result<Vec<F2CVirtualMachine>> {
        self.run("list_virtual_machines", |session| async move {
            virtual_machines(&*session).await.map_err(CloudError::from)
        })
        .await
    }

    async fn list_images(&self) -> f2c_cloud::Result<Vec<F2CImage>> {
        let use_content_library = self.credential().use_content_library;
        self.run("list_images", |session| async move {
            images(&*session, use_content_library)
                .await
                .map_err(CloudError::from)
        })
        .await
    }

    async fn list_disks(&self) -> f2c_cloud::Result<Vec<F2CDisk>> {
        self.run("list_disks", |session| async move {
            disks(&*session).await.map_err(CloudError::from)
        })
        .await
    }

    async fn list_vm_disks(&self, instance_uuid: &str) -> f2c_cloud::Result<Vec<F2CDisk>> {
        self.run("list_vm_disks", |session| async move {
            vm_disks(&*session, instance_uuid)
                .await
                .map_err(CloudError::from)
        })
        .await
    }

    async fn get_clusters(&self) -> f2c_cloud::Result<Vec<F2CCluster>> {
        self.run("get_clusters", |session| async move {
            clusters(&*session).await.map_err(CloudError::from)
        })
        .await
    }

    async fn get_networks(&self, query: &NetworkQuery) -> f2c_cloud::Result<Vec<F2CNetwork>> {
        self.run("get_networks", |session| async move {
            networks(&*session, query).await.map_err(CloudError::from)
        })
        .await
    }

    async fn get_hosts(&self, cluster: Option<&str>) -> f2c_cloud::Result<Vec<F2CHost>> {
        self.run("get_hosts", |session| async move {
            hosts(&*session, cluster).await.map_err(CloudError::from)
        })
        .await
    }

    async fn get_resource_pools(
        &self,
        cluster: Option<&str>,
    ) -> f2c_cloud::Result<Vec<F2CResourcePool>> {
        self.run("get_resource_pools", |session| async move {
            resource_pools(&*session, cluster)
                .await
                .map_err(CloudError::from)
        })
        .await
    }

    async fn get_locations(&self, cluster: &str) -> Vec<F2CLocation> {
        let mut locations = vec![
            F2CLocation::new("Host", LOCATION_HOST),
            F2CLocation::new("Resource pool", LOCATION_POOL),
        ];

        let drs = self
            .run("get_locations", |session| async move {
                drs_enabled(&*session, cluster)
                    .await
                    .map_err(CloudError::from)
            })
            .await;
        match drs {
            Ok(true) => locations.push(F2CLocation::new("Automatic selection", LOCATION_DRS)),
            Ok(false) => {}
            Err(e) => {
                tracing::warn!(
                    cluster,
                    error = %e,
                    "Could not read DRS config, treating as disabled"
                );
            }
        }
        locations
    }
}
