//! Power and disk mutations

use crate::credential::VsphereCredential;
use crate::disk::{self, find_vm};
use crate::error::Result;
use crate::provider::VsphereProvider;
use crate::vim::{VimSession, VmPowerState};
use async_trait::async_trait;
use f2c_cloud::{
    CloudError, Connector, CreateDisksRequest, F2CDisk, LifecycleAdapter, PowerAction,
    ResizeDiskRequest,
};

async fn apply_power<S: VimSession>(
    session: &S,
    instance_uuid: &str,
    action: PowerAction,
) -> Result<()> {
    let vm = find_vm(session, instance_uuid).await?;

    // vCenter refuses to destroy a running VM
    if action == PowerAction::Delete && vm.power_state == VmPowerState::PoweredOn {
        session.power(&vm.mor, PowerAction::PowerOff).await?;
    }

    session.power(&vm.mor, action).await?;
    tracing::info!(vm = %vm.name, instance_uuid, %action, "Power operation completed");
    Ok(())
}

#[async_trait]
impl<C> LifecycleAdapter for VsphereProvider<C>
where
    C: Connector<Credential = VsphereCredential>,
    C::Session: VimSession,
{
    async fn power(&self, instance_uuid: &str, action: PowerAction) -> bool {
        let operation = action.to_string();
        let result = self
            .run(&operation, |session| async move {
                apply_power(&*session, instance_uuid, action)
                    .await
                    .map_err(CloudError::from)
            })
            .await;

        match result {
            Ok(()) => {
                self.last_error.clear(instance_uuid);
                true
            }
            Err(e) => {
                self.last_error.set(
                    instance_uuid,
                    format!("{} {} failed: {}", action, instance_uuid, e),
                );
                false
            }
        }
    }

    fn last_error(&self, instance_uuid: &str) -> Option<String> {
        self.last_error.get(instance_uuid)
    }

    async fn create_disks(&self, request: &CreateDisksRequest) -> f2c_cloud::Result<Vec<F2CDisk>> {
        if request.disks.is_empty() {
            return Err(CloudError::Validation("disk list is empty".to_string()));
        }
        self.run("create_disks", |session| async move {
            disk::create_disks(&*session, request)
                .await
                .map_err(CloudError::from)
        })
        .await
    }

    async fn enlarge_disk(&self, request: &ResizeDiskRequest) -> f2c_cloud::Result<()> {
        self.run("enlarge_disk", |session| async move {
            disk::enlarge_disk(&*session, request)
                .await
                .map_err(CloudError::from)
        })
        .await
    }
}
