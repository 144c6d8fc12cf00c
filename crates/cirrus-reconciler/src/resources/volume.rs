//! Block storage volumes.
//!
//! Provisioning is deferred behind an order; size only grows, through a
//! dedicated expand call; an attached volume must be detached from its
//! server before deletion.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use cirrus_api::Volume;
use cirrus_api::request::{VolumeCreate, VolumeExpand, VolumeUpdate};
use cirrus_api::service::{OrderService, VolumeService};

use crate::context::OpContext;
use crate::diff::{self, AttributeSchema, Mutability};
use crate::error::ReconcileError;
use crate::order;
use crate::reconciler::Reconcile;

/// Desired configuration for one volume.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VolumeConfig {
    pub name: String,
    /// Size in GiB. Growth-only: a smaller value than the current remote
    /// size is left unchanged and reported as a warning.
    pub size: u64,
    pub location: u64,
    pub restore_from_snapshot: Option<u64>,
    pub attach_to_server: Option<u64>,
}

/// Last-synchronized record of one volume, persisted by the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VolumeState {
    pub id: u64,
    pub serial_number: String,
    pub name: String,
    pub size: u64,
    pub location: u64,
    /// The API does not remember which snapshot a volume was restored
    /// from, so this is carried over from the configuration at creation.
    pub restore_from_snapshot: Option<u64>,
    pub attach_to_server: Option<u64>,
}

impl VolumeState {
    fn from_entity(volume: &Volume, restore_from_snapshot: Option<u64>) -> Self {
        Self {
            id: volume.id,
            serial_number: volume.serial_number.clone(),
            name: volume.name.clone(),
            size: volume.size,
            location: volume.location.id,
            restore_from_snapshot,
            attach_to_server: volume.attached_to.as_ref().map(|server| server.id),
        }
    }
}

const SCHEMA: &[AttributeSchema] = &[
    AttributeSchema::new("id", Mutability::Computed),
    AttributeSchema::new("serial_number", Mutability::Computed),
    AttributeSchema::new("name", Mutability::Mutable),
    AttributeSchema::new("size", Mutability::Mutable),
    AttributeSchema::new("location", Mutability::Immutable),
    AttributeSchema::new("restore_from_snapshot", Mutability::Immutable),
    // Attachment changes go through the dedicated attach/detach sub-calls,
    // not through an in-place update of this resource.
    AttributeSchema::new("attach_to_server", Mutability::Immutable),
];

pub struct VolumeReconciler {
    volumes: Arc<dyn VolumeService>,
    orders: Arc<dyn OrderService>,
}

impl VolumeReconciler {
    pub fn new(volumes: Arc<dyn VolumeService>, orders: Arc<dyn OrderService>) -> Self {
        Self { volumes, orders }
    }
}

impl Reconcile for VolumeReconciler {
    type Config = VolumeConfig;
    type State = VolumeState;

    async fn create(
        &self,
        ctx: &OpContext,
        desired: &VolumeConfig,
    ) -> Result<VolumeState, ReconcileError> {
        let create = VolumeCreate {
            name: desired.name.clone(),
            size: desired.size,
            location_id: desired.location,
            snapshot_id: desired.restore_from_snapshot,
            instance_id: desired.attach_to_server,
        };

        let ordering = self.volumes.create(create).await?;
        let volume_id = order::wait_until_processed(ctx, &*self.orders, ordering).await?;

        // Read back so the record carries the server-assigned serial number.
        let volume = self.volumes.get(volume_id).await?;
        tracing::info!(id = volume.id, name = %volume.name, "created volume");

        Ok(VolumeState::from_entity(
            &volume,
            desired.restore_from_snapshot,
        ))
    }

    async fn read(
        &self,
        _ctx: &OpContext,
        current: &VolumeState,
    ) -> Result<VolumeState, ReconcileError> {
        let volume = self
            .volumes
            .get(current.id)
            .await
            .map_err(|e| ReconcileError::from_read(format!("volume {}", current.id), e))?;

        Ok(VolumeState::from_entity(
            &volume,
            current.restore_from_snapshot,
        ))
    }

    async fn update(
        &self,
        ctx: &OpContext,
        previous: &VolumeState,
        desired: &VolumeConfig,
    ) -> Result<VolumeState, ReconcileError> {
        let changes = diff::changes(
            SCHEMA,
            &serde_json::to_value(previous)?,
            &serde_json::to_value(desired)?,
        )?;
        if changes.is_empty() {
            return Ok(previous.clone());
        }

        let mut volume = None;

        if diff::touches(&changes, "name") {
            let update = VolumeUpdate {
                name: desired.name.clone(),
            };
            volume = Some(self.volumes.update(previous.id, update).await?);
            tracing::debug!(id = previous.id, name = %desired.name, "renamed volume");
        }

        if desired.size < previous.size {
            ctx.warn(
                "volume resize not possible",
                format!(
                    "the requested size ({} GiB) is smaller than the current size ({} GiB); \
                     the volume keeps its current size",
                    desired.size, previous.size
                ),
            );
        } else if desired.size > previous.size {
            let expand = VolumeExpand { size: desired.size };
            volume = Some(self.volumes.expand(previous.id, expand).await?);
            tracing::debug!(id = previous.id, size = desired.size, "expanded volume");
        }

        Ok(match volume {
            Some(volume) => VolumeState::from_entity(&volume, previous.restore_from_snapshot),
            None => previous.clone(),
        })
    }

    async fn delete(&self, _ctx: &OpContext, current: &VolumeState) -> Result<(), ReconcileError> {
        if let Some(server_id) = current.attach_to_server {
            match self.volumes.detach(current.id, server_id).await {
                Ok(()) => {
                    tracing::debug!(id = current.id, server = server_id, "detached volume");
                }
                Err(e) if e.is_not_found() => {}
                Err(e) => return Err(e.into()),
            }
        }

        match self.volumes.delete(current.id).await {
            Ok(()) => {
                tracing::info!(id = current.id, "deleted volume");
                Ok(())
            }
            Err(e) if e.is_not_found() => {
                tracing::debug!(id = current.id, "volume already absent");
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }
}
