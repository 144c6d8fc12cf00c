//! Volume snapshots.
//!
//! Creation is synchronous at the API level but the snapshot may come back
//! still in `Creating`; the reconciler polls it out of that status before
//! returning so the host never persists a half-baked record.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use cirrus_api::request::{SnapshotCreate, SnapshotUpdate};
use cirrus_api::service::SnapshotService;
use cirrus_api::{Snapshot, SnapshotStatus};

use crate::context::OpContext;
use crate::diff::{self, AttributeSchema, Mutability};
use crate::error::ReconcileError;
use crate::reconciler::Reconcile;
use crate::wait;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotConfig {
    pub name: String,
    pub volume: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotState {
    pub id: u64,
    pub name: String,
    pub size: u64,
    pub volume: u64,
}

impl SnapshotState {
    fn from_entity(snapshot: &Snapshot) -> Self {
        Self {
            id: snapshot.id,
            name: snapshot.name.clone(),
            size: snapshot.size,
            volume: snapshot.volume.id,
        }
    }
}

const SCHEMA: &[AttributeSchema] = &[
    AttributeSchema::new("id", Mutability::Computed),
    AttributeSchema::new("size", Mutability::Computed),
    AttributeSchema::new("name", Mutability::Mutable),
    AttributeSchema::new("volume", Mutability::Immutable),
];

pub struct SnapshotReconciler {
    snapshots: Arc<dyn SnapshotService>,
}

impl SnapshotReconciler {
    pub fn new(snapshots: Arc<dyn SnapshotService>) -> Self {
        Self { snapshots }
    }
}

impl Reconcile for SnapshotReconciler {
    type Config = SnapshotConfig;
    type State = SnapshotState;

    async fn create(
        &self,
        ctx: &OpContext,
        desired: &SnapshotConfig,
    ) -> Result<SnapshotState, ReconcileError> {
        let create = SnapshotCreate {
            name: desired.name.clone(),
            volume_id: desired.volume,
        };

        let mut snapshot = self.snapshots.create(create).await?;
        tracing::info!(id = snapshot.id, name = %snapshot.name, "created snapshot");

        if snapshot.status == SnapshotStatus::Creating {
            let snapshots = &*self.snapshots;
            let id = snapshot.id;
            wait::wait_for_condition(
                ctx,
                "snapshot to finish creating",
                wait::POLL_INTERVAL,
                || async move {
                    let snapshot = snapshots.get(id).await?;
                    Ok(snapshot.status != SnapshotStatus::Creating)
                },
            )
            .await?;

            snapshot = self.snapshots.get(snapshot.id).await?;
        }

        Ok(SnapshotState::from_entity(&snapshot))
    }

    async fn read(
        &self,
        _ctx: &OpContext,
        current: &SnapshotState,
    ) -> Result<SnapshotState, ReconcileError> {
        let snapshot = self
            .snapshots
            .get(current.id)
            .await
            .map_err(|e| ReconcileError::from_read(format!("snapshot {}", current.id), e))?;

        Ok(SnapshotState::from_entity(&snapshot))
    }

    async fn update(
        &self,
        _ctx: &OpContext,
        previous: &SnapshotState,
        desired: &SnapshotConfig,
    ) -> Result<SnapshotState, ReconcileError> {
        let changes = diff::changes(
            SCHEMA,
            &serde_json::to_value(previous)?,
            &serde_json::to_value(desired)?,
        )?;
        if changes.is_empty() {
            return Ok(previous.clone());
        }

        let update = SnapshotUpdate {
            name: desired.name.clone(),
        };
        let snapshot = self.snapshots.update(previous.id, update).await?;
        tracing::debug!(id = previous.id, name = %desired.name, "renamed snapshot");

        Ok(SnapshotState::from_entity(&snapshot))
    }

    async fn delete(
        &self,
        _ctx: &OpContext,
        current: &SnapshotState,
    ) -> Result<(), ReconcileError> {
        match self.snapshots.delete(current.id).await {
            Ok(()) => {
                tracing::info!(id = current.id, "deleted snapshot");
                Ok(())
            }
            Err(e) if e.is_not_found() => {
                tracing::debug!(id = current.id, "snapshot already absent");
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }
}
