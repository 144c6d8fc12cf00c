//! Server network interfaces.
//!
//! The API only exposes the per-server collection, so read-back locates
//! the interface by predicate over the list. Security-group membership and
//! the security flag are independent remote sub-resources and are updated
//! through separate calls; there is no batched endpoint covering both.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use cirrus_api::NetworkInterface;
use cirrus_api::request::{NetworkInterfaceCreate, SecurityGroupAssignment, SecurityToggle};
use cirrus_api::service::NetworkInterfaceService;

use crate::context::OpContext;
use crate::diff::{self, AttributeSchema, Mutability};
use crate::error::ReconcileError;
use crate::filter;
use crate::reconciler::Reconcile;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkInterfaceConfig {
    pub server: u64,
    pub network: u64,
    pub private_ip: Option<String>,
    /// Unset means: leave the remote membership alone.
    pub security_groups: Option<Vec<u64>>,
    /// Unset means: leave the remote flag alone.
    pub security: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkInterfaceState {
    pub id: u64,
    pub server: u64,
    pub network: u64,
    pub private_ip: String,
    pub mac_address: String,
    pub security_groups: Vec<u64>,
    pub security: bool,
}

impl NetworkInterfaceState {
    fn from_entity(interface: &NetworkInterface, server: u64) -> Self {
        Self {
            id: interface.id,
            server,
            network: interface.network.id,
            private_ip: interface.private_ip.clone(),
            mac_address: interface.mac_address.clone(),
            security_groups: interface.security_groups.iter().map(|sg| sg.id).collect(),
            security: interface.security,
        }
    }
}

const SCHEMA: &[AttributeSchema] = &[
    AttributeSchema::new("id", Mutability::Computed),
    AttributeSchema::new("mac_address", Mutability::Computed),
    AttributeSchema::new("server", Mutability::Immutable),
    AttributeSchema::new("network", Mutability::Immutable),
    AttributeSchema::new("private_ip", Mutability::Immutable),
    AttributeSchema::new("security_groups", Mutability::Mutable),
    AttributeSchema::new("security", Mutability::Mutable),
];

pub struct NetworkInterfaceReconciler {
    interfaces: Arc<dyn NetworkInterfaceService>,
}

impl NetworkInterfaceReconciler {
    pub fn new(interfaces: Arc<dyn NetworkInterfaceService>) -> Self {
        Self { interfaces }
    }

    /// Best-effort rollback of a half-created interface.
    async fn rollback_create(
        &self,
        server_id: u64,
        interface_id: u64,
        primary: ReconcileError,
    ) -> ReconcileError {
        match self.interfaces.delete(server_id, interface_id).await {
            Ok(()) => {
                tracing::warn!(id = interface_id, "rolled back half-created network interface");
                primary
            }
            Err(cleanup) => ReconcileError::CleanupFailed {
                source: Box::new(primary),
                cleanup: Box::new(cleanup.into()),
            },
        }
    }
}

impl Reconcile for NetworkInterfaceReconciler {
    type Config = NetworkInterfaceConfig;
    type State = NetworkInterfaceState;

    async fn create(
        &self,
        _ctx: &OpContext,
        desired: &NetworkInterfaceConfig,
    ) -> Result<NetworkInterfaceState, ReconcileError> {
        let create = NetworkInterfaceCreate {
            network_id: desired.network,
            private_ip: desired.private_ip.clone(),
        };

        let mut interface = self.interfaces.create(desired.server, create).await?;
        tracing::info!(id = interface.id, server = desired.server, "created network interface");

        if let Some(group_ids) = &desired.security_groups {
            let update = SecurityGroupAssignment {
                security_group_ids: group_ids.clone(),
            };
            match self
                .interfaces
                .update_security_groups(desired.server, interface.id, update)
                .await
            {
                Ok(updated) => interface = updated,
                Err(e) => {
                    return Err(self
                        .rollback_create(desired.server, interface.id, e.into())
                        .await);
                }
            }
        }

        if desired.security == Some(false) {
            let update = SecurityToggle { security: false };
            match self
                .interfaces
                .update_security(desired.server, interface.id, update)
                .await
            {
                Ok(updated) => interface = updated,
                Err(e) => {
                    return Err(self
                        .rollback_create(desired.server, interface.id, e.into())
                        .await);
                }
            }
        }

        Ok(NetworkInterfaceState::from_entity(&interface, desired.server))
    }

    async fn read(
        &self,
        _ctx: &OpContext,
        current: &NetworkInterfaceState,
    ) -> Result<NetworkInterfaceState, ReconcileError> {
        let interfaces = self.interfaces.list(current.server).await?;

        let interface = filter::find_one(|i: &NetworkInterface| i.id == current.id, &interfaces)
            .map_err(|e| {
                ReconcileError::from_filter(&format!("network interface {}", current.id), e)
            })?;

        Ok(NetworkInterfaceState::from_entity(interface, current.server))
    }

    async fn update(
        &self,
        _ctx: &OpContext,
        previous: &NetworkInterfaceState,
        desired: &NetworkInterfaceConfig,
    ) -> Result<NetworkInterfaceState, ReconcileError> {
        let changes = diff::changes(
            SCHEMA,
            &serde_json::to_value(previous)?,
            &serde_json::to_value(desired)?,
        )?;
        if changes.is_empty() {
            return Ok(previous.clone());
        }

        let mut state = previous.clone();

        // Membership and the security flag live behind separate endpoints;
        // each changed group gets its own call.
        if diff::touches(&changes, "security_groups") {
            if let Some(group_ids) = &desired.security_groups {
                let update = SecurityGroupAssignment {
                    security_group_ids: group_ids.clone(),
                };
                let interface = self
                    .interfaces
                    .update_security_groups(previous.server, previous.id, update)
                    .await?;
                state = NetworkInterfaceState::from_entity(&interface, previous.server);
                tracing::debug!(id = previous.id, "updated security group membership");
            }
        }

        if diff::touches(&changes, "security") {
            if let Some(security) = desired.security {
                let update = SecurityToggle { security };
                let interface = self
                    .interfaces
                    .update_security(previous.server, previous.id, update)
                    .await?;
                state = NetworkInterfaceState::from_entity(&interface, previous.server);
                tracing::debug!(id = previous.id, security, "toggled interface security");
            }
        }

        Ok(state)
    }

    async fn delete(
        &self,
        _ctx: &OpContext,
        current: &NetworkInterfaceState,
    ) -> Result<(), ReconcileError> {
        match self.interfaces.delete(current.server, current.id).await {
            Ok(()) => {
                tracing::info!(id = current.id, "deleted network interface");
                Ok(())
            }
            Err(e) if e.is_not_found() => {
                tracing::debug!(id = current.id, "network interface already absent");
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }
}
