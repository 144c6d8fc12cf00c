//! Compute instances.
//!
//! Provisioning is deferred behind an order. An optional elastic IP attach
//! runs as a dependent follow-up of create; if it fails, the half-created
//! server is rolled back best-effort and both errors are reported.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use cirrus_api::Server;
use cirrus_api::request::{ElasticIpAttach, ServerCreate, ServerUpdate};
use cirrus_api::service::{OrderService, ServerElasticIpService, ServerService};

use crate::context::OpContext;
use crate::diff::{self, AttributeSchema, Mutability};
use crate::error::ReconcileError;
use crate::order;
use crate::reconciler::Reconcile;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    pub name: String,
    pub location: u64,
    pub image: u64,
    pub product: u64,
    pub network: u64,
    pub private_ip: Option<String>,
    pub key_pair: Option<u64>,
    /// Write-only: sent on create, never read back.
    pub password: Option<String>,
    /// Write-only: sent on create, never read back.
    pub cloud_init: Option<String>,
    /// Elastic IP to attach once the server exists.
    pub elastic_ip: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerState {
    pub id: u64,
    pub name: String,
    pub location: u64,
    pub image: u64,
    pub product: u64,
    pub network: u64,
    pub private_ip: Option<String>,
    pub key_pair: Option<u64>,
    /// Echoed from the configuration; the API does not expose it.
    pub password: Option<String>,
    /// Echoed from the configuration; the API does not expose it.
    pub cloud_init: Option<String>,
    pub elastic_ip: Option<u64>,
}

/// Attributes the API does not expose and the record must carry forward.
struct CarriedOver {
    network: u64,
    private_ip: Option<String>,
    password: Option<String>,
    cloud_init: Option<String>,
}

impl ServerState {
    fn from_entity(server: &Server, carried: CarriedOver) -> Self {
        Self {
            id: server.id,
            name: server.name.clone(),
            location: server.location.id,
            image: server.image.id,
            product: server.product.id,
            network: carried.network,
            private_ip: carried.private_ip,
            key_pair: server.key_pair.as_ref().map(|kp| kp.id),
            password: carried.password,
            cloud_init: carried.cloud_init,
            elastic_ip: server.elastic_ip.as_ref().map(|ip| ip.id),
        }
    }
}

impl From<&ServerConfig> for CarriedOver {
    fn from(config: &ServerConfig) -> Self {
        Self {
            network: config.network,
            private_ip: config.private_ip.clone(),
            password: config.password.clone(),
            cloud_init: config.cloud_init.clone(),
        }
    }
}

impl From<&ServerState> for CarriedOver {
    fn from(state: &ServerState) -> Self {
        Self {
            network: state.network,
            private_ip: state.private_ip.clone(),
            password: state.password.clone(),
            cloud_init: state.cloud_init.clone(),
        }
    }
}

const SCHEMA: &[AttributeSchema] = &[
    AttributeSchema::new("id", Mutability::Computed),
    AttributeSchema::new("name", Mutability::Mutable),
    AttributeSchema::new("location", Mutability::Immutable),
    AttributeSchema::new("image", Mutability::Immutable),
    AttributeSchema::new("product", Mutability::Immutable),
    AttributeSchema::new("network", Mutability::Immutable),
    AttributeSchema::new("private_ip", Mutability::Immutable),
    AttributeSchema::new("key_pair", Mutability::Immutable),
    AttributeSchema::new("password", Mutability::Immutable),
    AttributeSchema::new("cloud_init", Mutability::Immutable),
    // Attachment is its own remote sub-resource: re-attachable in place.
    AttributeSchema::new("elastic_ip", Mutability::Mutable),
];

pub struct ServerReconciler {
    servers: Arc<dyn ServerService>,
    server_elastic_ips: Arc<dyn ServerElasticIpService>,
    orders: Arc<dyn OrderService>,
}

impl ServerReconciler {
    pub fn new(
        servers: Arc<dyn ServerService>,
        server_elastic_ips: Arc<dyn ServerElasticIpService>,
        orders: Arc<dyn OrderService>,
    ) -> Self {
        Self {
            servers,
            server_elastic_ips,
            orders,
        }
    }

    /// Best-effort rollback of a half-created server. The primary error is
    /// always surfaced; a failed rollback rides along as the secondary
    /// diagnostic.
    async fn rollback_create(&self, server_id: u64, primary: ReconcileError) -> ReconcileError {
        match self.servers.delete(server_id).await {
            Ok(()) => {
                tracing::warn!(id = server_id, "rolled back half-created server");
                primary
            }
            Err(cleanup) => ReconcileError::CleanupFailed {
                source: Box::new(primary),
                cleanup: Box::new(cleanup.into()),
            },
        }
    }
}

impl Reconcile for ServerReconciler {
    type Config = ServerConfig;
    type State = ServerState;

    async fn create(
        &self,
        ctx: &OpContext,
        desired: &ServerConfig,
    ) -> Result<ServerState, ReconcileError> {
        let create = ServerCreate {
            name: desired.name.clone(),
            location_id: desired.location,
            image_id: desired.image,
            product_id: desired.product,
            network_id: desired.network,
            private_ip: desired.private_ip.clone(),
            key_pair_id: desired.key_pair,
            password: desired.password.clone(),
            cloud_init: desired.cloud_init.clone(),
        };

        let ordering = self.servers.create(create).await?;
        let server_id = order::wait_until_processed(ctx, &*self.orders, ordering).await?;

        let mut server = self.servers.get(server_id).await?;
        tracing::info!(id = server.id, name = %server.name, "created server");

        if let Some(elastic_ip_id) = desired.elastic_ip {
            let attach = ElasticIpAttach { elastic_ip_id };
            match self.server_elastic_ips.attach(server.id, attach).await {
                Ok(_) => {
                    tracing::debug!(id = server.id, elastic_ip = elastic_ip_id, "attached elastic ip");
                    server = self.servers.get(server.id).await?;
                }
                Err(e) => return Err(self.rollback_create(server.id, e.into()).await),
            }
        }

        Ok(ServerState::from_entity(&server, desired.into()))
    }

    async fn read(
        &self,
        _ctx: &OpContext,
        current: &ServerState,
    ) -> Result<ServerState, ReconcileError> {
        let server = self
            .servers
            .get(current.id)
            .await
            .map_err(|e| ReconcileError::from_read(format!("server {}", current.id), e))?;

        Ok(ServerState::from_entity(&server, current.into()))
    }

    async fn update(
        &self,
        _ctx: &OpContext,
        previous: &ServerState,
        desired: &ServerConfig,
    ) -> Result<ServerState, ReconcileError> {
        let changes = diff::changes(
            SCHEMA,
            &serde_json::to_value(previous)?,
            &serde_json::to_value(desired)?,
        )?;
        if changes.is_empty() {
            return Ok(previous.clone());
        }

        let mut state = previous.clone();

        if diff::touches(&changes, "name") {
            let update = ServerUpdate {
                name: desired.name.clone(),
            };
            let server = self.servers.update(previous.id, update).await?;
            state.name = server.name;
            tracing::debug!(id = previous.id, name = %desired.name, "renamed server");
        }

        if diff::touches(&changes, "elastic_ip") {
            if let Some(old) = previous.elastic_ip {
                match self.server_elastic_ips.detach(previous.id, old).await {
                    Ok(()) | Err(cirrus_api::ApiError::NotFound(_)) => {}
                    Err(e) => return Err(e.into()),
                }
            }
            if let Some(new) = desired.elastic_ip {
                let attach = ElasticIpAttach { elastic_ip_id: new };
                self.server_elastic_ips.attach(previous.id, attach).await?;
            }
            state.elastic_ip = desired.elastic_ip;
            tracing::debug!(id = previous.id, "re-pointed elastic ip attachment");
        }

        Ok(state)
    }

    async fn delete(&self, _ctx: &OpContext, current: &ServerState) -> Result<(), ReconcileError> {
        if let Some(elastic_ip_id) = current.elastic_ip {
            match self
                .server_elastic_ips
                .detach(current.id, elastic_ip_id)
                .await
            {
                Ok(()) => {
                    tracing::debug!(id = current.id, elastic_ip = elastic_ip_id, "detached elastic ip");
                }
                Err(e) if e.is_not_found() => {}
                Err(e) => return Err(e.into()),
            }
        }

        match self.servers.delete(current.id).await {
            Ok(()) => {
                tracing::info!(id = current.id, "deleted server");
                Ok(())
            }
            Err(e) if e.is_not_found() => {
                tracing::debug!(id = current.id, "server already absent");
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }
}
