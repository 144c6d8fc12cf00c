//! Elastic IP addresses.
//!
//! The control plane has no update endpoint for addresses: every attribute
//! is either immutable (location) or computed (the address itself), so any
//! requested change means replacement. An attached address is detached
//! from its server before deletion.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use cirrus_api::ElasticIp;
use cirrus_api::request::ElasticIpCreate;
use cirrus_api::service::{ElasticIpService, ServerElasticIpService};

use crate::context::OpContext;
use crate::diff::{self, AttributeSchema, Mutability};
use crate::error::ReconcileError;
use crate::reconciler::Reconcile;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElasticIpConfig {
    pub location: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElasticIpState {
    pub id: u64,
    pub public_ip: String,
    pub location: u64,
    pub attached_to: Option<u64>,
}

impl ElasticIpState {
    fn from_entity(elastic_ip: &ElasticIp) -> Self {
        Self {
            id: elastic_ip.id,
            public_ip: elastic_ip.public_ip.clone(),
            location: elastic_ip.location.id,
            attached_to: elastic_ip.attached_to.as_ref().map(|server| server.id),
        }
    }
}

const SCHEMA: &[AttributeSchema] = &[
    AttributeSchema::new("id", Mutability::Computed),
    AttributeSchema::new("public_ip", Mutability::Computed),
    AttributeSchema::new("location", Mutability::Immutable),
];

pub struct ElasticIpReconciler {
    elastic_ips: Arc<dyn ElasticIpService>,
    server_elastic_ips: Arc<dyn ServerElasticIpService>,
}

impl ElasticIpReconciler {
    pub fn new(
        elastic_ips: Arc<dyn ElasticIpService>,
        server_elastic_ips: Arc<dyn ServerElasticIpService>,
    ) -> Self {
        Self {
            elastic_ips,
            server_elastic_ips,
        }
    }
}

impl Reconcile for ElasticIpReconciler {
    type Config = ElasticIpConfig;
    type State = ElasticIpState;

    async fn create(
        &self,
        _ctx: &OpContext,
        desired: &ElasticIpConfig,
    ) -> Result<ElasticIpState, ReconcileError> {
        let create = ElasticIpCreate {
            location_id: desired.location,
        };

        let elastic_ip = self.elastic_ips.create(create).await?;
        tracing::info!(id = elastic_ip.id, public_ip = %elastic_ip.public_ip, "created elastic ip");

        Ok(ElasticIpState::from_entity(&elastic_ip))
    }

    async fn read(
        &self,
        _ctx: &OpContext,
        current: &ElasticIpState,
    ) -> Result<ElasticIpState, ReconcileError> {
        let elastic_ip = self
            .elastic_ips
            .get(current.id)
            .await
            .map_err(|e| ReconcileError::from_read(format!("elastic ip {}", current.id), e))?;

        Ok(ElasticIpState::from_entity(&elastic_ip))
    }

    async fn update(
        &self,
        _ctx: &OpContext,
        previous: &ElasticIpState,
        desired: &ElasticIpConfig,
    ) -> Result<ElasticIpState, ReconcileError> {
        // Any change trips the immutable `location` attribute, so a
        // non-empty diff never gets past this point.
        let changes = diff::changes(
            SCHEMA,
            &serde_json::to_value(previous)?,
            &serde_json::to_value(desired)?,
        )?;
        debug_assert!(changes.is_empty());

        Ok(previous.clone())
    }

    async fn delete(
        &self,
        _ctx: &OpContext,
        current: &ElasticIpState,
    ) -> Result<(), ReconcileError> {
        if let Some(server_id) = current.attached_to {
            match self.server_elastic_ips.detach(server_id, current.id).await {
                Ok(()) => {
                    tracing::debug!(id = current.id, server = server_id, "detached elastic ip");
                }
                Err(e) if e.is_not_found() => {}
                Err(e) => return Err(e.into()),
            }
        }

        match self.elastic_ips.delete(current.id).await {
            Ok(()) => {
                tracing::info!(id = current.id, "deleted elastic ip");
                Ok(())
            }
            Err(e) if e.is_not_found() => {
                tracing::debug!(id = current.id, "elastic ip already absent");
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }
}
