//! Load balancers.
//!
//! A composite entity: after every order or mutation the control plane
//! holds it in a non-mutable settlement window. The reconciler waits that
//! window out before returning, so an immediately following update or
//! delete will not race the remote system.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use cirrus_api::LoadBalancer;
use cirrus_api::request::{LoadBalancerCreate, LoadBalancerUpdate};
use cirrus_api::service::{LoadBalancerService, OrderService};

use crate::context::OpContext;
use crate::diff::{self, AttributeSchema, Mutability};
use crate::error::ReconcileError;
use crate::order;
use crate::reconciler::Reconcile;
use crate::wait;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadBalancerConfig {
    pub name: String,
    pub location: u64,
    pub network: u64,
    pub private_ip: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadBalancerState {
    pub id: u64,
    pub name: String,
    pub location: u64,
    pub network: u64,
    pub private_ip: String,
}

impl LoadBalancerState {
    fn from_entity(load_balancer: &LoadBalancer) -> Self {
        Self {
            id: load_balancer.id,
            name: load_balancer.name.clone(),
            location: load_balancer.location.id,
            network: load_balancer.network.id,
            private_ip: load_balancer.private_ip.clone(),
        }
    }
}

const SCHEMA: &[AttributeSchema] = &[
    AttributeSchema::new("id", Mutability::Computed),
    AttributeSchema::new("name", Mutability::Mutable),
    AttributeSchema::new("location", Mutability::Immutable),
    AttributeSchema::new("network", Mutability::Immutable),
    AttributeSchema::new("private_ip", Mutability::Immutable),
];

pub struct LoadBalancerReconciler {
    load_balancers: Arc<dyn LoadBalancerService>,
    orders: Arc<dyn OrderService>,
}

impl LoadBalancerReconciler {
    pub fn new(load_balancers: Arc<dyn LoadBalancerService>, orders: Arc<dyn OrderService>) -> Self {
        Self {
            load_balancers,
            orders,
        }
    }

    /// Poll until the load balancer accepts mutations again, then return
    /// the settled entity.
    async fn wait_until_mutable(
        &self,
        ctx: &OpContext,
        id: u64,
    ) -> Result<LoadBalancer, ReconcileError> {
        let load_balancers = &*self.load_balancers;

        wait::wait_for_condition(
            ctx,
            "load balancer to become mutable",
            wait::POLL_INTERVAL,
            || async move {
                let load_balancer = load_balancers.get(id).await?;
                Ok(load_balancer.status.is_mutable())
            },
        )
        .await?;

        Ok(self.load_balancers.get(id).await?)
    }
}

impl Reconcile for LoadBalancerReconciler {
    type Config = LoadBalancerConfig;
    type State = LoadBalancerState;

    async fn create(
        &self,
        ctx: &OpContext,
        desired: &LoadBalancerConfig,
    ) -> Result<LoadBalancerState, ReconcileError> {
        let create = LoadBalancerCreate {
            name: desired.name.clone(),
            location_id: desired.location,
            network_id: desired.network,
            private_ip: desired.private_ip.clone(),
        };

        let ordering = self.load_balancers.create(create).await?;
        let id = order::wait_until_processed(ctx, &*self.orders, ordering).await?;

        let load_balancer = self.wait_until_mutable(ctx, id).await?;
        tracing::info!(id = load_balancer.id, name = %load_balancer.name, "created load balancer");

        Ok(LoadBalancerState::from_entity(&load_balancer))
    }

    async fn read(
        &self,
        _ctx: &OpContext,
        current: &LoadBalancerState,
    ) -> Result<LoadBalancerState, ReconcileError> {
        let load_balancer = self
            .load_balancers
            .get(current.id)
            .await
            .map_err(|e| ReconcileError::from_read(format!("load balancer {}", current.id), e))?;

        Ok(LoadBalancerState::from_entity(&load_balancer))
    }

    async fn update(
        &self,
        ctx: &OpContext,
        previous: &LoadBalancerState,
        desired: &LoadBalancerConfig,
    ) -> Result<LoadBalancerState, ReconcileError> {
        let changes = diff::changes(
            SCHEMA,
            &serde_json::to_value(previous)?,
            &serde_json::to_value(desired)?,
        )?;
        if changes.is_empty() {
            return Ok(previous.clone());
        }

        let update = LoadBalancerUpdate {
            name: desired.name.clone(),
        };
        self.load_balancers.update(previous.id, update).await?;
        tracing::debug!(id = previous.id, name = %desired.name, "renamed load balancer");

        // Hold until the settlement window closes so a follow-up
        // update/delete issued right after us cannot be rejected.
        let load_balancer = self.wait_until_mutable(ctx, previous.id).await?;

        Ok(LoadBalancerState::from_entity(&load_balancer))
    }

    async fn delete(
        &self,
        _ctx: &OpContext,
        current: &LoadBalancerState,
    ) -> Result<(), ReconcileError> {
        match self.load_balancers.delete(current.id).await {
            Ok(()) => {
                tracing::info!(id = current.id, "deleted load balancer");
                Ok(())
            }
            Err(e) if e.is_not_found() => {
                tracing::debug!(id = current.id, "load balancer already absent");
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }
}
