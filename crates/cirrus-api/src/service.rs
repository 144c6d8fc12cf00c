//! Service traits, one per remote API domain.
//!
//! Methods return boxed futures for dyn compatibility — reconcilers hold
//! `Arc<dyn VolumeService>` handles and tests substitute in-memory fakes.
//! Implementations must be safe for concurrent use; the reconciler treats
//! the handle as read-only configuration.

use std::future::Future;
use std::pin::Pin;

use crate::entity::{
    Certificate, ElasticIp, KeyPair, LoadBalancer, Network, NetworkInterface, Server, Snapshot,
    Volume,
};
use crate::error::ApiError;
use crate::order::{Order, Ordering};
use crate::request::{
    ElasticIpAttach, ElasticIpCreate, ListQuery, LoadBalancerCreate, LoadBalancerUpdate,
    NetworkInterfaceCreate, SecurityGroupAssignment, SecurityToggle, ServerCreate, ServerUpdate,
    SnapshotCreate, SnapshotUpdate, VolumeCreate, VolumeExpand, VolumeUpdate,
};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

pub type ApiResult<T> = Result<T, ApiError>;

/// Order status lookups, shared by every order-based create flow.
pub trait OrderService: Send + Sync {
    fn get(&self, order_id: u64) -> BoxFuture<'_, ApiResult<Order>>;
}

pub trait VolumeService: Send + Sync {
    fn list(&self, query: ListQuery) -> BoxFuture<'_, ApiResult<Vec<Volume>>>;
    fn get(&self, id: u64) -> BoxFuture<'_, ApiResult<Volume>>;
    /// Volume provisioning is deferred; the returned ordering settles into
    /// the concrete volume id.
    fn create(&self, create: VolumeCreate) -> BoxFuture<'_, ApiResult<Ordering>>;
    fn update(&self, id: u64, update: VolumeUpdate) -> BoxFuture<'_, ApiResult<Volume>>;
    fn expand(&self, id: u64, expand: VolumeExpand) -> BoxFuture<'_, ApiResult<Volume>>;
    fn detach(&self, id: u64, server_id: u64) -> BoxFuture<'_, ApiResult<()>>;
    fn delete(&self, id: u64) -> BoxFuture<'_, ApiResult<()>>;
}

pub trait ServerService: Send + Sync {
    fn get(&self, id: u64) -> BoxFuture<'_, ApiResult<Server>>;
    fn create(&self, create: ServerCreate) -> BoxFuture<'_, ApiResult<Ordering>>;
    fn update(&self, id: u64, update: ServerUpdate) -> BoxFuture<'_, ApiResult<Server>>;
    fn delete(&self, id: u64) -> BoxFuture<'_, ApiResult<()>>;
}

/// Elastic IP attachment is a sub-resource of the server, not of the
/// address: attach/detach go through the server endpoint.
pub trait ServerElasticIpService: Send + Sync {
    fn attach(
        &self,
        server_id: u64,
        attach: ElasticIpAttach,
    ) -> BoxFuture<'_, ApiResult<ElasticIp>>;
    fn detach(&self, server_id: u64, elastic_ip_id: u64) -> BoxFuture<'_, ApiResult<()>>;
}

pub trait ElasticIpService: Send + Sync {
    fn list(&self, query: ListQuery) -> BoxFuture<'_, ApiResult<Vec<ElasticIp>>>;
    fn get(&self, id: u64) -> BoxFuture<'_, ApiResult<ElasticIp>>;
    fn create(&self, create: ElasticIpCreate) -> BoxFuture<'_, ApiResult<ElasticIp>>;
    fn delete(&self, id: u64) -> BoxFuture<'_, ApiResult<()>>;
}

pub trait LoadBalancerService: Send + Sync {
    fn get(&self, id: u64) -> BoxFuture<'_, ApiResult<LoadBalancer>>;
    fn create(&self, create: LoadBalancerCreate) -> BoxFuture<'_, ApiResult<Ordering>>;
    fn update(
        &self,
        id: u64,
        update: LoadBalancerUpdate,
    ) -> BoxFuture<'_, ApiResult<LoadBalancer>>;
    fn delete(&self, id: u64) -> BoxFuture<'_, ApiResult<()>>;
}

pub trait SnapshotService: Send + Sync {
    fn get(&self, id: u64) -> BoxFuture<'_, ApiResult<Snapshot>>;
    fn create(&self, create: SnapshotCreate) -> BoxFuture<'_, ApiResult<Snapshot>>;
    fn update(&self, id: u64, update: SnapshotUpdate) -> BoxFuture<'_, ApiResult<Snapshot>>;
    fn delete(&self, id: u64) -> BoxFuture<'_, ApiResult<()>>;
}

/// Network interfaces hang off a server; the API only exposes the
/// per-server collection, there is no get-by-id endpoint.
pub trait NetworkInterfaceService: Send + Sync {
    fn list(&self, server_id: u64) -> BoxFuture<'_, ApiResult<Vec<NetworkInterface>>>;
    fn create(
        &self,
        server_id: u64,
        create: NetworkInterfaceCreate,
    ) -> BoxFuture<'_, ApiResult<NetworkInterface>>;
    fn update_security_groups(
        &self,
        server_id: u64,
        interface_id: u64,
        update: SecurityGroupAssignment,
    ) -> BoxFuture<'_, ApiResult<NetworkInterface>>;
    fn update_security(
        &self,
        server_id: u64,
        interface_id: u64,
        update: SecurityToggle,
    ) -> BoxFuture<'_, ApiResult<NetworkInterface>>;
    fn delete(&self, server_id: u64, interface_id: u64) -> BoxFuture<'_, ApiResult<()>>;
}

pub trait NetworkService: Send + Sync {
    fn list(&self, query: ListQuery) -> BoxFuture<'_, ApiResult<Vec<Network>>>;
    fn get(&self, id: u64) -> BoxFuture<'_, ApiResult<Network>>;
}

pub trait CertificateService: Send + Sync {
    fn list(&self, query: ListQuery) -> BoxFuture<'_, ApiResult<Vec<Certificate>>>;
}

pub trait KeyPairService: Send + Sync {
    fn list(&self, query: ListQuery) -> BoxFuture<'_, ApiResult<Vec<KeyPair>>>;
}
