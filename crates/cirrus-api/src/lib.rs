//! cirrus-api
//!
//! Typed entities, request payloads, and service traits for the cloud
//! control-plane API. No transport, no runtime — this is the shared
//! vocabulary between the reconciler core and whatever client binds it
//! to the wire.

pub mod entity;
pub mod error;
pub mod order;
pub mod request;
pub mod service;

pub use crate::entity::{
    Certificate, ElasticIp, KeyPair, LoadBalancer, LoadBalancerStatus, Location, Network,
    NetworkInterface, ResourceRef, Server, ServerStatus, Snapshot, SnapshotStatus, Volume,
};
pub use crate::error::ApiError;
pub use crate::order::{Order, OrderStatus, Ordering};
pub use crate::request::ListQuery;
pub use crate::service::BoxFuture;
