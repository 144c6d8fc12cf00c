use serde::{Deserialize, Serialize};

/// A by-id reference to another remote entity, as embedded in API payloads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceRef {
    pub id: u64,
    #[serde(default)]
    pub name: String,
}

impl ResourceRef {
    pub fn new(id: u64, name: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub id: u64,
    pub name: String,
    pub city: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Volume {
    pub id: u64,
    pub serial_number: String,
    pub name: String,
    /// Size in GiB. Grows via the dedicated expand call, never shrinks.
    pub size: u64,
    pub location: ResourceRef,
    /// Server this volume is currently attached to, if any.
    pub attached_to: Option<ResourceRef>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServerStatus {
    Creating,
    Running,
    Stopped,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Server {
    pub id: u64,
    pub name: String,
    pub status: ServerStatus,
    pub location: ResourceRef,
    pub image: ResourceRef,
    pub product: ResourceRef,
    pub key_pair: Option<ResourceRef>,
    /// Elastic IP currently attached to the server's public interface.
    pub elastic_ip: Option<ResourceRef>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SnapshotStatus {
    Creating,
    Available,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub id: u64,
    pub name: String,
    pub size: u64,
    pub status: SnapshotStatus,
    pub volume: ResourceRef,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElasticIp {
    pub id: u64,
    pub public_ip: String,
    pub location: ResourceRef,
    /// Server the address is currently attached to, if any.
    pub attached_to: Option<ResourceRef>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadBalancerStatus {
    Creating,
    Active,
    Updating,
    Error,
}

impl LoadBalancerStatus {
    /// Whether the control plane accepts mutations in this status.
    /// `Creating` and `Updating` are the settlement window after an order
    /// or an update; mutations issued during it are rejected remotely.
    pub fn is_mutable(self) -> bool {
        matches!(self, Self::Active)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadBalancer {
    pub id: u64,
    pub name: String,
    pub status: LoadBalancerStatus,
    pub location: ResourceRef,
    pub network: ResourceRef,
    pub private_ip: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkInterface {
    pub id: u64,
    pub private_ip: String,
    pub mac_address: String,
    pub network: ResourceRef,
    /// Whether security group filtering is enforced on this interface.
    pub security: bool,
    pub security_groups: Vec<ResourceRef>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Network {
    pub id: u64,
    pub name: String,
    pub cidr: String,
    pub location: ResourceRef,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Certificate {
    pub id: u64,
    pub name: String,
    pub serial: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyPair {
    pub id: u64,
    pub name: String,
    pub fingerprint: String,
}
