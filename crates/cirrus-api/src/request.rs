use serde::{Deserialize, Serialize};

/// Pagination and server-side filter hint for list endpoints.
///
/// Most collection endpoints cannot filter server-side; lookups pass
/// [`ListQuery::unfiltered`] and match client-side instead.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    pub filter: Option<String>,
}

impl ListQuery {
    /// Request the whole collection, unfiltered.
    pub fn unfiltered() -> Self {
        Self::default()
    }
}

// ── create payloads ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VolumeCreate {
    pub name: String,
    pub size: u64,
    pub location_id: u64,
    /// Restore the volume content from this snapshot.
    pub snapshot_id: Option<u64>,
    /// Attach the volume to this server right after provisioning.
    pub instance_id: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerCreate {
    pub name: String,
    pub location_id: u64,
    pub image_id: u64,
    pub product_id: u64,
    pub network_id: u64,
    pub private_ip: Option<String>,
    pub key_pair_id: Option<u64>,
    pub password: Option<String>,
    pub cloud_init: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadBalancerCreate {
    pub name: String,
    pub location_id: u64,
    pub network_id: u64,
    pub private_ip: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElasticIpCreate {
    pub location_id: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotCreate {
    pub name: String,
    pub volume_id: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkInterfaceCreate {
    pub network_id: u64,
    pub private_ip: Option<String>,
}

// ── update payloads ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VolumeUpdate {
    pub name: String,
}

/// Volumes only grow. The control plane rejects a smaller size, so the
/// reconciler never sends one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VolumeExpand {
    pub size: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerUpdate {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadBalancerUpdate {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotUpdate {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElasticIpAttach {
    pub elastic_ip_id: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecurityGroupAssignment {
    pub security_group_ids: Vec<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecurityToggle {
    pub security: bool,
}
