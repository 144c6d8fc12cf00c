//! One reconciler per resource kind. Each implements the [`Reconcile`]
//! contract against the service traits of `cirrus-api`.
//!
//! [`Reconcile`]: crate::reconciler::Reconcile

pub mod elastic_ip;
pub mod load_balancer;
pub mod network_interface;
pub mod server;
pub mod snapshot;
pub mod volume;

pub use elastic_ip::{ElasticIpConfig, ElasticIpReconciler, ElasticIpState};
pub use load_balancer::{LoadBalancerConfig, LoadBalancerReconciler, LoadBalancerState};
pub use network_interface::{
    NetworkInterfaceConfig, NetworkInterfaceReconciler, NetworkInterfaceState,
};
pub use server::{ServerConfig, ServerReconciler, ServerState};
pub use snapshot::{SnapshotConfig, SnapshotReconciler, SnapshotState};
pub use volume::{VolumeConfig, VolumeReconciler, VolumeState};
