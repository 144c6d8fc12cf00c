#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};

use cirrus_api::request::ElasticIpAttach;
use cirrus_api::service::{ApiResult, BoxFuture, OrderService, ServerElasticIpService};
use cirrus_api::{
    ApiError,
    Certificate, ElasticIp, KeyPair, LoadBalancer, LoadBalancerStatus, Network, NetworkInterface,
    Order, OrderStatus, ResourceRef, Server, ServerStatus, Snapshot, SnapshotStatus, Volume,
};

/// Records the remote calls a fake service receives, in order.
#[derive(Default)]
pub struct CallLog(Mutex<Vec<String>>);

impl CallLog {
    pub fn push(&self, call: impl Into<String>) {
        self.0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(call.into());
    }

    pub fn calls(&self) -> Vec<String> {
        self.0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn is_empty(&self) -> bool {
        self.calls().is_empty()
    }
}

/// Order lookup fake scripted with one response per expected poll.
pub struct FakeOrders {
    log: Arc<CallLog>,
    responses: Mutex<VecDeque<Order>>,
}

impl FakeOrders {
    pub fn new(log: Arc<CallLog>, responses: Vec<Order>) -> Self {
        Self {
            log,
            responses: Mutex::new(responses.into()),
        }
    }
}

impl OrderService for FakeOrders {
    fn get(&self, order_id: u64) -> BoxFuture<'_, ApiResult<Order>> {
        self.log.push(format!("orders.get({order_id})"));
        let order = self
            .responses
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
            .expect("order polled more often than scripted");
        Box::pin(async move { Ok(order) })
    }
}

/// Elastic IP attachment fake; failures are opted into per test.
#[derive(Default)]
pub struct FakeServerElasticIps {
    pub log: Arc<CallLog>,
    pub attach_fails: bool,
    pub detach_not_found: bool,
}

impl ServerElasticIpService for FakeServerElasticIps {
    fn attach(&self, server_id: u64, attach: ElasticIpAttach) -> BoxFuture<'_, ApiResult<ElasticIp>> {
        self.log
            .push(format!("eips.attach({server_id}, {})", attach.elastic_ip_id));
        let result = if self.attach_fails {
            Err(ApiError::Server {
                status: 423,
                message: "address is locked".to_string(),
            })
        } else {
            Ok(elastic_ip(attach.elastic_ip_id, "203.0.113.9"))
        };
        Box::pin(async move { result })
    }

    fn detach(&self, server_id: u64, elastic_ip_id: u64) -> BoxFuture<'_, ApiResult<()>> {
        self.log
            .push(format!("eips.detach({server_id}, {elastic_ip_id})"));
        let result = if self.detach_not_found {
            Err(ApiError::NotFound(format!("elastic ip {elastic_ip_id}")))
        } else {
            Ok(())
        };
        Box::pin(async move { result })
    }
}

pub fn rref(id: u64, name: &str) -> ResourceRef {
    ResourceRef::new(id, name)
}

pub fn volume(id: u64, name: &str, size: u64) -> Volume {
    Volume {
        id,
        serial_number: format!("vol-{id}"),
        name: name.to_string(),
        size,
        location: rref(1, "ALP1"),
        attached_to: None,
    }
}

pub fn server(id: u64, name: &str) -> Server {
    Server {
        id,
        name: name.to_string(),
        status: ServerStatus::Running,
        location: rref(1, "ALP1"),
        image: rref(10, "ubuntu-22.04"),
        product: rref(20, "b1.2x4"),
        key_pair: None,
        elastic_ip: None,
    }
}

pub fn load_balancer(id: u64, name: &str, status: LoadBalancerStatus) -> LoadBalancer {
    LoadBalancer {
        id,
        name: name.to_string(),
        status,
        location: rref(1, "ALP1"),
        network: rref(30, "backend"),
        private_ip: "10.0.0.7".to_string(),
    }
}

pub fn elastic_ip(id: u64, public_ip: &str) -> ElasticIp {
    ElasticIp {
        id,
        public_ip: public_ip.to_string(),
        location: rref(1, "ALP1"),
        attached_to: None,
    }
}

pub fn api_snapshot(id: u64, name: &str, status: SnapshotStatus) -> Snapshot {
    Snapshot {
        id,
        name: name.to_string(),
        size: 10,
        status,
        volume: rref(5, "data"),
    }
}

pub fn interface(id: u64, private_ip: &str) -> NetworkInterface {
    NetworkInterface {
        id,
        private_ip: private_ip.to_string(),
        mac_address: format!("02:00:00:00:00:{id:02x}"),
        network: rref(30, "backend"),
        security: true,
        security_groups: vec![rref(40, "default")],
    }
}

pub fn network(id: u64, name: &str, cidr: &str) -> Network {
    Network {
        id,
        name: name.to_string(),
        cidr: cidr.to_string(),
        location: rref(1, "ALP1"),
    }
}

pub fn certificate(id: u64, name: &str, serial: &str) -> Certificate {
    Certificate {
        id,
        name: name.to_string(),
        serial: serial.to_string(),
    }
}

pub fn key_pair(id: u64, name: &str, fingerprint: &str) -> KeyPair {
    KeyPair {
        id,
        name: name.to_string(),
        fingerprint: fingerprint.to_string(),
    }
}

pub fn order(id: u64, status: OrderStatus, product: Option<u64>) -> Order {
    Order {
        id,
        status,
        product: product.map(|id| rref(id, "product")),
    }
}
