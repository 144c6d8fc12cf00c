//! Unambiguous lookups over collection endpoints.
//!
//! These APIs cannot filter server-side; the whole collection is listed and
//! matched client-side. A selector attribute left unset is a wildcard. The
//! match must be unique — first-wins would make the resolved identity
//! depend on remote ordering.

use cirrus_api::service::{CertificateService, KeyPairService, NetworkService};
use cirrus_api::{Certificate, KeyPair, ListQuery, Network};

use crate::error::ReconcileError;
use crate::filter;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CertificateSelector {
    pub id: Option<u64>,
    pub name: Option<String>,
    pub serial: Option<String>,
}

impl CertificateSelector {
    fn matches(&self, certificate: &Certificate) -> bool {
        self.id.map_or(true, |id| id == certificate.id)
            && self.name.as_ref().map_or(true, |n| *n == certificate.name)
            && self
                .serial
                .as_ref()
                .map_or(true, |s| *s == certificate.serial)
    }
}

pub async fn find_certificate(
    certificates: &dyn CertificateService,
    selector: &CertificateSelector,
) -> Result<Certificate, ReconcileError> {
    let items = certificates.list(ListQuery::unfiltered()).await?;

    filter::find_one(|c: &Certificate| selector.matches(c), &items)
        .map(Clone::clone)
        .map_err(|e| ReconcileError::from_filter("certificate", e))
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyPairSelector {
    pub id: Option<u64>,
    pub name: Option<String>,
    pub fingerprint: Option<String>,
}

impl KeyPairSelector {
    fn matches(&self, key_pair: &KeyPair) -> bool {
        self.id.map_or(true, |id| id == key_pair.id)
            && self.name.as_ref().map_or(true, |n| *n == key_pair.name)
            && self
                .fingerprint
                .as_ref()
                .map_or(true, |f| *f == key_pair.fingerprint)
    }
}

pub async fn find_key_pair(
    key_pairs: &dyn KeyPairService,
    selector: &KeyPairSelector,
) -> Result<KeyPair, ReconcileError> {
    let items = key_pairs.list(ListQuery::unfiltered()).await?;

    filter::find_one(|kp: &KeyPair| selector.matches(kp), &items)
        .map(Clone::clone)
        .map_err(|e| ReconcileError::from_filter("key pair", e))
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NetworkSelector {
    pub id: Option<u64>,
    pub name: Option<String>,
    pub cidr: Option<String>,
}

impl NetworkSelector {
    fn matches(&self, network: &Network) -> bool {
        self.id.map_or(true, |id| id == network.id)
            && self.name.as_ref().map_or(true, |n| *n == network.name)
            && self.cidr.as_ref().map_or(true, |c| *c == network.cidr)
    }
}

pub async fn find_network(
    networks: &dyn NetworkService,
    selector: &NetworkSelector,
) -> Result<Network, ReconcileError> {
    let items = networks.list(ListQuery::unfiltered()).await?;

    filter::find_one(|n: &Network| selector.matches(n), &items)
        .map(Clone::clone)
        .map_err(|e| ReconcileError::from_filter("network", e))
}
