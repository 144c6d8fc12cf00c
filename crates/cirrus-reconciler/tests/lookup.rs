mod common;

use std::sync::Arc;

use cirrus_api::request::ListQuery;
use cirrus_api::service::{
    ApiResult, BoxFuture, CertificateService, KeyPairService, NetworkService,
};
use cirrus_api::{Certificate, KeyPair, Network};

use cirrus_reconciler::lookup::{
    self, CertificateSelector, KeyPairSelector, NetworkSelector,
};
use cirrus_reconciler::ReconcileError;

use common::CallLog;

struct FakeCatalog {
    log: Arc<CallLog>,
    certificates: Vec<Certificate>,
    key_pairs: Vec<KeyPair>,
    networks: Vec<Network>,
}

impl FakeCatalog {
    fn new(log: Arc<CallLog>) -> Self {
        Self {
            log,
            certificates: vec![
                common::certificate(1, "api", "0A:1B"),
                common::certificate(2, "web", "2C:3D"),
                common::certificate(3, "web", "4E:5F"),
            ],
            key_pairs: vec![
                common::key_pair(1, "deploy", "aa:bb"),
                common::key_pair(2, "ops", "cc:dd"),
            ],
            networks: vec![
                common::network(1, "backend", "10.0.0.0/24"),
                common::network(2, "frontend", "10.0.1.0/24"),
            ],
        }
    }
}

impl CertificateService for FakeCatalog {
    fn list(&self, _query: ListQuery) -> BoxFuture<'_, ApiResult<Vec<Certificate>>> {
        self.log.push("certificates.list");
        let items = self.certificates.clone();
        Box::pin(async move { Ok(items) })
    }
}

impl KeyPairService for FakeCatalog {
    fn list(&self, _query: ListQuery) -> BoxFuture<'_, ApiResult<Vec<KeyPair>>> {
        self.log.push("key_pairs.list");
        let items = self.key_pairs.clone();
        Box::pin(async move { Ok(items) })
    }
}

impl NetworkService for FakeCatalog {
    fn list(&self, _query: ListQuery) -> BoxFuture<'_, ApiResult<Vec<Network>>> {
        self.log.push("networks.list");
        let items = self.networks.clone();
        Box::pin(async move { Ok(items) })
    }

    fn get(&self, _id: u64) -> BoxFuture<'_, ApiResult<Network>> {
        unimplemented!("lookups never fetch by id")
    }
}

#[tokio::test]
async fn a_unique_name_resolves_the_certificate() {
    let catalog = FakeCatalog::new(Arc::new(CallLog::default()));

    let selector = CertificateSelector {
        name: Some("api".to_string()),
        ..CertificateSelector::default()
    };
    let found = lookup::find_certificate(&catalog, &selector).await.unwrap();

    assert_eq!(found.id, 1);
}

#[tokio::test]
async fn a_shared_name_needs_a_second_attribute() {
    let catalog = FakeCatalog::new(Arc::new(CallLog::default()));

    let ambiguous = CertificateSelector {
        name: Some("web".to_string()),
        ..CertificateSelector::default()
    };
    let err = lookup::find_certificate(&catalog, &ambiguous)
        .await
        .unwrap_err();
    assert!(matches!(err, ReconcileError::Ambiguous(_)));

    let narrowed = CertificateSelector {
        serial: Some("4E:5F".to_string()),
        ..ambiguous
    };
    let found = lookup::find_certificate(&catalog, &narrowed).await.unwrap();
    assert_eq!(found.id, 3);
}

#[tokio::test]
async fn an_empty_selector_over_many_items_is_ambiguous() {
    let catalog = FakeCatalog::new(Arc::new(CallLog::default()));

    let err = lookup::find_key_pair(&catalog, &KeyPairSelector::default())
        .await
        .unwrap_err();

    assert!(matches!(err, ReconcileError::Ambiguous(_)));
}

#[tokio::test]
async fn a_selector_matching_nothing_reports_not_found() {
    let catalog = FakeCatalog::new(Arc::new(CallLog::default()));

    let selector = KeyPairSelector {
        name: Some("missing".to_string()),
        ..KeyPairSelector::default()
    };
    let err = lookup::find_key_pair(&catalog, &selector).await.unwrap_err();

    match err {
        ReconcileError::NotFound(what) => assert!(what.contains("key pair")),
        other => panic!("expected NotFound, got {other:?}"),
    }
}

#[tokio::test]
async fn all_set_attributes_must_match_together() {
    let catalog = FakeCatalog::new(Arc::new(CallLog::default()));

    // Name and CIDR each match a network, but not the same one.
    let selector = NetworkSelector {
        name: Some("backend".to_string()),
        cidr: Some("10.0.1.0/24".to_string()),
        ..NetworkSelector::default()
    };
    let err = lookup::find_network(&catalog, &selector).await.unwrap_err();
    assert!(matches!(err, ReconcileError::NotFound(_)));

    let selector = NetworkSelector {
        id: Some(2),
        cidr: Some("10.0.1.0/24".to_string()),
        ..NetworkSelector::default()
    };
    let found = lookup::find_network(&catalog, &selector).await.unwrap();
    assert_eq!(found.name, "frontend");
}
