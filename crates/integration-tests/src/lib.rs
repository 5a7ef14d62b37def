//! Integration tests for Storage Hub.
//!
//! The remote store is a `wiremock` server speaking the PostgREST protocol,
//! so the tests run without a database or network access:
//!
//! ```bash
//! cargo test -p storage-hub-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `rest_store` - request and response shapes of the HTTP store
//! - `sync_fallback` - degraded reads and failed writes through the sync layer
//! - `lifecycle` - warehouse scenarios end to end over the HTTP store

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use rust_decimal::Decimal;
use secrecy::SecretString;
use storage_hub::{LocalCache, RestConfig, RestDocumentStore, SyncLayer, Warehouse};
use storage_hub_core::{BoxDraft, CustomerId, JobDraft, Price, Zone, ZoneCatalog};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

/// Table the tests read and write.
pub const TABLE: &str = "system_data";

/// Document key the tests read and write.
pub const DOCUMENT_KEY: &str = "main";

/// API key accepted by [`rest_config`]'s store.
pub const API_KEY: &str = "sb-k3Yq8Zp2Lm9Wx4RtQv7N";

/// Path the HTTP store requests.
#[must_use]
pub fn table_path() -> String {
    format!("/rest/v1/{TABLE}")
}

#[must_use]
pub fn rest_config(server: &MockServer) -> RestConfig {
    RestConfig {
        url: server.uri(),
        api_key: SecretString::from(API_KEY),
        table: TABLE.to_string(),
    }
}

/// HTTP store pointed at `server`.
#[must_use]
pub fn rest_store(server: &MockServer) -> RestDocumentStore {
    RestDocumentStore::new(&rest_config(server), DOCUMENT_KEY, Duration::from_secs(2)).unwrap()
}

/// Warehouse over the mock server, with its local copy inside `dir`.
pub struct TestContext {
    pub warehouse: Warehouse,
    pub cache: LocalCache,
    pub dir: TempDir,
}

impl TestContext {
    #[must_use]
    pub fn new(server: &MockServer) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let cache = LocalCache::new(dir.path().join("storage_hub_v1_data.json"));
        let sync = SyncLayer::new(
            Arc::new(rest_store(server)),
            cache.clone(),
            Duration::from_secs(2),
        );
        Self {
            warehouse: Warehouse::new(sync, ZoneCatalog::default()),
            cache,
            dir,
        }
    }
}

/// Box draft with a price in whole baht.
#[must_use]
pub fn box_draft(number: &str, price: i64) -> BoxDraft {
    BoxDraft {
        box_number: Some(number.to_string()),
        color: "brown".to_string(),
        box_size: "40x30x30".to_string(),
        price: Price::from(Decimal::new(price, 0)),
        contents: "printed sleeves".to_string(),
        ..BoxDraft::default()
    }
}

#[must_use]
pub fn job_draft(customer_id: &CustomerId, zone: &str, boxes: Vec<BoxDraft>) -> JobDraft {
    JobDraft {
        job_name: "Summer packaging".to_string(),
        product_size: "L".to_string(),
        customer_id: customer_id.clone(),
        zone: Zone::new(zone),
        boxes,
    }
}

/// In-memory stand-in for the document table.
///
/// `GET` answers with the stored row (or `[]`), `POST` replaces it with the
/// upserted `data`. Mount it with [`DocumentTable::mount`].
#[derive(Clone, Default)]
pub struct DocumentTable {
    document: Arc<Mutex<Option<serde_json::Value>>>,
}

impl DocumentTable {
    #[must_use]
    pub fn with_document(document: serde_json::Value) -> Self {
        Self {
            document: Arc::new(Mutex::new(Some(document))),
        }
    }

    /// Last document written to the table.
    #[must_use]
    pub fn document(&self) -> Option<serde_json::Value> {
        self.document.lock().unwrap().clone()
    }

    pub async fn mount(&self, server: &MockServer) {
        Mock::given(method("GET"))
            .and(path(table_path()))
            .respond_with(TableRead(self.clone()))
            .mount(server)
            .await;
        Mock::given(method("POST"))
            .and(path(table_path()))
            .respond_with(TableWrite(self.clone()))
            .mount(server)
            .await;
    }
}

struct TableRead(DocumentTable);

impl Respond for TableRead {
    fn respond(&self, _request: &Request) -> ResponseTemplate {
        let rows = self
            .0
            .document()
            .map(|data| vec![serde_json::json!({ "data": data })])
            .unwrap_or_default();
        ResponseTemplate::new(200).set_body_json(rows)
    }
}

struct TableWrite(DocumentTable);

impl Respond for TableWrite {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let Ok(mut body) = serde_json::from_slice::<serde_json::Value>(&request.body) else {
            return ResponseTemplate::new(400);
        };
        *self.0.document.lock().unwrap() = Some(body["data"].take());
        ResponseTemplate::new(201)
    }
}
