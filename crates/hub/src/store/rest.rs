//! PostgREST-compatible HTTP store.
//!
//! The table has three columns: `id` (text key), `data` (JSON document) and
//! `updated_at`.
//!
//! - Read: `GET {url}/rest/v1/{table}?id=eq.{key}&select=data` returns
//!   `[{"data": {...}}]`, or `[]` when nothing was written yet.
//! - Write: `POST {url}/rest/v1/{table}` with
//!   `Prefer: resolution=merge-duplicates` upserts `{id, data, updated_at}`.
//! - Authentication: the API key goes in the `apikey` header and as a bearer
//!   token.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use storage_hub_core::SystemData;

use super::{DocumentStore, StoreError};
use crate::config::RestConfig;

/// Upsert preference understood by PostgREST.
const PREFER_UPSERT: &str = "resolution=merge-duplicates,return=minimal";

#[derive(Deserialize)]
struct DocumentRow {
    data: Option<SystemData>,
}

#[derive(Serialize)]
struct DocumentUpsert<'a> {
    id: &'a str,
    data: &'a SystemData,
    updated_at: DateTime<Utc>,
}

/// System document stored in a PostgREST table.
#[derive(Clone)]
pub struct RestDocumentStore {
    inner: Arc<RestDocumentStoreInner>,
}

struct RestDocumentStoreInner {
    client: reqwest::Client,
    endpoint: String,
    key: String,
}

impl RestDocumentStore {
    /// Create a store client.
    ///
    /// `timeout` bounds every request made by the client.
    ///
    /// # Errors
    ///
    /// Returns error if the API key is not a valid header value or the HTTP
    /// client fails to build.
    pub fn new(config: &RestConfig, key: &str, timeout: Duration) -> Result<Self, StoreError> {
        let api_key = config.api_key.expose_secret();
        let mut headers = HeaderMap::new();

        let mut apikey = HeaderValue::from_str(api_key)
            .map_err(|e| StoreError::Config(format!("Invalid API key format: {e}")))?;
        apikey.set_sensitive(true);
        headers.insert("apikey", apikey);

        let mut bearer = HeaderValue::from_str(&format!("Bearer {api_key}"))
            .map_err(|e| StoreError::Config(format!("Invalid API key format: {e}")))?;
        bearer.set_sensitive(true);
        headers.insert(AUTHORIZATION, bearer);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            inner: Arc::new(RestDocumentStoreInner {
                client,
                endpoint: format!(
                    "{}/rest/v1/{}",
                    config.url.trim_end_matches('/'),
                    config.table
                ),
                key: key.to_string(),
            }),
        })
    }

    /// Parse error response from the service.
    async fn parse_error(response: reqwest::Response) -> StoreError {
        let status = response.status().as_u16();

        if status == 401 || status == 403 {
            return StoreError::Unauthorized;
        }

        let message = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());

        StoreError::Api { status, message }
    }
}

#[async_trait]
impl DocumentStore for RestDocumentStore {
    fn name(&self) -> &'static str {
        "rest"
    }

    #[tracing::instrument(skip(self), fields(key = %self.inner.key))]
    async fn load(&self) -> Result<Option<SystemData>, StoreError> {
        let response = self
            .inner
            .client
            .get(&self.inner.endpoint)
            .query(&[
                ("id", format!("eq.{}", self.inner.key)),
                ("select", "data".to_string()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::parse_error(response).await);
        }

        let body = response.text().await?;
        let rows: Vec<DocumentRow> = serde_json::from_str(&body)?;
        Ok(rows.into_iter().next().and_then(|row| row.data))
    }

    #[tracing::instrument(skip(self, data), fields(key = %self.inner.key, jobs = data.jobs.len()))]
    async fn save(&self, data: &SystemData) -> Result<(), StoreError> {
        let body = DocumentUpsert {
            id: &self.inner.key,
            data,
            updated_at: Utc::now(),
        };
        let response = self
            .inner
            .client
            .post(&self.inner.endpoint)
            .header("Prefer", PREFER_UPSERT)
            .json(&body)
            .send()
            .await?;

        if response.status().is_success() {
            return Ok(());
        }

        Err(Self::parse_error(response).await)
    }
}

impl std::fmt::Debug for RestDocumentStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestDocumentStore")
            .field("endpoint", &self.inner.endpoint)
            .field("key", &self.inner.key)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use secrecy::SecretString;

    use super::*;

    fn config(url: &str) -> RestConfig {
        RestConfig {
            url: url.to_string(),
            api_key: SecretString::from("k3Yq8Zp2Lm9Wx4Rt"),
            table: "system_data".to_string(),
        }
    }

    #[test]
    fn test_endpoint_strips_trailing_slash() {
        let store =
            RestDocumentStore::new(&config("https://db.local/"), "main", Duration::from_secs(5))
                .unwrap();
        assert_eq!(store.inner.endpoint, "https://db.local/rest/v1/system_data");
    }

    #[test]
    fn test_debug_hides_api_key() {
        let store =
            RestDocumentStore::new(&config("https://db.local"), "main", Duration::from_secs(5))
                .unwrap();
        let debug_output = format!("{store:?}");
        assert!(debug_output.contains("main"));
        assert!(!debug_output.contains("k3Yq8Zp2Lm9Wx4Rt"));
    }

    #[test]
    fn test_row_with_null_data_is_no_document() {
        let rows: Vec<DocumentRow> = serde_json::from_str(r#"[{"data": null}]"#).unwrap();
        assert!(rows.into_iter().next().and_then(|r| r.data).is_none());
    }

    #[test]
    fn test_upsert_body_shape() {
        let data = SystemData::empty();
        let body = DocumentUpsert {
            id: "main",
            data: &data,
            updated_at: Utc::now(),
        };
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["id"], "main");
        assert_eq!(value["data"], serde_json::json!({ "jobs": [], "customers": [] }));
        assert!(value["updated_at"].is_string());
    }
}
