use std::sync::Arc;
use std::time::Duration;

use anyhow::{Result, anyhow, bail};
use chrono::Utc;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ALL_ENDPOINTS_FAILED, AttemptError};
use crate::storage::Store;

/// Page metadata shipped to the backend on each sync. The sync routine
/// itself treats payloads as opaque; this is just the shape the boundary
/// constructs from the active tab.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncPayload {
    pub url: String,
    pub title: String,
    pub timestamp: String,
}

impl SyncPayload {
    /// Build a payload stamped with the current UTC time.
    pub fn now(url: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            title: title.into(),
            timestamp: Utc::now().to_rfc3339(),
        }
    }
}

/// Delivers payloads to the first accepting endpoint of a fixed ordered
/// candidate list and records the outcome locally.
///
/// Construct one per endpoint configuration and pass it by reference to
/// callers; there is no process-wide instance.
pub struct SyncClient {
    endpoints: Vec<String>,
    http: Client,
    store: Arc<Store>,
}

impl SyncClient {
    /// Create a client over a non-empty ordered endpoint list. The HTTP
    /// client is built once with the transport-default timeout.
    pub fn new(endpoints: Vec<String>, store: Arc<Store>) -> Result<Self> {
        if endpoints.is_empty() {
            bail!("endpoint list must not be empty");
        }

        let http = Client::builder().timeout(Duration::from_secs(30)).build()?;

        Ok(Self {
            endpoints,
            http,
            store,
        })
    }

    pub fn endpoints(&self) -> &[String] {
        &self.endpoints
    }

    pub fn store(&self) -> &Arc<Store> {
        &self.store
    }

    /// Try every candidate in order and stop at the first success.
    ///
    /// A success is a 2xx response with a JSON body; the parsed body is
    /// persisted together with a `lastSync` timestamp and returned, and no
    /// further candidates are contacted. Any failure (transport fault,
    /// non-2xx status, or an unparsable success body) advances to the next
    /// candidate. Once the list is exhausted the call fails with a single
    /// generic error and the store is left untouched.
    pub async fn sync<T: Serialize>(&self, payload: &T) -> Result<Value> {
        for endpoint in &self.endpoints {
            match self.attempt(endpoint, payload).await {
                Ok(body) => {
                    self.persist(&body).await?;
                    tracing::info!(%endpoint, "sync delivered");
                    return Ok(body);
                }
                Err(err) => {
                    tracing::warn!(%endpoint, kind = err.kind(), "sync attempt failed: {err}");
                }
            }
        }

        Err(anyhow!(ALL_ENDPOINTS_FAILED))
    }

    /// One POST to one candidate. `.json()` sets the
    /// `Content-Type: application/json` header and encodes the payload.
    async fn attempt<T: Serialize>(
        &self,
        endpoint: &str,
        payload: &T,
    ) -> Result<Value, AttemptError> {
        let response = self
            .http
            .post(endpoint)
            .json(payload)
            .send()
            .await
            .map_err(AttemptError::Transport)?;

        if !response.status().is_success() {
            return Err(AttemptError::Status(response.status()));
        }

        let bytes = response.bytes().await.map_err(AttemptError::Transport)?;
        serde_json::from_slice(&bytes).map_err(AttemptError::Decode)
    }

    /// Overwrite the persisted sync record with this response body and a
    /// fresh timestamp. Runs on the blocking pool; the store serializes
    /// writers internally.
    async fn persist(&self, body: &Value) -> Result<()> {
        let store = self.store.clone();
        let stamp = Utc::now().to_rfc3339();
        let body = body.clone();

        tokio::task::spawn_blocking(move || store.record_sync(&stamp, &body))
            .await
            .map_err(|err| anyhow!("failed to join store task: {err}"))??;

        Ok(())
    }
}
