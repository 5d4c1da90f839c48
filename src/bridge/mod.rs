//! Boundary adapter between the host environment and the sync core.
//!
//! The host's string-keyed action table becomes a tagged [`Request`] enum
//! matched exhaustively in [`Dispatcher::handle`]; the sync routine itself
//! carries no dispatch logic. The host plugs its active-tab query in via
//! [`TabSource`] and talks to a spawned dispatcher over a channel.

use anyhow::{Result, anyhow};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use crate::sync::{SyncClient, SyncPayload};

/// Snapshot of the host's active tab.
#[derive(Debug, Clone)]
pub struct TabInfo {
    pub url: String,
    pub title: String,
}

/// Active-tab query provided by the host environment.
pub trait TabSource: Send + Sync {
    fn active_tab(&self) -> Result<TabInfo>;
}

/// Actions the boundary accepts.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "action", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Request {
    /// Build a payload from the active tab and deliver it to the backend.
    SyncWithBackend,

    /// Report the persisted record of the most recent successful sync.
    LastSync,
}

/// Result contract reported back to the host: `{status:"success", data}` or
/// `{status:"error", error}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum SyncResponse {
    Success { data: Value },
    Error { error: String },
}

impl SyncResponse {
    pub fn success(data: Value) -> Self {
        SyncResponse::Success { data }
    }

    pub fn error(message: impl Into<String>) -> Self {
        SyncResponse::Error {
            error: message.into(),
        }
    }
}

/// Routes boundary requests to the sync core.
pub struct Dispatcher {
    client: SyncClient,
    tabs: Arc<dyn TabSource>,
}

impl Dispatcher {
    pub fn new(client: SyncClient, tabs: Arc<dyn TabSource>) -> Self {
        Self { client, tabs }
    }

    /// Serve one request. Failures are folded into the error shape of the
    /// response contract; nothing escapes the boundary as a panic or a bare
    /// `Err`.
    pub async fn handle(&self, request: Request) -> SyncResponse {
        match request {
            Request::SyncWithBackend => {
                let tab = match self.tabs.active_tab() {
                    Ok(tab) => tab,
                    Err(err) => {
                        tracing::warn!("active tab query failed: {err}");
                        return SyncResponse::error(format!("active tab unavailable: {err}"));
                    }
                };

                let payload = SyncPayload::now(tab.url, tab.title);
                match self.client.sync(&payload).await {
                    Ok(data) => SyncResponse::success(data),
                    Err(err) => SyncResponse::error(err.to_string()),
                }
            }

            Request::LastSync => {
                let store = self.client.store();
                match (store.last_sync(), store.sync_data()) {
                    (Ok(Some(last_sync)), Ok(Some(sync_data))) => SyncResponse::success(json!({
                        "lastSync": last_sync,
                        "syncData": sync_data,
                    })),
                    (Ok(_), Ok(_)) => SyncResponse::error("no successful sync recorded"),
                    (Err(err), _) | (_, Err(err)) => SyncResponse::error(err.to_string()),
                }
            }
        }
    }

    /// Run the dispatcher on its own task, exposing the channel surface the
    /// host message route plugs into. Requests are served one at a time in
    /// arrival order; the handle is cheap to clone across host contexts.
    pub fn spawn(self) -> (BridgeHandle, JoinHandle<()>) {
        let (tx, mut rx) = mpsc::channel::<Envelope>(32);

        let task = tokio::spawn(async move {
            while let Some(Envelope { request, reply }) = rx.recv().await {
                let response = self.handle(request).await;
                // Receiver may have hung up; the sync outcome is already
                // persisted, so dropping the reply loses nothing.
                let _ = reply.send(response);
            }
        });

        (BridgeHandle { tx }, task)
    }
}

/// A boundary request paired with its completion channel.
struct Envelope {
    request: Request,
    reply: oneshot::Sender<SyncResponse>,
}

/// Handle for submitting requests to a spawned [`Dispatcher`].
#[derive(Clone)]
pub struct BridgeHandle {
    tx: mpsc::Sender<Envelope>,
}

impl BridgeHandle {
    pub async fn request(&self, request: Request) -> Result<SyncResponse> {
        let (reply, rx) = oneshot::channel();

        self.tx
            .send(Envelope { request, reply })
            .await
            .map_err(|_| anyhow!("bridge task is gone"))?;

        rx.await.map_err(|_| anyhow!("bridge task dropped the reply"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_uses_action_tags() {
        let raw = serde_json::to_value(&Request::SyncWithBackend).unwrap();
        assert_eq!(raw, json!({"action": "SYNC_WITH_BACKEND"}));

        let parsed: Request = serde_json::from_value(json!({"action": "LAST_SYNC"})).unwrap();
        assert_eq!(parsed, Request::LastSync);
    }

    #[test]
    fn test_response_wire_shape() {
        let ok = serde_json::to_value(SyncResponse::success(json!({"id": 42}))).unwrap();
        assert_eq!(ok, json!({"status": "success", "data": {"id": 42}}));

        let err = serde_json::to_value(SyncResponse::error("All sync endpoints failed")).unwrap();
        assert_eq!(
            err,
            json!({"status": "error", "error": "All sync endpoints failed"})
        );
    }
}
