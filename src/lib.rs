//! # Beacon - Page Metadata Sync Relay
//!
//! Relays page metadata to a local backend over HTTP, walking a fixed
//! ordered list of candidate endpoints and stopping at the first one that
//! accepts the payload.
//!
//! ## Features
//!
//! - **Ordered fallback delivery**: candidates are tried strictly in
//!   declaration order, one POST each, first success wins
//! - **Last-write-wins persistence**: the most recent successful response
//!   and its timestamp are kept in a local key-value store, no history
//! - **Uniform failure**: exhausting the candidate list surfaces a single
//!   generic error, never a partial store write
//! - **Tagged request boundary**: host triggers arrive as an enum matched
//!   exhaustively at the edge, keeping the sync routine free of dispatch
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use beacon::{Store, SyncClient, SyncPayload};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let store = Arc::new(Store::open(".beacon")?);
//!     store.initialize()?;
//!
//!     let client = SyncClient::new(
//!         vec!["http://localhost:5000/api/sync".into()],
//!         store,
//!     )?;
//!
//!     let body = client
//!         .sync(&SyncPayload::now("https://example.com", "Example"))
//!         .await?;
//!     println!("synced: {body}");
//!     Ok(())
//! }
//! ```

pub mod bridge;
pub mod config;
pub mod error;
pub mod storage;
pub mod sync;

// Re-export main types for library consumers
pub use bridge::{BridgeHandle, Dispatcher, Request, SyncResponse, TabInfo, TabSource};
pub use config::Config;
pub use storage::Store;
pub use sync::{SyncClient, SyncPayload};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
