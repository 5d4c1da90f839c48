pub mod client;

pub use client::{SyncClient, SyncPayload};

// Endpoint-fallback delivery: one sync call walks the configured candidate
// list in declaration order, one POST per candidate, and stops at the first
// endpoint that accepts the payload. Only a success writes to the store.
