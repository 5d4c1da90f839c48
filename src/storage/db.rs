use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use parking_lot::Mutex;
use rusqlite::{Connection, params};
use serde_json::Value;

/// Flat key holding the RFC 3339 timestamp of the last successful sync.
pub const LAST_SYNC_KEY: &str = "lastSync";

/// Flat key holding the JSON body returned by the succeeding endpoint.
pub const SYNC_DATA_KEY: &str = "syncData";

/// Local key-value store. Holds at most one sync record at a time; every
/// successful sync overwrites the previous one.
pub struct Store {
    pub conn: Arc<Mutex<Connection>>,
}

impl Store {
    pub fn new(data_dir: &Path) -> Result<Self> {
        let db_path = data_dir.join("beacon.db");
        let conn = Connection::open(db_path)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn open(data_dir: &str) -> Result<Self> {
        Self::new(Path::new(data_dir))
    }

    pub fn initialize(&self) -> Result<()> {
        let conn = self.conn.lock();

        conn.execute(
            "CREATE TABLE IF NOT EXISTS kv (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            )",
            [],
        )?;

        Ok(())
    }

    pub fn set(&self, key: &str, value: &str) -> Result<()> {
        let conn = self.conn.lock();
        conn.execute(
            "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }

    pub fn get(&self, key: &str) -> Result<Option<String>> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare("SELECT value FROM kv WHERE key = ?1")?;
        let mut rows = stmt.query(params![key])?;
        match rows.next()? {
            Some(row) => Ok(Some(row.get(0)?)),
            None => Ok(None),
        }
    }

    /// Write the sync outcome pair in one transaction so a reader never
    /// observes a timestamp from one sync and a body from another.
    pub fn record_sync(&self, timestamp: &str, body: &Value) -> Result<()> {
        let mut conn = self.conn.lock();
        let tx = conn.transaction()?;
        tx.execute(
            "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
            params![LAST_SYNC_KEY, timestamp],
        )?;
        tx.execute(
            "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
            params![SYNC_DATA_KEY, serde_json::to_string(body)?],
        )?;
        tx.commit()?;
        Ok(())
    }

    pub fn last_sync(&self) -> Result<Option<String>> {
        self.get(LAST_SYNC_KEY)
    }

    pub fn sync_data(&self) -> Result<Option<Value>> {
        match self.get(SYNC_DATA_KEY)? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn scratch_store() -> (tempfile::TempDir, Store) {
        let dir = tempfile::TempDir::new().unwrap();
        let store = Store::new(dir.path()).unwrap();
        store.initialize().unwrap();
        (dir, store)
    }

    #[test]
    fn test_set_get_round_trip() {
        let (_dir, store) = scratch_store();

        assert_eq!(store.get("missing").unwrap(), None);

        store.set("k", "v1").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v1"));

        store.set("k", "v2").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v2"));
    }

    #[test]
    fn test_record_sync_writes_both_keys() {
        let (_dir, store) = scratch_store();

        store
            .record_sync("2026-01-01T00:00:00Z", &json!({"id": 42}))
            .unwrap();

        assert_eq!(
            store.last_sync().unwrap().as_deref(),
            Some("2026-01-01T00:00:00Z")
        );
        assert_eq!(store.sync_data().unwrap(), Some(json!({"id": 42})));
    }

    #[test]
    fn test_record_sync_is_last_write_wins() {
        let (_dir, store) = scratch_store();

        store
            .record_sync("2026-01-01T00:00:00Z", &json!({"first": true}))
            .unwrap();
        store
            .record_sync("2026-01-02T00:00:00Z", &json!({"second": true}))
            .unwrap();

        assert_eq!(
            store.last_sync().unwrap().as_deref(),
            Some("2026-01-02T00:00:00Z")
        );
        assert_eq!(store.sync_data().unwrap(), Some(json!({"second": true})));
    }
}
