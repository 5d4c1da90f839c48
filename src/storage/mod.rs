pub mod db;

use std::path::Path;

use anyhow::Result;

use crate::config::Config;

pub use db::{LAST_SYNC_KEY, SYNC_DATA_KEY, Store};

/// Data directory created next to the given path.
pub const DATA_DIR: &str = ".beacon";

/// Create the data directory, the key-value store, and a default
/// `config.json` with a fresh client id.
pub async fn init(path: &Path) -> Result<()> {
    let data_path = path.join(DATA_DIR);

    tokio::fs::create_dir_all(&data_path).await?;

    // Initialize database
    let store = Store::new(&data_path)?;
    store.initialize()?;

    // Create config
    let config = Config::default();
    config.save(&data_path.join("config.json"))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_init_creates_store_and_config() {
        let dir = tempfile::TempDir::new().unwrap();

        init(dir.path()).await.unwrap();

        let data_path = dir.path().join(DATA_DIR);
        assert!(data_path.join("beacon.db").exists());
        assert!(data_path.join("config.json").exists());

        let config = Config::load_or_default(&data_path).unwrap();
        assert_eq!(config.endpoints.len(), 2);
    }
}
