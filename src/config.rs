use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use url::Url;
use uuid::Uuid;

/// Backend candidates tried in declaration order when no config overrides
/// them.
pub const DEFAULT_ENDPOINTS: [&str; 2] = [
    "http://localhost:5000/api/sync",
    "http://localhost:3000/api/sync",
];

const CONFIG_FILE: &str = "config.json";

/// Client configuration, persisted as `config.json` in the data directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Stable identifier for this installation.
    pub client_id: Uuid,

    /// Ordered sync endpoint candidates. The order is the fallback order.
    pub endpoints: Vec<String>,

    /// Whether the host should trigger a sync whenever the active tab
    /// changes.
    pub auto_sync: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            client_id: Uuid::new_v4(),
            endpoints: DEFAULT_ENDPOINTS.iter().map(|s| s.to_string()).collect(),
            auto_sync: true,
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config: {}", path.display()))?;
        let config: Config = serde_json::from_str(&raw)
            .with_context(|| format!("invalid config: {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        std::fs::write(path, serde_json::to_string_pretty(self)?)
            .with_context(|| format!("failed to write config: {}", path.display()))?;
        Ok(())
    }

    /// Load `config.json` from the data directory, falling back to the
    /// defaults when the file does not exist yet.
    pub fn load_or_default(data_dir: &Path) -> Result<Self> {
        let path = data_dir.join(CONFIG_FILE);
        if path.exists() {
            Self::load(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// The endpoint list must be non-empty and every entry must parse as an
    /// absolute URL.
    pub fn validate(&self) -> Result<()> {
        if self.endpoints.is_empty() {
            bail!("config must list at least one sync endpoint");
        }
        for endpoint in &self.endpoints {
            Url::parse(endpoint)
                .with_context(|| format!("invalid sync endpoint: {endpoint}"))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_keep_fallback_order() {
        let config = Config::default();
        assert_eq!(config.endpoints.len(), 2);
        assert_eq!(config.endpoints[0], "http://localhost:5000/api/sync");
        assert_eq!(config.endpoints[1], "http://localhost:3000/api/sync");
        assert!(config.auto_sync);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_endpoint_list_rejected() {
        let config = Config {
            endpoints: vec![],
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_unparsable_endpoint_rejected() {
        let config = Config {
            endpoints: vec!["not a url".to_string()],
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_save_load_round_trip() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE);

        let config = Config::default();
        config.save(&path).unwrap();

        let loaded = Config::load(&path).unwrap();
        assert_eq!(loaded.client_id, config.client_id);
        assert_eq!(loaded.endpoints, config.endpoints);
    }

    #[test]
    fn test_load_or_default_without_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = Config::load_or_default(dir.path()).unwrap();
        assert_eq!(config.endpoints.len(), 2);
    }
}
