use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Engine configuration, persisted as JSON next to the rest of the
/// client state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatchConfig {
    /// Base URL of the progress ledger server.
    pub server_url: String,
    /// Embedded-backend position poll cadence, in seconds.
    pub poll_interval_secs: u64,
    /// Wall-clock cadence of the sync scheduler check, in seconds.
    pub sync_interval_secs: u64,
    /// Bounded timeout for a single ledger request, in seconds.
    pub request_timeout_secs: u64,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            server_url: "http://localhost:3000".to_string(),
            poll_interval_secs: 1,
            sync_interval_secs: 5,
            request_timeout_secs: 5,
        }
    }
}

impl WatchConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs.max(1))
    }

    pub fn sync_interval(&self) -> Duration {
        Duration::from_secs(self.sync_interval_secs.max(1))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    pub fn load() -> Self {
        if let Some(config_dir) = dirs::config_dir() {
            return Self::load_from(&config_dir.join("verba").join("watch.json"));
        }
        Self::default()
    }

    pub fn save(&self) -> Result<(), std::io::Error> {
        if let Some(config_dir) = dirs::config_dir() {
            self.save_to(&config_dir.join("verba").join("watch.json"))?;
        }
        Ok(())
    }

    fn load_from(path: &Path) -> Self {
        if path.exists() {
            if let Ok(content) = std::fs::read_to_string(path) {
                if let Ok(config) = serde_json::from_str(&content) {
                    return config;
                }
            }
        }
        Self::default()
    }

    fn save_to(&self, path: &Path) -> Result<(), std::io::Error> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = WatchConfig::load_from(&dir.path().join("watch.json"));
        assert_eq!(config.sync_interval_secs, 5);
        assert_eq!(config.poll_interval_secs, 1);
    }

    #[test]
    fn save_and_reload_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("watch.json");
        let config = WatchConfig {
            server_url: "https://ledger.verba.app".to_string(),
            sync_interval_secs: 10,
            ..WatchConfig::default()
        };
        config.save_to(&path).unwrap();

        let loaded = WatchConfig::load_from(&path);
        assert_eq!(loaded.server_url, "https://ledger.verba.app");
        assert_eq!(loaded.sync_interval_secs, 10);
    }

    #[test]
    fn zero_intervals_are_clamped() {
        let config = WatchConfig {
            sync_interval_secs: 0,
            ..WatchConfig::default()
        };
        assert_eq!(config.sync_interval(), Duration::from_secs(1));
    }
}
