use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::EditorError;

pub const DEFAULT_CONFIG_NAME: &str = "lexform.config.json";

/// Lexform configuration file format
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default)]
    pub autosave: AutosaveConfig,
}

/// Timing for the autosave coordinator, in milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutosaveConfig {
    /// Quiet period after the last edit before a save starts
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// How long `saved` is reported before reverting to `idle`
    #[serde(default = "default_saved_display_ms")]
    pub saved_display_ms: u64,

    /// How long `error` is reported before reverting to `idle`
    #[serde(default = "default_error_display_ms")]
    pub error_display_ms: u64,

    /// Delay before saving a payload that arrived while another save ran
    #[serde(default = "default_settle_ms")]
    pub settle_ms: u64,
}

fn default_debounce_ms() -> u64 {
    2000
}

fn default_saved_display_ms() -> u64 {
    2000
}

fn default_error_display_ms() -> u64 {
    5000
}

fn default_settle_ms() -> u64 {
    100
}

impl Default for AutosaveConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            saved_display_ms: default_saved_display_ms(),
            error_display_ms: default_error_display_ms(),
            settle_ms: default_settle_ms(),
        }
    }
}

impl AutosaveConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn saved_display(&self) -> Duration {
        Duration::from_millis(self.saved_display_ms)
    }

    pub fn error_display(&self) -> Duration {
        Duration::from_millis(self.error_display_ms)
    }

    pub fn settle(&self) -> Duration {
        Duration::from_millis(self.settle_ms)
    }
}

impl Config {
    /// Load config from a directory, falling back to defaults when absent
    pub fn load(dir: &Path) -> Result<Self, EditorError> {
        let config_path = dir.join(DEFAULT_CONFIG_NAME);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let json = r#"{
            "autosave": { "debounceMs": 500, "errorDisplayMs": 8000 }
        }"#;

        let config: Config = serde_json::from_str(json).unwrap();
        assert_eq!(config.autosave.debounce_ms, 500);
        assert_eq!(config.autosave.error_display_ms, 8000);
        assert_eq!(config.autosave.saved_display_ms, 2000);
        assert_eq!(config.autosave.settle(), Duration::from_millis(100));
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.autosave.debounce(), Duration::from_secs(2));
        assert_eq!(config.autosave.error_display(), Duration::from_secs(5));
    }

    #[test]
    fn test_load_from_directory() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        assert_eq!(Config::load(dir.path())?, Config::default());

        std::fs::write(
            dir.path().join(DEFAULT_CONFIG_NAME),
            r#"{ "autosave": { "settleMs": 25 } }"#,
        )?;
        let config = Config::load(dir.path())?;
        assert_eq!(config.autosave.settle_ms, 25);
        assert_eq!(config.autosave.debounce_ms, 2000);
        Ok(())
    }

    #[test]
    fn test_load_rejects_bad_json() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(DEFAULT_CONFIG_NAME), "{").unwrap();
        assert!(matches!(Config::load(dir.path()), Err(EditorError::Config(_))));
    }
}
