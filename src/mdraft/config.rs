use crate::ai::gemini::DEFAULT_MODEL;
use crate::error::{MdraftError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

const CONFIG_FILENAME: &str = "config.json";
const DEFAULT_AUTOSAVE_DELAY_MS: u64 = 2000;

/// Configuration for mdraft, stored as config.json in the data directory.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MdraftConfig {
    /// Quiet period before an autosave fires, in milliseconds
    #[serde(default = "default_autosave_delay_ms")]
    pub autosave_delay_ms: u64,

    /// Where the document collection lives; platform data dir when unset
    #[serde(default)]
    pub data_dir: Option<PathBuf>,

    #[serde(default)]
    pub ai: AiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AiConfig {
    #[serde(default)]
    pub api_key: String,

    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_autosave_delay_ms() -> u64 {
    DEFAULT_AUTOSAVE_DELAY_MS
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_enabled() -> bool {
    true
}

impl Default for MdraftConfig {
    fn default() -> Self {
        Self {
            autosave_delay_ms: DEFAULT_AUTOSAVE_DELAY_MS,
            data_dir: None,
            ai: AiConfig::default(),
        }
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: default_model(),
            enabled: true,
        }
    }
}

impl MdraftConfig {
    /// Load config from the given directory, or return defaults if not found
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path).map_err(MdraftError::Io)?;
        let config: MdraftConfig =
            serde_json::from_str(&content).map_err(MdraftError::Serialization)?;
        Ok(config)
    }

    /// Save config to the given directory
    pub fn save<P: AsRef<Path>>(&self, config_dir: P) -> Result<()> {
        let config_dir = config_dir.as_ref();

        if !config_dir.exists() {
            fs::create_dir_all(config_dir).map_err(MdraftError::Io)?;
        }

        let config_path = config_dir.join(CONFIG_FILENAME);
        let content = serde_json::to_string_pretty(self).map_err(MdraftError::Serialization)?;
        fs::write(config_path, content).map_err(MdraftError::Io)?;
        Ok(())
    }

    pub fn autosave_delay(&self) -> Duration {
        Duration::from_millis(self.autosave_delay_ms)
    }

    /// AI features require both the flag and a key.
    pub fn ai_available(&self) -> bool {
        self.ai.enabled && !self.ai.api_key.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_delay_is_two_seconds() {
        let config = MdraftConfig::default();
        assert_eq!(config.autosave_delay(), Duration::from_millis(2000));
    }

    #[test]
    fn load_missing_config_returns_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = MdraftConfig::load(dir.path()).unwrap();
        assert_eq!(config, MdraftConfig::default());
    }

    #[test]
    fn save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();

        let mut config = MdraftConfig::default();
        config.autosave_delay_ms = 500;
        config.ai.api_key = "k".into();
        config.save(dir.path()).unwrap();

        let loaded = MdraftConfig::load(dir.path()).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn ai_requires_key_and_flag() {
        let mut config = MdraftConfig::default();
        assert!(!config.ai_available());
        config.ai.api_key = "k".into();
        assert!(config.ai_available());
        config.ai.enabled = false;
        assert!(!config.ai_available());
    }

    #[test]
    fn partial_config_fills_in_defaults() {
        let config: MdraftConfig =
            serde_json::from_str(r#"{"autosave_delay_ms": 100}"#).unwrap();
        assert_eq!(config.autosave_delay_ms, 100);
        assert_eq!(config.ai.model, DEFAULT_MODEL);
    }
}
