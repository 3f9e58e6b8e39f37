//! Configuration management for the ATS scorer

use crate::error::{AtsScorerError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub ai: AiConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Settings for the optional model-backed refinement step.
///
/// The API key is deliberately not part of the file: only the name of the
/// environment variable holding it is configured.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AiConfig {
    pub enabled: bool,
    pub base_url: String,
    pub model: String,
    pub max_output_tokens: u32,
    pub timeout_secs: u64,
    pub api_key_env: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub color_output: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Console,
    Json,
    Markdown,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: "https://api.x.ai/v1".to_string(),
            model: "grok-2-latest".to_string(),
            max_output_tokens: 2000,
            timeout_secs: 60,
            api_key_env: "XAI_API_KEY".to_string(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Console,
            color_output: true,
        }
    }
}

impl AiConfig {
    /// Read the credential from the configured environment variable.
    pub fn api_key(&self) -> Option<String> {
        std::env::var(&self.api_key_env)
            .ok()
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty())
    }
}

impl Config {
    /// Load from the default location, writing defaults on first use.
    pub fn load_from(config_path: &Path) -> Result<Self> {
        if config_path.exists() {
            let content = std::fs::read_to_string(config_path)?;
            let config: Config = toml::from_str(&content)
                .map_err(|e| AtsScorerError::Configuration(format!("Failed to parse config: {}", e)))?;
            Ok(config)
        } else {
            let config = Self::default();
            config.save_to(config_path)?;
            Ok(config)
        }
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| AtsScorerError::Configuration(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
            .join("ats-scorer")
            .join("config.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert!(config.ai.enabled);
        assert_eq!(config.ai.max_output_tokens, 2000);
        assert_eq!(config.ai.api_key_env, "XAI_API_KEY");
        assert_eq!(config.output.format, OutputFormat::Console);
    }

    #[test]
    fn test_load_creates_default_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let config = Config::load_from(&path).unwrap();
        assert!(path.exists());
        assert_eq!(config.ai.model, "grok-2-latest");
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[ai]\nenabled = false\n\n[output]\nformat = \"json\"\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert!(!config.ai.enabled);
        assert_eq!(config.ai.timeout_secs, 60);
        assert_eq!(config.output.format, OutputFormat::Json);
        assert!(config.output.color_output);
    }

    #[test]
    fn test_malformed_file_is_configuration_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[ai\nenabled = ").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(matches!(err, AtsScorerError::Configuration(_)));
    }
}
