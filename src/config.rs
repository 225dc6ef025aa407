//! Configuration management for the resume builder

use crate::error::{Result, ResumeBuilderError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub enrichment: EnrichmentConfig,
    #[serde(default)]
    pub document: DocumentConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnrichmentConfig {
    /// Base URL of an OpenAI-compatible chat completions API
    pub api_base_url: String,
    pub model: String,
    /// Name of the environment variable holding the API key
    pub api_key_env: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub timeout_secs: u64,
    /// Keep the user's own text when an enrichment call fails instead of aborting
    pub fallback_to_raw: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentConfig {
    pub output_file: String,
    pub title: String,
}

impl Default for EnrichmentConfig {
    fn default() -> Self {
        Self {
            api_base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-4o-mini".to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
            max_tokens: 1000,
            temperature: 0.7,
            timeout_secs: 60,
            fallback_to_raw: false,
        }
    }
}

impl Default for DocumentConfig {
    fn default() -> Self {
        Self {
            output_file: "resume.pdf".to_string(),
            title: "Resume".to_string(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            enrichment: EnrichmentConfig::default(),
            document: DocumentConfig::default(),
        }
    }
}

impl Config {
    /// Load the user configuration, writing the defaults on first use
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            let config = Self::default();
            config.save()?;
            Ok(config)
        }
    }

    /// Load an explicit configuration file; a missing file is an error here
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ResumeBuilderError::Configuration(format!(
                "Failed to read config {}: {}",
                path.display(),
                e
            ))
        })?;
        let config: Config = toml::from_str(&content).map_err(|e| {
            ResumeBuilderError::Configuration(format!("Failed to parse config: {}", e))
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self).map_err(|e| {
            ResumeBuilderError::Configuration(format!("Failed to serialize config: {}", e))
        })?;

        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
            .join("resume-builder")
            .join("config.toml")
    }

    pub fn validate(&self) -> Result<()> {
        let enrichment = &self.enrichment;
        if enrichment.api_base_url.trim().is_empty() {
            return Err(ResumeBuilderError::Configuration(
                "enrichment.api_base_url must not be empty".to_string(),
            ));
        }
        if enrichment.max_tokens == 0 {
            return Err(ResumeBuilderError::Configuration(
                "enrichment.max_tokens must be positive".to_string(),
            ));
        }
        if !(0.0..=2.0).contains(&enrichment.temperature) {
            return Err(ResumeBuilderError::Configuration(format!(
                "enrichment.temperature must be within 0.0..=2.0, got {}",
                enrichment.temperature
            )));
        }
        if self.document.output_file.trim().is_empty() {
            return Err(ResumeBuilderError::Configuration(
                "document.output_file must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Read the API key from the configured environment variable
    pub fn api_key(&self) -> Result<String> {
        match std::env::var(&self.enrichment.api_key_env) {
            Ok(key) if !key.trim().is_empty() => Ok(key),
            _ => Err(ResumeBuilderError::Configuration(format!(
                "API key not found: set {} (or pass --no-enrich)",
                self.enrichment.api_key_env
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_service_contract() {
        let config = Config::default();
        assert_eq!(config.enrichment.model, "gpt-4o-mini");
        assert_eq!(config.enrichment.max_tokens, 1000);
        assert!((config.enrichment.temperature - 0.7).abs() < f32::EPSILON);
        assert!(!config.enrichment.fallback_to_raw);
        assert_eq!(config.document.output_file, "resume.pdf");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_file_falls_back_to_defaults() {
        let config: Config = toml::from_str("[enrichment]\ntemperature = 0.2\n").unwrap();
        assert!((config.enrichment.temperature - 0.2).abs() < f32::EPSILON);
        assert_eq!(config.enrichment.model, "gpt-4o-mini");
        assert_eq!(config.document, DocumentConfig::default());
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.enrichment.fallback_to_raw = true;
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_invalid_temperature_rejected() {
        let mut config = Config::default();
        config.enrichment.temperature = 3.5;
        assert!(matches!(
            config.validate(),
            Err(ResumeBuilderError::Configuration(_))
        ));
    }

    #[test]
    fn test_missing_api_key_is_configuration_error() {
        let mut config = Config::default();
        config.enrichment.api_key_env = "RESUME_BUILDER_TEST_KEY_THAT_IS_NOT_SET".to_string();
        assert!(matches!(
            config.api_key(),
            Err(ResumeBuilderError::Configuration(_))
        ));
    }
}
