//! Configuration management for the CLI.
//!
//! Settings come from a TOML file (default `~/.pragati/config.toml`,
//! overridable with `--config`), with environment variables taking
//! precedence for the completion-service settings so credentials can stay
//! out of the file.

use crate::error::{CliError, Result};
use pragati_extractor::ExtractorConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// CLI configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Path to the SQLite database file
    #[serde(default = "default_database_path")]
    pub database_path: PathBuf,

    /// Completion-service settings
    #[serde(default)]
    pub llm: LlmSettings,

    /// Chunking, concurrency, and sampling settings
    #[serde(default)]
    pub extractor: ExtractorConfig,
}

/// Completion-service connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmSettings {
    /// Completions endpoint URL
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// API key, sent as both bearer token and `API-Key` header
    #[serde(default)]
    pub api_key: String,

    /// Model identifier for the request body
    #[serde(default = "default_model")]
    pub model: String,

    /// Attempts per completion call
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

fn default_database_path() -> PathBuf {
    PathBuf::from("pragati.db")
}

fn default_endpoint() -> String {
    "http://localhost:8000/v1/completions".to_string()
}

fn default_model() -> String {
    "gemini-2.0-flash".to_string()
}

fn default_max_retries() -> u32 {
    3
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            api_key: String::new(),
            model: default_model(),
            max_retries: default_max_retries(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            llm: LlmSettings::default(),
            extractor: ExtractorConfig::default(),
        }
    }
}

impl Config {
    /// Default configuration file path (`~/.pragati/config.toml`).
    pub fn default_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| CliError::Config("Could not find home directory".into()))?;
        Ok(home.join(".pragati").join("config.toml"))
    }

    /// Load configuration, apply environment overrides, and validate.
    ///
    /// A missing file yields the defaults; an explicit `--config` path
    /// that does not exist is an error.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        let mut config = match explicit_path {
            Some(path) => {
                let contents = fs::read_to_string(path).map_err(|e| {
                    CliError::Config(format!("Cannot read {}: {}", path.display(), e))
                })?;
                toml::from_str(&contents)?
            }
            None => {
                let path = Self::default_path()?;
                if path.exists() {
                    toml::from_str(&fs::read_to_string(&path)?)?
                } else {
                    Self::default()
                }
            }
        };

        config.apply_env_overrides();
        config
            .extractor
            .validate()
            .map_err(CliError::Config)?;
        Ok(config)
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(endpoint) = std::env::var("PRAGATI_LLM_ENDPOINT") {
            self.llm.endpoint = endpoint;
        }
        if let Ok(api_key) = std::env::var("PRAGATI_API_KEY") {
            self.llm.api_key = api_key;
        }
        if let Ok(model) = std::env::var("PRAGATI_MODEL") {
            self.llm.model = model;
        }
        if let Ok(db) = std::env::var("PRAGATI_DB") {
            self.database_path = PathBuf::from(db);
        }
    }
}
