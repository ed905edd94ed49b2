//! Configuration for the extraction pipeline

use serde::{Deserialize, Serialize};

/// Configuration for chunking, concurrency, and sampling
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractorConfig {
    /// Window width in characters per chunk
    pub chunk_size: usize,

    /// Characters shared between consecutive chunks, so facts straddling
    /// a window boundary appear whole in at least one chunk
    pub overlap_size: usize,

    /// Maximum chunk extraction calls in flight at once
    pub max_concurrent_chunks: usize,

    /// Sampling temperature for extraction calls
    pub extraction_temperature: f64,

    /// Sampling temperature for chat answers
    pub chat_temperature: f64,
}

impl Default for ExtractorConfig {
    /// Defaults sized so a chunk plus the prompt template fits the model's
    /// input window.
    fn default() -> Self {
        Self {
            chunk_size: 8000,
            overlap_size: 500,
            max_concurrent_chunks: 4,
            extraction_temperature: 0.3,
            chat_temperature: 0.7,
        }
    }
}

impl ExtractorConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.chunk_size == 0 {
            return Err("chunk_size must be greater than 0".to_string());
        }
        if self.overlap_size >= self.chunk_size {
            return Err("overlap_size must be smaller than chunk_size".to_string());
        }
        if self.max_concurrent_chunks == 0 {
            return Err("max_concurrent_chunks must be greater than 0".to_string());
        }
        Ok(())
    }

    /// Load configuration from a TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to a TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(ExtractorConfig::default().validate().is_ok());
    }

    #[test]
    fn test_overlap_must_stay_below_chunk_size() {
        let mut config = ExtractorConfig::default();
        config.overlap_size = config.chunk_size;
        assert!(config.validate().is_err());

        config.overlap_size = config.chunk_size + 1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_concurrency_is_invalid() {
        let config = ExtractorConfig {
            max_concurrent_chunks: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_toml_round_trip() {
        let config = ExtractorConfig::default();
        let toml_str = config.to_toml().unwrap();
        let parsed = ExtractorConfig::from_toml(&toml_str).unwrap();

        assert_eq!(config.chunk_size, parsed.chunk_size);
        assert_eq!(config.overlap_size, parsed.overlap_size);
        assert_eq!(config.max_concurrent_chunks, parsed.max_concurrent_chunks);
    }
}
