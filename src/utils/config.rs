use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use crate::cli::OutputFormat;
use crate::utils::error::{EngineError, EngineResult};

/// Main engine configuration
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct EngineConfig {
    pub loader: LoaderConfig,
    pub repl: ReplConfig,
    pub output: OutputConfig,
}

/// Dataset loader configuration
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// Field delimiter of delimited-text sources
    pub delimiter: char,
    /// Trim surrounding whitespace from headers and fields
    pub trim: bool,
}

/// Interactive read loop configuration
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ReplConfig {
    pub prompt: String,
    pub history_file: Option<PathBuf>,
}

/// Result output configuration
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct OutputConfig {
    pub format: OutputFormat,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            delimiter: ',',
            trim: false,
        }
    }
}

impl Default for ReplConfig {
    fn default() -> Self {
        Self {
            prompt: "SQL> ".to_string(),
            history_file: None,
        }
    }
}

impl LoaderConfig {
    /// Delimiter as the single byte the CSV reader expects
    pub fn delimiter_byte(&self) -> EngineResult<u8> {
        if self.delimiter.is_ascii() {
            Ok(self.delimiter as u8)
        } else {
            Err(EngineError::Configuration(format!(
                "Delimiter must be a single ASCII character, got '{}'",
                self.delimiter
            )))
        }
    }
}

impl EngineConfig {
    /// Load configuration from a JSON file; missing fields take their defaults
    pub fn from_file(path: &Path) -> EngineResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            EngineError::Configuration(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;

        let config: EngineConfig = serde_json::from_str(&content).map_err(|e| {
            EngineError::Configuration(format!(
                "Failed to parse config file {}: {}",
                path.display(),
                e
            ))
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Check values that serde alone cannot reject
    pub fn validate(&self) -> EngineResult<()> {
        self.loader.delimiter_byte()?;
        Ok(())
    }
}
