//! Configuration system for the treehash CLI.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use treehash_core::{Sha256Primitive, primitive_for};

/// treehash configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Hash configuration
    #[serde(default)]
    pub hash: HashConfig,
    /// Output configuration
    #[serde(default)]
    pub output: OutputConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Hash configuration
///
/// The chunk size is not configurable; only the primitive name is.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HashConfig {
    /// Hash algorithm name
    #[serde(default = "default_algorithm")]
    pub algorithm: String,
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Write per-file elapsed milliseconds to stderr
    #[serde(default = "default_true")]
    pub timing: bool,
    /// Show a progress bar for multi-chunk inputs
    #[serde(default = "default_true")]
    pub progress: bool,
    /// Continue with remaining inputs after a failure
    #[serde(default)]
    pub keep_going: bool,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub level: String,
}

// Default values

fn default_algorithm() -> String {
    Sha256Primitive::NAME.to_string()
}

fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for HashConfig {
    fn default() -> Self {
        Self {
            algorithm: default_algorithm(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            timing: true,
            progress: true,
            keep_going: false,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Config {
    /// Load configuration from file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: Self = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Get default config path
    #[must_use]
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("/tmp"))
            .join("treehash/config.toml")
    }

    /// Load config from the default path, or use defaults if there is none
    ///
    /// # Errors
    ///
    /// Returns an error if an existing config file cannot be read or parsed.
    pub fn load_or_default() -> anyhow::Result<Self> {
        let path = Self::default_path();

        if path.exists() {
            Self::load(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Resolve the configured hash primitive
    ///
    /// # Errors
    ///
    /// Returns an error if the algorithm is not available.
    pub fn primitive(&self) -> anyhow::Result<Sha256Primitive> {
        Ok(primitive_for(&self.hash.algorithm)?)
    }

    /// Validate configuration
    ///
    /// # Errors
    ///
    /// Returns an error if configuration is invalid.
    pub fn validate(&self) -> anyhow::Result<()> {
        self.primitive()?;

        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&self.logging.level.to_lowercase().as_str()) {
            anyhow::bail!(
                "Invalid log level: {}. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            );
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.hash.algorithm, "SHA-256");
        assert!(config.output.timing);
        assert!(config.output.progress);
        assert!(!config.output.keep_going);
        assert_eq!(config.logging.level, "warn");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = Config::default();

        // Unavailable primitive
        config.hash.algorithm = "MD5".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("MD5"));

        // Invalid log level
        config.hash.algorithm = "sha256".to_string();
        config.logging.level = "loud".to_string();
        assert!(config.validate().is_err());

        config.logging.level = "DEBUG".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[output]\nkeep_going = true").unwrap();
        file.flush().unwrap();

        let config = Config::load(file.path()).unwrap();
        assert!(config.output.keep_going);
        assert!(config.output.timing);
        assert_eq!(config.hash.algorithm, "SHA-256");
    }

    #[test]
    fn test_chunk_size_is_not_a_setting() {
        let toml_str = toml::to_string(&Config::default()).unwrap();
        assert!(!toml_str.contains("chunk_size"));
    }

    #[test]
    fn test_toml_serialization() {
        let config = Config::default();
        let toml_str = toml::to_string(&config).unwrap();
        let deserialized: Config = toml::from_str(&toml_str).unwrap();

        assert_eq!(config.hash.algorithm, deserialized.hash.algorithm);
        assert_eq!(config.logging.level, deserialized.logging.level);
    }
}
