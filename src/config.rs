//! Configuration module for Cloudglue
//!
//! Handles loading and merging configuration from multiple sources:
//! - Default values
//! - System configuration (/etc/cloudglue/cloudglue.toml)
//! - User configuration (~/.cloudglue.toml)
//! - Project configuration (./cloudglue.toml)
//! - Environment variables

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default endpoint serving the host list.
pub const DEFAULT_INVENTORY_URL: &str = "https://api.example.com/hosts";

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Errors raised while loading configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("Failed to read config file '{path}': {source}")]
    Read {
        /// Path to the config file
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// Config file could not be parsed
    #[error("Failed to parse config file '{path}': {message}")]
    Parse {
        /// Path to the config file
        path: PathBuf,
        /// Parser message
        message: String,
    },
}

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Inventory source settings
    pub inventory: InventoryConfig,

    /// AWS settings for the EC2 lookups
    pub aws: AwsConfig,

    /// Logging settings
    pub logging: LoggingConfig,
}

/// Inventory source settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InventoryConfig {
    /// URL returning a JSON array of host objects
    pub url: String,

    /// Request timeout in seconds
    pub timeout: u64,
}

impl Default for InventoryConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_INVENTORY_URL.to_string(),
            timeout: DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// AWS settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AwsConfig {
    /// Named profile from the shared credentials file
    pub profile: Option<String>,

    /// Endpoint override (e.g. a local EC2 emulator)
    pub endpoint_url: Option<String>,

    /// Operation timeout in seconds
    pub timeout: u64,
}

impl Default for AwsConfig {
    fn default() -> Self {
        Self {
            profile: None,
            endpoint_url: None,
            timeout: DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// Logging settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter directive when neither RUST_LOG nor -v is given
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}

/// One config file as written on disk; unset fields leave earlier layers alone
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct ConfigLayer {
    inventory: InventoryLayer,
    aws: AwsLayer,
    logging: LoggingLayer,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct InventoryLayer {
    url: Option<String>,
    timeout: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct AwsLayer {
    profile: Option<String>,
    endpoint_url: Option<String>,
    timeout: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct LoggingLayer {
    level: Option<String>,
}

impl Config {
    /// Load configuration from all sources
    pub fn load(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = Config::default();

        for path in Self::get_config_paths(config_path) {
            if path.exists() {
                config = config.merge(Self::read_layer(&path)?);
            }
        }

        config.apply_env_overrides();

        Ok(config)
    }

    /// Load from a specific file, without environment overrides
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Ok(Config::default().merge(Self::read_layer(path.as_ref())?))
    }

    /// Get the list of configuration file paths to check
    fn get_config_paths(explicit_path: Option<&Path>) -> Vec<PathBuf> {
        // Explicit path takes priority
        if let Some(path) = explicit_path {
            return vec![path.to_path_buf()];
        }

        let mut paths = vec![PathBuf::from("/etc/cloudglue/cloudglue.toml")];

        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".cloudglue.toml"));
        }

        paths.push(PathBuf::from("cloudglue.toml"));
        paths
    }

    fn read_layer(path: &Path) -> Result<ConfigLayer, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let parse_error = |message: String| ConfigError::Parse {
            path: path.to_path_buf(),
            message,
        };

        let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("");

        match extension {
            "yml" | "yaml" => serde_yaml::from_str(&content).map_err(|e| parse_error(e.to_string())),
            "json" => serde_json::from_str(&content).map_err(|e| parse_error(e.to_string())),
            "toml" => toml::from_str(&content).map_err(|e| parse_error(e.to_string())),
            _ => toml::from_str(&content)
                .or_else(|_| serde_yaml::from_str(&content))
                .map_err(|e| parse_error(e.to_string())),
        }
    }

    /// Merge a file layer into this config; every field the layer sets wins
    fn merge(mut self, layer: ConfigLayer) -> Config {
        if let Some(url) = layer.inventory.url {
            self.inventory.url = url;
        }
        if let Some(timeout) = layer.inventory.timeout {
            self.inventory.timeout = timeout;
        }
        if let Some(profile) = layer.aws.profile {
            self.aws.profile = Some(profile);
        }
        if let Some(endpoint_url) = layer.aws.endpoint_url {
            self.aws.endpoint_url = Some(endpoint_url);
        }
        if let Some(timeout) = layer.aws.timeout {
            self.aws.timeout = timeout;
        }
        if let Some(level) = layer.logging.level {
            self.logging.level = level;
        }
        self
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var("CLOUDGLUE_INVENTORY_URL") {
            self.inventory.url = url;
        }

        // CLOUDGLUE_TIMEOUT applies to both remote calls
        if let Ok(timeout) = std::env::var("CLOUDGLUE_TIMEOUT") {
            if let Ok(n) = timeout.parse() {
                self.inventory.timeout = n;
                self.aws.timeout = n;
            }
        }

        if let Ok(profile) = std::env::var("CLOUDGLUE_AWS_PROFILE") {
            self.aws.profile = Some(profile);
        } else if self.aws.profile.is_none() {
            if let Ok(profile) = std::env::var("AWS_PROFILE") {
                self.aws.profile = Some(profile);
            }
        }

        if let Ok(endpoint) = std::env::var("CLOUDGLUE_AWS_ENDPOINT_URL") {
            self.aws.endpoint_url = Some(endpoint);
        }

        if let Ok(level) = std::env::var("CLOUDGLUE_LOG") {
            self.logging.level = level;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.inventory.url, DEFAULT_INVENTORY_URL);
        assert_eq!(config.inventory.timeout, 30);
        assert_eq!(config.aws.timeout, 30);
        assert!(config.aws.profile.is_none());
        assert_eq!(config.logging.level, "warn");
    }

    fn layer(toml_text: &str) -> ConfigLayer {
        toml::from_str(toml_text).unwrap()
    }

    #[test]
    fn test_config_merge() {
        let merged = Config::default()
            .merge(layer("[aws]\nprofile = \"base\""))
            .merge(layer("[inventory]\nurl = \"https://cmdb.internal/hosts\""));

        assert_eq!(merged.inventory.url, "https://cmdb.internal/hosts");
        assert_eq!(merged.aws.profile.as_deref(), Some("base"));
    }

    #[test]
    fn test_later_layer_can_restore_default_value() {
        let merged = Config::default()
            .merge(layer("[inventory]\ntimeout = 60\n\n[logging]\nlevel = \"debug\""))
            .merge(layer("[inventory]\ntimeout = 30\n\n[logging]\nlevel = \"warn\""));

        assert_eq!(merged.inventory.timeout, 30);
        assert_eq!(merged.logging.level, "warn");
    }

    #[test]
    fn test_unset_fields_keep_earlier_layer() {
        let merged = Config::default()
            .merge(layer("[aws]\ntimeout = 60"))
            .merge(layer("[aws]\nendpoint_url = \"http://localhost:4566\""));

        assert_eq!(merged.aws.timeout, 60);
        assert_eq!(merged.aws.endpoint_url.as_deref(), Some("http://localhost:4566"));
    }

    #[test]
    fn test_from_toml_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[inventory]
url = "https://cmdb.internal/hosts"

[aws]
endpoint_url = "http://localhost:4566"
timeout = 5
"#
        )
        .unwrap();

        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.inventory.url, "https://cmdb.internal/hosts");
        assert_eq!(config.inventory.timeout, 30);
        assert_eq!(config.aws.endpoint_url.as_deref(), Some("http://localhost:4566"));
        assert_eq!(config.aws.timeout, 5);
    }

    #[test]
    fn test_from_yaml_file() {
        let mut file = tempfile::Builder::new().suffix(".yml").tempfile().unwrap();
        writeln!(file, "logging:\n  level: debug").unwrap();

        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_from_file_parse_error() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        writeln!(file, "{{ not json").unwrap();

        let result = Config::from_file(file.path());
        assert!(matches!(result, Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_from_file_missing() {
        let result = Config::from_file("/nonexistent/cloudglue.toml");
        assert!(matches!(result, Err(ConfigError::Read { .. })));
    }

    #[test]
    #[serial]
    fn test_env_override() {
        std::env::set_var("CLOUDGLUE_INVENTORY_URL", "http://127.0.0.1:9000/hosts");
        std::env::set_var("CLOUDGLUE_TIMEOUT", "7");
        let mut config = Config::default();
        config.apply_env_overrides();
        assert_eq!(config.inventory.url, "http://127.0.0.1:9000/hosts");
        assert_eq!(config.inventory.timeout, 7);
        assert_eq!(config.aws.timeout, 7);
        std::env::remove_var("CLOUDGLUE_INVENTORY_URL");
        std::env::remove_var("CLOUDGLUE_TIMEOUT");
    }

    #[test]
    #[serial]
    fn test_explicit_path_wins() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[inventory]\ntimeout = 12").unwrap();

        let config = Config::load(Some(file.path())).unwrap();
        assert_eq!(config.inventory.timeout, 12);
    }
}
