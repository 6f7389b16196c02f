//! Configuration schema (modeldoc.toml)

use serde::{Deserialize, Serialize};

/// Default archive member holding the model document
pub const DEFAULT_MEMBER: &str = "DaxModel.json";

fn default_member() -> String {
    DEFAULT_MEMBER.to_string()
}

fn default_max_entries() -> usize {
    10_000
}

fn default_max_member_bytes() -> u64 {
    256 * 1024 * 1024
}

fn default_true() -> bool {
    true
}

/// Limits applied while reading the archive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerLimitsConfig {
    /// Maximum number of entries in the archive
    #[serde(default = "default_max_entries")]
    pub max_entries: usize,

    /// Maximum uncompressed size of a single member, in bytes
    #[serde(default = "default_max_member_bytes")]
    pub max_member_bytes: u64,
}

impl Default for ContainerLimitsConfig {
    fn default() -> Self {
        Self {
            max_entries: default_max_entries(),
            max_member_bytes: default_max_member_bytes(),
        }
    }
}

/// Graph output settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphConfig {
    /// Whether the extract command builds the table graph at all
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
        }
    }
}

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Archive member holding the model document
    #[serde(default = "default_member")]
    pub member: String,

    /// Container limits
    #[serde(default)]
    pub limits: ContainerLimitsConfig,

    /// Graph output settings
    #[serde(default)]
    pub graph: GraphConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            member: default_member(),
            limits: ContainerLimitsConfig::default(),
            graph: GraphConfig::default(),
        }
    }
}

impl Config {
    /// Load config from TOML file
    pub fn from_file(path: &std::path::Path) -> Result<Self, ConfigError> {
        let contents =
            std::fs::read_to_string(path).map_err(|e| ConfigError::IoError(e.to_string()))?;

        Self::from_toml(&contents)
    }

    /// Load config from TOML string
    pub fn from_toml(toml: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Save config to TOML file
    pub fn save_to_file(&self, path: &std::path::Path) -> Result<(), ConfigError> {
        let toml =
            toml::to_string_pretty(self).map_err(|e| ConfigError::SerializeError(e.to_string()))?;

        std::fs::write(path, toml).map_err(|e| ConfigError::IoError(e.to_string()))?;

        Ok(())
    }
}

/// Config error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Serialize error: {0}")]
    SerializeError(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = Config::default();
        assert_eq!(config.member, "DaxModel.json");
        assert_eq!(config.limits.max_entries, 10_000);
        assert!(config.graph.enabled);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let config = Config::from_toml("member = \"Model.json\"").unwrap();
        assert_eq!(config.member, "Model.json");
        assert_eq!(config.limits, ContainerLimitsConfig::default());
    }

    #[test]
    fn config_toml_roundtrip() {
        let config = Config::default();
        let toml = toml::to_string(&config).unwrap();
        let parsed: Config = toml::from_str(&toml).unwrap();
        assert_eq!(config, parsed);
    }

    #[test]
    fn limits_section() {
        let config = Config::from_toml(
            "[limits]\nmax_entries = 5\nmax_member_bytes = 1024\n",
        )
        .unwrap();
        assert_eq!(config.limits.max_entries, 5);
        assert_eq!(config.limits.max_member_bytes, 1024);
    }
}
