//! Configuration system

pub use serde::{Serialize, Deserialize};

/// Configuration trait
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Load configuration from file
    fn load_from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(ConfigError::Io)?;

        if path.ends_with(".toml") {
            Self::from_toml_str(&contents)
        } else if path.ends_with(".ron") {
            Self::from_ron_str(&contents)
        } else {
            Err(ConfigError::UnsupportedFormat(path.to_string()))
        }
    }

    /// Parse configuration from TOML text
    fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        toml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Parse configuration from RON text
    fn from_ron_str(contents: &str) -> Result<Self, ConfigError> {
        ron::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Save configuration to file
    fn save_to_file(&self, path: &str) -> Result<(), ConfigError> {
        let contents = if path.ends_with(".toml") {
            toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else if path.ends_with(".ron") {
            ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
                .map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else {
            return Err(ConfigError::UnsupportedFormat(path.to_string()));
        };

        std::fs::write(path, contents).map_err(ConfigError::Io)
    }
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Unsupported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}

/// # Pool Allocator Configuration
///
/// Tuning knobs for [`PoolSetAllocator`](crate::descriptors::PoolSetAllocator).
/// All fields default so a partial file only overrides what it names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolAllocatorConfig {
    /// Lower bound on the set capacity of every pool, on top of the
    /// requirements the allocator is constructed with. Clamped to at least 1.
    pub minimum_max_sets: u32,
    /// Set-count target used when sizing a new pool from reservation history.
    /// Zero means the immediate request is the target.
    pub target_max_sets: u32,
    /// Log pool sizing decisions at info level instead of debug
    pub log_sizing_decisions: bool,
}

impl Default for PoolAllocatorConfig {
    fn default() -> Self {
        Self {
            minimum_max_sets: 1,
            target_max_sets: 0,
            log_sizing_decisions: false,
        }
    }
}

impl Config for PoolAllocatorConfig {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = PoolAllocatorConfig::default();
        assert_eq!(config.minimum_max_sets, 1);
        assert_eq!(config.target_max_sets, 0);
        assert!(!config.log_sizing_decisions);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = PoolAllocatorConfig::from_toml_str("target_max_sets = 64\n").unwrap();
        assert_eq!(config.target_max_sets, 64);
        assert_eq!(config.minimum_max_sets, 1);
    }

    #[test]
    fn test_ron_config() {
        let config = PoolAllocatorConfig::from_ron_str(
            "(minimum_max_sets: 8, log_sizing_decisions: true)",
        )
        .unwrap();
        assert_eq!(config.minimum_max_sets, 8);
        assert!(config.log_sizing_decisions);
    }

    #[test]
    fn test_unsupported_format() {
        let result = PoolAllocatorConfig::load_from_file("pools.yaml");
        assert!(matches!(result, Err(ConfigError::UnsupportedFormat(_)) | Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_save_and_load_toml() {
        let path = std::env::temp_dir().join("scene_resources_pool_config_test.toml");
        let path = path.to_string_lossy().to_string();
        let config = PoolAllocatorConfig {
            minimum_max_sets: 16,
            target_max_sets: 32,
            log_sizing_decisions: true,
        };
        config.save_to_file(&path).unwrap();
        let loaded = PoolAllocatorConfig::load_from_file(&path).unwrap();
        let _ = std::fs::remove_file(&path);
        assert_eq!(loaded, config);
    }
}
