//! Error types for descriptor resource management

use ash::vk;
use thiserror::Error;

use crate::config::ConfigError;

/// Descriptor resource errors
#[derive(Error, Debug)]
pub enum ResourceError {
    /// General Vulkan API error with result code
    #[error("Vulkan API error: {0:?}")]
    Api(vk::Result),

    /// A pool created for a request could not satisfy that same request
    #[error("Freshly created descriptor pool (max sets {max_sets}) could not satisfy allocation")]
    PoolExhausted {
        /// Set capacity of the pool that was created
        max_sets: u32,
    },

    /// Configuration could not be loaded
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Result type for descriptor resource operations
pub type ResourceResult<T> = Result<T, ResourceError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, PoolAllocatorConfig};

    fn load(contents: &str) -> ResourceResult<PoolAllocatorConfig> {
        Ok(PoolAllocatorConfig::from_toml_str(contents)?)
    }

    #[test]
    fn test_config_error_converts() {
        let result = load("minimum_max_sets = \"many\"");
        assert!(matches!(result, Err(ResourceError::Config(ConfigError::Parse(_)))));
    }

    #[test]
    fn test_api_error_message() {
        let error = ResourceError::Api(vk::Result::ERROR_OUT_OF_DEVICE_MEMORY);
        assert_eq!(error.to_string(), "Vulkan API error: ERROR_OUT_OF_DEVICE_MEMORY");
    }
}
