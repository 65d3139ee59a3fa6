//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use thiserror::Error;

use super::schema::SupervisorConfig;

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<SupervisorConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: SupervisorConfig = toml::from_str(&content)?;
    validate(&config)?;
    Ok(config)
}

/// Semantic checks serde cannot express.
fn validate(config: &SupervisorConfig) -> Result<(), ConfigError> {
    let base = &config.api.base_path;
    if !base.starts_with('/') {
        return Err(ConfigError::Invalid(format!(
            "base_path must start with '/', got '{base}'"
        )));
    }
    if base.len() > 1 && base.ends_with('/') {
        return Err(ConfigError::Invalid(format!(
            "base_path must not end with '/', got '{base}'"
        )));
    }
    if config.api.step_secs == 0 {
        return Err(ConfigError::Invalid(
            "step_secs must be at least 1".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(validate(&SupervisorConfig::default()).is_ok());
    }

    #[test]
    fn test_rejects_relative_base_path() {
        let mut config = SupervisorConfig::default();
        config.api.base_path = "api/v1".to_string();
        assert!(matches!(validate(&config), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_rejects_trailing_slash() {
        let mut config = SupervisorConfig::default();
        config.api.base_path = "/api/v1/".to_string();
        assert!(matches!(validate(&config), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_parses_partial_toml() {
        let config: SupervisorConfig = toml::from_str(
            r#"
            [listener]
            bind_address = "127.0.0.1:8099"

            [api]
            base_path = "/supervisor/api/v1"
            "#,
        )
        .unwrap();
        assert_eq!(config.listener.bind_address, "127.0.0.1:8099");
        assert_eq!(config.api.base_path, "/supervisor/api/v1");
        assert_eq!(config.api.page_size, 10);
    }
}
