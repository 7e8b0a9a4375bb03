//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading engine
//! configuration from YAML files.

use std::fs;
use std::path::Path;

use crate::error::{EngineError, EngineResult};
use crate::models::LeaveType;

use super::types::{EngineConfig, LeaveAllowances, LeavePolicy, ServerConfig};

/// Loads and provides access to engine configuration.
///
/// # Directory Structure
///
/// The configuration directory should have the following structure:
/// ```text
/// config/default/
/// ├── leave_policy.yaml   # Yearly leave allowances per leave type
/// └── server.yaml         # Bind address and log filter
/// ```
///
/// # Example
///
/// ```no_run
/// use hr_engine::config::ConfigLoader;
/// use hr_engine::models::LeaveType;
///
/// let loader = ConfigLoader::load("./config/default").unwrap();
/// println!("Annual leave: {:?} days", loader.allowance(LeaveType::Annual));
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConfigLoader {
    config: EngineConfig,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// Returns an error if either file is missing or contains invalid YAML.
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let leave_policy = Self::load_yaml::<LeavePolicy>(&path.join("leave_policy.yaml"))?;
        let server = Self::load_yaml::<ServerConfig>(&path.join("server.yaml"))?;

        Ok(Self {
            config: EngineConfig::new(leave_policy, server),
        })
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Returns the underlying engine configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Returns the configured leave allowances.
    pub fn allowances(&self) -> &LeaveAllowances {
        &self.config.leave_policy().allowances
    }

    /// Returns the yearly allowance for a leave type (`None` for unpaid).
    pub fn allowance(&self, leave_type: LeaveType) -> Option<u32> {
        self.allowances().for_type(leave_type)
    }

    /// Returns the server configuration.
    pub fn server(&self) -> &ServerConfig {
        self.config.server()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_path() -> &'static str {
        "./config/default"
    }

    #[test]
    fn test_load_valid_configuration() {
        let result = ConfigLoader::load(config_path());
        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());

        let loader = result.unwrap();
        assert_eq!(loader.allowances(), &LeaveAllowances::default());
        assert_eq!(loader.server().bind_addr, "0.0.0.0:8080");
    }

    #[test]
    fn test_allowance_lookup_by_type() {
        let loader = ConfigLoader::load(config_path()).unwrap();
        assert_eq!(loader.allowance(LeaveType::Maternity), Some(90));
        assert_eq!(loader.allowance(LeaveType::Unpaid), None);
    }

    #[test]
    fn test_default_loader_uses_built_in_constants() {
        let loader = ConfigLoader::default();
        assert_eq!(loader.allowance(LeaveType::Annual), Some(21));
        assert_eq!(loader.server().log_filter, "info");
    }

    #[test]
    fn test_load_missing_directory_returns_error() {
        let result = ConfigLoader::load("/nonexistent/path");

        match result {
            Err(EngineError::ConfigNotFound { path }) => {
                assert!(path.contains("leave_policy.yaml"));
            }
            _ => panic!("Expected ConfigNotFound error"),
        }
    }

    #[test]
    fn test_malformed_yaml_returns_parse_error() {
        let dir = std::env::temp_dir().join(format!("hr-engine-bad-config-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("leave_policy.yaml"), "allowances: [not, a, map]\n").unwrap();
        fs::write(dir.join("server.yaml"), "{}\n").unwrap();

        let result = ConfigLoader::load(&dir);
        let _ = fs::remove_dir_all(&dir);

        match result {
            Err(EngineError::ConfigParseError { path, .. }) => {
                assert!(path.ends_with("leave_policy.yaml"));
            }
            other => panic!("Expected ConfigParseError, got {:?}", other),
        }
    }
}
