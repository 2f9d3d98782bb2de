//! Configuration management for dotnet-which
//!
//! Settings are loaded from environment variables with sensible defaults;
//! command-line flags override individual fields afterwards.
//!
//! # Environment Variables
//!
//! - `DOTNET_WHICH_PARALLELISM`: Max concurrent probe/resolve operations - default: CPU count
//! - `DOTNET_WHICH_SEQUENTIAL`: Force one operation at a time (true|false) - default: "false"
//! - `DOTNET_WHICH_TOOL_TIMEOUT`: Seconds allowed per `dotnet msbuild` call - default: "300"
//! - `DOTNET_WHICH_LOG_LEVEL`: Logging level - default: "info"
//! - `DOTNET_WHICH_LOG_JSON`: Emit logs as JSON (true|false) - default: "false"
//!
//! The `dotnet` executable itself is located through `DOTNET_HOST_PATH`,
//! `DOTNET_ROOT` or `PATH`, see [`crate::discovery::DotNetMuxer`].
//!
//! # Example
//!
//! ```no_run
//! use dotnet_which::WhichConfig;
//!
//! let config = WhichConfig::from_env().expect("Invalid environment");
//! config.validate().expect("Invalid configuration");
//! println!("{}", config);
//! ```

use crate::discovery::PipelineConfig;
use std::env;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_TOOL_TIMEOUT_SECS: u64 = 300;
const MAX_TOOL_TIMEOUT_SECS: u64 = 3600;
const MAX_PARALLELISM: usize = 1024;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Configuration validation failed
    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),

    /// Failed to parse configuration value
    #[error("Failed to parse {field}: {error}")]
    ParseError { field: String, error: String },
}

/// Runtime configuration for a discovery run
#[derive(Debug, Clone)]
pub struct WhichConfig {
    /// Maximum number of concurrent probe or resolve operations
    pub parallelism: usize,

    /// Run every stage strictly one item at a time
    pub sequential: bool,

    /// Timeout for each external tool invocation, in seconds
    pub tool_timeout_secs: u64,

    /// Logging level (trace, debug, info, warn, error)
    pub log_level: String,

    /// Emit logs as JSON
    pub log_json: bool,
}

impl Default for WhichConfig {
    fn default() -> Self {
        Self {
            parallelism: num_cpus::get(),
            sequential: false,
            tool_timeout_secs: DEFAULT_TOOL_TIMEOUT_SECS,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            log_json: false,
        }
    }
}

fn parse_env<T>(key: &str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| ConfigError::ParseError {
                field: key.to_string(),
                error: format!("'{}': {}", raw, e),
            }),
        Err(_) => Ok(None),
    }
}

impl WhichConfig {
    /// Loads configuration from `DOTNET_WHICH_*` variables over the defaults.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ParseError` when a variable is set but malformed.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        Ok(Self {
            parallelism: parse_env("DOTNET_WHICH_PARALLELISM")?.unwrap_or(defaults.parallelism),
            sequential: parse_env("DOTNET_WHICH_SEQUENTIAL")?.unwrap_or(defaults.sequential),
            tool_timeout_secs: parse_env("DOTNET_WHICH_TOOL_TIMEOUT")?
                .unwrap_or(defaults.tool_timeout_secs),
            log_level: env::var("DOTNET_WHICH_LOG_LEVEL")
                .map(|v| v.to_lowercase())
                .unwrap_or(defaults.log_level),
            log_json: parse_env("DOTNET_WHICH_LOG_JSON")?.unwrap_or(defaults.log_json),
        })
    }

    /// Validates the configuration
    ///
    /// Checks that parallelism and the tool timeout are in range and that the
    /// log level is known.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.parallelism == 0 {
            return Err(ConfigError::ValidationFailed(
                "Parallelism must be at least 1".to_string(),
            ));
        }
        if self.parallelism > MAX_PARALLELISM {
            return Err(ConfigError::ValidationFailed(format!(
                "Parallelism cannot exceed {}",
                MAX_PARALLELISM
            )));
        }

        if self.tool_timeout_secs == 0 {
            return Err(ConfigError::ValidationFailed(
                "Tool timeout must be at least 1 second".to_string(),
            ));
        }
        if self.tool_timeout_secs > MAX_TOOL_TIMEOUT_SECS {
            return Err(ConfigError::ValidationFailed(
                "Tool timeout cannot exceed 1 hour".to_string(),
            ));
        }

        match self.log_level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => {
                return Err(ConfigError::ValidationFailed(format!(
                    "Invalid log level: {}. Valid options: trace, debug, info, warn, error",
                    self.log_level
                )))
            }
        }

        Ok(())
    }

    /// Effective concurrency; `sequential` wins over `parallelism`.
    pub fn pipeline_config(&self) -> PipelineConfig {
        if self.sequential {
            PipelineConfig::sequential()
        } else {
            PipelineConfig::with_parallelism(self.parallelism)
        }
    }

    pub fn tool_timeout(&self) -> Duration {
        Duration::from_secs(self.tool_timeout_secs)
    }
}

impl fmt::Display for WhichConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "dotnet-which Configuration:")?;
        writeln!(f, "  Parallelism: {}", self.pipeline_config().parallelism())?;
        writeln!(f, "  Tool Timeout: {}s", self.tool_timeout_secs)?;
        writeln!(f, "  Log Level: {}", self.log_level)?;
        writeln!(f, "  Log JSON: {}", self.log_json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    /// Helper to temporarily set environment variables for testing
    struct EnvGuard {
        key: String,
        old_value: Option<String>,
    }

    impl EnvGuard {
        fn set(key: &str, value: &str) -> Self {
            let old_value = env::var(key).ok();
            env::set_var(key, value);
            Self {
                key: key.to_string(),
                old_value,
            }
        }

        fn unset(key: &str) -> Self {
            let old_value = env::var(key).ok();
            env::remove_var(key);
            Self {
                key: key.to_string(),
                old_value,
            }
        }
    }

    impl Drop for EnvGuard {
        fn drop(&mut self) {
            match &self.old_value {
                Some(v) => env::set_var(&self.key, v),
                None => env::remove_var(&self.key),
            }
        }
    }

    #[test]
    #[serial]
    fn test_from_env_defaults() {
        let _guards = vec![
            EnvGuard::unset("DOTNET_WHICH_PARALLELISM"),
            EnvGuard::unset("DOTNET_WHICH_SEQUENTIAL"),
            EnvGuard::unset("DOTNET_WHICH_TOOL_TIMEOUT"),
            EnvGuard::unset("DOTNET_WHICH_LOG_LEVEL"),
            EnvGuard::unset("DOTNET_WHICH_LOG_JSON"),
        ];

        let config = WhichConfig::from_env().unwrap();

        assert_eq!(config.parallelism, num_cpus::get());
        assert!(!config.sequential);
        assert_eq!(config.tool_timeout_secs, DEFAULT_TOOL_TIMEOUT_SECS);
        assert_eq!(config.log_level, DEFAULT_LOG_LEVEL);
        assert!(!config.log_json);
    }

    #[test]
    #[serial]
    fn test_environment_variable_parsing() {
        let _guards = vec![
            EnvGuard::set("DOTNET_WHICH_PARALLELISM", "3"),
            EnvGuard::set("DOTNET_WHICH_SEQUENTIAL", "true"),
            EnvGuard::set("DOTNET_WHICH_TOOL_TIMEOUT", "45"),
            EnvGuard::set("DOTNET_WHICH_LOG_LEVEL", "DEBUG"),
            EnvGuard::set("DOTNET_WHICH_LOG_JSON", "true"),
        ];

        let config = WhichConfig::from_env().unwrap();

        assert_eq!(config.parallelism, 3);
        assert!(config.sequential);
        assert_eq!(config.tool_timeout_secs, 45);
        assert_eq!(config.log_level, "debug");
        assert!(config.log_json);
    }

    #[test]
    #[serial]
    fn test_malformed_environment_variable() {
        let _guard = EnvGuard::set("DOTNET_WHICH_PARALLELISM", "lots");

        match WhichConfig::from_env() {
            Err(ConfigError::ParseError { field, .. }) => {
                assert_eq!(field, "DOTNET_WHICH_PARALLELISM")
            }
            other => panic!("Expected ParseError, got {:?}", other),
        }
    }

    #[test]
    fn test_configuration_validation_valid() {
        assert!(WhichConfig::default().validate().is_ok());
    }

    #[test]
    fn test_configuration_validation_invalid_parallelism() {
        let mut config = WhichConfig::default();
        config.parallelism = 0;
        assert!(config.validate().is_err());

        config.parallelism = MAX_PARALLELISM + 1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_configuration_validation_invalid_timeout() {
        let mut config = WhichConfig::default();
        config.tool_timeout_secs = 0;
        assert!(config.validate().is_err());

        config.tool_timeout_secs = MAX_TOOL_TIMEOUT_SECS + 1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_configuration_validation_invalid_log_level() {
        let mut config = WhichConfig::default();
        config.log_level = "invalid".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_sequential_overrides_parallelism() {
        let config = WhichConfig {
            parallelism: 16,
            sequential: true,
            ..Default::default()
        };
        assert_eq!(config.pipeline_config().parallelism(), 1);

        let config = WhichConfig {
            parallelism: 16,
            ..Default::default()
        };
        assert_eq!(config.pipeline_config().parallelism(), 16);
    }

    #[test]
    fn test_config_display() {
        let display = format!("{}", WhichConfig::default());
        assert!(display.contains("dotnet-which Configuration:"));
        assert!(display.contains("Parallelism:"));
    }
}
