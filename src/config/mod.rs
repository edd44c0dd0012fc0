// Configuration module
//
// YAML configuration with ${VAR} substitution. Loaded once in main and
// handed to the service; nothing reads configuration from globals after
// startup.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::ConfigError;

pub mod logging;
pub mod pipeline;
pub mod server;

pub use logging::{LogFormat, LoggingConfig};
pub use pipeline::{FetchConfig, ScratchConfig, TransformConfig};
pub use server::ServerConfig;

/// Environment variable overriding `server.port`
pub const PORT_ENV_VAR: &str = "PORT";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub fetch: FetchConfig,
    #[serde(default)]
    pub transform: TransformConfig,
    #[serde(default)]
    pub scratch: ScratchConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    pub fn from_yaml_with_env(yaml: &str) -> Result<Self, ConfigError> {
        // Replace ${VAR_NAME} with environment variable values
        let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;

        // Every referenced variable must exist before anything is substituted
        for caps in re.captures_iter(yaml) {
            let var_name = &caps[1];
            if std::env::var(var_name).is_err() {
                return Err(ConfigError::MissingEnvVar(var_name.to_string()));
            }
        }

        let substituted = re.replace_all(yaml, |caps: &regex::Captures| {
            std::env::var(&caps[1]).unwrap_or_default()
        });

        Ok(serde_yaml::from_str(&substituted)?)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let yaml = std::fs::read_to_string(path)?;
        Self::from_yaml_with_env(&yaml)
    }

    /// Load configuration for the binary
    ///
    /// Reads `path` when it exists and falls back to defaults otherwise, then
    /// applies the `PORT` override and validates the result.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let mut config = if path.exists() {
            Self::from_file(path)?
        } else {
            tracing::debug!(
                config_file = %path.display(),
                "Config file not found, using defaults"
            );
            Self::default()
        };

        config.apply_env_overrides(|name| std::env::var(name).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Apply environment overrides using the given lookup
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(port) = lookup(PORT_ENV_VAR).filter(|p| !p.is_empty()) {
            self.server.port = port.trim().parse().map_err(|_| {
                ConfigError::Invalid(format!("{} must be a port number, got '{}'", PORT_ENV_VAR, port))
            })?;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Invalid("server.port must be non-zero".to_string()));
        }

        if self.server.threads == 0 {
            return Err(ConfigError::Invalid(
                "server.threads must be at least 1".to_string(),
            ));
        }

        if self.fetch.timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "fetch.timeout_secs must be at least 1".to_string(),
            ));
        }

        if self.fetch.max_source_bytes == 0 {
            return Err(ConfigError::Invalid(
                "fetch.max_source_bytes must be non-zero".to_string(),
            ));
        }

        if self.transform.max_width == 0 {
            return Err(ConfigError::Invalid(
                "transform.max_width must be non-zero".to_string(),
            ));
        }

        if self.transform.max_source_pixels == 0 || self.transform.max_output_pixels == 0 {
            return Err(ConfigError::Invalid(
                "transform pixel limits must be non-zero".to_string(),
            ));
        }

        if !(1..=100).contains(&self.transform.jpeg_quality) {
            return Err(ConfigError::Invalid(format!(
                "transform.jpeg_quality must be 1-100, got {}",
                self.transform.jpeg_quality
            )));
        }

        if self.scratch.directory.as_os_str().is_empty() {
            return Err(ConfigError::Invalid(
                "scratch.directory cannot be empty".to_string(),
            ));
        }

        Ok(())
    }
}
