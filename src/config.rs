//! Configuration loading helpers.

use std::env;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::access::AccessConfig;

/// Environment variable naming a TOML config file.
pub const CONFIG_PATH_ENV: &str = "OXIRECORD_CONFIG";

/// Prefix for `OXIRECORD__section__field` overrides.
const ENV_PREFIX: &str = "OXIRECORD__";

/// Errors returned by configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// I/O error while reading config files.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parse error.
    #[error("toml parse error: {0}")]
    Toml(#[from] toml::de::Error),
    /// Invalid value for a key.
    #[error("invalid value for {key}: {value}")]
    InvalidValue {
        /// Configuration key.
        key: String,
        /// Raw value string.
        value: String,
    },
    /// Unknown configuration key.
    #[error("unknown config key: {0}")]
    UnknownKey(String),
}

/// Top-level configuration schema.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OxirecordConfig {
    /// Access cache configuration.
    pub access: Option<AccessConfigSpec>,
}

impl OxirecordConfig {
    /// Parse configuration from a TOML string.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    /// Load configuration from a TOML file.
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Load configuration from the `OXIRECORD_CONFIG` env var (if set),
    /// then apply `OXIRECORD__section__field` overrides.
    pub fn load_from_env() -> Result<Self, ConfigError> {
        let mut config = match env::var(CONFIG_PATH_ENV).ok() {
            Some(path) => Self::load_from_path(path)?,
            None => Self::default(),
        };
        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Apply environment overrides in-place.
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        self.apply_overrides(env::vars())
    }

    /// Apply `OXIRECORD__section__field` style overrides from any source.
    pub fn apply_overrides<I>(&mut self, vars: I) -> Result<(), ConfigError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        for (key, value) in vars {
            let Some(path) = key.strip_prefix(ENV_PREFIX) else {
                continue;
            };
            let path = path.to_ascii_lowercase();
            let parts: Vec<&str> = path.split("__").collect();
            let value = value.trim();

            match parts.as_slice() {
                ["access", "pool_capacity"] => {
                    self.access_mut().pool_capacity = Some(parse_value(&key, value)?);
                }
                ["access", "initial_pool_size"] => {
                    self.access_mut().initial_pool_size = Some(parse_value(&key, value)?);
                }
                ["access", "track_stats"] => {
                    self.access_mut().track_stats = Some(parse_value(&key, value)?);
                }
                _ => return Err(ConfigError::UnknownKey(key)),
            }
        }

        Ok(())
    }

    /// Build an `AccessConfig` using defaults plus overrides.
    pub fn to_access_config(&self) -> AccessConfig {
        let mut config = AccessConfig::default();
        if let Some(access) = &self.access {
            access.apply_to(&mut config);
        }
        config
    }

    fn access_mut(&mut self) -> &mut AccessConfigSpec {
        self.access.get_or_insert_with(AccessConfigSpec::default)
    }
}

/// Access cache configuration overrides.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AccessConfigSpec {
    /// Idle proxy slots kept between batches.
    pub pool_capacity: Option<usize>,
    /// Proxy slots allocated up front.
    pub initial_pool_size: Option<usize>,
    /// Whether to maintain access statistics.
    pub track_stats: Option<bool>,
}

impl AccessConfigSpec {
    fn apply_to(&self, config: &mut AccessConfig) {
        if let Some(value) = self.pool_capacity {
            config.pool_capacity = value.max(1);
        }
        if let Some(value) = self.initial_pool_size {
            config.initial_pool_size = value;
        }
        if let Some(value) = self.track_stats {
            config.track_stats = value;
        }
    }
}

fn parse_value<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value.parse().map_err(|_| ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    })
}
