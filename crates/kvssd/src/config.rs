//! Backend configuration
//!
//! A benchmark harness selects the device through string properties
//! (`kvssd.backend`, `kvssd.shard_amount`). This module turns those into a
//! validated [`KvssdConfig`] and opens the matching device.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::device::KvssdDevice;
use crate::hashmap::HashmapKvssd;
use crate::sharded::{DEFAULT_SHARD_AMOUNT, MAX_SHARD_AMOUNT, ShardedKvssd};

/// Property naming the backend.
pub const PROP_BACKEND: &str = "kvssd.backend";
/// Property naming the shard amount of the sharded backend.
pub const PROP_SHARD_AMOUNT: &str = "kvssd.shard_amount";

/// Configuration errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A property value could not be parsed
    #[error("Invalid value '{value}' for property {property}")]
    InvalidProperty {
        /// Property name
        property: String,
        /// Rejected value
        value: String,
    },

    /// The backend is recognized but not available in this build
    #[error("Backend '{0}' is not supported by this build")]
    UnsupportedBackend(Backend),

    /// The configuration is inconsistent
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Device backend selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// Single hashmap behind one reader-writer lock
    #[default]
    Hashmap,
    /// Sharded concurrent map with per-shard locking
    Sharded,
    /// A physical KV-SSD
    #[serde(rename = "kvssd")]
    Device,
}

impl Backend {
    /// Property value naming this backend.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Hashmap => "hashmap",
            Self::Sharded => "sharded",
            Self::Device => "kvssd",
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Backend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "hashmap" => Ok(Self::Hashmap),
            "sharded" => Ok(Self::Sharded),
            "kvssd" => Ok(Self::Device),
            other => Err(ConfigError::InvalidProperty {
                property: PROP_BACKEND.to_string(),
                value: other.to_string(),
            }),
        }
    }
}

/// Device configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KvssdConfig {
    /// Backend to open
    pub backend: Backend,
    /// Shard amount for [`Backend::Sharded`]
    pub shard_amount: usize,
}

impl Default for KvssdConfig {
    fn default() -> Self {
        Self {
            backend: Backend::Hashmap,
            shard_amount: DEFAULT_SHARD_AMOUNT,
        }
    }
}

impl KvssdConfig {
    /// Create a configuration with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the backend.
    #[must_use]
    pub const fn with_backend(mut self, backend: Backend) -> Self {
        self.backend = backend;
        self
    }

    /// Set the shard amount.
    #[must_use]
    pub const fn with_shard_amount(mut self, shard_amount: usize) -> Self {
        self.shard_amount = shard_amount;
        self
    }

    /// Read a configuration from harness properties. Missing properties
    /// keep their defaults.
    pub fn from_properties(props: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(backend) = props.get(PROP_BACKEND) {
            config.backend = backend.trim().parse()?;
        }

        if let Some(amount) = props.get(PROP_SHARD_AMOUNT) {
            config.shard_amount =
                amount
                    .trim()
                    .parse()
                    .map_err(|_| ConfigError::InvalidProperty {
                        property: PROP_SHARD_AMOUNT.to_string(),
                        value: amount.clone(),
                    })?;
        }

        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.backend {
            Backend::Hashmap => Ok(()),
            Backend::Sharded => {
                if self.shard_amount < 2 || !self.shard_amount.is_power_of_two() {
                    return Err(ConfigError::Invalid(format!(
                        "shard_amount must be a power of two greater than 1, got {}",
                        self.shard_amount
                    )));
                }
                if self.shard_amount > MAX_SHARD_AMOUNT {
                    return Err(ConfigError::Invalid(format!(
                        "shard_amount must be at most {MAX_SHARD_AMOUNT}, got {}",
                        self.shard_amount
                    )));
                }
                Ok(())
            }
            Backend::Device => Err(ConfigError::UnsupportedBackend(self.backend)),
        }
    }
}

/// Validate `config` and open the device it selects.
pub fn open_device(config: &KvssdConfig) -> Result<Box<dyn KvssdDevice>, ConfigError> {
    config.validate()?;
    let device: Box<dyn KvssdDevice> = match config.backend {
        Backend::Hashmap => Box::new(HashmapKvssd::new()),
        Backend::Sharded => Box::new(ShardedKvssd::with_shard_amount(config.shard_amount)),
        Backend::Device => return Err(ConfigError::UnsupportedBackend(config.backend)),
    };
    Ok(device)
}
