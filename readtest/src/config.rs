//! Configuration for the read test.
//!
//! The sampler settings can be loaded from multiple sources with the following precedence
//! (highest to lowest):
//!
//! 1. Environment variables (prefixed with `READTEST__`)
//! 2. YAML configuration file (specified via `-c` or `--config` flag)
//! 3. Defaults
//!
//! For example, `READTEST__TEST_DURATION=30s` shortens the run to 30 seconds. The same settings
//! in YAML format:
//!
//! ```yaml
//! buffer_size: 4 KiB
//! window_period: 5s
//! test_duration: 30s
//! max_iterations: 1000
//! stride: 100
//! ```

use std::path::Path;
use std::time::Duration;

use bytesize::ByteSize;
use figment::providers::{Env, Format, Serialized, Yaml};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Environment variable prefix for all configuration options.
const ENV_PREFIX: &str = "READTEST__";

/// Settings of a read test run.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Size of the scratch buffer each object is drained through.
    ///
    /// # Default
    ///
    /// `16 KiB`
    pub buffer_size: ByteSize,

    /// Length of a rate-sampling window.
    ///
    /// # Default
    ///
    /// `5s`
    #[serde(with = "humantime_serde")]
    pub window_period: Duration,

    /// Wall-clock budget of the run, checked after every object.
    ///
    /// # Default
    ///
    /// `120s`
    #[serde(with = "humantime_serde")]
    pub test_duration: Duration,

    /// Maximum number of objects opened in one run.
    ///
    /// # Default
    ///
    /// `1000`
    pub max_iterations: u64,

    /// Distance between the block numbers of consecutive objects.
    ///
    /// # Default
    ///
    /// `100`
    pub stride: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            buffer_size: ByteSize::kib(16),
            window_period: Duration::from_secs(5),
            test_duration: Duration::from_secs(120),
            max_iterations: 1000,
            stride: 100,
        }
    }
}

impl Config {
    /// Loads configuration from defaults, the optional YAML file, and the environment.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut figment = figment::Figment::from(Serialized::defaults(Config::default()));
        if let Some(path) = path {
            figment = figment.merge(Yaml::file(path));
        }
        let config: Config = figment
            .merge(Env::prefixed(ENV_PREFIX))
            .extract()
            .map_err(Box::new)?;

        config.validate()?;
        Ok(config)
    }

    /// Rejects settings that would make the sampler loop degenerate.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |field, reason| Err(ConfigError::Invalid { field, reason });

        if self.buffer_size.as_u64() == 0 {
            return invalid("buffer_size", "must not be zero");
        }
        if usize::try_from(self.buffer_size.as_u64()).is_err() {
            return invalid("buffer_size", "does not fit into memory");
        }
        if self.window_period.is_zero() {
            return invalid("window_period", "must not be zero");
        }
        if self.max_iterations == 0 {
            return invalid("max_iterations", "must not be zero");
        }
        if self.stride == 0 {
            return invalid("stride", "must not be zero");
        }
        Ok(())
    }

    /// The scratch buffer size in bytes.
    pub fn buffer_len(&self) -> usize {
        usize::try_from(self.buffer_size.as_u64()).unwrap_or(usize::MAX)
    }
}
