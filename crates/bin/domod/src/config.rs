//! Configuration loading — TOML file with environment variable overrides.
//!
//! Looks for `domod.toml` in the working directory. Every field has a
//! sensible default so the file is optional. Environment variables take
//! precedence over file values.

use serde::Deserialize;

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Logging settings.
    pub logging: LoggingConfig,
    /// Background simulator settings.
    pub simulator: SimulatorConfig,
    /// Engine capacities.
    pub engine: EngineConfig,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

/// Background simulator configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SimulatorConfig {
    /// Seconds between simulator ticks.
    pub tick_secs: u64,
}

/// Engine capacity configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Event log retention, in entries.
    pub log_capacity: usize,
    /// Per-subscriber event bus queue length.
    pub bus_capacity: usize,
}

impl Config {
    /// Load configuration from `domod.toml` (if present) then apply
    /// environment-variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML file exists but is malformed, or if
    /// a value fails validation.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::from_file("domod.toml")?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("DOMOD_TICK_SECS") {
            if let Ok(secs) = val.parse() {
                self.simulator.tick_secs = secs;
            }
        }
        if let Ok(val) = std::env::var("DOMOD_LOG") {
            self.logging.filter = val;
        }
        if let Ok(val) = std::env::var("RUST_LOG") {
            self.logging.filter = val;
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.simulator.tick_secs == 0 {
            return Err(ConfigError::Validation(
                "simulator tick must be non-zero".to_string(),
            ));
        }
        if self.engine.log_capacity == 0 {
            return Err(ConfigError::Validation(
                "log capacity must be non-zero".to_string(),
            ));
        }
        if self.engine.bus_capacity == 0 {
            return Err(ConfigError::Validation(
                "bus capacity must be non-zero".to_string(),
            ));
        }
        Ok(())
    }

    /// The simulator tick period as a [`std::time::Duration`].
    #[must_use]
    pub fn tick_period(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.simulator.tick_secs)
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "domod=info,domo_core=info".to_string(),
        }
    }
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self { tick_secs: 5 }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            log_capacity: 500,
            bus_capacity: 256,
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
}
