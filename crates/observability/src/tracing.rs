//! Tracing/logging initialization.

use core::str::FromStr;

use thiserror::Error;
use tracing_subscriber::EnvFilter;

/// Env var selecting the output format (`json` or `pretty`).
pub const LOG_FORMAT_ENV: &str = "TRACKING_LOG_FORMAT";

const DEFAULT_FILTER: &str = "info";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("unknown log format '{0}' (expected 'json' or 'pretty')")]
    UnknownLogFormat(String),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Json,
    Pretty,
}

impl FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(LogFormat::Json),
            "pretty" => Ok(LogFormat::Pretty),
            _ => Err(ConfigError::UnknownLogFormat(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TracingConfig {
    /// `EnvFilter` directives, e.g. `info,tracking_delivery=debug`.
    pub filter: String,
    pub format: LogFormat,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            filter: DEFAULT_FILTER.to_string(),
            format: LogFormat::default(),
        }
    }
}

impl TracingConfig {
    /// Read `RUST_LOG` and `TRACKING_LOG_FORMAT`; unset values use the defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(
            std::env::var(EnvFilter::DEFAULT_ENV).ok(),
            std::env::var(LOG_FORMAT_ENV).ok(),
        )
    }

    fn from_vars(filter: Option<String>, format: Option<String>) -> Result<Self, ConfigError> {
        let format = match format {
            Some(raw) => raw.parse()?,
            None => LogFormat::default(),
        };
        Ok(Self {
            filter: filter.unwrap_or_else(|| DEFAULT_FILTER.to_string()),
            format,
        })
    }

    fn env_filter(&self) -> EnvFilter {
        EnvFilter::try_new(&self.filter).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
    }
}

/// Initialize tracing/logging with an explicit configuration.
///
/// Safe to call multiple times (subsequent calls are no-ops).
pub fn init_with(config: &TracingConfig) {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(config.env_filter())
        .with_timer(tracing_subscriber::fmt::time::SystemTime)
        .with_target(false);

    let _ = match config.format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
    };
}

/// Route logs through the test harness writer so they show up only for failing tests.
pub fn init_for_tests() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}
