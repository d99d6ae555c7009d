//! Tracing and logging setup shared by delivery tracking processes.
//!
//! A service calls one of the initializers once at startup:
//!
//! ```
//! use tracking_observability::{LogFormat, TracingConfig};
//!
//! // Environment driven (`RUST_LOG`, `TRACKING_LOG_FORMAT`).
//! tracking_observability::init();
//!
//! // Or explicit, e.g. from a service's own settings.
//! let config = TracingConfig::from_env().unwrap_or_default();
//! let config = TracingConfig {
//!     format: LogFormat::Pretty,
//!     ..config
//! };
//! tracking_observability::init_with(&config);
//! ```

/// Initialize process-wide tracing from the environment.
///
/// Safe to call multiple times; subsequent calls become no-ops. An unknown
/// `TRACKING_LOG_FORMAT` falls back to the default format with a warning.
pub fn init() {
    match TracingConfig::from_env() {
        Ok(config) => tracing::init_with(&config),
        Err(err) => {
            tracing::init_with(&TracingConfig::default());
            ::tracing::warn!("invalid tracing configuration, using defaults: {err}");
        }
    }
}

/// Tracing configuration (filters, formats).
pub mod tracing;

pub use self::tracing::{ConfigError, LogFormat, TracingConfig, init_for_tests, init_with};
