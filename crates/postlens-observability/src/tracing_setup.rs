//! Tracing subscriber setup

use crate::{ObservabilityError, Result};
use postlens_core::LoggingConfig;
use serde::{Deserialize, Serialize};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Tracing configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TracingConfig {
    /// Service name reported in the startup event
    pub service_name: String,
    /// Service version
    pub service_version: String,
    /// Log level or `EnvFilter` directive, used when `RUST_LOG` is unset
    pub log_level: String,
    /// Enable JSON logging
    pub json_logs: bool,
    /// Enable colored output (for console)
    pub colored_output: bool,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            service_name: "postlens".to_string(),
            service_version: env!("CARGO_PKG_VERSION").to_string(),
            log_level: "warn".to_string(),
            json_logs: false,
            colored_output: true,
        }
    }
}

impl TracingConfig {
    pub fn from_logging(logging: &LoggingConfig) -> Self {
        Self {
            log_level: logging.level.clone(),
            json_logs: logging.json,
            ..Default::default()
        }
    }

    pub fn with_service_name(mut self, name: &str) -> Self {
        self.service_name = name.to_string();
        self
    }

    pub fn with_log_level(mut self, level: &str) -> Self {
        self.log_level = level.to_string();
        self
    }

    pub fn with_json(mut self, json: bool) -> Self {
        self.json_logs = json;
        self
    }

    pub fn with_color(mut self, colored: bool) -> Self {
        self.colored_output = colored;
        self
    }

    /// `RUST_LOG` wins over the configured level.
    pub fn build_filter(&self) -> Result<EnvFilter> {
        if let Ok(filter) = EnvFilter::try_from_default_env() {
            return Ok(filter);
        }

        EnvFilter::try_new(&self.log_level).map_err(|e| {
            ObservabilityError::Configuration(format!(
                "invalid log level '{}': {}",
                self.log_level, e
            ))
        })
    }
}

/// Install the global subscriber, logging to stderr.
pub fn init_tracing(config: &TracingConfig) -> Result<()> {
    let filter = config.build_filter()?;
    let subscriber = tracing_subscriber::registry().with(filter);

    if config.json_logs {
        let fmt_layer = fmt::layer()
            .json()
            .with_target(true)
            .with_writer(std::io::stderr);
        subscriber
            .with(fmt_layer)
            .try_init()
            .map_err(|e| ObservabilityError::TracingInit(e.to_string()))?;
    } else {
        let fmt_layer = fmt::layer()
            .with_target(true)
            .with_ansi(config.colored_output)
            .with_writer(std::io::stderr);
        subscriber
            .with(fmt_layer)
            .try_init()
            .map_err(|e| ObservabilityError::TracingInit(e.to_string()))?;
    }

    tracing::debug!(
        service = %config.service_name,
        version = %config.service_version,
        "Tracing initialized"
    );

    Ok(())
}
