//! CLI configuration management

use crate::output::OutputFormat;
use anyhow::{bail, Context};
use postlens_core::AppConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Keys accepted by `config get` and `config set`.
pub const KEYS: &[&str] = &["api_url", "timeout_seconds", "output_format"];

/// CLI configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct CliConfig {
    /// Base URL of the extraction and analysis services
    pub api_url: Option<String>,
    /// Request timeout in seconds
    pub timeout_seconds: Option<u64>,
    /// Default output format
    pub output_format: Option<String>,
}

/// Settings after merging flags, the config file and the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub api_url: String,
    pub timeout: Option<Duration>,
    pub format: OutputFormat,
}

impl CliConfig {
    /// Load configuration from `path`, or defaults when it does not exist
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            toml::from_str(&content).with_context(|| format!("parsing {}", path.display()))
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to `path`
    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;

        Ok(())
    }

    /// Get the default configuration file path
    pub fn config_path() -> anyhow::Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
        Ok(config_dir.join("postlens").join("config.toml"))
    }

    pub fn resolve_path(explicit: Option<&Path>) -> anyhow::Result<PathBuf> {
        match explicit {
            Some(path) => Ok(path.to_path_buf()),
            None => Self::config_path(),
        }
    }

    /// Get a configuration value
    pub fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        let value = match key {
            "api_url" => self.api_url.clone(),
            "timeout_seconds" => self.timeout_seconds.map(|t| t.to_string()),
            "output_format" => self.output_format.clone(),
            _ => bail!(unknown_key(key)),
        };
        Ok(value)
    }

    /// Set a configuration value
    pub fn set(&mut self, key: &str, value: &str) -> anyhow::Result<()> {
        match key {
            "api_url" => self.api_url = Some(value.to_string()),
            "timeout_seconds" => {
                let seconds = value
                    .parse::<u64>()
                    .with_context(|| format!("timeout_seconds must be a number, got '{}'", value))?;
                self.timeout_seconds = Some(seconds);
            }
            "output_format" => {
                let format: OutputFormat = value.parse().map_err(anyhow::Error::msg)?;
                self.output_format = Some(format.to_string());
            }
            _ => bail!(unknown_key(key)),
        }
        Ok(())
    }

    /// Merge with command line options.
    ///
    /// Flags and their environment variables win over the config file, which
    /// wins over `POSTLENS__*` settings and built-in defaults.
    pub fn resolve(
        &self,
        api_url: Option<&str>,
        timeout_seconds: Option<u64>,
        format: Option<&str>,
        app: &AppConfig,
    ) -> anyhow::Result<Settings> {
        let api_url = api_url
            .map(String::from)
            .or_else(|| self.api_url.clone())
            .unwrap_or_else(|| app.api.base_url.clone());

        let timeout = timeout_seconds
            .or(self.timeout_seconds)
            .or(app.api.timeout_seconds)
            .map(Duration::from_secs);

        let format = match format.or(self.output_format.as_deref()) {
            Some(f) => f.parse::<OutputFormat>().map_err(anyhow::Error::msg)?,
            None => OutputFormat::Text,
        };

        Ok(Settings {
            api_url,
            timeout,
            format,
        })
    }
}

fn unknown_key(key: &str) -> String {
    format!(
        "Unknown configuration key '{}' (expected one of: {})",
        key,
        KEYS.join(", ")
    )
}
