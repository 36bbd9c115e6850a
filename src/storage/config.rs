//! Configuration file loading and management.
//!
//! Loads configuration from:
//! - Linux: `~/.config/sandcalc/config.toml`
//! - macOS: `~/Library/Application Support/com.sandcalc.sandcalc/config.toml`
//! - Windows: `%APPDATA%/sandcalc/sandcalc/config/config.toml`
//!
//! ## Precedence
//!
//! Settings are resolved with the following precedence (highest first):
//! 1. CLI flags
//! 2. Environment variables
//! 3. Config file
//! 4. Built-in defaults
//!
//! ## Environment Variables
//!
//! - `SANDCALC_PREDICT_ENDPOINT`, `SANDCALC_INTERFACE_ENDPOINT`: service base URLs
//! - `SANDCALC_PREDICT_API_KEY`, `SANDCALC_PREDICT_API_SECRET`: prediction credentials
//! - `SANDCALC_INTERFACE_API_KEY`, `SANDCALC_INTERFACE_API_SECRET`: interface credentials
//! - `SANDCALC_API_KEY`, `SANDCALC_API_SECRET`: shared fallback for both services
//! - `SANDCALC_FORMAT`: Output format (human, json)
//! - `SANDCALC_TIMEOUT`: Request timeout in seconds
//! - `SANDCALC_NO_COLOR` or `NO_COLOR`: Disable colors (1, true, yes)
//! - `SANDCALC_PRETTY`: Pretty-print JSON output (1, true, yes)
//! - `SANDCALC_CONFIG`: Override config file path

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::AppPaths;
use crate::cli::args::{Cli, OutputFormat};
use crate::core::service::{DEFAULT_INTERFACE_ENDPOINT, ServiceConfig, ServiceKind};
use crate::error::{Result, SandcalcError};

// =============================================================================
// Environment Variable Names
// =============================================================================

/// Shared API key used when a service has no key of its own.
pub const ENV_API_KEY: &str = "SANDCALC_API_KEY";
/// Shared API secret used when a service has no secret of its own.
pub const ENV_API_SECRET: &str = "SANDCALC_API_SECRET";
/// Environment variable for output format.
pub const ENV_FORMAT: &str = "SANDCALC_FORMAT";
/// Environment variable for timeout in seconds.
pub const ENV_TIMEOUT: &str = "SANDCALC_TIMEOUT";
/// Environment variable to disable colors.
pub const ENV_NO_COLOR: &str = "SANDCALC_NO_COLOR";
/// Standard environment variable to disable colors.
pub const ENV_NO_COLOR_STD: &str = "NO_COLOR";
/// Environment variable for pretty JSON output.
pub const ENV_PRETTY: &str = "SANDCALC_PRETTY";
/// Environment variable to override config file path.
pub const ENV_CONFIG: &str = "SANDCALC_CONFIG";

/// Bounds for the request timeout, in seconds.
const TIMEOUT_RANGE: std::ops::RangeInclusive<u64> = 1..=300;

/// Per-service environment variable, e.g. `SANDCALC_PREDICT_API_KEY`.
#[must_use]
pub fn service_env(service: ServiceKind, suffix: &str) -> String {
    format!("{}_{suffix}", service.env_prefix())
}

// =============================================================================
// Resolved Configuration
// =============================================================================

/// Fully resolved configuration after merging CLI, env vars, and config file.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// Prediction service settings.
    pub prediction: ServiceConfig,
    /// Interface service settings.
    pub interface: ServiceConfig,
    /// Output format.
    pub format: OutputFormat,
    /// Request timeout, applied to both services.
    pub timeout: Duration,
    /// Whether to disable colored output.
    pub no_color: bool,
    /// Whether to pretty-print JSON output.
    pub pretty: bool,
    /// Config file that was consulted (it may not exist).
    pub config_path: PathBuf,
    /// Source of each setting for debugging.
    pub sources: ConfigSources,
}

/// Tracks the source of each configuration value.
#[derive(Debug, Clone, Default)]
pub struct ConfigSources {
    pub prediction: ServiceSources,
    pub interface: ServiceSources,
    pub format: ConfigSource,
    pub timeout: ConfigSource,
    pub no_color: ConfigSource,
    pub pretty: ConfigSource,
}

impl ConfigSources {
    #[must_use]
    pub const fn service(&self, service: ServiceKind) -> &ServiceSources {
        match service {
            ServiceKind::Prediction => &self.prediction,
            ServiceKind::Interface => &self.interface,
        }
    }
}

/// Source of each per-service setting.
#[derive(Debug, Clone, Copy, Default)]
pub struct ServiceSources {
    pub endpoint: ConfigSource,
    pub api_key: ConfigSource,
    pub api_secret: ConfigSource,
}

/// Where a configuration value came from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConfigSource {
    /// Value from CLI flag.
    Cli,
    /// Value from environment variable.
    Env,
    /// Value from config file.
    ConfigFile,
    /// Built-in default.
    #[default]
    Default,
    /// Not set anywhere.
    Unset,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cli => write!(f, "CLI flag"),
            Self::Env => write!(f, "environment variable"),
            Self::ConfigFile => write!(f, "config file"),
            Self::Default => write!(f, "default"),
            Self::Unset => write!(f, "not set"),
        }
    }
}

impl ResolvedConfig {
    /// Resolve final configuration from CLI args, the process environment and
    /// the config file.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but is invalid, or if any
    /// resolved value is invalid.
    pub fn resolve(cli: &Cli) -> Result<Self> {
        let config_path = std::env::var(ENV_CONFIG)
            .ok()
            .filter(|p| !p.trim().is_empty())
            .map_or_else(|| AppPaths::new().config_file(), PathBuf::from);
        let config = Config::load_from(&config_path)?;
        config.validate()?;
        Self::resolve_from(cli, &config, config_path, |key| std::env::var(key).ok())
    }

    /// Resolve against an explicit config and environment lookup.
    ///
    /// Blank environment values are treated as unset.
    pub fn resolve_from<F>(cli: &Cli, config: &Config, config_path: PathBuf, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = |key: &str| env(key).filter(|v| !v.trim().is_empty());
        let mut sources = ConfigSources::default();

        let timeout = Self::resolve_timeout(cli, config, &env, &mut sources.timeout)?;
        let format = Self::resolve_format(cli, config, &env, &mut sources.format)?;
        let no_color = Self::resolve_no_color(cli, config, &env, &mut sources.no_color);
        let pretty = Self::resolve_pretty(cli, config, &env, &mut sources.pretty);

        let prediction = Self::resolve_service(
            ServiceKind::Prediction,
            cli.predict_endpoint.as_deref(),
            &config.prediction,
            &env,
            &mut sources.prediction,
        )
        .with_timeout(timeout);
        let interface = Self::resolve_service(
            ServiceKind::Interface,
            cli.interface_endpoint.as_deref(),
            &config.interface,
            &env,
            &mut sources.interface,
        )
        .with_timeout(timeout);

        Ok(Self {
            prediction,
            interface,
            format,
            timeout,
            no_color,
            pretty,
            config_path,
            sources,
        })
    }

    /// Settings for one service.
    #[must_use]
    pub const fn service(&self, service: ServiceKind) -> &ServiceConfig {
        match service {
            ServiceKind::Prediction => &self.prediction,
            ServiceKind::Interface => &self.interface,
        }
    }

    fn resolve_service(
        service: ServiceKind,
        cli_endpoint: Option<&str>,
        file: &ServiceSettings,
        env: &impl Fn(&str) -> Option<String>,
        sources: &mut ServiceSources,
    ) -> ServiceConfig {
        let endpoint = if let Some(url) = cli_endpoint.filter(|u| !u.trim().is_empty()) {
            sources.endpoint = ConfigSource::Cli;
            url.to_string()
        } else if let Some(url) = env(&service_env(service, "ENDPOINT")) {
            sources.endpoint = ConfigSource::Env;
            url
        } else if let Some(url) = file.endpoint.clone().filter(|u| !u.trim().is_empty()) {
            sources.endpoint = ConfigSource::ConfigFile;
            url
        } else if service == ServiceKind::Interface {
            sources.endpoint = ConfigSource::Default;
            DEFAULT_INTERFACE_ENDPOINT.to_string()
        } else {
            sources.endpoint = ConfigSource::Unset;
            String::new()
        };

        let mut config = ServiceConfig::new(service, endpoint);
        config.api_key = Self::resolve_secret(
            env(&service_env(service, "API_KEY")),
            env(ENV_API_KEY),
            file.api_key.as_deref(),
            &mut sources.api_key,
        );
        config.api_secret = Self::resolve_secret(
            env(&service_env(service, "API_SECRET")),
            env(ENV_API_SECRET),
            file.api_secret.as_deref(),
            &mut sources.api_secret,
        );
        config
    }

    /// Per-service env, then shared env, then config file.
    fn resolve_secret(
        scoped: Option<String>,
        shared: Option<String>,
        file: Option<&str>,
        source: &mut ConfigSource,
    ) -> Option<String> {
        if let Some(value) = scoped.or(shared) {
            *source = ConfigSource::Env;
            return Some(value);
        }
        if let Some(value) = file.filter(|v| !v.trim().is_empty()) {
            *source = ConfigSource::ConfigFile;
            return Some(value.to_string());
        }
        *source = ConfigSource::Unset;
        None
    }

    fn resolve_timeout(
        cli: &Cli,
        config: &Config,
        env: &impl Fn(&str) -> Option<String>,
        source: &mut ConfigSource,
    ) -> Result<Duration> {
        let (seconds, origin, raw) = if let Some(timeout) = cli.timeout {
            (Some(timeout), ConfigSource::Cli, timeout.to_string())
        } else if let Some(raw) = env(ENV_TIMEOUT) {
            (raw.trim().parse::<u64>().ok(), ConfigSource::Env, raw)
        } else if let Some(timeout) = config.general.timeout_seconds {
            (Some(timeout), ConfigSource::ConfigFile, timeout.to_string())
        } else {
            *source = ConfigSource::Default;
            return Ok(crate::core::http::DEFAULT_TIMEOUT);
        };

        match seconds {
            Some(s) if TIMEOUT_RANGE.contains(&s) => {
                *source = origin;
                Ok(Duration::from_secs(s))
            }
            _ => Err(SandcalcError::ConfigInvalid {
                key: "timeout".to_string(),
                value: raw,
                message: format!(
                    "Timeout must be between {} and {} seconds",
                    TIMEOUT_RANGE.start(),
                    TIMEOUT_RANGE.end()
                ),
            }),
        }
    }

    fn resolve_format(
        cli: &Cli,
        config: &Config,
        env: &impl Fn(&str) -> Option<String>,
        source: &mut ConfigSource,
    ) -> Result<OutputFormat> {
        if let Some(format) = cli.requested_format() {
            *source = ConfigSource::Cli;
            return Ok(format);
        }
        if let Some(raw) = env(ENV_FORMAT) {
            *source = ConfigSource::Env;
            return parse_format(&raw);
        }
        if let Some(raw) = config.output.format.as_deref() {
            *source = ConfigSource::ConfigFile;
            return parse_format(raw);
        }
        *source = ConfigSource::Default;
        Ok(OutputFormat::Human)
    }

    fn resolve_no_color(
        cli: &Cli,
        config: &Config,
        env: &impl Fn(&str) -> Option<String>,
        source: &mut ConfigSource,
    ) -> bool {
        if cli.no_color {
            *source = ConfigSource::Cli;
            return true;
        }
        // NO_COLOR disables color whatever its value.
        if is_truthy(env(ENV_NO_COLOR)) || env(ENV_NO_COLOR_STD).is_some() {
            *source = ConfigSource::Env;
            return true;
        }
        if !config.output.color {
            *source = ConfigSource::ConfigFile;
            return true;
        }
        *source = ConfigSource::Default;
        false
    }

    fn resolve_pretty(
        cli: &Cli,
        config: &Config,
        env: &impl Fn(&str) -> Option<String>,
        source: &mut ConfigSource,
    ) -> bool {
        if cli.pretty {
            *source = ConfigSource::Cli;
            return true;
        }
        if is_truthy(env(ENV_PRETTY)) {
            *source = ConfigSource::Env;
            return true;
        }
        if config.output.pretty {
            *source = ConfigSource::ConfigFile;
            return true;
        }
        *source = ConfigSource::Default;
        false
    }
}

fn is_truthy(value: Option<String>) -> bool {
    value.is_some_and(|v| matches!(v.trim().to_lowercase().as_str(), "1" | "true" | "yes" | "on"))
}

/// Parse a format string into [`OutputFormat`].
fn parse_format(raw: &str) -> Result<OutputFormat> {
    match raw.trim().to_lowercase().as_str() {
        "human" => Ok(OutputFormat::Human),
        "json" => Ok(OutputFormat::Json),
        _ => Err(SandcalcError::ConfigInvalid {
            key: "format".to_string(),
            value: raw.to_string(),
            message: "Valid formats: human, json".to_string(),
        }),
    }
}

// =============================================================================
// Config File
// =============================================================================

/// Application configuration file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General settings.
    pub general: GeneralConfig,
    /// Prediction service settings.
    pub prediction: ServiceSettings,
    /// Interface service settings.
    pub interface: ServiceSettings,
    /// Output settings.
    pub output: OutputConfig,
}

/// General application settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Timeout for network requests in seconds.
    pub timeout_seconds: Option<u64>,
    /// Default log level (error, warn, info, debug, trace).
    pub log_level: Option<String>,
}

/// Connection settings for one service.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceSettings {
    /// Base URL.
    pub endpoint: Option<String>,
    /// API key.
    pub api_key: Option<String>,
    /// API secret.
    pub api_secret: Option<String>,
}

/// Output formatting configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Default output format (human, json).
    pub format: Option<String>,
    /// Whether to use colors in output.
    pub color: bool,
    /// Whether to pretty-print JSON output.
    pub pretty: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: None,
            color: true,
            pretty: false,
        }
    }
}

impl Config {
    /// Load configuration from a specific path.
    ///
    /// Returns default config if the file doesn't exist.
    /// Returns error only if the file exists but is invalid.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(?path, "Config file not found, using defaults");
            return Ok(Self::default());
        }

        tracing::debug!(?path, "Loading config file");
        let content = fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| SandcalcError::ConfigParse {
            path: path.display().to_string(),
            message: e.message().to_string(),
        })
    }

    /// Validate configuration values.
    ///
    /// Checks that:
    /// - Output format is valid (human, json)
    /// - Timeout is within reasonable bounds (1-300 seconds)
    /// - Endpoints are http(s) URLs
    pub fn validate(&self) -> Result<()> {
        if let Some(format) = &self.output.format {
            parse_format(format)?;
        }

        if let Some(timeout) = self.general.timeout_seconds
            && !TIMEOUT_RANGE.contains(&timeout)
        {
            return Err(SandcalcError::ConfigInvalid {
                key: "general.timeout_seconds".to_string(),
                value: timeout.to_string(),
                message: "Timeout must be between 1 and 300 seconds".to_string(),
            });
        }

        for (service, settings) in [
            (ServiceKind::Prediction, &self.prediction),
            (ServiceKind::Interface, &self.interface),
        ] {
            if let Some(endpoint) = &settings.endpoint
                && !endpoint.trim().is_empty()
                && !(endpoint.starts_with("http://") || endpoint.starts_with("https://"))
            {
                return Err(SandcalcError::ConfigInvalid {
                    key: format!("{service}.endpoint"),
                    value: endpoint.clone(),
                    message: "Endpoint must start with http:// or https://".to_string(),
                });
            }
        }

        Ok(())
    }
}
