//! Storage for configuration.

pub mod config;
pub mod paths;

pub use config::{
    Config, ConfigSource, ConfigSources, ENV_API_KEY, ENV_API_SECRET, ENV_CONFIG, ENV_FORMAT,
    ENV_NO_COLOR, ENV_NO_COLOR_STD, ENV_PRETTY, ENV_TIMEOUT, ResolvedConfig, ServiceSources,
    service_env,
};
pub use paths::AppPaths;
