//! Service identities and per-service connection settings.
//!
//! The prediction and interface backends are structurally identical but differ
//! in their paths, login body field names and environment variable names.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::core::http::DEFAULT_TIMEOUT;

/// Default base URL of the interface service.
pub const DEFAULT_INTERFACE_ENDPOINT: &str = "http://localhost:8004";

/// One of the two independently secured backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceKind {
    Prediction,
    Interface,
}

impl ServiceKind {
    /// All services in a stable order.
    pub const ALL: &'static [Self] = &[Self::Prediction, Self::Interface];

    /// Lowercase name used in CLI output and config tables.
    #[must_use]
    pub const fn cli_name(self) -> &'static str {
        match self {
            Self::Prediction => "prediction",
            Self::Interface => "interface",
        }
    }

    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Prediction => "Prediction",
            Self::Interface => "Interface",
        }
    }

    /// Login exchange path.
    #[must_use]
    pub const fn login_path(self) -> &'static str {
        match self {
            Self::Prediction => "/login",
            Self::Interface => "/api/auth/login",
        }
    }

    /// Business endpoint path.
    #[must_use]
    pub const fn business_path(self) -> &'static str {
        match self {
            Self::Prediction => "/sand-predict",
            Self::Interface => "/interfaces/physical-data",
        }
    }

    /// Prefix of the per-service environment variables.
    #[must_use]
    pub const fn env_prefix(self) -> &'static str {
        match self {
            Self::Prediction => "SANDCALC_PREDICT",
            Self::Interface => "SANDCALC_INTERFACE",
        }
    }

    /// Message used when a failed response carries no `message` of its own.
    #[must_use]
    pub const fn default_failure_message(self) -> &'static str {
        match self {
            Self::Prediction => "Prediction request failed",
            Self::Interface => "Failed to start interface",
        }
    }

    /// Login request body. The prediction service expects snake_case keys,
    /// the interface service camelCase.
    #[must_use]
    pub fn login_body(self, api_key: &str, api_secret: &str) -> serde_json::Value {
        match self {
            Self::Prediction => json!({ "api_key": api_key, "api_secret": api_secret }),
            Self::Interface => json!({ "apiKey": api_key, "apiSecret": api_secret }),
        }
    }
}

impl fmt::Display for ServiceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.cli_name())
    }
}

/// Connection settings for one service.
#[derive(Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    pub kind: ServiceKind,
    /// Base URL without trailing slash. Empty when not configured.
    pub base_url: String,
    pub api_key: Option<String>,
    pub api_secret: Option<String>,
    pub timeout: Duration,
}

impl ServiceConfig {
    /// Create settings with the given base URL and no credentials.
    pub fn new(kind: ServiceKind, base_url: impl Into<String>) -> Self {
        Self {
            kind,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: None,
            api_secret: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Builder: set the API key and secret.
    #[must_use]
    pub fn with_credentials(mut self, api_key: impl Into<String>, api_secret: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self.api_secret = Some(api_secret.into());
        self
    }

    /// Builder: set the request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Full URL for a path on this service.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// API key and secret, if both are present and non-empty.
    #[must_use]
    pub fn credentials(&self) -> Option<(&str, &str)> {
        let key = self.api_key.as_deref().filter(|k| !k.trim().is_empty())?;
        let secret = self.api_secret.as_deref().filter(|s| !s.trim().is_empty())?;
        Some((key, secret))
    }

    /// Names of required settings that are missing.
    #[must_use]
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.base_url.trim().is_empty() {
            missing.push("endpoint");
        }
        if self.api_key.as_deref().is_none_or(|k| k.trim().is_empty()) {
            missing.push("api_key");
        }
        if self.api_secret.as_deref().is_none_or(|s| s.trim().is_empty()) {
            missing.push("api_secret");
        }
        missing
    }

    /// Whether every required setting is present.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.missing_fields().is_empty()
    }

    /// Fail with [`crate::error::SandcalcError::ServiceNotConfigured`] unless ready.
    pub fn ensure_ready(&self) -> crate::error::Result<()> {
        let missing = self.missing_fields();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(crate::error::SandcalcError::ServiceNotConfigured {
                service: self.kind,
                missing: missing.join(", "),
            })
        }
    }
}

impl fmt::Debug for ServiceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceConfig")
            .field("kind", &self.kind)
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<set>"))
            .field("api_secret", &self.api_secret.as_ref().map(|_| "<set>"))
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_body_field_names_differ_per_service() {
        let predict = ServiceKind::Prediction.login_body("k", "s");
        assert_eq!(predict["api_key"], "k");
        assert_eq!(predict["api_secret"], "s");

        let interface = ServiceKind::Interface.login_body("k", "s");
        assert_eq!(interface["apiKey"], "k");
        assert_eq!(interface["apiSecret"], "s");
    }

    #[test]
    fn url_joins_without_double_slash() {
        let config = ServiceConfig::new(ServiceKind::Prediction, "http://predict.local/");
        assert_eq!(config.url("/sand-predict"), "http://predict.local/sand-predict");
    }

    #[test]
    fn missing_fields_reports_each_gap() {
        let config = ServiceConfig::new(ServiceKind::Interface, "");
        assert_eq!(config.missing_fields(), vec!["endpoint", "api_key", "api_secret"]);
        assert!(config.ensure_ready().is_err());

        let ready = ServiceConfig::new(ServiceKind::Interface, DEFAULT_INTERFACE_ENDPOINT)
            .with_credentials("key", "secret");
        assert!(ready.is_ready());
    }

    #[test]
    fn blank_credentials_count_as_missing() {
        let config =
            ServiceConfig::new(ServiceKind::Prediction, "http://x").with_credentials("  ", "secret");
        assert!(config.credentials().is_none());
        assert_eq!(config.missing_fields(), vec!["api_key"]);
    }

    #[test]
    fn debug_masks_secrets() {
        let config =
            ServiceConfig::new(ServiceKind::Prediction, "http://x").with_credentials("key-123", "shh");
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("key-123"));
        assert!(!rendered.contains("shh"));
        assert!(rendered.contains("<set>"));
    }
}
