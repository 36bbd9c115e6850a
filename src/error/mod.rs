//! Error types for sandcalc.
//!
//! Uses `thiserror` for structured error types that map to exit codes.
//!
//! ## Error Taxonomy
//!
//! Everything that crosses the access-layer boundary is an [`AccessError`]:
//! a single tagged value carrying an [`ErrorKind`], a human-readable message,
//! the service it came from, the HTTP status (when there was one) and an
//! optional underlying cause.
//!
//! - **Input**: malformed date, non-numeric fines/bulk (caught before any network call)
//! - **Auth**: missing credentials, login rejected, or still unauthenticated after re-login
//! - **Transport**: no response from the server
//! - **Service**: non-auth 4xx/5xx with a service-supplied message
//! - **Validation**: business response shape or number coercion failure
//!
//! The crate-level [`SandcalcError`] wraps `AccessError` and adds configuration
//! and internal failures. Each variant has a stable error code (e.g. `SC-A001`)
//! for programmatic handling.

pub mod suggestions;

use std::fmt;
use std::sync::Arc;

use thiserror::Error;

use crate::core::service::ServiceKind;

pub use suggestions::FixSuggestion;

/// Result alias for access-layer operations.
pub type AccessResult<T> = std::result::Result<T, AccessError>;

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, SandcalcError>;

// =============================================================================
// Access-layer error kinds
// =============================================================================

/// Discriminant of an [`AccessError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Operator input rejected before any network call.
    Input,
    /// Credentials missing, rejected, or still failing after a forced re-login.
    Auth,
    /// The server could not be reached or did not answer.
    Transport,
    /// The service answered with a non-auth failure status.
    Service,
    /// The service answered, but the payload failed shape/number checks.
    Validation,
}

impl ErrorKind {
    /// Returns a human-readable label for the kind.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Input => "input error",
            Self::Auth => "authentication error",
            Self::Transport => "transport error",
            Self::Service => "service error",
            Self::Validation => "validation error",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Tagged error returned by every access-layer operation.
///
/// Cloneable so that the outcome of one login exchange can be handed to every
/// caller that was waiting on it.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct AccessError {
    pub kind: ErrorKind,
    pub message: String,
    pub service: Option<ServiceKind>,
    pub status: Option<u16>,
    #[source]
    pub cause: Option<Arc<dyn std::error::Error + Send + Sync>>,
}

impl AccessError {
    fn new(kind: ErrorKind, service: Option<ServiceKind>, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            service,
            status: None,
            cause: None,
        }
    }

    /// Operator input failure.
    pub fn input(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Input, None, message)
    }

    /// Authentication failure for a service.
    pub fn auth(service: ServiceKind, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Auth, Some(service), message)
    }

    /// The API key or secret is not configured. Never worth retrying.
    #[must_use]
    pub fn missing_credentials(service: ServiceKind) -> Self {
        Self::auth(service, "Missing API credentials")
    }

    /// No response from the server.
    pub fn transport(service: ServiceKind, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Transport, Some(service), message)
    }

    /// Non-auth failure status with the service-supplied message.
    pub fn service(service: ServiceKind, status: u16, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Service, Some(service), message).with_status(status)
    }

    /// Payload shape or number coercion failure.
    pub fn validation(service: ServiceKind, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, Some(service), message)
    }

    /// Attach the HTTP status that produced this error.
    #[must_use]
    pub const fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    /// Attach the underlying cause.
    #[must_use]
    pub fn with_cause<E>(mut self, cause: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        self.cause = Some(Arc::new(cause));
        self
    }

    /// Whether this is a missing-credentials failure.
    #[must_use]
    pub fn is_missing_credentials(&self) -> bool {
        self.kind == ErrorKind::Auth && self.status.is_none() && self.message == "Missing API credentials"
    }
}

// =============================================================================
// Error Categories
// =============================================================================

/// High-level error categories for classification and routing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Operator input problems.
    Input,
    /// Authentication issues (missing, rejected or stale credentials).
    Authentication,
    /// Network issues (no response, timeout, connection refused).
    Network,
    /// Service-side failures.
    Service,
    /// Response payload validation failures.
    Validation,
    /// Configuration issues (parse errors, invalid values, missing settings).
    Configuration,
    /// Internal errors (bugs, unexpected state, unclassified).
    Internal,
}

impl ErrorCategory {
    /// Returns a human-readable description of the category.
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::Input => "Input error",
            Self::Authentication => "Authentication error",
            Self::Network => "Network error",
            Self::Service => "Service error",
            Self::Validation => "Validation error",
            Self::Configuration => "Configuration error",
            Self::Internal => "Internal error",
        }
    }

    /// Returns a short code prefix for this category.
    #[must_use]
    pub const fn code_prefix(&self) -> &'static str {
        match self {
            Self::Input => "I",
            Self::Authentication => "A",
            Self::Network => "N",
            Self::Service => "S",
            Self::Validation => "V",
            Self::Configuration => "C",
            Self::Internal => "X",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description())
    }
}

impl From<ErrorKind> for ErrorCategory {
    fn from(kind: ErrorKind) -> Self {
        match kind {
            ErrorKind::Input => Self::Input,
            ErrorKind::Auth => Self::Authentication,
            ErrorKind::Transport => Self::Network,
            ErrorKind::Service => Self::Service,
            ErrorKind::Validation => Self::Validation,
        }
    }
}

// =============================================================================
// Exit Codes
// =============================================================================

/// Process exit codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ExitCode {
    /// Success
    Success = 0,
    /// Unexpected failure
    GeneralError = 1,
    /// Operator input rejected
    InputError = 2,
    /// Authentication failed
    AuthError = 3,
    /// Network or service failure
    ServiceError = 4,
    /// Response failed validation
    ValidationError = 5,
    /// Missing or invalid configuration
    ConfigError = 6,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code as Self
    }
}

/// Main error type for sandcalc operations.
#[derive(Error, Debug)]
pub enum SandcalcError {
    /// Failure surfaced by the access layer.
    #[error(transparent)]
    Access(#[from] AccessError),

    /// A service is missing required settings.
    #[error("{service} service is not configured: missing {missing}")]
    ServiceNotConfigured {
        service: ServiceKind,
        missing: String,
    },

    /// Error parsing configuration file.
    #[error("config parse error at {path}: {message}")]
    ConfigParse { path: String, message: String },

    /// Invalid value in configuration.
    #[error("invalid config value for '{key}': {message}")]
    ConfigInvalid {
        key: String,
        value: String,
        message: String,
    },

    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Catch-all for other errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SandcalcError {
    /// The access-layer kind, when this error came from the access layer.
    #[must_use]
    pub const fn kind(&self) -> Option<ErrorKind> {
        match self {
            Self::Access(err) => Some(err.kind),
            _ => None,
        }
    }

    /// Map error to exit code.
    #[must_use]
    pub const fn exit_code(&self) -> ExitCode {
        match self {
            Self::Access(err) => match err.kind {
                ErrorKind::Input => ExitCode::InputError,
                ErrorKind::Auth => ExitCode::AuthError,
                ErrorKind::Transport | ErrorKind::Service => ExitCode::ServiceError,
                ErrorKind::Validation => ExitCode::ValidationError,
            },
            Self::ServiceNotConfigured { .. }
            | Self::ConfigParse { .. }
            | Self::ConfigInvalid { .. } => ExitCode::ConfigError,
            Self::Io(_) | Self::Json(_) | Self::Other(_) => ExitCode::GeneralError,
        }
    }

    /// Returns the error category for classification and routing.
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Access(err) => err.kind.into(),
            Self::ServiceNotConfigured { .. }
            | Self::ConfigParse { .. }
            | Self::ConfigInvalid { .. } => ErrorCategory::Configuration,
            Self::Io(_) | Self::Json(_) | Self::Other(_) => ErrorCategory::Internal,
        }
    }

    /// Returns a stable error code for programmatic handling.
    ///
    /// Format: `SC-{category}{number}`.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Access(err) => match err.kind {
                ErrorKind::Input => "SC-I001",
                ErrorKind::Auth => "SC-A001",
                ErrorKind::Transport => "SC-N001",
                ErrorKind::Service => "SC-S001",
                ErrorKind::Validation => "SC-V001",
            },
            Self::ServiceNotConfigured { .. } => "SC-C001",
            Self::ConfigParse { .. } => "SC-C002",
            Self::ConfigInvalid { .. } => "SC-C003",
            Self::Io(_) => "SC-X001",
            Self::Json(_) => "SC-X002",
            Self::Other(_) => "SC-X099",
        }
    }

    /// Returns whether the caller may reasonably retry the operation.
    ///
    /// The access layer itself never retries these; the flag is advice for
    /// whoever drives it.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Access(err) => match err.kind {
                ErrorKind::Transport => true,
                ErrorKind::Service => err.status.is_some_and(|s| s >= 500),
                ErrorKind::Input | ErrorKind::Auth | ErrorKind::Validation => false,
            },
            _ => false,
        }
    }

    /// Returns the service this error concerns, if any.
    #[must_use]
    pub const fn service(&self) -> Option<ServiceKind> {
        match self {
            Self::Access(err) => err.service,
            Self::ServiceNotConfigured { service, .. } => Some(*service),
            _ => None,
        }
    }

    /// Returns actionable fix suggestions for this error.
    #[must_use]
    pub fn fix_suggestions(&self) -> Vec<FixSuggestion> {
        match self {
            Self::Access(err) => suggestions::access_suggestions(err),
            Self::ServiceNotConfigured { service, missing } => {
                suggestions::not_configured_suggestions(*service, missing)
            }
            Self::ConfigParse { path, message } => {
                suggestions::config_parse_suggestions(path, message)
            }
            Self::ConfigInvalid {
                key,
                value,
                message,
            } => suggestions::config_invalid_suggestions(key, value, message),
            Self::Io(e) => vec![FixSuggestion::new(
                vec!["sandcalc config".to_string()],
                format!("An I/O operation failed: {e}"),
            )],
            Self::Json(e) => vec![FixSuggestion::new(
                Vec::new(),
                format!("JSON could not be processed: {e}"),
            )],
            Self::Other(e) => vec![FixSuggestion::new(
                vec!["sandcalc --verbose <command>".to_string()],
                format!("Unexpected error: {e}"),
            )],
        }
    }
}
