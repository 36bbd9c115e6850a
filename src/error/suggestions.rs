//! Fix suggestion database for sandcalc errors.
//!
//! Provides actionable fix suggestions mapped to specific error types,
//! including commands, context explanations, and prevention tips.

use super::{AccessError, ErrorKind};
use crate::core::service::ServiceKind;

// =============================================================================
// Fix Suggestion Types
// =============================================================================

/// A fix suggestion for an error.
///
/// Contains actionable information to help operators resolve errors.
#[derive(Debug, Clone)]
pub struct FixSuggestion {
    /// Primary fix commands in order of preference.
    /// These should be copy-paste ready for the terminal.
    pub commands: Vec<String>,

    /// Explanation of why this error occurred.
    pub context: String,

    /// Tips to prevent this error in the future.
    pub prevention: Option<String>,
}

impl FixSuggestion {
    /// Creates a new fix suggestion with required fields.
    #[must_use]
    pub fn new(commands: Vec<String>, context: impl Into<String>) -> Self {
        Self {
            commands,
            context: context.into(),
            prevention: None,
        }
    }

    /// Builder: adds prevention tips.
    #[must_use]
    pub fn with_prevention(mut self, prevention: impl Into<String>) -> Self {
        self.prevention = Some(prevention.into());
        self
    }
}

// =============================================================================
// Suggestion Generators
// =============================================================================

/// Dispatches on the access-layer error kind.
#[must_use]
pub fn access_suggestions(err: &AccessError) -> Vec<FixSuggestion> {
    match (err.kind, err.service) {
        (ErrorKind::Input, _) => input_suggestions(&err.message),
        (ErrorKind::Auth, Some(service)) if err.is_missing_credentials() => {
            missing_credentials_suggestions(service)
        }
        (ErrorKind::Auth, Some(service)) => auth_rejected_suggestions(service, &err.message),
        (ErrorKind::Transport, Some(service)) => transport_suggestions(service, &err.message),
        (ErrorKind::Service, Some(service)) => {
            service_error_suggestions(service, err.status, &err.message)
        }
        (ErrorKind::Validation, Some(service)) => validation_suggestions(service, &err.message),
        (_, None) => vec![FixSuggestion::new(
            vec!["sandcalc --verbose <command>".to_string()],
            err.message.clone(),
        )],
    }
}

/// Generates fix suggestions for rejected operator input.
#[must_use]
pub fn input_suggestions(message: &str) -> Vec<FixSuggestion> {
    vec![
        FixSuggestion::new(
            vec![
                "sandcalc predict --date-receive 2024.03.15 --fines 1.5 --bulk 20 ...".to_string(),
            ],
            format!(
                "The lot data was rejected before contacting any service: {message}. \
                 Dates must be YYYY.MM.DD and fines/bulk must be non-negative numbers."
            ),
        )
        .with_prevention("Scan the lot label again rather than typing fields by hand."),
    ]
}

/// Generates fix suggestions for a service without API key/secret.
#[must_use]
pub fn missing_credentials_suggestions(service: ServiceKind) -> Vec<FixSuggestion> {
    let prefix = service.env_prefix();
    vec![
        FixSuggestion::new(
            vec![
                format!("export {prefix}_API_KEY=<key>"),
                format!("export {prefix}_API_SECRET=<secret>"),
                "sandcalc config".to_string(),
            ],
            format!(
                "No API key/secret is configured for the {service} service, so no login \
                 can be attempted. Retrying will not help until they are set."
            ),
        )
        .with_prevention("Keep the keys in a .env file next to where sandcalc runs."),
    ]
}

/// Generates fix suggestions for a login the service rejected.
#[must_use]
pub fn auth_rejected_suggestions(service: ServiceKind, reason: &str) -> Vec<FixSuggestion> {
    let prefix = service.env_prefix();
    vec![
        FixSuggestion::new(
            vec!["sandcalc config".to_string()],
            format!(
                "The {service} service refused authentication: {reason}. The API key or \
                 secret may have been rotated or revoked."
            ),
        )
        .with_prevention(format!(
            "Verify {prefix}_API_KEY and {prefix}_API_SECRET against the service owner's records."
        )),
    ]
}

/// Generates fix suggestions for a server that did not answer.
#[must_use]
pub fn transport_suggestions(service: ServiceKind, message: &str) -> Vec<FixSuggestion> {
    let prefix = service.env_prefix();
    vec![
        FixSuggestion::new(
            vec![
                "sandcalc config".to_string(),
                format!("curl -v ${prefix}_ENDPOINT"),
            ],
            format!(
                "The {service} service did not respond: {message}. The endpoint may be \
                 wrong, or the service may be down."
            ),
        )
        .with_prevention("Increase --timeout if the service is slow rather than unreachable."),
    ]
}

/// Generates fix suggestions for a non-auth failure status.
#[must_use]
pub fn service_error_suggestions(
    service: ServiceKind,
    status: Option<u16>,
    message: &str,
) -> Vec<FixSuggestion> {
    let status_info = status.map_or(String::new(), |c| format!(" (HTTP {c})"));
    vec![FixSuggestion::new(
        vec!["sandcalc --verbose <command>".to_string()],
        format!("The {service} service returned an error{status_info}: {message}"),
    )]
}

/// Generates fix suggestions for a payload that failed validation.
#[must_use]
pub fn validation_suggestions(service: ServiceKind, message: &str) -> Vec<FixSuggestion> {
    vec![FixSuggestion::new(
        vec!["sandcalc --verbose --format json <command>".to_string()],
        format!(
            "The {service} service answered, but its payload was unusable: {message}. \
             No value was substituted."
        ),
    )]
}

/// Generates fix suggestions for a service missing required settings.
#[must_use]
pub fn not_configured_suggestions(service: ServiceKind, missing: &str) -> Vec<FixSuggestion> {
    let prefix = service.env_prefix();
    vec![FixSuggestion::new(
        vec![
            format!("export {prefix}_ENDPOINT=<url>"),
            format!("export {prefix}_API_KEY=<key>"),
            format!("export {prefix}_API_SECRET=<secret>"),
        ],
        format!("The {service} service is missing: {missing}."),
    )]
}

/// Generates fix suggestions for config parse errors.
#[must_use]
pub fn config_parse_suggestions(path: &str, message: &str) -> Vec<FixSuggestion> {
    vec![
        FixSuggestion::new(
            vec![format!("$EDITOR {path}")],
            format!("The config file has a syntax error. The TOML parser reported: {message}"),
        )
        .with_prevention("Run `sandcalc config` after editing to check the file."),
    ]
}

/// Generates fix suggestions for invalid config value errors.
#[must_use]
pub fn config_invalid_suggestions(key: &str, value: &str, message: &str) -> Vec<FixSuggestion> {
    vec![FixSuggestion::new(
        vec!["sandcalc config".to_string()],
        format!("Invalid config value for '{key}': '{value}'. {message}"),
    )]
}
