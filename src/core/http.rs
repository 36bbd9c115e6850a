//! HTTP client utilities.
//!
//! Provides the shared HTTP client and the raw response type the gateway and
//! validators exchange.

use std::time::Duration;

use reqwest::{Client, ClientBuilder, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::core::service::ServiceKind;
use crate::error::{AccessError, AccessResult, Result, SandcalcError};

/// Default timeout for HTTP requests.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Build a configured HTTP client.
///
/// # Errors
///
/// Returns error if client construction fails.
pub fn build_client(timeout: Duration) -> Result<Client> {
    ClientBuilder::new()
        .timeout(timeout)
        .user_agent(format!("sandcalc/{}", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| SandcalcError::Other(anyhow::Error::new(e).context("building HTTP client")))
}

/// Status and body of a completed HTTP exchange.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: StatusCode,
    pub body: Vec<u8>,
}

impl RawResponse {
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Whether the service rejected the bearer token.
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        self.status == StatusCode::UNAUTHORIZED
    }

    /// The `message` field of a JSON error body, if any.
    #[must_use]
    pub fn service_message(&self) -> Option<String> {
        service_message(&self.body)
    }

    /// Turn a non-2xx response into a [`crate::error::ErrorKind::Service`] error.
    pub fn ensure_success(self, service: ServiceKind) -> AccessResult<Self> {
        if self.is_success() {
            return Ok(self);
        }
        let message = self
            .service_message()
            .unwrap_or_else(|| service.default_failure_message().to_string());
        Err(AccessError::service(service, self.status.as_u16(), message))
    }

    /// Deserialize the body, failing with a validation error.
    pub fn json<T: DeserializeOwned>(&self, service: ServiceKind) -> AccessResult<T> {
        serde_json::from_slice(&self.body).map_err(|e| {
            AccessError::validation(service, format!("malformed response body: {e}")).with_cause(e)
        })
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// Extract a human-readable `message` from a JSON error body.
#[must_use]
pub fn service_message(body: &[u8]) -> Option<String> {
    serde_json::from_slice::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.message)
        .filter(|m| !m.trim().is_empty())
}

/// Classify a reqwest failure that produced no usable response.
#[must_use]
pub fn transport_error(service: ServiceKind, err: reqwest::Error) -> AccessError {
    let message = if err.is_timeout() {
        "API server did not respond before the timeout".to_string()
    } else if err.is_connect() {
        "No response received from the API server".to_string()
    } else if err.is_builder() {
        format!("Error setting up API request: {err}")
    } else {
        format!("API server did not respond: {err}")
    };
    AccessError::transport(service, message).with_cause(err)
}

/// Send a prepared request and read the full body.
pub(crate) async fn send(
    service: ServiceKind,
    request: reqwest::RequestBuilder,
) -> AccessResult<RawResponse> {
    let response = request
        .send()
        .await
        .map_err(|e| transport_error(service, e))?;
    let status = response.status();
    let body = response
        .bytes()
        .await
        .map_err(|e| transport_error(service, e))?
        .to_vec();
    Ok(RawResponse { status, body })
}
