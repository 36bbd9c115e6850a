//! API key/secret login exchange with single-flight de-duplication.
//!
//! At most one login exchange per service is in flight. Callers that arrive
//! while one is running wait for it and receive its outcome, success or
//! failure, instead of starting their own.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use reqwest::Client;
use serde::Deserialize;
use tokio::sync::Mutex;

use crate::core::credential::{Credential, CredentialStore};
use crate::core::http;
use crate::core::service::{ServiceConfig, ServiceKind};
use crate::error::{AccessError, AccessResult};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LoginResponse {
    access_token: Option<String>,
    refresh_token: Option<String>,
}

/// Outcome of the most recent exchange, stamped with its sequence number.
#[derive(Default)]
struct LoginSlot {
    generation: u64,
    outcome: Option<AccessResult<Credential>>,
}

/// When an exchange is actually needed.
#[derive(Debug, Clone, Copy)]
enum LoginMode<'a> {
    /// Only if the store is empty.
    IfMissing,
    /// Only if the store still holds `stale` (or nothing).
    Replacing(&'a Credential),
    /// Always.
    Forced,
}

/// Exchanges a static API key/secret for a token pair for one service.
pub struct Authenticator {
    config: ServiceConfig,
    http: Client,
    store: Arc<dyn CredentialStore>,
    slot: Mutex<LoginSlot>,
    completed: AtomicU64,
}

impl Authenticator {
    pub fn new(config: ServiceConfig, http: Client, store: Arc<dyn CredentialStore>) -> Self {
        Self {
            config,
            http,
            store,
            slot: Mutex::new(LoginSlot::default()),
            completed: AtomicU64::new(0),
        }
    }

    #[must_use]
    pub const fn service(&self) -> ServiceKind {
        self.config.kind
    }

    #[must_use]
    pub const fn config(&self) -> &ServiceConfig {
        &self.config
    }

    #[must_use]
    pub fn store(&self) -> &Arc<dyn CredentialStore> {
        &self.store
    }

    /// Number of login exchanges that have completed (successfully or not).
    #[must_use]
    pub fn login_count(&self) -> u64 {
        self.completed.load(Ordering::Acquire)
    }

    /// Currently stored credential.
    #[must_use]
    pub fn current(&self) -> Option<Credential> {
        self.store.get()
    }

    /// Forget the stored credential.
    pub fn logout(&self) {
        tracing::debug!(service = %self.service(), "Clearing stored credential");
        self.store.clear();
    }

    /// Log in unconditionally, unless another login is already in flight, in
    /// which case its outcome is returned.
    pub async fn login(&self) -> AccessResult<Credential> {
        self.acquire(LoginMode::Forced).await
    }

    /// Return the stored credential, logging in first if there is none.
    pub async fn ensure(&self) -> AccessResult<Credential> {
        if let Some(credential) = self.store.get() {
            return Ok(credential);
        }
        self.acquire(LoginMode::IfMissing).await
    }

    /// Replace a credential the service just rejected.
    ///
    /// If the store already holds a different credential, another caller has
    /// re-authenticated in the meantime and that credential is returned
    /// without a second exchange.
    pub async fn relogin(&self, stale: &Credential) -> AccessResult<Credential> {
        self.acquire(LoginMode::Replacing(stale)).await
    }

    async fn acquire(&self, mode: LoginMode<'_>) -> AccessResult<Credential> {
        let service = self.service();
        let seen = self.completed.load(Ordering::Acquire);
        let mut slot = self.slot.lock().await;

        if slot.generation != seen
            && let Some(outcome) = slot.outcome.clone()
        {
            tracing::debug!(%service, "Joined in-flight login");
            return outcome;
        }

        match mode {
            LoginMode::IfMissing => {
                if let Some(current) = self.store.get() {
                    return Ok(current);
                }
            }
            LoginMode::Replacing(stale) => {
                if let Some(current) = self.store.get()
                    && current != *stale
                {
                    tracing::debug!(
                        %service,
                        fingerprint = %current.fingerprint(),
                        "Credential already replaced, skipping login"
                    );
                    return Ok(current);
                }
            }
            LoginMode::Forced => {}
        }

        let outcome = self.exchange().await;
        if let Ok(credential) = &outcome {
            self.store.set(credential.clone());
        }

        slot.generation += 1;
        slot.outcome = Some(outcome.clone());
        self.completed.store(slot.generation, Ordering::Release);
        outcome
    }

    async fn exchange(&self) -> AccessResult<Credential> {
        let service = self.service();
        let Some((api_key, api_secret)) = self.config.credentials() else {
            tracing::error!(%service, "Missing API credentials");
            return Err(AccessError::missing_credentials(service));
        };

        let url = self.config.url(service.login_path());
        tracing::debug!(%service, %url, "Exchanging API key for token pair");

        let request = self
            .http
            .post(&url)
            .timeout(self.config.timeout)
            .json(&service.login_body(api_key, api_secret));
        let response = http::send(service, request).await?;

        if !response.is_success() {
            let message = response
                .service_message()
                .unwrap_or_else(|| "Authentication failed".to_string());
            tracing::warn!(%service, status = %response.status, %message, "Login rejected");
            return Err(AccessError::auth(service, message).with_status(response.status.as_u16()));
        }

        let body: LoginResponse = serde_json::from_slice(&response.body).map_err(|e| {
            AccessError::auth(service, "Failed to get token").with_cause(e)
        })?;
        let Some(access_token) = body.access_token.filter(|t| !t.is_empty()) else {
            tracing::warn!(%service, "Login response carried no access token");
            return Err(AccessError::auth(service, "Failed to get token"));
        };

        let credential = Credential::new(access_token, body.refresh_token.unwrap_or_default());
        tracing::info!(%service, fingerprint = %credential.fingerprint(), "Login successful");
        Ok(credential)
    }
}

impl std::fmt::Debug for Authenticator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Authenticator")
            .field("config", &self.config)
            .field("login_count", &self.login_count())
            .finish_non_exhaustive()
    }
}
