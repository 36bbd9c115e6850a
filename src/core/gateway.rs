//! Authenticated request issuing with a single forced re-login.
//!
//! Each call walks an explicit state machine:
//!
//! ```text
//! Unauthenticated --login--> Authenticated --send--> done
//!                                  |
//!                                 401 (first)
//!                                  v
//!                           Reauthenticating --relogin--> Authenticated --send--> done
//!                                                               |
//!                                                              401 (second): clear store, AuthError
//! ```
//!
//! No two network calls of the same call are ever in flight at once, and the
//! business request is retried at most once.

use std::fmt;
use std::sync::Arc;

use reqwest::Client;
use serde::Serialize;

use crate::core::auth::Authenticator;
use crate::core::credential::Credential;
use crate::core::http::{self, RawResponse};
use crate::error::{AccessError, AccessResult};

/// Where a single gateway call currently stands.
#[derive(Clone, PartialEq, Eq)]
pub enum GatewayState {
    /// No credential available yet.
    Unauthenticated,
    /// Holding a credential to attach; `retried` once a re-login happened.
    Authenticated { credential: Credential, retried: bool },
    /// The service rejected `stale`; a replacement is being obtained.
    Reauthenticating { stale: Credential },
}

impl GatewayState {
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Unauthenticated => "unauthenticated",
            Self::Authenticated { .. } => "authenticated",
            Self::Reauthenticating { .. } => "reauthenticating",
        }
    }
}

impl fmt::Debug for GatewayState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Issues business requests for one service with its bearer token attached.
#[derive(Debug)]
pub struct RequestGateway {
    auth: Arc<Authenticator>,
    http: Client,
}

impl RequestGateway {
    pub const fn new(auth: Arc<Authenticator>, http: Client) -> Self {
        Self { auth, http }
    }

    #[must_use]
    pub const fn authenticator(&self) -> &Arc<Authenticator> {
        &self.auth
    }

    /// Initial state for a new call, based on what the store holds right now.
    #[must_use]
    pub fn initial_state(&self) -> GatewayState {
        self.auth
            .current()
            .map_or(GatewayState::Unauthenticated, |credential| {
                GatewayState::Authenticated {
                    credential,
                    retried: false,
                }
            })
    }

    /// POST `body` to `path` on this gateway's service.
    ///
    /// Returns the response only when it is 2xx. Non-auth failures are
    /// classified and returned without retry.
    pub async fn call<B>(&self, path: &str, body: &B) -> AccessResult<RawResponse>
    where
        B: Serialize + ?Sized,
    {
        let service = self.auth.service();
        let url = self.auth.config().url(path);
        let mut state = self.initial_state();

        loop {
            tracing::debug!(%service, state = state.name(), "Gateway step");
            state = match state {
                GatewayState::Unauthenticated => GatewayState::Authenticated {
                    credential: self.auth.ensure().await?,
                    retried: false,
                },
                GatewayState::Reauthenticating { stale } => GatewayState::Authenticated {
                    credential: self.auth.relogin(&stale).await?,
                    retried: true,
                },
                GatewayState::Authenticated {
                    credential,
                    retried,
                } => {
                    let response = self.send(&url, &credential, body).await?;
                    if !response.is_unauthorized() {
                        return response.ensure_success(service);
                    }
                    if retried {
                        let cleared = self.auth.store().clear_if(&credential);
                        tracing::error!(
                            %service,
                            fingerprint = %credential.fingerprint(),
                            cleared,
                            "Still unauthorized after re-login"
                        );
                        return Err(AccessError::auth(
                            service,
                            response
                                .service_message()
                                .unwrap_or_else(|| "Unauthorized after re-login".to_string()),
                        )
                        .with_status(response.status.as_u16()));
                    }
                    tracing::warn!(
                        %service,
                        fingerprint = %credential.fingerprint(),
                        "Token rejected, re-authenticating"
                    );
                    GatewayState::Reauthenticating { stale: credential }
                }
            };
        }
    }

    async fn send<B>(&self, url: &str, credential: &Credential, body: &B) -> AccessResult<RawResponse>
    where
        B: Serialize + ?Sized,
    {
        let service = self.auth.service();
        tracing::debug!(%service, %url, fingerprint = %credential.fingerprint(), "Sending request");
        let request = self
            .http
            .post(url)
            .timeout(self.auth.config().timeout)
            .bearer_auth(credential.access_token())
            .json(body);
        let response = http::send(service, request).await?;
        tracing::debug!(%service, status = %response.status, "Response received");
        Ok(response)
    }
}
