//! Session-scoped credential storage.
//!
//! Each service client owns a [`CredentialStore`]. The default store is a
//! per-service view onto one [`SessionStorage`], so both services can share a
//! session without ever seeing each other's tokens. Writes are whole-value
//! replacements; nothing is merged.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};

use crate::core::service::ServiceKind;

/// Access/refresh token pair returned by a login exchange.
#[derive(Clone)]
pub struct Credential {
    access_token: String,
    refresh_token: String,
    obtained_at: DateTime<Utc>,
}

impl Credential {
    pub fn new(access_token: impl Into<String>, refresh_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: refresh_token.into(),
            obtained_at: Utc::now(),
        }
    }

    #[must_use]
    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    #[must_use]
    pub fn refresh_token(&self) -> &str {
        &self.refresh_token
    }

    #[must_use]
    pub const fn obtained_at(&self) -> DateTime<Utc> {
        self.obtained_at
    }

    /// Short SHA-256 prefix of the access token, safe to log.
    #[must_use]
    pub fn fingerprint(&self) -> String {
        let digest = Sha256::digest(self.access_token.as_bytes());
        hex::encode(&digest[..6])
    }
}

impl PartialEq for Credential {
    fn eq(&self, other: &Self) -> bool {
        self.access_token == other.access_token && self.refresh_token == other.refresh_token
    }
}

impl Eq for Credential {}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("fingerprint", &self.fingerprint())
            .field("obtained_at", &self.obtained_at)
            .finish_non_exhaustive()
    }
}

/// Storage for one service's current credential.
pub trait CredentialStore: Send + Sync {
    /// Current credential, if any.
    fn get(&self) -> Option<Credential>;

    /// Replace the stored credential.
    fn set(&self, credential: Credential);

    /// Remove the stored credential.
    fn clear(&self);

    /// Remove the stored credential only if it is still `expected`.
    ///
    /// Returns whether anything was removed.
    fn clear_if(&self, expected: &Credential) -> bool;
}

/// Process-lifetime token storage shared by all service clients of a session.
#[derive(Clone, Default)]
pub struct SessionStorage {
    slots: Arc<RwLock<HashMap<ServiceKind, Credential>>>,
}

impl SessionStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store handle for one service.
    #[must_use]
    pub fn scoped(&self, service: ServiceKind) -> ScopedCredentialStore {
        ScopedCredentialStore {
            storage: self.clone(),
            service,
        }
    }

    /// Drop every stored credential (explicit logout of the whole session).
    pub fn clear_all(&self) {
        self.slots
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    /// Services that currently hold a credential.
    #[must_use]
    pub fn services(&self) -> Vec<ServiceKind> {
        let slots = self.slots.read().unwrap_or_else(PoisonError::into_inner);
        ServiceKind::ALL
            .iter()
            .copied()
            .filter(|s| slots.contains_key(s))
            .collect()
    }
}

impl fmt::Debug for SessionStorage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionStorage")
            .field("services", &self.services())
            .finish()
    }
}

/// [`CredentialStore`] bound to one service inside a [`SessionStorage`].
#[derive(Debug, Clone)]
pub struct ScopedCredentialStore {
    storage: SessionStorage,
    service: ServiceKind,
}

impl ScopedCredentialStore {
    #[must_use]
    pub const fn service(&self) -> ServiceKind {
        self.service
    }
}

impl CredentialStore for ScopedCredentialStore {
    fn get(&self) -> Option<Credential> {
        self.storage
            .slots
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&self.service)
            .cloned()
    }

    fn set(&self, credential: Credential) {
        self.storage
            .slots
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(self.service, credential);
    }

    fn clear(&self) {
        self.storage
            .slots
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.service);
    }

    fn clear_if(&self, expected: &Credential) -> bool {
        let mut slots = self
            .storage
            .slots
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        if slots.get(&self.service) == Some(expected) {
            slots.remove(&self.service);
            true
        } else {
            false
        }
    }
}
