//! Per-service clients: authenticator, gateway and validator wired together.

use std::sync::Arc;

use reqwest::Client;

use crate::core::auth::Authenticator;
use crate::core::credential::{CredentialStore, SessionStorage};
use crate::core::gateway::RequestGateway;
use crate::core::models::{InterfaceRequest, InterfaceResult, PredictionRequest, PredictionResult};
use crate::core::service::ServiceConfig;
use crate::core::validator::{InterfaceValidator, PredictionValidator, ResponseValidator};
use crate::error::{AccessResult, Result, SandcalcError};

/// Client for the prediction service.
pub type PredictionClient = ServiceClient<PredictionValidator>;

/// Client for the interface service.
pub type InterfaceClient = ServiceClient<InterfaceValidator>;

/// Everything needed to talk to one backend.
#[derive(Debug)]
pub struct ServiceClient<V: ResponseValidator> {
    gateway: RequestGateway,
    validator: V,
}

impl<V: ResponseValidator + Default> ServiceClient<V> {
    /// Build a client over an explicit store.
    ///
    /// # Errors
    ///
    /// Fails when `config` belongs to a different service than `V`.
    pub fn new(config: ServiceConfig, http: Client, store: Arc<dyn CredentialStore>) -> Result<Self> {
        if config.kind != V::SERVICE {
            return Err(SandcalcError::ConfigInvalid {
                key: "service".to_string(),
                value: config.kind.to_string(),
                message: format!("expected {} settings", V::SERVICE),
            });
        }
        let auth = Arc::new(Authenticator::new(config, http.clone(), store));
        Ok(Self {
            gateway: RequestGateway::new(auth, http),
            validator: V::default(),
        })
    }

    /// Build a client whose store is this service's slot in `session`.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when `config` belongs to a different
    /// service than this client talks to.
    pub fn from_session(config: ServiceConfig, http: Client, session: &SessionStorage) -> Result<Self> {
        let store = Arc::new(session.scoped(V::SERVICE));
        Self::new(config, http, store)
    }
}

impl<V: ResponseValidator> ServiceClient<V> {
    #[must_use]
    pub const fn authenticator(&self) -> &Arc<Authenticator> {
        self.gateway.authenticator()
    }

    /// Forget this service's credential.
    pub fn logout(&self) {
        self.authenticator().logout();
    }

    async fn dispatch<B>(&self, body: &B) -> AccessResult<V::Output>
    where
        B: serde::Serialize + ?Sized,
    {
        let response = self.gateway.call(V::SERVICE.business_path(), body).await?;
        self.validator.validate(&response)
    }
}

impl ServiceClient<PredictionValidator> {
    /// `POST /sand-predict`.
    pub async fn predict(&self, request: &PredictionRequest) -> AccessResult<PredictionResult> {
        self.dispatch(request).await
    }
}

impl ServiceClient<InterfaceValidator> {
    /// `POST /interfaces/physical-data`.
    pub async fn interface(&self, request: &InterfaceRequest) -> AccessResult<InterfaceResult> {
        self.dispatch(request).await
    }
}
