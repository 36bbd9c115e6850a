//! The two operator verbs: submit measurements and trigger the interface.
//!
//! Input is validated before any network call. The two verbs use disjoint
//! clients, so a failure in one never touches the other's credential or
//! status.

use crate::core::client::{InterfaceClient, PredictionClient};
use crate::core::credential::SessionStorage;
use crate::core::http::build_client;
use crate::core::models::{InterfaceRequest, InterfaceResult, LotContext, PredictionRequest, PredictionResult};
use crate::core::status::{OperationStatus, StatusCell};
use crate::error::{AccessResult, Result};
use crate::storage::ResolvedConfig;

/// Orchestrates one operator session against both services.
#[derive(Debug)]
pub struct PredictionWorkflow {
    prediction: PredictionClient,
    interface: InterfaceClient,
    session: SessionStorage,
    prediction_status: StatusCell,
    interface_status: StatusCell,
}

impl PredictionWorkflow {
    pub fn new(prediction: PredictionClient, interface: InterfaceClient, session: SessionStorage) -> Self {
        Self {
            prediction,
            interface,
            session,
            prediction_status: StatusCell::default(),
            interface_status: StatusCell::default(),
        }
    }

    /// Build both clients over a fresh session from resolved settings.
    ///
    /// # Errors
    ///
    /// Fails if the HTTP client cannot be built.
    pub fn from_config(config: &ResolvedConfig) -> Result<Self> {
        let http = build_client(config.timeout)?;
        let session = SessionStorage::new();
        let prediction = PredictionClient::from_session(config.prediction.clone(), http.clone(), &session)?;
        let interface = InterfaceClient::from_session(config.interface.clone(), http, &session)?;
        Ok(Self::new(prediction, interface, session))
    }

    /// Validate `fines`/`bulk` and the lot's receive date, then request a
    /// prediction.
    pub async fn submit(&self, lot: &LotContext, fines: &str, bulk: &str) -> AccessResult<PredictionResult> {
        let request = match PredictionRequest::from_lot(lot, fines, bulk) {
            Ok(request) => request,
            Err(err) => {
                tracing::debug!(inslot = %lot.inslot, error = %err, "Rejected prediction input");
                self.prediction_status.set(OperationStatus::Failed);
                return Err(err);
            }
        };

        tracing::debug!(inslot = %lot.inslot, month = request.month, "Submitting prediction");
        self.prediction_status.set(OperationStatus::Pending);
        let result = self.prediction.predict(&request).await;
        self.prediction_status.finish(&result);
        result
    }

    /// Trigger the physical-data interface for `lot`.
    pub async fn trigger_interface(&self, lot: &LotContext) -> AccessResult<InterfaceResult> {
        let request = InterfaceRequest::from(lot);

        tracing::debug!(inslot = %lot.inslot, "Triggering interface");
        self.interface_status.set(OperationStatus::Pending);
        let result = self.interface.interface(&request).await;
        self.interface_status.finish(&result);
        result
    }

    /// Status of the most recently finished prediction call.
    ///
    /// Overlapping submits each write the status when they finish, so the
    /// last one to complete wins. It can read `Succeeded` or `Failed` while
    /// another submit is still pending.
    #[must_use]
    pub fn prediction_status(&self) -> OperationStatus {
        self.prediction_status.get()
    }

    /// Status of the most recently finished interface call. Same
    /// last-finisher-wins rule as [`Self::prediction_status`].
    #[must_use]
    pub fn interface_status(&self) -> OperationStatus {
        self.interface_status.get()
    }

    #[must_use]
    pub const fn prediction_client(&self) -> &PredictionClient {
        &self.prediction
    }

    #[must_use]
    pub const fn interface_client(&self) -> &InterfaceClient {
        &self.interface
    }

    /// Forget both services' credentials.
    pub fn logout(&self) {
        self.session.clear_all();
    }
}
