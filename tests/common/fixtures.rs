//! Mock backends and client builders for integration tests.
//!
//! ```rust,ignore
//! let backend = MockBackend::start(ServiceKind::Prediction).await;
//! backend.mount_login("token-1").await;
//! let client = backend.prediction_client(&SessionStorage::new());
//! ```

use std::time::Duration;

use serde_json::Value;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use sandcalc::core::client::{InterfaceClient, PredictionClient};
use sandcalc::core::credential::SessionStorage;
use sandcalc::core::http::{DEFAULT_TIMEOUT, build_client};
use sandcalc::core::service::{ServiceConfig, ServiceKind};
use sandcalc::core::workflow::PredictionWorkflow;
use sandcalc::test_utils::{make_test_login_body, make_test_service_config};

/// A wiremock server standing in for one service.
pub struct MockBackend {
    pub service: ServiceKind,
    pub server: MockServer,
}

impl MockBackend {
    pub async fn start(service: ServiceKind) -> Self {
        Self {
            service,
            server: MockServer::start().await,
        }
    }

    #[must_use]
    pub fn uri(&self) -> String {
        self.server.uri()
    }

    #[must_use]
    pub fn config(&self) -> ServiceConfig {
        make_test_service_config(self.service, &self.uri())
    }

    /// Login succeeds with `access_token`, any number of times.
    pub async fn mount_login(&self, access_token: &str) {
        Mock::given(method("POST"))
            .and(path(self.service.login_path()))
            .respond_with(ResponseTemplate::new(200).set_body_json(make_test_login_body(access_token)))
            .mount(&self.server)
            .await;
    }

    /// Login succeeds with `access_token` after `delay`, and must be called
    /// exactly `times` times.
    pub async fn mount_login_expecting(&self, access_token: &str, delay: Duration, times: u64) {
        Mock::given(method("POST"))
            .and(path(self.service.login_path()))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(make_test_login_body(access_token))
                    .set_delay(delay),
            )
            .expect(times)
            .mount(&self.server)
            .await;
    }

    /// Business endpoint answers `status` with `body` for `token`.
    pub async fn mount_business(&self, token: &str, status: u16, body: Value) {
        Mock::given(method("POST"))
            .and(path(self.service.business_path()))
            .and(header("authorization", format!("Bearer {token}").as_str()))
            .respond_with(ResponseTemplate::new(status).set_body_json(body))
            .mount(&self.server)
            .await;
    }

    /// Requests received so far on `route`.
    pub async fn hits(&self, route: &str) -> usize {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .filter(|r| r.url.path() == route)
            .count()
    }

    pub async fn login_hits(&self) -> usize {
        self.hits(self.service.login_path()).await
    }

    pub async fn business_hits(&self) -> usize {
        self.hits(self.service.business_path()).await
    }

    /// Every request body received on the login path.
    pub async fn login_bodies(&self) -> Vec<Value> {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .filter(|r| r.url.path() == self.service.login_path())
            .filter_map(|r| serde_json::from_slice(&r.body).ok())
            .collect()
    }

    pub async fn total_hits(&self) -> usize {
        self.server.received_requests().await.unwrap_or_default().len()
    }

    pub fn prediction_client(&self, session: &SessionStorage) -> PredictionClient {
        let http = build_client(DEFAULT_TIMEOUT).expect("http client");
        PredictionClient::from_session(self.config(), http, session).expect("prediction client")
    }

    pub fn interface_client(&self, session: &SessionStorage) -> InterfaceClient {
        let http = build_client(DEFAULT_TIMEOUT).expect("http client");
        InterfaceClient::from_session(self.config(), http, session).expect("interface client")
    }
}

/// Both backends plus a workflow wired to them over one session.
pub struct Harness {
    pub prediction: MockBackend,
    pub interface: MockBackend,
    pub session: SessionStorage,
    pub workflow: PredictionWorkflow,
}

impl Harness {
    pub async fn start() -> Self {
        let prediction = MockBackend::start(ServiceKind::Prediction).await;
        let interface = MockBackend::start(ServiceKind::Interface).await;
        let session = SessionStorage::new();
        let workflow = PredictionWorkflow::new(
            prediction.prediction_client(&session),
            interface.interface_client(&session),
            session.clone(),
        );
        Self {
            prediction,
            interface,
            session,
            workflow,
        }
    }
}
