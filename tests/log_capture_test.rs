//! Tests for the log capture helpers against sandcalc's own events.

use sandcalc::core::credential::{Credential, SessionStorage};
use sandcalc::core::service::ServiceKind;
use sandcalc::test_utils::make_test_service_config;

mod common;
use common::log_capture::TestLogCapture;
use common::logger::TestLogger;

fn authenticator() -> sandcalc::core::auth::Authenticator {
    let config = make_test_service_config(ServiceKind::Interface, "http://127.0.0.1:9");
    let store = std::sync::Arc::new(SessionStorage::new().scoped(ServiceKind::Interface));
    let http = sandcalc::core::http::build_client(std::time::Duration::from_secs(1)).unwrap();
    sandcalc::core::auth::Authenticator::new(config, http, store)
}

#[test]
fn captures_logout_event_with_service_field() {
    let capture = TestLogCapture::start();

    authenticator().logout();

    capture.assert_logged_at_level(tracing::Level::DEBUG, "Clearing stored credential");
    capture.assert_field_logged("service", "interface");
}

#[tokio::test]
async fn relogin_skip_logs_fingerprint_not_token() {
    let (log, capture) = TestLogger::with_capture("relogin_skip_logs_fingerprint_not_token");
    log.phase("setup");
    let auth = authenticator();
    let newer = Credential::new("newer-access-token", "r");
    auth.store().set(newer.clone());

    log.phase("execute");
    let adopted = auth
        .relogin(&Credential::new("stale-access-token", "r"))
        .await
        .expect("adopts stored credential");

    log.phase("verify");
    assert_eq!(adopted, newer);
    capture.assert_logged("Credential already replaced");
    capture.assert_field_logged("fingerprint", &newer.fingerprint());
    capture.assert_never_logged("newer-access-token");
    assert_eq!(capture.count("Login successful"), 0);
    log.finish_ok();
}

#[test]
#[should_panic(expected = "Expected log containing")]
fn missing_message_fails_assertion() {
    let capture = TestLogCapture::start();
    tracing::info!("unrelated");
    capture.assert_logged("Login successful");
}
