//! E2E tests for the sandcalc binary.
//!
//! Every invocation runs with a cleared environment, an isolated working
//! directory (so no stray `.env` is loaded) and an explicit config path.

mod common;

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::{Value, json};

use sandcalc::core::service::ServiceKind;
use sandcalc::test_utils::{TestDir, make_test_config_toml, make_test_prediction_body};
use sandcalc::{assert_contains, assert_json_valid, assert_no_ansi_codes, assert_not_contains};

use common::fixtures::MockBackend;
use common::logger::TestLogger;

const LOT_ARGS: &[&str] = &[
    "--inslot",
    "890000012345",
    "--batch",
    "B240315",
    "--plant",
    "1100",
    "--material",
    "RM-CASSAVA-01",
    "--operationno",
    "0010",
    "--date-receive",
    "2024.03.15",
];

#[allow(deprecated)]
fn sandcalc(dir: &TestDir) -> Command {
    let mut cmd = Command::cargo_bin("sandcalc").expect("binary built");
    cmd.env_clear()
        .current_dir(dir.path())
        .env("SANDCALC_CONFIG", dir.file_path("config.toml"))
        .env("SANDCALC_LOG", "error");
    cmd
}

/// Last non-empty line of `bytes`, parsed as JSON.
fn last_json_line(bytes: &[u8]) -> Value {
    let text = String::from_utf8_lossy(bytes);
    let line = text
        .lines()
        .rev()
        .find(|l| !l.trim().is_empty())
        .expect("output line");
    serde_json::from_str(line).expect("JSON line")
}

#[test]
fn help_lists_commands() {
    let dir = TestDir::new();
    sandcalc(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("predict")
                .and(predicate::str::contains("interface"))
                .and(predicate::str::contains("run"))
                .and(predicate::str::contains("config")),
        );
}

#[test]
fn config_masks_secrets_and_reports_sources() {
    let log = TestLogger::new("config_masks_secrets_and_reports_sources");
    log.phase("execute");
    let dir = TestDir::new();
    let assert = sandcalc(&dir)
        .args(["config", "--json"])
        .env("SANDCALC_PREDICT_ENDPOINT", "http://predict.local")
        .env("SANDCALC_API_KEY", "key-0123456789")
        .env("SANDCALC_API_SECRET", "secret-0123456789")
        .assert()
        .success();

    log.phase("verify");
    let output = last_json_line(&assert.get_output().stdout);
    assert_eq!(output["schemaVersion"], "sandcalc.v1");
    assert_eq!(output["command"], "config");

    let services = output["data"]["services"].as_array().expect("services");
    assert_eq!(services.len(), 2);
    assert_eq!(services[0]["service"], "prediction");
    assert_eq!(services[0]["endpoint"], "http://predict.local");
    assert_eq!(services[0]["endpoint_source"], "environment variable");
    assert_eq!(services[0]["api_key"], "key-********");
    assert_eq!(services[0]["ready"], true);
    assert_eq!(services[1]["endpoint"], "http://localhost:8004");

    let stdout = String::from_utf8_lossy(&assert.get_output().stdout);
    assert_json_valid!(stdout.trim().lines().last().unwrap_or_default());
    assert_not_contains!(&*stdout, "secret-0123456789");
    log.finish_ok();
}

#[test]
fn config_file_values_are_used() {
    let dir = TestDir::new();
    dir.create_file("config.toml", &make_test_config_toml("http://from-file.local"));

    sandcalc(&dir)
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("http://from-file.local"))
        .stdout(predicate::str::contains("config file"));
}

#[test]
fn corrupted_config_is_a_config_error() {
    let dir = TestDir::new();
    dir.create_file("config.toml", "[general\ntimeout_seconds = ");

    sandcalc(&dir)
        .arg("config")
        .assert()
        .code(6)
        .stderr(predicate::str::contains("SC-C002"));
}

#[test]
fn unconfigured_prediction_service_exits_with_config_error() {
    let dir = TestDir::new();
    let assert = sandcalc(&dir)
        .args(["predict", "--json", "--fines", "1", "--bulk", "1"])
        .args(LOT_ARGS)
        .assert()
        .code(6);

    let error = last_json_line(&assert.get_output().stderr);
    assert_eq!(error["error_code"], "SC-C001");
    assert_eq!(error["service"], "prediction");
    assert!(error["message"].as_str().unwrap().contains("endpoint"));
}

#[test]
fn invalid_measurement_exits_with_input_error() {
    let dir = TestDir::new();
    // Nothing listens on port 1; input is rejected before any connection.
    let assert = sandcalc(&dir)
        .args(["predict", "--json", "--fines", "abc", "--bulk", "1"])
        .args(LOT_ARGS)
        .env("SANDCALC_PREDICT_ENDPOINT", "http://127.0.0.1:1")
        .env("SANDCALC_API_KEY", "k")
        .env("SANDCALC_API_SECRET", "s")
        .assert()
        .code(2);

    let error = last_json_line(&assert.get_output().stderr);
    assert_eq!(error["error_code"], "SC-I001");
    assert_eq!(error["message"], "Please enter valid fines and bulk values.");
    assert_eq!(error["is_retryable"], false);
}

#[test]
fn human_errors_are_plain_when_not_a_tty() {
    let dir = TestDir::new();
    sandcalc(&dir)
        .args(["predict", "--fines", "1", "--bulk", "1", "--date-receive", "2024-03-15"])
        .args(&LOT_ARGS[..10])
        .env("SANDCALC_PREDICT_ENDPOINT", "http://127.0.0.1:1")
        .env("SANDCALC_API_KEY", "k")
        .env("SANDCALC_API_SECRET", "s")
        .assert()
        .code(2)
        .stderr(predicate::str::contains(
            "Error [SC-I001]: Invalid date format. Please use YYYY.MM.DD format.",
        ))
        .stderr(predicate::str::contains("\x1b[").not());
}

#[tokio::test(flavor = "multi_thread")]
async fn predict_against_mock_service() {
    let log = TestLogger::new("predict_against_mock_service");
    log.phase("setup");
    let backend = MockBackend::start(ServiceKind::Prediction).await;
    backend.mount_login("cli-token").await;
    backend
        .mount_business("cli-token", 200, make_test_prediction_body(1.005, 3.5))
        .await;
    let uri = backend.uri();

    log.phase("execute");
    let output = tokio::task::spawn_blocking(move || {
        let dir = TestDir::new();
        sandcalc(&dir)
            .args(["predict", "--fines", "12.5", "--bulk", "3.4"])
            .args(LOT_ARGS)
            .args(["--predict-endpoint", uri.as_str()])
            .env("SANDCALC_API_KEY", "k")
            .env("SANDCALC_API_SECRET", "s")
            .output()
            .expect("run binary")
    })
    .await
    .expect("join");

    log.phase("verify");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    assert_contains!(&*stdout, "Prediction for lot 890000012345");
    assert_contains!(&*stdout, "1.00");
    assert_contains!(&*stdout, "above 3.00 limit");
    assert_no_ansi_codes!(&*stdout);
    assert_eq!(backend.login_hits().await, 1);
    log.finish_ok();
}

#[tokio::test(flavor = "multi_thread")]
async fn run_reports_both_verbs_as_json() {
    let prediction = MockBackend::start(ServiceKind::Prediction).await;
    prediction.mount_login("p").await;
    prediction
        .mount_business("p", 200, make_test_prediction_body(1.2, 2.0))
        .await;
    let interface = MockBackend::start(ServiceKind::Interface).await;
    interface.mount_login("i").await;
    interface
        .mount_business("i", 200, json!({ "message": "Interface queued" }))
        .await;
    let (predict_uri, interface_uri) = (prediction.uri(), interface.uri());

    let output = tokio::task::spawn_blocking(move || {
        let dir = TestDir::new();
        sandcalc(&dir)
            .args(["run", "--json", "--fines", "1", "--bulk", "2"])
            .args(LOT_ARGS)
            .env("SANDCALC_PREDICT_ENDPOINT", predict_uri)
            .env("SANDCALC_INTERFACE_ENDPOINT", interface_uri)
            .env("SANDCALC_PREDICT_API_KEY", "pk")
            .env("SANDCALC_PREDICT_API_SECRET", "ps")
            .env("SANDCALC_INTERFACE_API_KEY", "ik")
            .env("SANDCALC_INTERFACE_API_SECRET", "is")
            .output()
            .expect("run binary")
    })
    .await
    .expect("join");

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let report = last_json_line(&output.stdout);
    assert_eq!(report["command"], "run");
    assert_eq!(report["data"]["prediction"]["result"]["total_sand_value"], 2.0);
    assert_eq!(report["data"]["prediction"]["display"]["alert"], false);
    assert_eq!(report["data"]["interface"]["payload"]["message"], "Interface queued");

    assert_eq!(prediction.login_bodies().await[0]["api_key"], "pk");
    assert_eq!(interface.login_bodies().await[0]["apiKey"], "ik");
}

#[tokio::test(flavor = "multi_thread")]
async fn interface_failure_exits_with_service_error() {
    let interface = MockBackend::start(ServiceKind::Interface).await;
    interface.mount_login("i").await;
    interface
        .mount_business("i", 500, json!({ "message": "SAP queue unavailable" }))
        .await;
    let uri = interface.uri();

    let output = tokio::task::spawn_blocking(move || {
        let dir = TestDir::new();
        sandcalc(&dir)
            .args(["interface", "--json"])
            .args(LOT_ARGS)
            .args(["--interface-endpoint", uri.as_str()])
            .env("SANDCALC_API_KEY", "k")
            .env("SANDCALC_API_SECRET", "s")
            .output()
            .expect("run binary")
    })
    .await
    .expect("join");

    assert_eq!(output.status.code(), Some(4));
    let error = last_json_line(&output.stderr);
    assert_eq!(error["error_code"], "SC-S001");
    assert_eq!(error["message"], "SAP queue unavailable");
    assert_eq!(error["status"], 500);
    assert_eq!(error["service"], "interface");
}
