//! Test utilities for sandcalc.
//!
//! Provides shared helpers, test data factories, and assertion macros
//! for use across all test modules.
//!
//! # Usage
//!
//! ```rust,ignore
//! use sandcalc::test_utils::*;
//!
//! let lot = make_test_lot_context();
//! let body = make_test_prediction_body(1.25, 2.5);
//! let dir = TestDir::new();
//! dir.create_file("config.toml", &make_test_config_toml("http://127.0.0.1:1"));
//! ```

use std::fs;
use std::io::Write as IoWrite;
use std::path::{Path, PathBuf};

use serde_json::{Value, json};

use crate::core::models::{LotContext, PredictionResult};
use crate::core::service::{ServiceConfig, ServiceKind};

// =============================================================================
// Test Data Factories
// =============================================================================

/// API key used by every test service config.
pub const TEST_API_KEY: &str = "test-api-key";
/// API secret used by every test service config.
pub const TEST_API_SECRET: &str = "test-api-secret";

/// Create a well-formed `LotContext` received on 2024.03.15.
#[must_use]
pub fn make_test_lot_context() -> LotContext {
    make_test_lot_context_with_date("2024.03.15")
}

/// Create a `LotContext` with the given receive date.
#[must_use]
pub fn make_test_lot_context_with_date(date_receive: &str) -> LotContext {
    LotContext {
        queue: "Q-017".to_string(),
        date_receive: date_receive.to_string(),
        inslot: "890000012345".to_string(),
        batch: "B240315".to_string(),
        plant: "1100".to_string(),
        material: "RM-CASSAVA-01".to_string(),
        vendor: "V000123".to_string(),
        operationno: "0010".to_string(),
    }
}

/// Create settings for `service` at `base_url` with the test credentials.
#[must_use]
pub fn make_test_service_config(service: ServiceKind, base_url: &str) -> ServiceConfig {
    ServiceConfig::new(service, base_url).with_credentials(TEST_API_KEY, TEST_API_SECRET)
}

/// Create a prediction service response body.
///
/// `phys0001`, `chem0010` and `chem0013` are fixed at 10.5, 0.42 and 1.8.
#[must_use]
pub fn make_test_prediction_body(sand_predict_value: f64, total_sand_value: f64) -> Value {
    json!({
        "result": {
            "result_info": {
                "sand_predict_value": sand_predict_value,
                "total_sand_value": total_sand_value
            },
            "mic_result_info": {
                "phys0001": 10.5,
                "chem0010": 0.42,
                "chem0013": 1.8
            }
        }
    })
}

/// The `PredictionResult` that [`make_test_prediction_body`] validates to.
#[must_use]
pub fn make_test_prediction_result(sand_predict_value: f64, total_sand_value: f64) -> PredictionResult {
    PredictionResult {
        sand_predict_value,
        total_sand_value,
        phys0001: 10.5,
        chem0010: 0.42,
        chem0013: 1.8,
    }
}

/// Create a login response body carrying `access_token`.
#[must_use]
pub fn make_test_login_body(access_token: &str) -> Value {
    json!({
        "accessToken": access_token,
        "refreshToken": format!("{access_token}-refresh")
    })
}

/// Create sample config TOML content pointing both services at `base_url`.
#[must_use]
pub fn make_test_config_toml(base_url: &str) -> String {
    format!(
        r#"[general]
timeout_seconds = 5
log_level = "info"

[prediction]
endpoint = "{base_url}"
api_key = "{TEST_API_KEY}"
api_secret = "{TEST_API_SECRET}"

[interface]
endpoint = "{base_url}"
api_key = "{TEST_API_KEY}"
api_secret = "{TEST_API_SECRET}"

[output]
format = "human"
color = false
pretty = false
"#
    )
}

// =============================================================================
// Temp Directory Utilities
// =============================================================================

/// A temporary directory for tests with automatic cleanup.
///
/// Creates an isolated directory that is automatically deleted when
/// the `TestDir` is dropped. Uses the `tempfile` crate internally.
pub struct TestDir {
    inner: tempfile::TempDir,
}

impl TestDir {
    /// Create a new isolated temporary directory.
    ///
    /// # Panics
    ///
    /// Panics if the temporary directory cannot be created.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: tempfile::tempdir().expect("Failed to create temp directory"),
        }
    }

    /// Get the path to the temporary directory.
    #[must_use]
    pub fn path(&self) -> &Path {
        self.inner.path()
    }

    /// Create a file in the temporary directory with the given content.
    ///
    /// # Panics
    ///
    /// Panics if the file cannot be created or written.
    pub fn create_file(&self, name: &str, content: &str) -> PathBuf {
        let path = self.inner.path().join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent directories");
        }
        let mut file = fs::File::create(&path).expect("Failed to create test file");
        file.write_all(content.as_bytes())
            .expect("Failed to write test file");
        path
    }

    /// Get the full path to a file in the temporary directory.
    #[must_use]
    pub fn file_path(&self, name: &str) -> PathBuf {
        self.inner.path().join(name)
    }
}

impl Default for TestDir {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Assertion Macros
// =============================================================================

/// Assert that a string contains a substring.
#[macro_export]
macro_rules! assert_contains {
    ($haystack:expr, $needle:expr) => {
        let haystack = $haystack;
        let needle = $needle;
        assert!(
            haystack.contains(needle),
            "Expected string to contain {:?}\n\nActual string:\n{:?}",
            needle,
            haystack
        );
    };
}

/// Assert that a string does NOT contain a substring.
#[macro_export]
macro_rules! assert_not_contains {
    ($haystack:expr, $needle:expr) => {
        let haystack = $haystack;
        let needle = $needle;
        assert!(
            !haystack.contains(needle),
            "Expected string NOT to contain {:?}\n\nActual string:\n{:?}",
            needle,
            haystack
        );
    };
}

/// Assert that a string is valid JSON.
#[macro_export]
macro_rules! assert_json_valid {
    ($json:expr) => {
        let json = $json;
        if let Err(e) = serde_json::from_str::<serde_json::Value>(json) {
            panic!("Expected valid JSON, but parsing failed: {}\n\nJSON string:\n{}", e, json);
        }
    };
}

/// Assert that a string does NOT contain ANSI escape codes.
#[macro_export]
macro_rules! assert_no_ansi_codes {
    ($text:expr) => {
        let text = $text;
        assert!(
            !$crate::test_utils::has_ansi_codes(text),
            "Expected string to NOT contain ANSI escape codes.\n\nActual string:\n{:?}",
            text
        );
    };
}

// =============================================================================
// Test Helpers
// =============================================================================

/// Check if a string contains ANSI escape sequences.
#[must_use]
pub fn has_ansi_codes(text: &str) -> bool {
    text.contains('\x1b')
}
