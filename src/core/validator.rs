//! Business payload validation.
//!
//! A validator turns a [`RawResponse`] into the typed result handed back to the
//! caller, or fails with a validation error naming what was wrong.

use serde_json::Value;

use crate::core::http::RawResponse;
use crate::core::models::{InterfaceResult, PredictionResult};
use crate::core::service::ServiceKind;
use crate::error::{AccessError, AccessResult};

/// Checks one service's business response.
pub trait ResponseValidator: Send + Sync {
    /// Service whose responses this validator understands.
    const SERVICE: ServiceKind;

    /// Typed result of a valid response.
    type Output;

    /// Validate `response` and extract its result.
    fn validate(&self, response: &RawResponse) -> AccessResult<Self::Output>;
}

/// Extracts the five prediction figures at full precision.
#[derive(Debug, Clone, Copy, Default)]
pub struct PredictionValidator;

impl ResponseValidator for PredictionValidator {
    const SERVICE: ServiceKind = ServiceKind::Prediction;
    type Output = PredictionResult;

    fn validate(&self, response: &RawResponse) -> AccessResult<PredictionResult> {
        let response = response.clone().ensure_success(Self::SERVICE)?;
        let body: Value = response.json(Self::SERVICE)?;

        let result = section(&body, &["result"])?;
        let result_info = section(result, &["result", "result_info"])?;
        let mic_info = section(result, &["result", "mic_result_info"])?;

        Ok(PredictionResult {
            sand_predict_value: number(result_info, "result.result_info", "sand_predict_value")?,
            total_sand_value: number(result_info, "result.result_info", "total_sand_value")?,
            phys0001: number(mic_info, "result.mic_result_info", "phys0001")?,
            chem0010: number(mic_info, "result.mic_result_info", "chem0010")?,
            chem0013: number(mic_info, "result.mic_result_info", "chem0013")?,
        })
    }
}

/// Passes the interface service's success payload through unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct InterfaceValidator;

impl ResponseValidator for InterfaceValidator {
    const SERVICE: ServiceKind = ServiceKind::Interface;
    type Output = InterfaceResult;

    fn validate(&self, response: &RawResponse) -> AccessResult<InterfaceResult> {
        let response = response.clone().ensure_success(Self::SERVICE)?;
        if response.body.iter().all(u8::is_ascii_whitespace) {
            return Ok(InterfaceResult(Value::Null));
        }
        // Not every deployment answers with JSON.
        let payload = serde_json::from_slice(&response.body)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&response.body).into_owned()));
        Ok(InterfaceResult(payload))
    }
}

/// Object at `path` (the last element is looked up in `parent`).
fn section<'a>(parent: &'a Value, path: &[&str]) -> AccessResult<&'a Value> {
    let key = path.last().copied().unwrap_or_default();
    match parent.get(key) {
        Some(value) if value.is_object() => Ok(value),
        Some(_) => Err(AccessError::validation(
            ServiceKind::Prediction,
            format!("field '{}' is not an object", path.join(".")),
        )),
        None => Err(AccessError::validation(
            ServiceKind::Prediction,
            format!("field '{}' is missing", path.join(".")),
        )),
    }
}

/// Coerce `parent[key]` to a finite `f64`. Numeric strings are accepted.
fn number(parent: &Value, prefix: &str, key: &str) -> AccessResult<f64> {
    let field = format!("{prefix}.{key}");
    let invalid = |what: String| AccessError::validation(ServiceKind::Prediction, what);

    let value = match parent.get(key) {
        None | Some(Value::Null) => return Err(invalid(format!("field '{field}' is missing"))),
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        Some(_) => None,
    };

    match value {
        Some(v) if v.is_finite() => Ok(v),
        _ => Err(invalid(format!(
            "field '{field}' is not a finite number: {}",
            parent[key]
        ))),
    }
}
