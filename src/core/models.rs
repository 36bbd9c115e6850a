//! Lot and measurement data exchanged with the two services.

use serde::{Deserialize, Serialize};

use crate::error::{AccessError, AccessResult};
use crate::util::format::format_measure;

/// `total_sand_value` above this is flagged for the operator.
pub const TOTAL_SAND_ALERT_THRESHOLD: f64 = 3.0;

/// Identifying fields of one physical lot, as produced by the scan/entry step.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LotContext {
    pub queue: String,
    pub date_receive: String,
    pub inslot: String,
    pub batch: String,
    pub plant: String,
    pub material: String,
    pub vendor: String,
    pub operationno: String,
}

/// Body of `POST /sand-predict`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionRequest {
    pub inslot: String,
    pub material: String,
    pub batch: String,
    pub plant: String,
    pub operationno: String,
    pub month: u8,
    pub vendor: String,
    pub fines: f64,
    pub bulk: f64,
}

impl PredictionRequest {
    /// Validate operator input and build the request.
    ///
    /// Nothing here touches the network; every failure is an input error.
    pub fn from_lot(lot: &LotContext, fines: &str, bulk: &str) -> AccessResult<Self> {
        let month = parse_month(&lot.date_receive)?;
        let fines = parse_measurement(fines)?;
        let bulk = parse_measurement(bulk)?;

        Ok(Self {
            inslot: lot.inslot.clone(),
            material: lot.material.clone(),
            batch: lot.batch.clone(),
            plant: lot.plant.clone(),
            operationno: lot.operationno.clone(),
            month,
            vendor: lot.vendor.clone(),
            fines,
            bulk,
        })
    }
}

/// Parse the month out of a `YYYY.MM.DD` date.
pub fn parse_month(date_receive: &str) -> AccessResult<u8> {
    let parts: Vec<&str> = date_receive.trim().split('.').collect();
    if parts.len() != 3 {
        return Err(AccessError::input(
            "Invalid date format. Please use YYYY.MM.DD format.",
        ));
    }
    match parts[1].trim().parse::<u8>() {
        Ok(month) if (1..=12).contains(&month) => Ok(month),
        _ => Err(AccessError::input(format!(
            "Invalid month '{}' in date '{date_receive}'",
            parts[1]
        ))),
    }
}

/// Parse a fines/bulk reading: a finite, non-negative decimal.
pub fn parse_measurement(raw: &str) -> AccessResult<f64> {
    let invalid = || AccessError::input("Please enter valid fines and bulk values.");
    let value: f64 = raw.trim().parse().map_err(|_| invalid())?;
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(invalid())
    }
}

/// Validated prediction output, at full precision.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PredictionResult {
    pub sand_predict_value: f64,
    pub total_sand_value: f64,
    pub phys0001: f64,
    pub chem0010: f64,
    pub chem0013: f64,
}

impl PredictionResult {
    #[must_use]
    pub fn exceeds_alert_threshold(&self) -> bool {
        self.total_sand_value > TOTAL_SAND_ALERT_THRESHOLD
    }

    /// Values rounded to two decimals for display.
    #[must_use]
    pub fn display(&self) -> DisplayedPrediction {
        DisplayedPrediction {
            sand_predict_value: format_measure(self.sand_predict_value),
            total_sand_value: format_measure(self.total_sand_value),
            phys0001: format_measure(self.phys0001),
            chem0010: format_measure(self.chem0010),
            chem0013: format_measure(self.chem0013),
            alert: self.exceeds_alert_threshold(),
        }
    }
}

/// [`PredictionResult`] formatted for an operator screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayedPrediction {
    pub sand_predict_value: String,
    pub total_sand_value: String,
    pub phys0001: String,
    pub chem0010: String,
    pub chem0013: String,
    pub alert: bool,
}

/// Body of `POST /interfaces/physical-data`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InterfaceRequest {
    pub inslot: String,
    pub batch: String,
    pub material: String,
    pub plant: String,
    pub operationno: String,
}

impl From<&LotContext> for InterfaceRequest {
    fn from(lot: &LotContext) -> Self {
        Self {
            inslot: lot.inslot.clone(),
            batch: lot.batch.clone(),
            material: lot.material.clone(),
            plant: lot.plant.clone(),
            operationno: lot.operationno.clone(),
        }
    }
}

/// Success payload of the interface service, passed through untouched.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct InterfaceResult(pub serde_json::Value);

impl InterfaceResult {
    /// Optional `message` the service attached to its success payload.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.0.get("message").and_then(serde_json::Value::as_str)
    }
}
