//! Robot-mode output (JSON).
//!
//! Every command wraps its data in the same versioned envelope.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::Result;

/// Schema identifier carried by every JSON document.
pub const SCHEMA_VERSION: &str = "sandcalc.v1";

/// Envelope for JSON output.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RobotOutput<'a, T> {
    pub schema_version: &'static str,
    pub generated_at: DateTime<Utc>,
    pub command: &'a str,
    pub data: &'a T,
}

impl<'a, T> RobotOutput<'a, T> {
    pub fn new(command: &'a str, data: &'a T) -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            generated_at: Utc::now(),
            command,
            data,
        }
    }
}

/// Render `data` for `command` as JSON.
pub fn render<T: Serialize>(command: &str, data: &T, pretty: bool) -> Result<String> {
    let output = RobotOutput::new(command, data);
    let json = if pretty {
        serde_json::to_string_pretty(&output)?
    } else {
        serde_json::to_string(&output)?
    };
    Ok(json)
}
