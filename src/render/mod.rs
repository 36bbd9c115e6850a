//! Output rendering for human and robot modes.

pub mod error;
pub mod human;
pub mod robot;

use serde::Serialize;

use crate::cli::args::OutputFormat;
use crate::core::models::{DisplayedPrediction, InterfaceResult, LotContext, PredictionResult};
use crate::core::service::ServiceKind;
use crate::error::Result;
use crate::storage::{ConfigSource, ResolvedConfig};
use crate::util::mask_secret;

/// Outcome of `predict` for one lot.
#[derive(Debug, Clone, Serialize)]
pub struct PredictionReport {
    pub inslot: String,
    pub batch: String,
    pub result: PredictionResult,
    pub display: DisplayedPrediction,
}

impl PredictionReport {
    #[must_use]
    pub fn new(lot: &LotContext, result: PredictionResult) -> Self {
        Self {
            inslot: lot.inslot.clone(),
            batch: lot.batch.clone(),
            display: result.display(),
            result,
        }
    }
}

/// Outcome of `interface` for one lot.
#[derive(Debug, Clone, Serialize)]
pub struct InterfaceReport {
    pub inslot: String,
    pub payload: InterfaceResult,
}

impl InterfaceReport {
    #[must_use]
    pub fn new(lot: &LotContext, payload: InterfaceResult) -> Self {
        Self {
            inslot: lot.inslot.clone(),
            payload,
        }
    }
}

/// Outcome of `run`: both verbs for one lot.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub prediction: PredictionReport,
    pub interface: InterfaceReport,
}

/// Resolved settings with secrets masked.
#[derive(Debug, Clone, Serialize)]
pub struct ConfigReport {
    pub config_path: String,
    pub format: String,
    pub timeout_seconds: u64,
    pub services: Vec<ServiceReport>,
}

/// One service's resolved settings.
#[derive(Debug, Clone, Serialize)]
pub struct ServiceReport {
    pub service: ServiceKind,
    pub endpoint: Option<String>,
    pub endpoint_source: String,
    pub api_key: Option<String>,
    pub api_key_source: String,
    pub api_secret: Option<String>,
    pub api_secret_source: String,
    pub ready: bool,
    pub missing: Vec<&'static str>,
}

impl From<&ResolvedConfig> for ConfigReport {
    fn from(config: &ResolvedConfig) -> Self {
        let services = ServiceKind::ALL
            .iter()
            .map(|&service| {
                let settings = config.service(service);
                let sources = config.sources.service(service);
                ServiceReport {
                    service,
                    endpoint: Some(settings.base_url.clone()).filter(|u| !u.is_empty()),
                    endpoint_source: source_label(sources.endpoint),
                    api_key: settings.api_key.as_deref().map(mask_secret),
                    api_key_source: source_label(sources.api_key),
                    api_secret: settings.api_secret.as_deref().map(mask_secret),
                    api_secret_source: source_label(sources.api_secret),
                    ready: settings.is_ready(),
                    missing: settings.missing_fields(),
                }
            })
            .collect();

        Self {
            config_path: config.config_path.display().to_string(),
            format: match config.format {
                OutputFormat::Human => "human",
                OutputFormat::Json => "json",
            }
            .to_string(),
            timeout_seconds: config.timeout.as_secs(),
            services,
        }
    }
}

fn source_label(source: ConfigSource) -> String {
    source.to_string()
}

/// Render a prediction.
pub fn render_prediction(report: &PredictionReport, format: OutputFormat, pretty: bool, no_color: bool) -> Result<String> {
    match format {
        OutputFormat::Human => Ok(human::render_prediction(report, no_color)),
        OutputFormat::Json => robot::render("predict", report, pretty),
    }
}

/// Render an interface trigger.
pub fn render_interface(report: &InterfaceReport, format: OutputFormat, pretty: bool, no_color: bool) -> Result<String> {
    match format {
        OutputFormat::Human => Ok(human::render_interface(report, no_color)),
        OutputFormat::Json => robot::render("interface", report, pretty),
    }
}

/// Render a combined run.
pub fn render_run(report: &RunReport, format: OutputFormat, pretty: bool, no_color: bool) -> Result<String> {
    match format {
        OutputFormat::Human => Ok(format!(
            "{}\n\n{}",
            human::render_prediction(&report.prediction, no_color),
            human::render_interface(&report.interface, no_color)
        )),
        OutputFormat::Json => robot::render("run", report, pretty),
    }
}

/// Render resolved configuration.
pub fn render_config(report: &ConfigReport, format: OutputFormat, pretty: bool, no_color: bool) -> Result<String> {
    match format {
        OutputFormat::Human => Ok(human::render_config(report, no_color)),
        OutputFormat::Json => robot::render("config", report, pretty),
    }
}
