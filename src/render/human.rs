//! Human-readable output using `colored`.

use colored::{ColoredString, Colorize};

use super::{ConfigReport, InterfaceReport, PredictionReport};
use crate::core::models::TOTAL_SAND_ALERT_THRESHOLD;
use crate::util::format_measure;

/// Apply `style` unless color is disabled.
fn paint(text: &str, no_color: bool, style: impl Fn(&str) -> ColoredString) -> String {
    if no_color {
        text.to_string()
    } else {
        style(text).to_string()
    }
}

/// Render a prediction for an operator.
#[must_use]
pub fn render_prediction(report: &PredictionReport, no_color: bool) -> String {
    let shown = &report.display;
    let mut lines = vec![paint(
        &format!("Prediction for lot {}", report.inslot),
        no_color,
        |s| s.bold(),
    )];

    let total = if shown.alert {
        format!(
            "{}  {}",
            paint(&shown.total_sand_value, no_color, |s| s.red().bold()),
            paint(
                &format!("above {} limit", format_measure(TOTAL_SAND_ALERT_THRESHOLD)),
                no_color,
                |s| s.red()
            )
        )
    } else {
        paint(&shown.total_sand_value, no_color, |s| s.green())
    };

    let rows = [
        ("Sand predict value", shown.sand_predict_value.clone()),
        ("Total sand value", total),
        ("PHYS0001", shown.phys0001.clone()),
        ("CHEM0010", shown.chem0010.clone()),
        ("CHEM0013", shown.chem0013.clone()),
    ];
    for (label, value) in rows {
        lines.push(format!("  {label:<20}{value}"));
    }

    lines.join("\n")
}

/// Render an interface trigger result.
#[must_use]
pub fn render_interface(report: &InterfaceReport, no_color: bool) -> String {
    let mut line = paint(
        &format!("Interface started for lot {}", report.inslot),
        no_color,
        |s| s.green(),
    );
    if let Some(message) = report.payload.message() {
        line.push_str(&format!("\n  {message}"));
    }
    line
}

/// Render resolved configuration with secrets masked.
#[must_use]
pub fn render_config(report: &ConfigReport, no_color: bool) -> String {
    let mut lines = vec![
        format!("Config file: {}", report.config_path),
        format!("Timeout:     {}s", report.timeout_seconds),
        format!("Format:      {}", report.format),
    ];

    for service in &report.services {
        lines.push(String::new());
        let status = if service.ready {
            paint("ready", no_color, |s| s.green())
        } else {
            paint(
                &format!("missing {}", service.missing.join(", ")),
                no_color,
                |s| s.yellow(),
            )
        };
        lines.push(format!(
            "{} ({status})",
            paint(service.service.display_name(), no_color, |s| s.bold())
        ));

        let unset = || paint("<not set>", no_color, |s| s.dimmed());
        let fields = [
            ("endpoint", &service.endpoint, &service.endpoint_source),
            ("api_key", &service.api_key, &service.api_key_source),
            ("api_secret", &service.api_secret, &service.api_secret_source),
        ];
        for (name, value, source) in fields {
            let value = value.clone().unwrap_or_else(unset);
            lines.push(format!(
                "  {name:<12}{value}  {}",
                paint(&format!("({source})"), no_color, |s| s.dimmed())
            ));
        }
    }

    lines.join("\n")
}
