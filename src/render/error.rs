//! Error rendering for sandcalc.
//!
//! Provides colored error rendering with fix suggestions for terminals,
//! simple text output for non-TTY environments, and structured JSON.

use colored::Colorize;

use crate::cli::args::OutputFormat;
use crate::error::{FixSuggestion, SandcalcError};
use crate::util::env::{Stream, should_use_color};

// =============================================================================
// Public API
// =============================================================================

/// Render an error with appropriate formatting based on terminal capabilities.
///
/// Uses colored output if the format is Human and color is allowed on
/// stderr. Otherwise falls back to simple text output.
///
/// When format is JSON, outputs structured JSON for machine consumption.
#[must_use]
pub fn render_error(error: &SandcalcError, format: OutputFormat, no_color: bool, pretty: bool) -> String {
    match format {
        OutputFormat::Json => render_error_json(error, pretty),
        OutputFormat::Human => {
            if should_use_color(no_color, Stream::Stderr) {
                render_rich(error)
            } else {
                render_simple(error)
            }
        }
    }
}

/// Render error as structured JSON for machine consumption.
#[must_use]
pub fn render_error_json(error: &SandcalcError, pretty: bool) -> String {
    let error_json = ErrorJson::from_error(error);
    let rendered = if pretty {
        serde_json::to_string_pretty(&error_json)
    } else {
        serde_json::to_string(&error_json)
    };
    rendered.unwrap_or_else(|_| render_simple(error))
}

// =============================================================================
// Colored Terminal Rendering
// =============================================================================

fn render_rich(error: &SandcalcError) -> String {
    let suggestions = error.fix_suggestions();
    let mut lines = vec![format!(
        "{} {}",
        error.to_string().red().bold(),
        format!("[{}]", error.error_code()).dimmed()
    )];

    if !suggestions.is_empty() {
        lines.push(String::new());
        lines.push(render_suggestions_section(&suggestions));
    }

    if let Some(context) = suggestions.first().map(|s| &s.context)
        && !context.is_empty()
    {
        lines.push(String::new());
        lines.push("Why this happened:".yellow().to_string());
        lines.extend(wrap_text(context, 60).into_iter().map(|l| format!("  {l}")));
    }

    if let Some(prevention) = suggestions.first().and_then(|s| s.prevention.as_ref()) {
        lines.push(String::new());
        lines.push("Prevention:".green().to_string());
        lines.extend(wrap_text(prevention, 60).into_iter().map(|l| format!("  {l}")));
    }

    lines.join("\n")
}

fn render_suggestions_section(suggestions: &[FixSuggestion]) -> String {
    let mut lines = vec!["How to fix:".bold().to_string()];
    for (i, suggestion) in suggestions.iter().enumerate() {
        for (j, cmd) in suggestion.commands.iter().enumerate() {
            let prefix = if j == 0 {
                format!("  {}. ", i + 1)
            } else {
                "     Or: ".to_string()
            };
            lines.push(format!("{prefix}{}", cmd.cyan()));
        }
    }
    lines.join("\n")
}

// =============================================================================
// Simple Text Rendering
// =============================================================================

/// Render error as simple text (no ANSI codes).
fn render_simple(error: &SandcalcError) -> String {
    let suggestions = error.fix_suggestions();
    let mut lines = vec![format!("Error [{}]: {}", error.error_code(), error)];

    // First real command; comments are skipped.
    if let Some(cmd) = suggestions
        .first()
        .and_then(|s| s.commands.iter().find(|c| !c.starts_with('#')))
    {
        lines.push(format!("Fix: {cmd}"));
    }

    lines.join("\n")
}

// =============================================================================
// JSON Rendering
// =============================================================================

/// JSON representation of an error for machine consumption.
#[derive(serde::Serialize)]
struct ErrorJson {
    error_code: String,
    category: String,
    message: String,
    is_retryable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    service: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    status: Option<u16>,
    suggestions: Vec<SuggestionJson>,
}

#[derive(serde::Serialize)]
struct SuggestionJson {
    commands: Vec<String>,
    context: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    prevention: Option<String>,
}

impl ErrorJson {
    fn from_error(error: &SandcalcError) -> Self {
        let status = match error {
            SandcalcError::Access(access) => access.status,
            _ => None,
        };
        Self {
            error_code: error.error_code().to_string(),
            category: error.category().to_string(),
            message: error.to_string(),
            is_retryable: error.is_retryable(),
            service: error.service().map(|s| s.cli_name().to_string()),
            status,
            suggestions: error
                .fix_suggestions()
                .into_iter()
                .map(|s| SuggestionJson {
                    commands: s.commands,
                    context: s.context,
                    prevention: s.prevention,
                })
                .collect(),
        }
    }
}

// =============================================================================
// Helpers
// =============================================================================

fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current_line = String::new();

    for word in text.split_whitespace() {
        if current_line.is_empty() {
            current_line = word.to_string();
        } else if current_line.len() + 1 + word.len() <= width {
            current_line.push(' ');
            current_line.push_str(word);
        } else {
            lines.push(std::mem::take(&mut current_line));
            current_line = word.to_string();
        }
    }

    if !current_line.is_empty() || lines.is_empty() {
        lines.push(current_line);
    }

    lines
}

// =============================================================================
// Tests
// =============================================================================
