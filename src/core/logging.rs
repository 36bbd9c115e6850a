//! Log subscriber setup.
//!
//! Logs go to stderr (or `SANDCALC_LOG_FILE`) so that stdout carries only
//! command output. Tokens are never logged; the access layer records
//! `service` and `fingerprint` fields instead, and the JSON format lifts
//! those fields to the top level of each line.

use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;

use tracing::{Level, Subscriber};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::fmt::writer::BoxMakeWriter;

use crate::util::env::{Stream, color_enabled};

pub const LOG_LEVEL_ENV: &str = "SANDCALC_LOG";
pub const LOG_FORMAT_ENV: &str = "SANDCALC_LOG_FORMAT";
pub const LOG_FILE_ENV: &str = "SANDCALC_LOG_FILE";

/// Level used when neither `--log-level` nor `SANDCALC_LOG` is given.
pub const DEFAULT_LEVEL: Level = Level::WARN;

/// Log line format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Plain `LEVEL message key=value` lines.
    #[default]
    Human,
    /// One JSON object per event, fields flattened.
    Json,
}

impl LogFormat {
    fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "human" => Some(Self::Human),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// Resolved logging settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSettings {
    pub level: Level,
    pub format: LogFormat,
    pub file: Option<PathBuf>,
    /// Whether ANSI colors may be used when writing to stderr.
    pub ansi: bool,
}

impl LogSettings {
    /// Resolve settings from CLI flags and an environment lookup.
    ///
    /// `--log-level` beats `SANDCALC_LOG`; `--json-output` beats
    /// `SANDCALC_LOG_FORMAT`. `--verbose` raises the level to at least debug.
    /// Unparseable or blank values are ignored.
    pub fn resolve<F>(cli_level: Option<&str>, json_output: bool, verbose: bool, env: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = |key: &str| env(key).filter(|v| !v.trim().is_empty());

        let mut level = cli_level
            .and_then(parse_level)
            .or_else(|| env(LOG_LEVEL_ENV).as_deref().and_then(parse_level))
            .unwrap_or(DEFAULT_LEVEL);
        if verbose && level < Level::DEBUG {
            level = Level::DEBUG;
        }

        let format = if json_output {
            LogFormat::Json
        } else {
            env(LOG_FORMAT_ENV)
                .as_deref()
                .and_then(LogFormat::parse)
                .unwrap_or_default()
        };

        let file = env(LOG_FILE_ENV).map(|p| PathBuf::from(p.trim()));
        let ansi = file.is_none() && color_enabled(false, Stream::Stderr.is_terminal(), &env);

        Self {
            level,
            format,
            file,
            ansi,
        }
    }

    /// Default filter: `sandcalc` at the resolved level, everything else off.
    #[must_use]
    pub fn filter(&self) -> EnvFilter {
        EnvFilter::new(format!("sandcalc={}", self.level.as_str().to_ascii_lowercase()))
    }
}

/// Parse a level name (`trace` .. `error`, case-insensitive).
#[must_use]
pub fn parse_level(s: &str) -> Option<Level> {
    s.trim().parse().ok()
}

/// Build the subscriber for `settings`, writing to `writer`.
pub fn subscriber<W>(settings: &LogSettings, filter: EnvFilter, writer: W) -> Box<dyn Subscriber + Send + Sync>
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_target(false);

    match settings.format {
        LogFormat::Json => Box::new(
            builder
                .json()
                .flatten_event(true)
                .with_current_span(false)
                .with_span_list(false)
                .finish(),
        ),
        LogFormat::Human => Box::new(builder.with_ansi(settings.ansi).without_time().finish()),
    }
}

/// Install the global subscriber. `RUST_LOG` overrides the level filter.
///
/// A log file that cannot be opened falls back to stderr. Repeated calls are
/// no-ops.
pub fn init(settings: &LogSettings) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| settings.filter());

    let file = settings.file.as_ref().and_then(|path| {
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .ok()
    });
    let writer = match file {
        Some(file) => BoxMakeWriter::new(Mutex::new(file)),
        None => BoxMakeWriter::new(std::io::stderr),
    };

    tracing::subscriber::set_global_default(subscriber(settings, filter, writer)).ok();
}
