//! Terminal capability detection.

use std::io::IsTerminal;

/// Output stream a color decision is made for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stream {
    /// Command output.
    Stdout,
    /// Logs and errors.
    Stderr,
}

impl Stream {
    #[must_use]
    pub fn is_terminal(self) -> bool {
        match self {
            Self::Stdout => std::io::stdout().is_terminal(),
            Self::Stderr => std::io::stderr().is_terminal(),
        }
    }
}

/// Decide whether to color a stream.
///
/// Color is off when `no_color_flag` is set, `NO_COLOR` is present (any
/// value), `TERM` is `dumb`, or the stream is not a terminal.
pub fn color_enabled<F>(no_color_flag: bool, is_terminal: bool, env: F) -> bool
where
    F: Fn(&str) -> Option<String>,
{
    !no_color_flag
        && env("NO_COLOR").is_none()
        && env("TERM").is_none_or(|term| term != "dumb")
        && is_terminal
}

/// Color decision for `stream` against the process environment.
#[must_use]
pub fn should_use_color(no_color_flag: bool, stream: Stream) -> bool {
    color_enabled(no_color_flag, stream.is_terminal(), |key| std::env::var(key).ok())
}
