//! Shared helpers for integration tests.
//!
//! - `fixtures`: mock backends and client builders
//! - `logger`: structured per-test logging
//! - `log_capture`: assertions on tracing output

#![allow(dead_code)]

pub mod fixtures;
pub mod log_capture;
pub mod logger;
