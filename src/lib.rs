//! sandcalc - sand prediction client
//!
//! Talks to two independently secured services: a prediction service that
//! turns lot measurements into a sand prediction, and an interface service
//! that pushes the lot's physical data downstream. Each service has its own
//! API-key login, cached bearer token and one forced re-login on 401.

// Note: deny (not forbid) to allow #[allow(unsafe_code)] in test helpers for env var manipulation
#![deny(unsafe_code)]
#![warn(clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod cli;
pub mod core;
pub mod error;
pub mod render;
pub mod storage;
pub mod util;

/// Test utilities module - included in test builds or when test-utils feature is enabled.
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use error::{AccessError, ErrorKind, ExitCode, Result, SandcalcError};

// Re-export test utilities for external test crates
#[cfg(any(test, feature = "test-utils"))]
pub use test_utils::*;
