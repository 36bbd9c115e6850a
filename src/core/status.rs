//! In-flight status of the two workflow verbs.

use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};

use serde::Serialize;

/// Lifecycle of one verb. A verb is in exactly one state at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum OperationStatus {
    Idle = 0,
    Pending = 1,
    Succeeded = 2,
    Failed = 3,
}

impl OperationStatus {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Pending => "pending",
            Self::Succeeded => "succeeded",
            Self::Failed => "failed",
        }
    }

    const fn from_u8(raw: u8) -> Self {
        match raw {
            1 => Self::Pending,
            2 => Self::Succeeded,
            3 => Self::Failed,
            _ => Self::Idle,
        }
    }
}

impl fmt::Display for OperationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Lock-free holder for an [`OperationStatus`].
#[derive(Debug)]
pub struct StatusCell(AtomicU8);

impl Default for StatusCell {
    fn default() -> Self {
        Self(AtomicU8::new(OperationStatus::Idle as u8))
    }
}

impl StatusCell {
    #[must_use]
    pub fn get(&self) -> OperationStatus {
        OperationStatus::from_u8(self.0.load(Ordering::Acquire))
    }

    pub fn set(&self, status: OperationStatus) {
        self.0.store(status as u8, Ordering::Release);
    }

    /// Record the outcome of `result`.
    pub fn finish<T, E>(&self, result: &Result<T, E>) {
        self.set(if result.is_ok() {
            OperationStatus::Succeeded
        } else {
            OperationStatus::Failed
        });
    }
}
