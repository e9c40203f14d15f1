//! Outcome status shared by response events.

use serde::{Deserialize, Serialize};

/// Terminal outcome of an asynchronous operation.
///
/// Serializes as `"SUCCESS"` / `"FAILED"` on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventStatus {
    /// The operation completed.
    Success,
    /// The operation failed; the event's `failure_reason` says why.
    Failed,
}

impl EventStatus {
    /// Whether this status reports success.
    #[must_use]
    pub fn is_success(self) -> bool {
        matches!(self, Self::Success)
    }
}

impl std::fmt::Display for EventStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Success => write!(f, "SUCCESS"),
            Self::Failed => write!(f, "FAILED"),
        }
    }
}
