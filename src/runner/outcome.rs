//! Execution outcome handed from the executor to the result synthesizer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What happened when the measured command ran.
///
/// `captured_text` holds the command's combined output on success, or the
/// classified error description on failure. The timestamps bound the
/// measured command only; setup time is excluded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionOutcome {
    /// Whether the measured command exited cleanly.
    pub succeeded: bool,
    /// Combined stdout/stderr text, or the classified error description.
    pub captured_text: String,
    /// Timestamp immediately before the measured command was spawned.
    pub started_at: DateTime<Utc>,
    /// Timestamp when the command exited or its fault was detected.
    pub finished_at: DateTime<Utc>,
}

impl ExecutionOutcome {
    /// Builds the outcome for a clean exit.
    pub fn success(
        captured_text: impl Into<String>,
        started_at: DateTime<Utc>,
        finished_at: DateTime<Utc>,
    ) -> Self {
        Self {
            succeeded: true,
            captured_text: captured_text.into(),
            started_at,
            finished_at,
        }
    }

    /// Builds the outcome for a classified fault.
    pub fn failure(
        message: impl Into<String>,
        started_at: DateTime<Utc>,
        finished_at: DateTime<Utc>,
    ) -> Self {
        Self {
            succeeded: false,
            captured_text: message.into(),
            started_at,
            finished_at,
        }
    }

    /// Wall-clock duration in milliseconds, clamped to non-negative.
    pub fn duration_millis(&self) -> u64 {
        (self.finished_at - self.started_at).num_milliseconds().max(0) as u64
    }
}
