//! Result synthesis: turning an execution outcome into the report envelope
//! consumed by the grading orchestrator.
//!
//! The envelope shape is a fixed wire contract: a schema version tag, an
//! overall status and max score, and a single-element `tests` array (one
//! invocation grades exactly one named check). `filename` and `line_no` are
//! reserved placeholders and always emitted empty/zero.

pub mod score;

use serde::{Deserialize, Serialize};

/// Schema version tag carried by every envelope.
pub const REPORT_VERSION: u32 = 1;

/// Outcome classification for a graded check.
///
/// `Fail` means the command ran to completion and did not pass; `Error`
/// means grading itself could not complete normally (timeout, missing
/// executable, unclassified fault).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestStatus {
    /// Command exited cleanly.
    Pass,
    /// Command ran but returned a failing exit status.
    Fail,
    /// Grading could not complete (timeout, missing binary, other fault).
    Error,
}

impl TestStatus {
    /// Returns true for the passing outcome.
    pub fn is_pass(&self) -> bool {
        matches!(self, TestStatus::Pass)
    }
}

impl std::fmt::Display for TestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TestStatus::Pass => write!(f, "pass"),
            TestStatus::Fail => write!(f, "fail"),
            TestStatus::Error => write!(f, "error"),
        }
    }
}

/// Per-test record inside the envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestReport {
    /// Test identifier, echoed from configuration.
    pub name: String,
    /// Outcome classification.
    pub status: TestStatus,
    /// Derived score.
    pub score: u64,
    /// Captured output (pass) or classified error description (fail/error).
    pub message: String,
    /// The measured command, echoed from configuration.
    pub test_code: String,
    /// Reserved for per-line attribution; always empty.
    pub filename: String,
    /// Reserved for per-line attribution; always zero.
    pub line_no: u32,
    /// Measured-command wall-clock duration in milliseconds.
    pub duration: u64,
}

/// The complete result record published to the orchestrator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportEnvelope {
    /// Schema version, always [`REPORT_VERSION`].
    pub version: u32,
    /// Overall status (same as the single test's status).
    pub status: TestStatus,
    /// Score ceiling supplied by configuration.
    pub max_score: u64,
    /// Exactly one per-test record.
    pub tests: Vec<TestReport>,
}

/// Builds the result envelope from a fully-formed execution outcome.
///
/// The score defaults to `max_score` on pass and `0` otherwise. On pass, a
/// summary line of the shape `<passed> of <total> ... passed` anywhere in
/// the message grants partial credit instead: `round(passed / total *
/// max_score)`. A `total` of zero leaves the default in place. `passed`
/// greater than `total` is not clamped; the overshoot is visible to
/// consumers.
pub fn synthesize(
    status: TestStatus,
    test_name: &str,
    command: &str,
    message: &str,
    duration_millis: u64,
    max_score: u64,
) -> ReportEnvelope {
    let mut score = if status.is_pass() { max_score } else { 0 };

    if status.is_pass() {
        if let Some((passed, total)) = score::extract_pass_counts(message) {
            if total > 0 {
                score = ((passed as f64 / total as f64) * max_score as f64).round() as u64;
            }
        }
    }

    ReportEnvelope {
        version: REPORT_VERSION,
        status,
        max_score,
        tests: vec![TestReport {
            name: test_name.to_string(),
            status,
            score,
            message: message.to_string(),
            test_code: command.to_string(),
            filename: String::new(),
            line_no: 0,
            duration: duration_millis,
        }],
    }
}
