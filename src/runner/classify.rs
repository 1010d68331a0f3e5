//! Classification of measured-command faults into a reportable status.
//!
//! Infrastructural failures (timeout, missing binary, anything opaque) are
//! reported as `error`: grading could not complete normally. A command that
//! ran and exited non-zero is reported as `fail`: the test ran and did not
//! pass. The priority order and the exact message strings are a wire
//! contract with existing consumers and must not change.

use crate::error::ExecError;
use crate::report::TestStatus;

/// Message published for a timed-out measured command.
pub const TIMEOUT_MESSAGE: &str = "Command timed out";

/// Message published for a failing exit status. The code is fixed at 1
/// regardless of the true exit code; consumers depend on the exact string.
pub const EXIT_FAILURE_MESSAGE: &str = "failed with exit code 1";

/// Maps a structured fault to the `(status, message)` pair published in the
/// result record. `command` is the configured command string, interpolated
/// into the missing-executable message.
pub fn classify(fault: &ExecError, command: &str) -> (TestStatus, String) {
    match fault {
        ExecError::Timeout { .. } => (TestStatus::Error, TIMEOUT_MESSAGE.to_string()),
        ExecError::NotFound { command } => (TestStatus::Error, not_found_message(command)),
        ExecError::NonZeroExit { .. } => (TestStatus::Fail, EXIT_FAILURE_MESSAGE.to_string()),
        ExecError::Io(e) => classify_text(&e.to_string(), command),
    }
}

/// Fallback for faults the platform left unstructured: match the legacy
/// substring markers in the same priority order, passing unrecognized text
/// through verbatim for diagnostic visibility.
fn classify_text(text: &str, command: &str) -> (TestStatus, String) {
    if text.contains("ETIMEDOUT") {
        (TestStatus::Error, TIMEOUT_MESSAGE.to_string())
    } else if text.contains("command not found") {
        (TestStatus::Error, not_found_message(command))
    } else if text.contains("Command failed") {
        (TestStatus::Fail, EXIT_FAILURE_MESSAGE.to_string())
    } else {
        (TestStatus::Error, text.to_string())
    }
}

fn not_found_message(command: &str) -> String {
    format!("Unable to locate executable file: {}", command)
}
