//! Publishing the encoded result to the orchestrator.
//!
//! The envelope is JSON-serialized, base64-encoded, and published as a
//! single output value named `result`. When running under a workflow
//! runner, outputs are appended to the file named by `GITHUB_OUTPUT`;
//! without one, the legacy `::set-output` command is emitted on stdout.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::error::GraderError;
use crate::report::ReportEnvelope;

/// Name of the published output value.
pub const OUTPUT_NAME: &str = "result";

/// Where output values are written.
#[derive(Debug, Clone)]
pub enum OutputTarget {
    /// Append `name=value` lines to this file (the `GITHUB_OUTPUT` contract).
    File(PathBuf),
    /// Emit legacy `::set-output` workflow commands on stdout.
    Stdout,
}

impl OutputTarget {
    /// Resolves the target from the ambient environment. This is the only
    /// place the publishing path consults the environment.
    pub fn from_ambient() -> Self {
        match std::env::var_os("GITHUB_OUTPUT") {
            Some(path) if !path.is_empty() => OutputTarget::File(PathBuf::from(path)),
            _ => OutputTarget::Stdout,
        }
    }
}

/// Serializes and base64-encodes the envelope.
pub fn encode_report(report: &ReportEnvelope) -> Result<String, GraderError> {
    let json = serde_json::to_string(report)?;
    Ok(STANDARD.encode(json))
}

/// Publishes the envelope as the `result` output value.
pub fn publish(report: &ReportEnvelope, target: &OutputTarget) -> Result<(), GraderError> {
    let encoded = encode_report(report)?;
    set_output(OUTPUT_NAME, &encoded, target)
}

/// Writes one output value to the target.
pub fn set_output(name: &str, value: &str, target: &OutputTarget) -> Result<(), GraderError> {
    match target {
        OutputTarget::File(path) => {
            let mut file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|e| {
                    GraderError::Publish(format!("cannot open {}: {}", path.display(), e))
                })?;
            writeln!(file, "{}={}", name, value)
                .map_err(|e| GraderError::Publish(e.to_string()))?;
        }
        OutputTarget::Stdout => {
            println!("::set-output name={}::{}", name, value);
        }
    }
    Ok(())
}
