//! Command execution and grading for a single invocation.
//!
//! ```text
//! GradeConfig + ExecEnv → CommandExecutor → fault classification → ReportEnvelope
//! ```
//!
//! The runner:
//! 1. Runs the optional setup command (faults here abort the invocation)
//! 2. Runs the measured command under the timeout, streaming and capturing
//!    its output
//! 3. Classifies any measured-command fault into a status and message
//! 4. Hands the outcome to the result synthesizer
//!
//! # Example
//!
//! ```ignore
//! use command_grader::runner::{ExecEnv, GradeConfig, Grader};
//!
//! let config = GradeConfig::new("unit tests", "npm test")
//!     .with_setup_command("npm ci")
//!     .with_timeout_minutes(5.0)
//!     .with_max_score(25);
//!
//! let report = Grader::new(config, ExecEnv::from_ambient()).run().await?;
//! println!("{}: {}", report.status, report.tests[0].score);
//! ```

pub mod classify;
pub mod config;
pub mod executor;
pub mod grader;
pub mod outcome;

pub use config::{ExecEnv, GradeConfig};
pub use executor::{CommandExecutor, MeasuredRun};
pub use grader::Grader;
pub use outcome::ExecutionOutcome;
