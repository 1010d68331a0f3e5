//! Command-line interface for command-grader.
//!
//! Resolves grading inputs from flags or `INPUT_*` environment variables
//! and drives a single grading invocation.

mod commands;

pub use commands::{parse_cli, run, run_with_cli, Cli};
