//! CLI definition and the top-level grading entrypoint.
//!
//! Every grading input is available both as a flag and as an `INPUT_*`
//! environment variable, matching the convention workflow runners use to
//! hand inputs to an action. Inputs arrive as strings; empty or malformed
//! numeric inputs fall back to their documented defaults rather than
//! aborting, since an unset optional input reaches the process as an empty
//! string.

use clap::Parser;
use tracing::{debug, info};

use crate::output::{self, OutputTarget};
use crate::runner::{ExecEnv, GradeConfig, Grader};

/// Default per-command timeout, in minutes.
const DEFAULT_TIMEOUT_MINUTES: f64 = 10.0;

/// Default score ceiling.
const DEFAULT_MAX_SCORE: u64 = 0;

/// Autograding command runner.
#[derive(Parser)]
#[command(name = "command-grader")]
#[command(about = "Run a test command and publish a scored autograding result")]
#[command(version)]
#[command(
    long_about = "command-grader runs an optional setup command and a measured test command \
inside a constrained environment, derives a pass/fail/error status and a score, and publishes \
the result as a base64-encoded JSON record.\n\nExample usage:\n  command-grader --test-name \
'unit tests' --setup-command 'npm ci' --command 'npm test' --timeout 5 --max-score 25"
)]
pub struct Cli {
    /// Test identifier echoed into the result record.
    #[arg(long, env = "INPUT_TEST-NAME")]
    pub test_name: String,

    /// Command run before the measured command; skipped when empty.
    #[arg(long, env = "INPUT_SETUP-COMMAND", default_value = "")]
    pub setup_command: String,

    /// The measured command to grade.
    #[arg(long, env = "INPUT_COMMAND")]
    pub command: String,

    /// Per-command timeout in minutes (fractional values allowed).
    #[arg(long, env = "INPUT_TIMEOUT", default_value = "10")]
    pub timeout: String,

    /// Score awarded when the command passes.
    #[arg(long, env = "INPUT_MAX-SCORE", default_value = "0")]
    pub max_score: String,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short, long, default_value = "info")]
    pub log_level: String,
}

/// Parses CLI arguments (and their environment fallbacks).
pub fn parse_cli() -> Cli {
    Cli::parse()
}

/// Parses and runs in one step.
pub async fn run() -> anyhow::Result<()> {
    run_with_cli(parse_cli()).await
}

/// Runs a grading invocation from parsed arguments.
pub async fn run_with_cli(cli: Cli) -> anyhow::Result<()> {
    let timeout_minutes = parse_timeout_minutes(&cli.timeout);
    let max_score = parse_max_score(&cli.max_score);
    debug!(
        "Resolved inputs: timeout {} min, max score {}",
        timeout_minutes, max_score
    );

    let config = GradeConfig::new(&cli.test_name, &cli.command)
        .with_setup_command(&cli.setup_command)
        .with_timeout_minutes(timeout_minutes)
        .with_max_score(max_score);

    // Snapshot the ambient environment exactly once; the executor never
    // consults it again.
    let env = ExecEnv::from_ambient();

    let report = Grader::new(config, env).run().await?;

    let target = OutputTarget::from_ambient();
    output::publish(&report, &target)?;
    info!("Published result with status {}", report.status);

    Ok(())
}

/// Parses the timeout input, falling back to the default for empty or
/// malformed values.
fn parse_timeout_minutes(raw: &str) -> f64 {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return DEFAULT_TIMEOUT_MINUTES;
    }
    trimmed.parse().unwrap_or(DEFAULT_TIMEOUT_MINUTES)
}

/// Parses the max-score input, falling back to the default for empty or
/// malformed values.
fn parse_max_score(raw: &str) -> u64 {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return DEFAULT_MAX_SCORE;
    }
    trimmed.parse().unwrap_or(DEFAULT_MAX_SCORE)
}
