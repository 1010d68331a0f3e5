//! Grading orchestration: setup, measured run, classification, synthesis.

use tracing::{error, info};

use crate::error::GraderError;
use crate::report::{self, ReportEnvelope, TestStatus};

use super::classify::classify;
use super::config::{ExecEnv, GradeConfig};
use super::executor::CommandExecutor;
use super::outcome::ExecutionOutcome;

/// Runs one grading invocation end to end.
///
/// Setup faults propagate out as [`GraderError::Setup`] and no result record
/// is produced for them. Every measured-command fault is absorbed here and
/// turned into a `fail`/`error` report instead.
pub struct Grader {
    config: GradeConfig,
    env: ExecEnv,
}

impl Grader {
    /// Creates a grader from a resolved configuration and environment overlay.
    pub fn new(config: GradeConfig, env: ExecEnv) -> Self {
        Self { config, env }
    }

    /// Runs setup and the measured command, returning the result envelope.
    pub async fn run(&self) -> Result<ReportEnvelope, GraderError> {
        info!("Starting grading run for '{}'", self.config.test_name);

        let executor = CommandExecutor::new(self.env.clone(), self.config.timeout);

        if let Some(setup) = &self.config.setup_command {
            executor.run_setup(setup).await.map_err(|e| {
                error!("Setup command failed: {}", e);
                GraderError::Setup(e.to_string())
            })?;
        }

        info!("Executing command: {}", self.config.command);
        let run = executor.run_measured(&self.config.command).await;

        let (status, outcome) = match run.result {
            Ok(captured) => (
                TestStatus::Pass,
                ExecutionOutcome::success(captured, run.started_at, run.finished_at),
            ),
            Err(fault) => {
                let (status, message) = classify(&fault, &self.config.command);
                info!("Command fault classified as {}: {}", status, message);
                (
                    status,
                    ExecutionOutcome::failure(message, run.started_at, run.finished_at),
                )
            }
        };

        info!("Generating result");
        Ok(report::synthesize(
            status,
            &self.config.test_name,
            &self.config.command,
            &outcome.captured_text,
            outcome.duration_millis(),
            self.config.max_score,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grader(config: GradeConfig) -> Grader {
        Grader::new(config, ExecEnv::from_ambient())
    }

    #[tokio::test]
    async fn test_passing_command_gets_full_score() {
        let config = GradeConfig::new("smoke", "echo hello").with_max_score(10);
        let report = grader(config).run().await.unwrap();
        assert_eq!(report.status, TestStatus::Pass);
        assert_eq!(report.tests[0].score, 10);
        assert_eq!(report.tests[0].message, "hello\n");
    }

    #[tokio::test]
    async fn test_summary_line_grants_partial_credit() {
        let config =
            GradeConfig::new("unit", "echo '8 of 10 tests passed'").with_max_score(20);
        let report = grader(config).run().await.unwrap();
        assert_eq!(report.status, TestStatus::Pass);
        assert_eq!(report.tests[0].score, 16);
    }

    #[tokio::test]
    async fn test_failing_command_scores_zero() {
        let config = GradeConfig::new("unit", "exit 2").with_max_score(20);
        let report = grader(config).run().await.unwrap();
        assert_eq!(report.status, TestStatus::Fail);
        assert_eq!(report.tests[0].score, 0);
        assert_eq!(report.tests[0].message, "failed with exit code 1");
    }

    #[tokio::test]
    async fn test_setup_fault_aborts_without_report() {
        let config = GradeConfig::new("unit", "echo unreachable").with_setup_command("exit 1");
        let result = grader(config).run().await;
        assert!(matches!(result, Err(GraderError::Setup(_))));
    }

    #[tokio::test]
    async fn test_absent_setup_is_skipped() {
        let config = GradeConfig::new("unit", "echo ok").with_setup_command("");
        let report = grader(config).run().await.unwrap();
        assert_eq!(report.status, TestStatus::Pass);
    }

    #[tokio::test]
    async fn test_duration_is_reported() {
        let config = GradeConfig::new("unit", "sleep 0.1 && echo done").with_max_score(1);
        let report = grader(config).run().await.unwrap();
        assert!(report.tests[0].duration >= 100);
    }
}
