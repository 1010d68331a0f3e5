//! Configuration for a grading run.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default per-command timeout when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(600);

/// Configuration for grading a single command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradeConfig {
    /// Test identifier echoed into the result record.
    pub test_name: String,
    /// Optional command run before the measured command. `None` skips setup.
    pub setup_command: Option<String>,
    /// The measured command being graded.
    pub command: String,
    /// Timeout applied independently to the setup and measured commands.
    pub timeout: Duration,
    /// Ceiling for the derived score.
    pub max_score: u64,
}

impl GradeConfig {
    /// Creates a configuration with defaults (no setup, 10 minute timeout,
    /// zero max score).
    pub fn new(test_name: impl Into<String>, command: impl Into<String>) -> Self {
        Self {
            test_name: test_name.into(),
            setup_command: None,
            command: command.into(),
            timeout: DEFAULT_TIMEOUT,
            max_score: 0,
        }
    }

    /// Sets the setup command. An empty or whitespace-only command is
    /// normalized to absent.
    pub fn with_setup_command(mut self, command: impl Into<String>) -> Self {
        let command = command.into();
        self.setup_command = if command.trim().is_empty() {
            None
        } else {
            Some(command)
        };
        self
    }

    /// Sets the per-command timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the per-command timeout from minutes, as supplied by the
    /// orchestrator. Non-finite or non-positive values fall back to zero
    /// seconds rather than panicking in `Duration` construction.
    pub fn with_timeout_minutes(self, minutes: f64) -> Self {
        let secs = minutes * 60.0;
        let secs = if secs.is_finite() && secs > 0.0 { secs } else { 0.0 };
        self.with_timeout(Duration::from_secs_f64(secs))
    }

    /// Sets the maximum score.
    pub fn with_max_score(mut self, max_score: u64) -> Self {
        self.max_score = max_score;
        self
    }
}

/// The environment overlay handed to child processes.
///
/// This is the *only* environment children see: `PATH` and `HOME` are
/// snapshotted from the ambient environment when the overlay is built, plus
/// fixed markers that force color output and keep invoked tooling from
/// touching the real home directory. Ambient variables not listed here are
/// not inherited. The overlay is constructed once per invocation and passed
/// by value into the executor; nothing in the execution path reads the
/// ambient environment directly.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExecEnv {
    vars: Vec<(String, String)>,
}

impl ExecEnv {
    /// Builds the overlay from the ambient process environment.
    pub fn from_ambient() -> Self {
        let mut env = Self::default();
        for key in ["PATH", "HOME"] {
            if let Ok(value) = std::env::var(key) {
                env.vars.push((key.to_string(), value));
            }
        }
        env.with_var("FORCE_COLOR", "true")
            .with_var("DOTNET_CLI_HOME", "/tmp")
            .with_var("DOTNET_NOLOGO", "true")
    }

    /// Adds a variable to the overlay.
    pub fn with_var(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.push((key.into(), value.into()));
        self
    }

    /// Iterates the overlay as key/value pairs.
    pub fn vars(&self) -> impl Iterator<Item = (&str, &str)> {
        self.vars.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Looks up a variable in the overlay.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grade_config_defaults() {
        let config = GradeConfig::new("smoke", "echo hello");
        assert_eq!(config.test_name, "smoke");
        assert_eq!(config.command, "echo hello");
        assert!(config.setup_command.is_none());
        assert_eq!(config.timeout, Duration::from_secs(600));
        assert_eq!(config.max_score, 0);
    }

    #[test]
    fn test_grade_config_builder() {
        let config = GradeConfig::new("unit", "npm test")
            .with_setup_command("npm ci")
            .with_timeout(Duration::from_secs(60))
            .with_max_score(25);
        assert_eq!(config.setup_command.as_deref(), Some("npm ci"));
        assert_eq!(config.timeout, Duration::from_secs(60));
        assert_eq!(config.max_score, 25);
    }

    #[test]
    fn test_empty_setup_command_is_skipped() {
        let config = GradeConfig::new("t", "c").with_setup_command("");
        assert!(config.setup_command.is_none());

        let config = GradeConfig::new("t", "c").with_setup_command("   ");
        assert!(config.setup_command.is_none());
    }

    #[test]
    fn test_timeout_minutes_conversion() {
        let config = GradeConfig::new("t", "c").with_timeout_minutes(2.0);
        assert_eq!(config.timeout, Duration::from_secs(120));

        // Fractional minutes are supported for short-lived checks.
        let config = GradeConfig::new("t", "c").with_timeout_minutes(0.5);
        assert_eq!(config.timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_degenerate_timeout_minutes() {
        let config = GradeConfig::new("t", "c").with_timeout_minutes(-3.0);
        assert_eq!(config.timeout, Duration::ZERO);

        let config = GradeConfig::new("t", "c").with_timeout_minutes(f64::NAN);
        assert_eq!(config.timeout, Duration::ZERO);
    }

    #[test]
    fn test_exec_env_fixed_markers() {
        let env = ExecEnv::from_ambient();
        assert_eq!(env.get("FORCE_COLOR"), Some("true"));
        assert_eq!(env.get("DOTNET_CLI_HOME"), Some("/tmp"));
        assert_eq!(env.get("DOTNET_NOLOGO"), Some("true"));
    }

    #[test]
    fn test_exec_env_snapshots_path() {
        // PATH is set in any reasonable test environment.
        if std::env::var("PATH").is_ok() {
            let env = ExecEnv::from_ambient();
            assert!(env.get("PATH").is_some());
        }
    }

    #[test]
    fn test_exec_env_with_var() {
        let env = ExecEnv::default().with_var("KEY", "value");
        assert_eq!(env.get("KEY"), Some("value"));
        assert_eq!(env.vars().count(), 1);
    }
}
