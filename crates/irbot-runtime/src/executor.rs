//! Remediation script execution.
//!
//! [`ActionExecutor`] maps an action to its script and hands it to a
//! [`ScriptRunner`]. The production runner, [`ProcessRunner`], starts the
//! configured interpreter in a child process with the host as the only
//! argument after the script path.
//!
//! Script runs are admitted through a semaphore sized by
//! `executor.max_concurrent_scripts`; requests over the limit wait for a
//! slot. There is no timeout and no way to cancel a running script.

use crate::error::ExecutionError;
use async_trait::async_trait;
use irbot_core::{ActionCatalog, ExecutorConfig};
use std::path::PathBuf;
use std::process::Stdio;
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;
use tokio::sync::Semaphore;

/// Result of a script that exited with code 0.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionOutput {
    /// Trimmed standard output.
    pub stdout: String,
    pub exit_code: i32,
}

/// Runs one script against one host.
#[async_trait]
pub trait ScriptRunner: Send + Sync {
    async fn run(&self, script: &str, host: &str) -> Result<ExecutionOutput, ExecutionError>;
}

/// Runs scripts as child processes of the configured interpreter.
#[derive(Debug, Clone)]
pub struct ProcessRunner {
    interpreter: String,
    interpreter_args: Vec<String>,
    scripts_dir: PathBuf,
}

impl ProcessRunner {
    pub fn new(config: &ExecutorConfig) -> Self {
        Self {
            interpreter: config.interpreter.clone(),
            interpreter_args: config.interpreter_args.clone(),
            scripts_dir: config.scripts_dir.clone(),
        }
    }

    /// Absolute or working-directory-relative path of a script.
    pub fn script_path(&self, script: &str) -> PathBuf {
        self.scripts_dir.join(script)
    }
}

#[async_trait]
impl ScriptRunner for ProcessRunner {
    async fn run(&self, script: &str, host: &str) -> Result<ExecutionOutput, ExecutionError> {
        let script_path = self.script_path(script);

        let mut child = Command::new(&self.interpreter)
            .args(&self.interpreter_args)
            .arg(&script_path)
            .arg(host)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| ExecutionError::Spawn {
                script: script.to_string(),
                source,
            })?;

        // Both pipes were configured above.
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| std::io::Error::other("stdout pipe was not available"))?;
        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| std::io::Error::other("stderr pipe was not available"))?;

        let (status, stdout, stderr) =
            tokio::try_join!(child.wait(), read_stream(stdout), read_stream(stderr))?;

        let stdout = String::from_utf8_lossy(&stdout).trim().to_string();
        let stderr = String::from_utf8_lossy(&stderr).trim().to_string();

        tracing::info!(
            script,
            host,
            code = ?status.code(),
            stdout = %stdout,
            stderr = %stderr,
            "script finished"
        );

        match status.code() {
            Some(0) => Ok(ExecutionOutput {
                stdout,
                exit_code: 0,
            }),
            code => Err(ExecutionError::script_failed(code, &stderr)),
        }
    }
}

async fn read_stream<R: AsyncRead + Unpin>(mut reader: R) -> std::io::Result<Vec<u8>> {
    let mut buf = Vec::new();
    reader.read_to_end(&mut buf).await?;
    Ok(buf)
}

/// Resolves actions to scripts and runs them with bounded concurrency.
pub struct ActionExecutor {
    catalog: Arc<ActionCatalog>,
    runner: Arc<dyn ScriptRunner>,
    permits: Arc<Semaphore>,
}

impl ActionExecutor {
    pub fn new(
        catalog: Arc<ActionCatalog>,
        runner: Arc<dyn ScriptRunner>,
        max_concurrent_scripts: usize,
    ) -> Self {
        Self {
            catalog,
            runner,
            permits: Arc::new(Semaphore::new(max_concurrent_scripts.max(1))),
        }
    }

    /// Executor backed by a [`ProcessRunner`].
    pub fn from_config(config: &ExecutorConfig, catalog: Arc<ActionCatalog>) -> Self {
        Self::new(
            catalog,
            Arc::new(ProcessRunner::new(config)),
            config.max_concurrent_scripts,
        )
    }

    /// Script mapped to an action, if any.
    pub fn script_for(&self, action: &str) -> Option<&str> {
        self.catalog.script(action)
    }

    /// Slots currently free for new script runs.
    pub fn available_permits(&self) -> usize {
        self.permits.available_permits()
    }

    /// Run the script mapped to `action` against `host`.
    pub async fn execute(&self, action: &str, host: &str) -> Result<ExecutionOutput, ExecutionError> {
        let script = self
            .script_for(action)
            .ok_or_else(|| ExecutionError::NotMapped {
                action: action.to_string(),
            })?;

        // The semaphore is never closed, so acquiring only fails in theory.
        let _permit = self.permits.acquire().await.map_err(std::io::Error::other)?;

        tracing::debug!(action, host, script, "running script");
        self.runner.run(script, host).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::future::join_all;
    use irbot_core::{ActionDefinition, Role};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    fn catalog() -> Arc<ActionCatalog> {
        Arc::new(ActionCatalog::new([
            ActionDefinition::new("check status", "check.sh", Role::Viewer),
            ActionDefinition::new("collect logs", "fail.sh", Role::Analyst),
            ActionDefinition::new("remediation report", "silent_fail.sh", Role::Analyst),
            ActionDefinition::new("quarantine host", "missing.sh", Role::Responder),
        ]))
    }

    #[cfg(unix)]
    fn sh_executor(dir: &tempfile::TempDir) -> ActionExecutor {
        std::fs::write(dir.path().join("check.sh"), "echo \"  status of $1: done  \"\n").unwrap();
        std::fs::write(dir.path().join("fail.sh"), "echo partial\necho boom >&2\nexit 1\n").unwrap();
        std::fs::write(dir.path().join("silent_fail.sh"), "exit 3\n").unwrap();

        let config = ExecutorConfig {
            interpreter: "sh".to_string(),
            interpreter_args: Vec::new(),
            scripts_dir: dir.path().to_path_buf(),
            max_concurrent_scripts: 4,
        };
        ActionExecutor::from_config(&config, catalog())
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_success_returns_trimmed_stdout() {
        let dir = tempfile::tempdir().unwrap();
        let executor = sh_executor(&dir);

        let output = executor.execute("check status", "db01").await.unwrap();
        assert_eq!(output.stdout, "status of db01: done");
        assert_eq!(output.exit_code, 0);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_failure_returns_stderr() {
        let dir = tempfile::tempdir().unwrap();
        let executor = sh_executor(&dir);

        let err = executor.execute("collect logs", "db01").await.unwrap_err();
        assert!(matches!(err, ExecutionError::ScriptFailed { exit_code: Some(1), .. }));
        assert_eq!(err.to_string(), "boom");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_failure_without_stderr_names_exit_code() {
        let dir = tempfile::tempdir().unwrap();
        let executor = sh_executor(&dir);

        let err = executor.execute("remediation report", "db01").await.unwrap_err();
        assert_eq!(err.to_string(), "Script exited with code 3");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_missing_script_fails_with_interpreter_diagnostic() {
        let dir = tempfile::tempdir().unwrap();
        let executor = sh_executor(&dir);

        let err = executor.execute("quarantine host", "db01").await.unwrap_err();
        assert!(matches!(err, ExecutionError::ScriptFailed { .. }));
        assert!(!err.to_string().is_empty());
    }

    #[tokio::test]
    async fn test_spawn_failure() {
        let config = ExecutorConfig {
            interpreter: "/nonexistent/irbot-interpreter".to_string(),
            ..Default::default()
        };
        let executor = ActionExecutor::from_config(&config, catalog());

        let err = executor.execute("check status", "db01").await.unwrap_err();
        assert!(matches!(err, ExecutionError::Spawn { ref script, .. } if script == "check.sh"));
    }

    #[tokio::test]
    async fn test_unmapped_action() {
        let executor = ActionExecutor::from_config(&ExecutorConfig::default(), catalog());
        let err = executor.execute("dance", "db01").await.unwrap_err();
        assert!(matches!(err, ExecutionError::NotMapped { ref action } if action == "dance"));
    }

    struct SlowRunner {
        running: AtomicUsize,
        peak: AtomicUsize,
    }

    #[async_trait]
    impl ScriptRunner for SlowRunner {
        async fn run(&self, _script: &str, host: &str) -> Result<ExecutionOutput, ExecutionError> {
            let now = self.running.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(20)).await;
            self.running.fetch_sub(1, Ordering::SeqCst);
            Ok(ExecutionOutput {
                stdout: host.to_string(),
                exit_code: 0,
            })
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrency_is_bounded() {
        let runner = Arc::new(SlowRunner {
            running: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
        });
        let executor = Arc::new(ActionExecutor::new(catalog(), runner.clone(), 2));

        let runs = (0..8).map(|i| {
            let executor = executor.clone();
            tokio::spawn(async move { executor.execute("check status", &format!("h{i}")).await })
        });
        for result in join_all(runs).await {
            result.unwrap().unwrap();
        }

        assert!(runner.peak.load(Ordering::SeqCst) <= 2);
        assert_eq!(executor.available_permits(), 2);
    }
}
