//! Script executor configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// How remediation scripts are launched.
///
/// A script runs as `<interpreter> <interpreter_args...> <scripts_dir>/<script> <host>`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutorConfig {
    /// Interpreter binary, e.g. "powershell.exe" or "pwsh".
    #[serde(default = "default_interpreter")]
    pub interpreter: String,

    /// Arguments placed before the script path.
    #[serde(default = "default_interpreter_args")]
    pub interpreter_args: Vec<String>,

    /// Directory the configured script names are resolved against.
    #[serde(default = "default_scripts_dir")]
    pub scripts_dir: PathBuf,

    /// Maximum number of scripts running at once. Further requests wait.
    #[serde(default = "default_max_concurrent_scripts")]
    pub max_concurrent_scripts: usize,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            interpreter: default_interpreter(),
            interpreter_args: default_interpreter_args(),
            scripts_dir: default_scripts_dir(),
            max_concurrent_scripts: default_max_concurrent_scripts(),
        }
    }
}

fn default_interpreter() -> String {
    "powershell.exe".to_string()
}

fn default_interpreter_args() -> Vec<String> {
    vec![
        "-ExecutionPolicy".to_string(),
        "Bypass".to_string(),
        "-File".to_string(),
    ]
}

fn default_scripts_dir() -> PathBuf {
    PathBuf::from("scripts")
}

fn default_max_concurrent_scripts() -> usize {
    16
}
