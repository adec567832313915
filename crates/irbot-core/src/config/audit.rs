//! Audit logging configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for the audit log store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditConfig {
    /// Directory holding the audit log. Created on first append if absent.
    #[serde(default = "default_directory")]
    pub directory: PathBuf,

    /// Log file name inside `directory`.
    #[serde(default = "default_file_name")]
    pub file_name: String,

    /// Also print a human-readable line per entry to stdout.
    #[serde(default)]
    pub stdout: bool,

    /// Capacity of the queue feeding the audit writer task.
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,
}

impl AuditConfig {
    /// Full path of the JSON Lines audit log.
    pub fn log_path(&self) -> PathBuf {
        self.directory.join(&self.file_name)
    }
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            directory: default_directory(),
            file_name: default_file_name(),
            stdout: false,
            queue_capacity: default_queue_capacity(),
        }
    }
}

fn default_directory() -> PathBuf {
    PathBuf::from("logs")
}

fn default_file_name() -> String {
    "ir-bot.log".to_string()
}

fn default_queue_capacity() -> usize {
    1024
}
