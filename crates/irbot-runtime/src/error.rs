//! Error types for the runtime crate.

use crate::parser::Command;
use irbot_core::Role;
use irbot_policy::Denial;
use thiserror::Error;

/// Command text that could not be turned into a [`Command`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// Missing, empty, or whitespace-only text.
    #[error("Empty command")]
    Empty,

    /// No configured action phrase prefixes the text.
    #[error("Unknown or disallowed action")]
    UnknownAction,

    /// Nothing left after the action phrase.
    #[error("Host is required")]
    HostRequired,
}

/// Failure to run a remediation script.
#[derive(Debug, Error)]
pub enum ExecutionError {
    /// The action has no script mapping. This is a configuration problem,
    /// not an authorization one.
    #[error("no script mapped for action '{action}'")]
    NotMapped { action: String },

    /// The script process could not be started.
    #[error("failed to start script {script}: {source}")]
    Spawn {
        script: String,
        #[source]
        source: std::io::Error,
    },

    /// The script ran and exited unsuccessfully. `message` is the trimmed
    /// stderr, or a synthetic message naming the exit code.
    #[error("{message}")]
    ScriptFailed {
        exit_code: Option<i32>,
        message: String,
    },

    /// Reading the script's output failed.
    #[error("IO error while running script: {0}")]
    Io(#[from] std::io::Error),
}

impl ExecutionError {
    /// Build the failure for a non-zero (or missing) exit code.
    pub fn script_failed(exit_code: Option<i32>, stderr: &str) -> Self {
        let stderr = stderr.trim();
        let message = if !stderr.is_empty() {
            stderr.to_string()
        } else {
            match exit_code {
                Some(code) => format!("Script exited with code {}", code),
                None => "Script exited without an exit code".to_string(),
            }
        };
        Self::ScriptFailed { exit_code, message }
    }
}

/// Terminal failure of an audited command request.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The command text was malformed.
    #[error("{0}")]
    Parse(#[from] ParseError),

    /// The parsed action has no script mapping.
    #[error("Action not allowed")]
    NotMapped { command: Command },

    /// The user may not invoke the action.
    #[error("Not authorized for this action")]
    Denied { command: Command, denial: Denial },

    /// The script was authorized but failed.
    #[error("{source}")]
    Execution {
        command: Command,
        role: Role,
        #[source]
        source: ExecutionError,
    },

    /// The request task was cancelled before it finished, which only happens
    /// while the runtime shuts down.
    #[error("Request interrupted")]
    Interrupted,
}

impl GatewayError {
    /// The parsed command, when parsing got that far.
    pub fn command(&self) -> Option<&Command> {
        match self {
            Self::Parse(_) | Self::Interrupted => None,
            Self::NotMapped { command }
            | Self::Denied { command, .. }
            | Self::Execution { command, .. } => Some(command),
        }
    }
}

/// Failure on the trusted direct-execution path.
#[derive(Debug, Error)]
pub enum DirectError {
    #[error("action and host are required")]
    MissingField,

    #[error("Action not allowed")]
    NotAllowed { action: String },

    #[error("{0}")]
    Execution(#[from] ExecutionError),
}
