//! Trusted direct execution.
//!
//! [`DirectExecutor`] runs an action's script with no parsing, no role check
//! and no audit entry. It exists for internal callers such as the error
//! handler script and must only be exposed to trusted networks.

use crate::error::{DirectError, ExecutionError};
use crate::executor::ActionExecutor;
use serde::Serialize;
use std::sync::Arc;

/// A successful direct run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DirectSuccess {
    /// Lowercased action name.
    pub action: String,
    pub host: String,
    pub output: String,
}

/// Unaudited, role-free access to the action executor.
#[derive(Clone)]
pub struct DirectExecutor {
    executor: Arc<ActionExecutor>,
}

impl DirectExecutor {
    pub fn new(executor: Arc<ActionExecutor>) -> Self {
        Self { executor }
    }

    /// Run `action` against `host`. Internal actions are allowed. The host
    /// is passed to the script exactly as given.
    pub async fn run(&self, action: &str, host: &str) -> Result<DirectSuccess, DirectError> {
        let action = action.trim().to_lowercase();
        if action.is_empty() || host.trim().is_empty() {
            return Err(DirectError::MissingField);
        }

        tracing::warn!(%action, host, "unaudited direct execution");

        match self.executor.execute(&action, host).await {
            Ok(output) => Ok(DirectSuccess {
                action,
                host: host.to_string(),
                output: output.stdout,
            }),
            Err(ExecutionError::NotMapped { action }) => Err(DirectError::NotAllowed { action }),
            Err(e) => Err(e.into()),
        }
    }
}
