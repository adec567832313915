//! Audited command handling.
//!
//! [`Gateway::handle`] walks one request through parse, script lookup,
//! authorization and execution. Whatever the outcome, exactly one audit
//! entry is recorded before the call returns.

use crate::error::{GatewayError, ParseError};
use crate::executor::ActionExecutor;
use crate::parser::{Command, CommandParser};
use chrono::{DateTime, Utc};
use irbot_audit::{AuditEntry, AuditLogger};
use irbot_core::Role;
use irbot_policy::Authorizer;
use serde::Serialize;
use std::sync::Arc;
use tracing::Instrument;
use uuid::Uuid;

/// User id recorded when a request carries none.
pub const UNKNOWN_USER: &str = "unknown";

/// An incoming audited command.
#[derive(Debug, Clone, Default)]
pub struct CommandRequest {
    /// Free-text command; `None` when absent or not a string.
    pub text: Option<String>,
    pub user_id: Option<String>,
}

impl CommandRequest {
    pub fn new(text: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            user_id: Some(user_id.into()),
        }
    }
}

/// A command that was authorized and ran successfully.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandSuccess {
    pub action: String,
    pub host: String,
    pub role: Role,
    pub output: String,
}

/// The audited command pipeline.
///
/// Cheap to clone. Each request runs on its own task, so a caller that goes
/// away mid-request does not stop the pipeline short of its audit entry.
#[derive(Clone)]
pub struct Gateway {
    pipeline: Arc<Pipeline>,
}

struct Pipeline {
    parser: CommandParser,
    authorizer: Authorizer,
    executor: Arc<ActionExecutor>,
    audit: AuditLogger,
}

impl Gateway {
    pub fn new(
        parser: CommandParser,
        authorizer: Authorizer,
        executor: Arc<ActionExecutor>,
        audit: AuditLogger,
    ) -> Self {
        Self {
            pipeline: Arc::new(Pipeline {
                parser,
                authorizer,
                executor,
                audit,
            }),
        }
    }

    /// Handle one command request end to end.
    ///
    /// Dropping the returned future does not cancel the request: the script
    /// still runs to completion and its outcome is still audited.
    pub async fn handle(&self, request: CommandRequest) -> Result<CommandSuccess, GatewayError> {
        let request_id = Uuid::new_v4();
        let span = tracing::info_span!(
            "command",
            %request_id,
            user_id = request.user_id.as_deref().unwrap_or(UNKNOWN_USER)
        );

        let pipeline = self.pipeline.clone();
        let task = tokio::spawn(async move { pipeline.process(request).await }.instrument(span));

        match task.await {
            Ok(result) => result,
            Err(e) if e.is_panic() => std::panic::resume_unwind(e.into_panic()),
            Err(e) => {
                tracing::error!(%request_id, error = %e, "command task did not complete");
                Err(GatewayError::Interrupted)
            }
        }
    }
}

impl Pipeline {
    async fn process(&self, request: CommandRequest) -> Result<CommandSuccess, GatewayError> {
        let audit = RequestAudit::new(&request);

        let command = match self.parser.parse(request.text.as_deref()) {
            Ok(command) => command,
            Err(e) => return Err(self.reject(&audit, e).await),
        };

        if self.executor.script_for(&command.action).is_none() {
            tracing::warn!(action = %command.action, "parsed action has no script mapping");
            self.audit
                .record(audit.denied(&command, "Action not mapped"))
                .await;
            return Err(GatewayError::NotMapped { command });
        }

        let user_id = request.user_id.as_deref().unwrap_or_default();
        let role = match self.authorizer.authorize(user_id, &command.action) {
            Ok(role) => role,
            Err(denial) => {
                tracing::info!(action = %command.action, reason = %denial, "command denied");
                self.audit
                    .record(audit.denied(&command, &denial.message))
                    .await;
                return Err(GatewayError::Denied { command, denial });
            }
        };

        match self.executor.execute(&command.action, &command.host).await {
            Ok(output) => {
                tracing::info!(action = %command.action, host = %command.host, %role, "command executed");
                self.audit.record(audit.executed(&command)).await;
                Ok(CommandSuccess {
                    action: command.action,
                    host: command.host,
                    role,
                    output: output.stdout,
                })
            }
            Err(source) => {
                tracing::warn!(action = %command.action, host = %command.host, error = %source, "command failed");
                self.audit
                    .record(audit.failed(&command, &source.to_string()))
                    .await;
                Err(GatewayError::Execution {
                    command,
                    role,
                    source,
                })
            }
        }
    }

    async fn reject(&self, audit: &RequestAudit, error: ParseError) -> GatewayError {
        tracing::info!(reason = %error, "command rejected");
        self.audit.record(audit.rejected(&error)).await;
        GatewayError::Parse(error)
    }
}

/// Per-request fields shared by every audit entry the request can produce.
struct RequestAudit {
    user_id: String,
    raw_command: String,
    received_at: DateTime<Utc>,
}

impl RequestAudit {
    fn new(request: &CommandRequest) -> Self {
        Self {
            user_id: request
                .user_id
                .as_deref()
                .filter(|id| !id.is_empty())
                .unwrap_or(UNKNOWN_USER)
                .to_string(),
            raw_command: request.text.clone().unwrap_or_default(),
            received_at: Utc::now(),
        }
    }

    fn builder(&self) -> irbot_audit::AuditEntryBuilder {
        AuditEntry::builder(&self.user_id, &self.raw_command).timestamp(self.received_at)
    }

    fn rejected(&self, error: &ParseError) -> AuditEntry {
        self.builder().reason(error.to_string()).build()
    }

    fn denied(&self, command: &Command, reason: &str) -> AuditEntry {
        self.builder()
            .command(&command.action, &command.host)
            .reason(reason)
            .build()
    }

    fn executed(&self, command: &Command) -> AuditEntry {
        self.builder()
            .command(&command.action, &command.host)
            .allowed(true)
            .success(true)
            .reason("OK")
            .build()
    }

    fn failed(&self, command: &Command, error: &str) -> AuditEntry {
        self.builder()
            .command(&command.action, &command.host)
            .allowed(true)
            .reason("Script error")
            .error(error)
            .build()
    }
}
