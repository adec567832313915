//! Audit entry type.
//!
//! One entry records the full disposition of one gateway request. Entries are
//! written as single-line JSON objects with camelCase field names.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize, Serializer};

/// Coarse classification of an entry, derived from its flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditOutcome {
    /// The command text could not be parsed.
    Rejected,
    /// The command parsed but was not allowed to run.
    Denied,
    /// The script ran and exited successfully.
    Executed,
    /// The script was allowed but failed.
    Failed,
}

impl std::fmt::Display for AuditOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Rejected => write!(f, "REJECTED"),
            Self::Denied => write!(f, "DENIED"),
            Self::Executed => write!(f, "EXECUTED"),
            Self::Failed => write!(f, "FAILED"),
        }
    }
}

/// An immutable audit record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditEntry {
    /// When the request was received, RFC 3339 with millisecond precision.
    #[serde(serialize_with = "serialize_millis")]
    pub timestamp: DateTime<Utc>,

    /// Requesting identity, `"unknown"` when none was supplied.
    pub user_id: String,

    /// Command text exactly as received.
    pub raw_command: String,

    /// Parsed action phrase; null when parsing failed.
    pub action: Option<String>,

    /// Parsed host; null when parsing failed.
    pub host: Option<String>,

    /// Whether authorization let the request through.
    pub allowed: bool,

    /// Short explanation of the disposition.
    pub reason: String,

    /// Whether the remediation script completed successfully.
    pub success: bool,

    /// Script failure text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AuditEntry {
    /// Create a builder for an entry.
    pub fn builder(user_id: impl Into<String>, raw_command: impl Into<String>) -> AuditEntryBuilder {
        AuditEntryBuilder::new(user_id, raw_command)
    }

    pub fn outcome(&self) -> AuditOutcome {
        match (self.success, self.allowed, self.action.is_some()) {
            (true, _, _) => AuditOutcome::Executed,
            (false, true, _) => AuditOutcome::Failed,
            (false, false, true) => AuditOutcome::Denied,
            (false, false, false) => AuditOutcome::Rejected,
        }
    }

    /// Serialize as one JSON Lines record (no trailing newline).
    pub fn to_json_line(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Format the entry as a human-readable log line.
    ///
    /// Format: `[timestamp] OUTCOME user=... action=... host=... reason="..."`.
    /// Field values never contain line breaks or double quotes.
    pub fn to_log_line(&self) -> String {
        let mut line = format!(
            "[{}] {} user={} action={} host={} reason=\"{}\"",
            self.timestamp.format("%Y-%m-%dT%H:%M:%S%.3fZ"),
            self.outcome(),
            single_line(&self.user_id),
            single_line(self.action.as_deref().unwrap_or("-")),
            single_line(self.host.as_deref().unwrap_or("-")),
            single_line(&self.reason),
        );

        if let Some(ref error) = self.error {
            line.push_str(&format!(" error=\"{}\"", single_line(error)));
        }

        line
    }
}

fn single_line(value: &str) -> String {
    value.replace('"', "'").replace(['\r', '\n'], " ")
}

fn serialize_millis<S: Serializer>(ts: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&ts.to_rfc3339_opts(SecondsFormat::Millis, true))
}

/// Builder for audit entries.
///
/// Starts as a rejected request (`allowed=false`, `success=false`, no
/// action or host) stamped with the current time.
#[derive(Debug)]
pub struct AuditEntryBuilder {
    entry: AuditEntry,
}

impl AuditEntryBuilder {
    pub fn new(user_id: impl Into<String>, raw_command: impl Into<String>) -> Self {
        Self {
            entry: AuditEntry {
                timestamp: Utc::now(),
                user_id: user_id.into(),
                raw_command: raw_command.into(),
                action: None,
                host: None,
                allowed: false,
                reason: String::new(),
                success: false,
                error: None,
            },
        }
    }

    /// Override the timestamp (defaults to now).
    pub fn timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.entry.timestamp = timestamp;
        self
    }

    /// Set the parsed action and host.
    pub fn command(mut self, action: impl Into<String>, host: impl Into<String>) -> Self {
        self.entry.action = Some(action.into());
        self.entry.host = Some(host.into());
        self
    }

    pub fn allowed(mut self, allowed: bool) -> Self {
        self.entry.allowed = allowed;
        self
    }

    pub fn reason(mut self, reason: impl Into<String>) -> Self {
        self.entry.reason = reason.into();
        self
    }

    pub fn success(mut self, success: bool) -> Self {
        self.entry.success = success;
        self
    }

    pub fn error(mut self, error: impl Into<String>) -> Self {
        self.entry.error = Some(error.into());
        self
    }

    pub fn build(self) -> AuditEntry {
        self.entry
    }
}
