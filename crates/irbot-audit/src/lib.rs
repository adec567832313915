//! # irbot-audit
//!
//! Append-only audit trail for the IR Bot command gateway.
//!
//! Every request that reaches the audited command interface produces exactly
//! one [`AuditEntry`], whether it was malformed, denied, or executed.
//!
//! ## Format
//!
//! - **File output**: JSON Lines, one object per request, camelCase fields
//!   `timestamp, userId, rawCommand, action, host, allowed, reason, success, error?`
//! - **Console output** (optional): human-readable log lines
//!
//! ## Outcomes
//!
//! | Outcome | allowed | success | action/host |
//! |---------|---------|---------|-------------|
//! | `Rejected` | false | false | null |
//! | `Denied` | false | false | set |
//! | `Executed` | true | true | set |
//! | `Failed` | true | false | set, plus `error` |
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use irbot_audit::{AuditEntry, AuditLogger};
//! use irbot_core::AuditConfig;
//!
//! # async fn example() {
//! let logger = AuditLogger::new(&AuditConfig::default());
//!
//! let entry = AuditEntry::builder("charlie", "quarantine host db01")
//!     .command("quarantine host", "db01")
//!     .allowed(true)
//!     .success(true)
//!     .reason("OK")
//!     .build();
//! logger.record(entry).await;
//! # }
//! ```

pub mod entry;
pub mod error;
pub mod logger;
pub mod storage;

pub use entry::{AuditEntry, AuditEntryBuilder, AuditOutcome};
pub use error::AuditError;
pub use logger::AuditLogger;
pub use storage::{AuditStorage, ConsoleStorage, DualStorage, FileStorage, create_storage};
