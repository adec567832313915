//! Audit logger implementation.
//!
//! All appends go through one writer task that owns the storage backend.
//! Callers hand entries over a bounded queue and wait for the writer to
//! acknowledge them. Storage failures stay inside this module: they are
//! reported on the diagnostic log and counted, never returned.

use irbot_core::AuditConfig;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::{mpsc, oneshot};

use crate::entry::AuditEntry;
use crate::error::AuditError;
use crate::storage::{AuditStorage, create_storage};

struct WriteRequest {
    entry: AuditEntry,
    ack: oneshot::Sender<()>,
}

/// The audit logger.
///
/// Cheap to clone; all clones feed the same writer task. The writer stops
/// once every clone has been dropped.
#[derive(Clone)]
pub struct AuditLogger {
    tx: mpsc::Sender<WriteRequest>,
    failed_writes: Arc<AtomicU64>,
}

impl AuditLogger {
    /// Create a logger writing where the configuration says.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn new(config: &AuditConfig) -> Self {
        Self::with_storage(create_storage(config), config.queue_capacity)
    }

    /// Create a logger with a custom storage backend.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn with_storage(storage: Arc<dyn AuditStorage>, queue_capacity: usize) -> Self {
        let (tx, rx) = mpsc::channel(queue_capacity.max(1));
        let failed_writes = Arc::new(AtomicU64::new(0));

        tokio::spawn(run_writer(storage, rx, failed_writes.clone()));

        Self { tx, failed_writes }
    }

    /// Record an entry and wait until the writer has attempted to store it.
    ///
    /// Never fails: problems are logged and counted in [`failed_writes`].
    ///
    /// [`failed_writes`]: AuditLogger::failed_writes
    pub async fn record(&self, entry: AuditEntry) {
        tracing::debug!(
            user_id = %entry.user_id,
            outcome = %entry.outcome(),
            action = entry.action.as_deref().unwrap_or("-"),
            "Audit entry"
        );

        let (ack, done) = oneshot::channel();
        if self.tx.send(WriteRequest { entry, ack }).await.is_err() {
            self.report_failure(&AuditError::WriterUnavailable);
            return;
        }
        if done.await.is_err() {
            self.report_failure(&AuditError::WriterUnavailable);
        }
    }

    /// Number of entries that could not be stored.
    pub fn failed_writes(&self) -> u64 {
        self.failed_writes.load(Ordering::Relaxed)
    }

    fn report_failure(&self, error: &AuditError) {
        self.failed_writes.fetch_add(1, Ordering::Relaxed);
        tracing::error!(error = %error, "Failed to write audit log");
    }
}

async fn run_writer(
    storage: Arc<dyn AuditStorage>,
    mut rx: mpsc::Receiver<WriteRequest>,
    failed_writes: Arc<AtomicU64>,
) {
    while let Some(WriteRequest { entry, ack }) = rx.recv().await {
        if let Err(e) = storage.store(&entry).await {
            failed_writes.fetch_add(1, Ordering::Relaxed);
            tracing::error!(
                error = %e,
                user_id = %entry.user_id,
                raw_command = %entry.raw_command,
                "Failed to write audit log"
            );
        }
        // The requester may have gone away; nothing to do then.
        let _ = ack.send(());
    }
    tracing::debug!("audit writer stopped");
}
