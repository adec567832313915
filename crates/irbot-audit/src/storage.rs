//! Audit storage backends.

use crate::error::AuditError;
use crate::entry::AuditEntry;
use async_trait::async_trait;
use irbot_core::AuditConfig;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::AsyncWriteExt;

/// Trait for audit storage backends.
///
/// Backends are driven by a single writer task, so implementations do not
/// need to guard against concurrent `store` calls.
#[async_trait]
pub trait AuditStorage: Send + Sync {
    /// Durably append an entry.
    async fn store(&self, entry: &AuditEntry) -> Result<(), AuditError>;
}

/// Create the storage backend described by the configuration.
pub fn create_storage(config: &AuditConfig) -> Arc<dyn AuditStorage> {
    let path = config.log_path();
    if config.stdout {
        Arc::new(DualStorage::new(path))
    } else {
        Arc::new(FileStorage::new(path))
    }
}

/// Console storage (human-readable lines on stdout).
pub struct ConsoleStorage;

#[async_trait]
impl AuditStorage for ConsoleStorage {
    async fn store(&self, entry: &AuditEntry) -> Result<(), AuditError> {
        println!("{}", entry.to_log_line());
        Ok(())
    }
}

/// File storage (appends JSON Lines to a log file).
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl AuditStorage for FileStorage {
    async fn store(&self, entry: &AuditEntry) -> Result<(), AuditError> {
        let mut line = entry.to_json_line()?;
        line.push('\n');

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent).await?;
        }

        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        // One write per line keeps records whole even if another process
        // appends to the same file.
        file.write_all(line.as_bytes()).await?;
        file.flush().await?;

        Ok(())
    }
}

/// File plus console output.
pub struct DualStorage {
    file: FileStorage,
    console: ConsoleStorage,
}

impl DualStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            file: FileStorage::new(path),
            console: ConsoleStorage,
        }
    }
}

#[async_trait]
impl AuditStorage for DualStorage {
    async fn store(&self, entry: &AuditEntry) -> Result<(), AuditError> {
        self.console.store(entry).await?;
        self.file.store(entry).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(user: &str) -> AuditEntry {
        AuditEntry::builder(user, "check status web01")
            .command("check status", "web01")
            .allowed(true)
            .success(true)
            .reason("OK")
            .build()
    }

    #[tokio::test]
    async fn test_console_storage() {
        ConsoleStorage.store(&entry("alice")).await.unwrap();
    }

    #[tokio::test]
    async fn test_file_storage_creates_directory_and_appends() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("logs").join("ir-bot.log");
        let storage = FileStorage::new(&path);

        storage.store(&entry("alice")).await.unwrap();
        storage.store(&entry("bob")).await.unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let users: Vec<String> = content
            .lines()
            .map(|l| serde_json::from_str::<AuditEntry>(l).unwrap().user_id)
            .collect();
        assert_eq!(users, vec!["alice", "bob"]);
    }

    #[tokio::test]
    async fn test_file_storage_reports_unwritable_location() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "not a directory").unwrap();

        let storage = FileStorage::new(blocker.join("ir-bot.log"));
        let result = storage.store(&entry("alice")).await;
        assert!(matches!(result, Err(AuditError::IoError(_))));
    }

    #[tokio::test]
    async fn test_create_storage_dual() {
        let dir = tempfile::tempdir().unwrap();
        let config = AuditConfig {
            directory: dir.path().to_path_buf(),
            stdout: true,
            ..Default::default()
        };

        let storage = create_storage(&config);
        storage.store(&entry("charlie")).await.unwrap();
        assert!(config.log_path().exists());
    }
}
