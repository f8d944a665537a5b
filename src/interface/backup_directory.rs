use crate::model::error::Error;
use async_trait::async_trait;
use chrono::NaiveDateTime;

/// Storage of finished backups, identified by their timestamps.
#[async_trait]
pub trait BackupDirectory: Send + Sync {
    async fn list_backups(&self, machine: &str) -> Result<Vec<NaiveDateTime>, Error>;

    async fn remove(&self, machine: &str, backup: NaiveDateTime) -> Result<(), Error>;
}
