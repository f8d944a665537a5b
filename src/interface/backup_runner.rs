use crate::model::backup_record::BackupOutcome;
use crate::model::error::Error;
use crate::model::machine::Machine;
use async_trait::async_trait;
use chrono::NaiveDateTime;

#[async_trait]
pub trait BackupRunner: Send + Sync {
    /// Runs one backup of `machine`, stamped with `started_at`.
    ///
    /// A non-zero exit code is reported through the outcome; `Err` means the
    /// run did not produce an exit code at all.
    async fn run(&self, machine: &Machine, started_at: NaiveDateTime)
    -> Result<BackupOutcome, Error>;
}
