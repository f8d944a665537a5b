use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Directory name format of a finished backup.
pub const BACKUP_NAME_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";

/// Suffix of a backup directory rsync is still writing to.
pub const PARTIAL_SUFFIX: &str = ".partial";

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackupReason {
    Scheduled,
    Manual,
}

/// What the backup runner reports for a single run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupOutcome {
    pub exit_code: Option<i32>,
    pub output: String,
    pub transfer_size: u64,
    pub duration_ms: u64,
}

impl BackupOutcome {
    pub fn succeeded(&self) -> bool {
        self.exit_code == Some(0)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct BackupRecord {
    pub uuid: Uuid,
    pub machine: String,
    pub timestamp: NaiveDateTime,
    pub exit_code: Option<i32>,
    pub transfer_size: u64,
    pub duration_ms: u64,
    pub reason: BackupReason,
    pub message: Option<String>,
}

impl BackupRecord {
    pub fn from_outcome(
        machine: &str,
        timestamp: NaiveDateTime,
        reason: BackupReason,
        outcome: &BackupOutcome,
    ) -> Self {
        let message = outcome
            .output
            .lines()
            .rev()
            .find(|line| !line.trim().is_empty())
            .map(|line| line.trim().to_string());
        Self {
            uuid: Uuid::new_v4(),
            machine: machine.to_string(),
            timestamp,
            exit_code: outcome.exit_code,
            transfer_size: outcome.transfer_size,
            duration_ms: outcome.duration_ms,
            reason,
            message,
        }
    }

    /// A run that never produced an exit code.
    pub fn from_failure(
        machine: &str,
        timestamp: NaiveDateTime,
        reason: BackupReason,
        duration_ms: u64,
        message: String,
    ) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            machine: machine.to_string(),
            timestamp,
            exit_code: None,
            transfer_size: 0,
            duration_ms,
            reason,
            message: Some(message),
        }
    }

    pub fn succeeded(&self) -> bool {
        self.exit_code == Some(0)
    }
}
