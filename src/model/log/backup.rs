use chrono::NaiveDateTime;
use macros::loggable;

loggable! {
    BackupLog {
        #[error("Backup of {machine} started")]
        BackupStarted { machine: String } => tracing::Level::INFO,

        #[error("Backup of {machine} completed: {transfer_size} bytes in {duration_ms} ms")]
        BackupCompleted {
            machine: String,
            transfer_size: u64,
            duration_ms: u64,
        } => tracing::Level::INFO,

        #[error("Backup of {machine} already in progress, trigger skipped")]
        BackupInProgress { machine: String } => tracing::Level::WARN,

        #[error("Pruned backup {backup} of {machine}")]
        BackupPruned { machine: String, backup: NaiveDateTime } => tracing::Level::INFO,

        #[error("Waiting for {tasks} background tasks")]
        WaitingForTasks { tasks: usize } => tracing::Level::INFO,
    }
}
