use macros::traceable;

traceable! {
    BackupError {
        #[error("Failed to start rsync for {machine}: {err}")]
        SpawnFailed { machine: String } => tracing::Level::ERROR,

        #[no_source]
        #[error("Backup of {machine} timed out after {seconds} seconds")]
        Timeout { machine: String, seconds: u64 } => tracing::Level::ERROR,

        #[no_source]
        #[error("Backup of {machine} failed with exit code {exit_code}")]
        BackupFailed { machine: String, exit_code: i32 } => tracing::Level::ERROR,

        #[no_source]
        #[error("Backup of {machine} was terminated by a signal")]
        Terminated { machine: String } => tracing::Level::ERROR,

        #[error("Failed to finalize backup directory of {machine}: {err}")]
        FinalizeFailed { machine: String } => tracing::Level::ERROR,

        #[no_source]
        #[error("Machine not found: {machine}")]
        MachineNotFound { machine: String } => tracing::Level::WARN,
    }
}
