use macros::traceable;

traceable! {
    DatabaseError {
        #[error("Failed to connect to database: {err}")]
        DatabaseConnectFailed => tracing::Level::ERROR,

        #[error("Failed to execute SQL statement: {err}")]
        StatementExecutionFailed => tracing::Level::ERROR,

        #[error("Stored data is corrupted: {err}")]
        DataCorrupted => tracing::Level::ERROR,
    }
}
