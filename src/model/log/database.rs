use macros::loggable;

loggable! {
    DatabaseLog {
        #[error("Connected to database successfully")]
        DatabaseConnectSuccess => tracing::Level::INFO,

        #[error("Created table {table}")]
        TableCreated { table: String } => tracing::Level::INFO,
    }
}
