use macros::traceable;

traceable! {
    TaskError {
        #[error("Background task panicked: {err}")]
        TaskPanicked => tracing::Level::ERROR,

        #[no_source]
        #[error("Timer of {name} stopped: no next run could be computed")]
        TimerHalted { name: String } => tracing::Level::ERROR,

        #[no_source]
        #[error("Failed to send shutdown signal to {name}")]
        ShutdownSignalFailed { name: String } => tracing::Level::WARN,
    }
}
