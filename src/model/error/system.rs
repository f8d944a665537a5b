use macros::traceable;

traceable! {
    SystemError {
        #[error("Configuration not found: {err}")]
        ConfigNotFound => tracing::Level::ERROR,

        #[error("Invalid configuration: {err}")]
        InvalidConfig => tracing::Level::ERROR,

        #[error("Machine {machine} rejected: {err}")]
        InvalidMachine { machine: String } => tracing::Level::ERROR,

        #[error("Failed to install signal handler: {err}")]
        SignalHandlerFailed => tracing::Level::ERROR,
    }
}
