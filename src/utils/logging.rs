use crate::platform::{LOG_DIRECTORY, LOG_FILE_PREFIX};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

pub struct Logging;

impl Logging {
    /// Installs the global subscriber writing to stdout and to a daily
    /// rolling file. The returned guard flushes the file writer on drop.
    pub fn initialize() -> WorkerGuard {
        let file_appender = tracing_appender::rolling::daily(LOG_DIRECTORY, LOG_FILE_PREFIX);
        let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(true))
            .with(fmt::layer().with_writer(file_writer).with_ansi(false))
            .init();

        log_panics::init();

        guard
    }
}
