use crate::model::error::Error;
use crate::model::error::system::SystemError;
use tokio::signal::unix::{Signal, SignalKind, signal};

/// SIGHUP asks for a configuration reload.
pub struct ReloadSignal {
    signal: Signal,
}

impl ReloadSignal {
    pub fn new() -> Result<Self, Error> {
        let signal = signal(SignalKind::hangup()).map_err(SystemError::SignalHandlerFailed)?;
        Ok(Self { signal })
    }

    pub async fn recv(&mut self) -> Option<()> {
        self.signal.recv().await
    }
}
