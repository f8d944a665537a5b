use crate::model::error::Error;
use crate::model::error::system::SystemError;
use tokio::signal::windows::{CtrlBreak, ctrl_break};

/// Ctrl-Break asks for a configuration reload.
pub struct ReloadSignal {
    signal: CtrlBreak,
}

impl ReloadSignal {
    pub fn new() -> Result<Self, Error> {
        let signal = ctrl_break().map_err(SystemError::SignalHandlerFailed)?;
        Ok(Self { signal })
    }

    pub async fn recv(&mut self) -> Option<()> {
        self.signal.recv().await
    }
}
