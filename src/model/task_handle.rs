use crate::model::error::Error;
use crate::model::error::task::TaskError;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

/// Cancel handle of a spawned `Runnable`.
#[derive(Debug)]
pub struct TaskHandle {
    name: String,
    shutdown: oneshot::Sender<()>,
    handle: JoinHandle<()>,
}

impl TaskHandle {
    pub fn new(name: String, shutdown: oneshot::Sender<()>, handle: JoinHandle<()>) -> Self {
        Self {
            name,
            shutdown,
            handle,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Signals the task and waits until it has returned.
    pub async fn stop(self) -> Result<(), Error> {
        // The receiver is gone when the task already returned on its own.
        if self.shutdown.send(()).is_err() && !self.handle.is_finished() {
            Err(TaskError::ShutdownSignalFailed(self.name.clone()))?
        }
        self.handle.await.map_err(TaskError::TaskPanicked)?;
        Ok(())
    }
}
