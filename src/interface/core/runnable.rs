use crate::model::task_handle::TaskHandle;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::oneshot;

#[async_trait]
pub trait Runnable: Send + Sync + 'static {
    fn task_name(&self) -> String;

    fn run(self: Arc<Self>) -> TaskHandle {
        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let name = self.task_name();

        let handle = tokio::spawn(self.run_impl(shutdown_rx));

        TaskHandle::new(name, shutdown_tx, handle)
    }

    async fn run_impl(self: Arc<Self>, shutdown_rx: oneshot::Receiver<()>);
}
