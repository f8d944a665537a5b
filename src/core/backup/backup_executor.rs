use crate::interface::backup_directory::BackupDirectory;
use crate::interface::backup_runner::BackupRunner;
use crate::interface::notification_sink::NotificationSink;
use crate::interface::repository::backup_event::EventStore;
use crate::model::backup_record::{BackupReason, BackupRecord};
use crate::model::error::Error;
use crate::model::error::backup::BackupError;
use crate::model::error::task::TaskError;
use crate::model::log::backup::BackupLog;
use crate::model::machine::Machine;
use chrono::NaiveDateTime;
use dashmap::DashSet;
use macros::log;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Mutex;
use tokio::task::JoinSet;

/// Membership of a machine in the in-progress set, released on drop.
struct InProgressGuard {
    in_progress: Arc<DashSet<String>>,
    machine: String,
}

impl InProgressGuard {
    fn acquire(in_progress: &Arc<DashSet<String>>, machine: &str) -> Option<Self> {
        in_progress.insert(machine.to_string()).then(|| Self {
            in_progress: in_progress.clone(),
            machine: machine.to_string(),
        })
    }
}

impl Drop for InProgressGuard {
    fn drop(&mut self) {
        self.in_progress.remove(&self.machine);
    }
}

/// Runs backups and prunes in the background so callers return at once.
pub struct BackupExecutor {
    runner: Arc<dyn BackupRunner>,
    backup_directory: Arc<dyn BackupDirectory>,
    event_store: Arc<dyn EventStore>,
    notifier: Arc<dyn NotificationSink>,
    in_progress: Arc<DashSet<String>>,
    tasks: Mutex<JoinSet<()>>,
}

impl BackupExecutor {
    pub fn new(
        runner: Arc<dyn BackupRunner>,
        backup_directory: Arc<dyn BackupDirectory>,
        event_store: Arc<dyn EventStore>,
        notifier: Arc<dyn NotificationSink>,
    ) -> Self {
        Self {
            runner,
            backup_directory,
            event_store,
            notifier,
            in_progress: Arc::new(DashSet::new()),
            tasks: Mutex::new(JoinSet::new()),
        }
    }

    pub fn backup_directory(&self) -> Arc<dyn BackupDirectory> {
        self.backup_directory.clone()
    }

    pub fn event_store(&self) -> Arc<dyn EventStore> {
        self.event_store.clone()
    }

    pub fn notifier(&self) -> Arc<dyn NotificationSink> {
        self.notifier.clone()
    }

    /// Starts a backup of `machine` unless one is already running for it.
    /// Returns whether a backup was started.
    pub async fn start_backup(
        &self,
        machine: Arc<Machine>,
        reason: BackupReason,
        started_at: NaiveDateTime,
    ) -> bool {
        let Some(guard) = InProgressGuard::acquire(&self.in_progress, &machine.name) else {
            log!(BackupLog::BackupInProgress {
                machine: machine.name.clone()
            });
            return false;
        };

        let runner = self.runner.clone();
        let event_store = self.event_store.clone();
        let notifier = self.notifier.clone();
        self.spawn(async move {
            let _guard = guard;
            execute_backup(runner, event_store, notifier, machine, reason, started_at).await;
        })
        .await;
        true
    }

    /// Removes `backups` of `machine` in the background.
    pub async fn prune(&self, machine: &str, backups: Vec<NaiveDateTime>) {
        if backups.is_empty() {
            return;
        }
        let backup_directory = self.backup_directory.clone();
        let machine = machine.to_string();
        self.spawn(async move {
            for backup in backups {
                match backup_directory.remove(&machine, backup).await {
                    Ok(()) => log!(BackupLog::BackupPruned {
                        machine: machine.clone(),
                        backup
                    }),
                    Err(err) => log!(err),
                }
            }
        })
        .await;
    }

    /// Waits until every background task has finished.
    pub async fn wait_idle(&self) {
        let mut tasks = self.tasks.lock().await;
        if !tasks.is_empty() {
            log!(BackupLog::WaitingForTasks { tasks: tasks.len() });
        }
        while let Some(result) = tasks.join_next().await {
            if let Err(err) = result {
                log!(TaskError::TaskPanicked(err));
            }
        }
    }

    async fn spawn<F>(&self, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let mut tasks = self.tasks.lock().await;
        while let Some(result) = tasks.try_join_next() {
            if let Err(err) = result {
                log!(TaskError::TaskPanicked(err));
            }
        }
        tasks.spawn(task);
    }
}

async fn execute_backup(
    runner: Arc<dyn BackupRunner>,
    event_store: Arc<dyn EventStore>,
    notifier: Arc<dyn NotificationSink>,
    machine: Arc<Machine>,
    reason: BackupReason,
    started_at: NaiveDateTime,
) {
    log!(BackupLog::BackupStarted {
        machine: machine.name.clone()
    });

    let clock = Instant::now();
    let (record, failure) = match runner.run(&machine, started_at).await {
        Ok(outcome) => {
            let record = BackupRecord::from_outcome(&machine.name, started_at, reason, &outcome);
            let failure = match outcome.exit_code {
                _ if outcome.succeeded() => None,
                Some(exit_code) => Some(Error::from(BackupError::BackupFailed(
                    machine.name.clone(),
                    exit_code,
                ))),
                None => Some(Error::from(BackupError::Terminated(machine.name.clone()))),
            };
            (record, failure)
        }
        Err(err) => {
            let duration_ms = u64::try_from(clock.elapsed().as_millis()).unwrap_or(u64::MAX);
            let record = BackupRecord::from_failure(
                &machine.name,
                started_at,
                reason,
                duration_ms,
                err.to_string(),
            );
            (record, Some(err))
        }
    };

    match &failure {
        None => log!(BackupLog::BackupCompleted {
            machine: machine.name.clone(),
            transfer_size: record.transfer_size,
            duration_ms: record.duration_ms,
        }),
        Some(err) => {
            log!(err);
            let message = match &record.message {
                Some(detail) if *detail != err.to_string() => format!("{err}\n{detail}"),
                _ => err.to_string(),
            };
            notifier.dispatch(&format!("Backup of {} failed", machine.name), &message);
        }
    }

    if let Err(err) = event_store.record_backup_event(&record).await {
        log!(err);
    }
}
