use crate::core::backup::backup_executor::BackupExecutor;
use crate::core::schedule::backup_cycle::BackupCycle;
use crate::core::schedule::schedule_timer::{ScheduleTimer, local_now};
use crate::core::schedule::summary_report::SummaryReport;
use crate::interface::core::runnable::Runnable;
use crate::model::backup_record::BackupReason;
use crate::model::error::Error;
use crate::model::error::backup::BackupError;
use crate::model::log::schedule::ScheduleLog;
use crate::model::machine::Machine;
use crate::model::schedule::Schedule;
use crate::model::task_handle::TaskHandle;
use dashmap::DashMap;
use futures::future::join_all;
use macros::log;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

/// Owns the configured machines and one timer per machine.
pub struct ScheduleManager {
    executor: Arc<BackupExecutor>,
    wakeup_interval: Duration,
    machines: Arc<DashMap<String, Arc<Machine>>>,
    timers: Mutex<HashMap<String, TaskHandle>>,
    summary: Mutex<Option<TaskHandle>>,
}

impl ScheduleManager {
    pub fn new(executor: Arc<BackupExecutor>, wakeup_interval: Duration) -> Self {
        Self {
            executor,
            wakeup_interval,
            machines: Arc::new(DashMap::new()),
            timers: Mutex::new(HashMap::new()),
            summary: Mutex::new(None),
        }
    }

    pub async fn start(&self, machines: Vec<Machine>) {
        let mut timers = self.timers.lock().await;
        for machine in machines {
            self.start_machine(&mut timers, machine);
        }
    }

    /// Replaces the machine set. Timers of unchanged machines keep running.
    pub async fn reconfigure(&self, machines: Vec<Machine>) {
        let mut timers = self.timers.lock().await;

        let wanted: HashMap<String, Machine> = machines
            .into_iter()
            .map(|machine| (machine.name.clone(), machine))
            .collect();
        let outdated: Vec<String> = self
            .machines
            .iter()
            .filter(|entry| wanted.get(entry.key()) != Some(entry.value().as_ref()))
            .map(|entry| entry.key().clone())
            .collect();

        let stopping = outdated
            .iter()
            .filter_map(|name| self.detach_machine(&mut timers, name));
        Self::stop_timers(stopping.collect()).await;

        for (name, machine) in wanted {
            if !self.machines.contains_key(&name) {
                self.start_machine(&mut timers, machine);
            }
        }
    }

    /// Replaces the summary timer; `None` turns summaries off.
    pub async fn start_summary(&self, schedule: Option<Schedule>) {
        let mut summary = self.summary.lock().await;
        if let Some(handle) = summary.take() {
            Self::stop_timers(vec![handle]).await;
        }
        if let Some(schedule) = schedule {
            let report = SummaryReport::new(
                schedule,
                self.machines.clone(),
                self.executor.event_store(),
                self.executor.notifier(),
            );
            let timer = ScheduleTimer::new(Arc::new(report), self.wakeup_interval);
            *summary = Some(Arc::new(timer).run());
        }
    }

    /// Starts a backup of `machine` now. Returns false when one is already
    /// running.
    pub async fn trigger_backup(&self, machine: &str) -> Result<bool, Error> {
        let machine = self
            .machines
            .get(machine)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| BackupError::MachineNotFound(machine))?;
        Ok(self
            .executor
            .start_backup(machine, BackupReason::Manual, local_now())
            .await)
    }

    pub fn machine_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .machines
            .iter()
            .map(|entry| entry.key().clone())
            .collect();
        names.sort_unstable();
        names
    }

    /// Stops every timer, then waits for running backups and prunes.
    pub async fn shutdown(&self) {
        let mut handles: Vec<TaskHandle> = {
            let mut timers = self.timers.lock().await;
            self.machines.clear();
            timers.drain().map(|(_, handle)| handle).collect()
        };
        if let Some(handle) = self.summary.lock().await.take() {
            handles.push(handle);
        }
        Self::stop_timers(handles).await;
        self.executor.wait_idle().await;
    }

    fn start_machine(&self, timers: &mut HashMap<String, TaskHandle>, machine: Machine) {
        let machine = Arc::new(machine);
        log!(ScheduleLog::MachineStarted {
            machine: machine.name.clone(),
            schedule: machine.schedule.to_string(),
        });
        let cycle = BackupCycle::new(machine.clone(), self.executor.clone());
        let timer = ScheduleTimer::new(Arc::new(cycle), self.wakeup_interval);
        timers.insert(machine.name.clone(), Arc::new(timer).run());
        self.machines.insert(machine.name.clone(), machine);
    }

    fn detach_machine(
        &self,
        timers: &mut HashMap<String, TaskHandle>,
        name: &str,
    ) -> Option<TaskHandle> {
        self.machines.remove(name);
        log!(ScheduleLog::MachineStopped {
            machine: name.to_string()
        });
        timers.remove(name)
    }

    async fn stop_timers(handles: Vec<TaskHandle>) {
        let results = join_all(handles.into_iter().map(TaskHandle::stop)).await;
        for result in results {
            if let Err(err) = result {
                log!(err);
            }
        }
    }
}
