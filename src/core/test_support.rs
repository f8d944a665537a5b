//! In-memory collaborators for tests.

use crate::interface::backup_directory::BackupDirectory;
use crate::interface::backup_runner::BackupRunner;
use crate::interface::notification_sink::NotificationSink;
use crate::interface::repository::backup_event::EventStore;
use crate::model::backup_record::{BackupOutcome, BackupRecord};
use crate::model::error::Error;
use crate::model::error::backup::BackupError;
use crate::model::error::database::DatabaseError;
use crate::model::error::io::IOError;
use crate::model::machine::Machine;
use crate::model::schedule::Schedule;
use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::Semaphore;

pub fn time(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(year, month, day)
        .unwrap()
        .and_hms_opt(hour, minute, 0)
        .unwrap()
}

pub fn machine(name: &str, schedule: &str) -> Machine {
    Machine {
        name: name.to_string(),
        source: format!("root@{name}:/"),
        schedule: schedule.parse::<Schedule>().unwrap(),
        inclusion_patterns: Vec::new(),
        exclusion_patterns: Vec::new(),
    }
}

#[derive(Default)]
pub struct FakeBackupDirectory {
    backups: Mutex<HashMap<String, BTreeSet<NaiveDateTime>>>,
    removed: Mutex<Vec<(String, NaiveDateTime)>>,
    undeletable: Mutex<HashSet<NaiveDateTime>>,
    failing: AtomicBool,
}

impl FakeBackupDirectory {
    pub fn insert(&self, machine: &str, backups: impl IntoIterator<Item = NaiveDateTime>) {
        self.backups
            .lock()
            .unwrap()
            .entry(machine.to_string())
            .or_default()
            .extend(backups);
    }

    pub fn removed(&self) -> Vec<(String, NaiveDateTime)> {
        self.removed.lock().unwrap().clone()
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Makes every removal of `backup` fail.
    pub fn fail_removal(&self, backup: NaiveDateTime) {
        self.undeletable.lock().unwrap().insert(backup);
    }
}

#[async_trait]
impl BackupDirectory for FakeBackupDirectory {
    async fn list_backups(&self, machine: &str) -> Result<Vec<NaiveDateTime>, Error> {
        if self.failing.load(Ordering::SeqCst) {
            Err(IOError::ReadDirectoryFailed(machine, "listing unavailable"))?
        }
        Ok(self
            .backups
            .lock()
            .unwrap()
            .get(machine)
            .map(|backups| backups.iter().copied().collect())
            .unwrap_or_default())
    }

    async fn remove(&self, machine: &str, backup: NaiveDateTime) -> Result<(), Error> {
        if self.undeletable.lock().unwrap().contains(&backup) {
            Err(IOError::DeleteDirectoryFailed(machine, "permission denied"))?
        }
        if let Some(backups) = self.backups.lock().unwrap().get_mut(machine) {
            backups.remove(&backup);
        }
        self.removed
            .lock()
            .unwrap()
            .push((machine.to_string(), backup));
        Ok(())
    }
}

enum RunnerBehavior {
    Exit(i32),
    Fail,
}

pub struct FakeBackupRunner {
    behavior: RunnerBehavior,
    gate: Option<Semaphore>,
    runs: Mutex<Vec<(String, NaiveDateTime)>>,
}

impl FakeBackupRunner {
    fn new(behavior: RunnerBehavior, gated: bool) -> Self {
        Self {
            behavior,
            gate: gated.then(|| Semaphore::new(0)),
            runs: Mutex::new(Vec::new()),
        }
    }

    pub fn succeeding() -> Self {
        Self::new(RunnerBehavior::Exit(0), false)
    }

    pub fn exiting_with(exit_code: i32) -> Self {
        Self::new(RunnerBehavior::Exit(exit_code), false)
    }

    pub fn failing() -> Self {
        Self::new(RunnerBehavior::Fail, false)
    }

    /// Succeeds, but every run blocks until `release` is called.
    pub fn gated() -> Self {
        Self::new(RunnerBehavior::Exit(0), true)
    }

    pub fn release(&self) {
        if let Some(gate) = &self.gate {
            gate.add_permits(1);
        }
    }

    pub fn runs(&self) -> Vec<(String, NaiveDateTime)> {
        self.runs.lock().unwrap().clone()
    }

    pub async fn wait_started(&self, runs: usize) {
        while self.runs.lock().unwrap().len() < runs {
            tokio::task::yield_now().await;
        }
    }
}

#[async_trait]
impl BackupRunner for FakeBackupRunner {
    async fn run(
        &self,
        machine: &Machine,
        started_at: NaiveDateTime,
    ) -> Result<BackupOutcome, Error> {
        self.runs
            .lock()
            .unwrap()
            .push((machine.name.clone(), started_at));
        if let Some(gate) = &self.gate {
            gate.acquire().await.unwrap().forget();
        }
        match self.behavior {
            RunnerBehavior::Exit(exit_code) => Ok(BackupOutcome {
                exit_code: Some(exit_code),
                output: "Total transferred file size: 2,048 bytes".to_string(),
                transfer_size: 2048,
                duration_ms: 1500,
            }),
            RunnerBehavior::Fail => Err(BackupError::SpawnFailed(
                machine.name.clone(),
                "No such file or directory",
            )
            .into()),
        }
    }
}

#[derive(Default)]
pub struct FakeEventStore {
    records: Mutex<Vec<BackupRecord>>,
    failing: AtomicBool,
}

impl FakeEventStore {
    pub fn records(&self) -> Vec<BackupRecord> {
        self.records.lock().unwrap().clone()
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }
}

#[async_trait]
impl EventStore for FakeEventStore {
    async fn find_backup_events(
        &self,
        machine: &str,
        since: NaiveDateTime,
    ) -> Result<Vec<BackupRecord>, Error> {
        if self.failing.load(Ordering::SeqCst) {
            Err(DatabaseError::StatementExecutionFailed("database is locked"))?
        }
        let mut records: Vec<_> = self
            .records
            .lock()
            .unwrap()
            .iter()
            .filter(|record| record.machine == machine && record.timestamp >= since)
            .cloned()
            .collect();
        records.sort_by_key(|record| record.timestamp);
        Ok(records)
    }

    async fn record_backup_event(&self, record: &BackupRecord) -> Result<(), Error> {
        if self.failing.load(Ordering::SeqCst) {
            Err(DatabaseError::StatementExecutionFailed("database is locked"))?
        }
        self.records.lock().unwrap().push(record.clone());
        Ok(())
    }
}

#[derive(Default)]
pub struct FakeNotifier {
    messages: Mutex<Vec<(String, String)>>,
}

impl FakeNotifier {
    pub fn messages(&self) -> Vec<(String, String)> {
        self.messages.lock().unwrap().clone()
    }
}

impl NotificationSink for FakeNotifier {
    fn dispatch(&self, subject: &str, message: &str) {
        self.messages
            .lock()
            .unwrap()
            .push((subject.to_string(), message.to_string()));
    }
}
