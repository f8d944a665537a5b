use crate::core::retention::next_run::last_scheduled_time;
use crate::interface::notification_sink::NotificationSink;
use crate::interface::repository::backup_event::EventStore;
use crate::interface::timer_job::TimerJob;
use crate::model::backup_record::BackupRecord;
use crate::model::log::schedule::ScheduleLog;
use crate::model::machine::Machine;
use crate::model::schedule::Schedule;
use async_trait::async_trait;
use chrono::{NaiveDateTime, TimeDelta};
use dashmap::DashMap;
use macros::log;
use std::sync::Arc;

pub const SUMMARY_SUBJECT: &str = "Backup summary";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MachineSummary {
    pub machine: String,
    pub succeeded: usize,
    pub failed: usize,
    pub transferred: u64,
    pub last_success: Option<NaiveDateTime>,
}

impl MachineSummary {
    pub fn from_records(machine: &str, records: &[BackupRecord]) -> Self {
        let (succeeded, failed): (Vec<_>, Vec<_>) =
            records.iter().partition(|record| record.succeeded());
        Self {
            machine: machine.to_string(),
            succeeded: succeeded.len(),
            failed: failed.len(),
            transferred: succeeded.iter().map(|record| record.transfer_size).sum(),
            last_success: succeeded.iter().map(|record| record.timestamp).max(),
        }
    }
}

/// `unavailable` names machines whose events could not be read.
pub fn compose_summary(
    since: NaiveDateTime,
    summaries: &[MachineSummary],
    unavailable: &[String],
) -> String {
    let mut message = format!("Backups since {since}:");
    if summaries.is_empty() && unavailable.is_empty() {
        message.push_str("\nno machines configured");
    }
    for summary in summaries {
        message.push_str(&format!(
            "\n{}: {} succeeded, {} failed, {} bytes transferred",
            summary.machine, summary.succeeded, summary.failed, summary.transferred
        ));
        if let Some(last_success) = summary.last_success {
            message.push_str(&format!(", last success {last_success}"));
        }
    }
    for machine in unavailable {
        message.push_str(&format!("\n{machine}: backup events unavailable"));
    }
    message
}

/// Periodically reports what every machine did since the previous report.
pub struct SummaryReport {
    schedule: Schedule,
    machines: Arc<DashMap<String, Arc<Machine>>>,
    event_store: Arc<dyn EventStore>,
    notifier: Arc<dyn NotificationSink>,
}

impl SummaryReport {
    pub fn new(
        schedule: Schedule,
        machines: Arc<DashMap<String, Arc<Machine>>>,
        event_store: Arc<dyn EventStore>,
        notifier: Arc<dyn NotificationSink>,
    ) -> Self {
        Self {
            schedule,
            machines,
            event_store,
            notifier,
        }
    }

    async fn collect(&self, since: NaiveDateTime) -> (Vec<MachineSummary>, Vec<String>) {
        let mut names: Vec<String> = self
            .machines
            .iter()
            .map(|entry| entry.key().clone())
            .collect();
        names.sort_unstable();

        let mut summaries = Vec::with_capacity(names.len());
        let mut unavailable = Vec::new();
        for name in names {
            match self.event_store.find_backup_events(&name, since).await {
                Ok(records) => summaries.push(MachineSummary::from_records(&name, &records)),
                Err(err) => {
                    log!(err);
                    unavailable.push(name);
                }
            }
        }
        (summaries, unavailable)
    }
}

#[async_trait]
impl TimerJob for SummaryReport {
    fn name(&self) -> &str {
        "summary"
    }

    fn schedule(&self) -> &Schedule {
        &self.schedule
    }

    async fn fire(&self, now: NaiveDateTime) {
        let since = match last_scheduled_time(&self.schedule, now - TimeDelta::seconds(1)) {
            Ok(since) => since,
            Err(err) => {
                log!(err);
                return;
            }
        };
        let (summaries, unavailable) = self.collect(since).await;
        self.notifier.dispatch(
            SUMMARY_SUBJECT,
            &compose_summary(since, &summaries, &unavailable),
        );
        log!(ScheduleLog::SummaryDispatched {
            machines: summaries.len() + unavailable.len()
        });
    }
}
