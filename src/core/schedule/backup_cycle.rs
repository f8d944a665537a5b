use crate::core::backup::backup_executor::BackupExecutor;
use crate::core::retention::backup_matcher::match_backups;
use crate::core::retention::bucket_calculator::compute_buckets;
use crate::interface::timer_job::TimerJob;
use crate::model::backup_record::BackupReason;
use crate::model::error::Error;
use crate::model::log::schedule::ScheduleLog;
use crate::model::machine::Machine;
use crate::model::schedule::Schedule;
use async_trait::async_trait;
use chrono::NaiveDateTime;
use macros::log;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleReport {
    pub buckets: usize,
    pub filled: usize,
    pub backup_started: bool,
    pub pruned: Vec<NaiveDateTime>,
}

/// One retention pass over a machine: start a backup when the newest bucket
/// is empty and prune what no bucket retains.
pub struct BackupCycle {
    machine: Arc<Machine>,
    executor: Arc<BackupExecutor>,
}

impl BackupCycle {
    pub fn new(machine: Arc<Machine>, executor: Arc<BackupExecutor>) -> Self {
        Self { machine, executor }
    }

    pub async fn run(&self, now: NaiveDateTime) -> Result<CycleReport, Error> {
        let buckets = compute_buckets(&self.machine.schedule, now);
        let backups = self
            .executor
            .backup_directory()
            .list_backups(&self.machine.name)
            .await?;
        let result = match_backups(&buckets, &backups);
        log!(ScheduleLog::CycleEvaluated {
            machine: self.machine.name.clone(),
            buckets: result.buckets.len(),
            filled: result.filled_count(),
            unmatched: result.unmatched.len(),
        });

        let backup_started = if result.newest_is_unfilled() {
            self.executor
                .start_backup(self.machine.clone(), BackupReason::Scheduled, now)
                .await
        } else {
            false
        };
        self.executor
            .prune(&self.machine.name, result.unmatched.clone())
            .await;

        Ok(CycleReport {
            buckets: result.buckets.len(),
            filled: result.filled_count(),
            backup_started,
            pruned: result.unmatched,
        })
    }
}

#[async_trait]
impl TimerJob for BackupCycle {
    fn name(&self) -> &str {
        &self.machine.name
    }

    fn schedule(&self) -> &Schedule {
        &self.machine.schedule
    }

    async fn fire(&self, now: NaiveDateTime) {
        if let Err(err) = self.run(now).await {
            log!(err);
            log!(ScheduleLog::CycleSkipped {
                machine: self.machine.name.clone()
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::schedule::schedule_timer::ScheduleTimer;
    use crate::core::test_support::{
        FakeBackupDirectory, FakeBackupRunner, FakeEventStore, FakeNotifier, machine, time,
    };
    use crate::interface::core::runnable::Runnable;
    use std::time::Duration;

    struct Fixture {
        runner: Arc<FakeBackupRunner>,
        backup_directory: Arc<FakeBackupDirectory>,
        executor: Arc<BackupExecutor>,
    }

    fn fixture(runner: FakeBackupRunner) -> Fixture {
        let runner = Arc::new(runner);
        let backup_directory = Arc::new(FakeBackupDirectory::default());
        let executor = Arc::new(BackupExecutor::new(
            runner.clone(),
            backup_directory.clone(),
            Arc::new(FakeEventStore::default()),
            Arc::new(FakeNotifier::default()),
        ));
        Fixture {
            runner,
            backup_directory,
            executor,
        }
    }

    fn april_machine() -> Arc<Machine> {
        Arc::new(machine("web01", "1,3-5(8)|6(2);[3:00]"))
    }

    #[tokio::test]
    async fn empty_directory_triggers_one_backup_and_no_prune() {
        let fixture = fixture(FakeBackupRunner::succeeding());
        let cycle = BackupCycle::new(april_machine(), fixture.executor.clone());
        let now = time(2016, 4, 29, 3, 0);

        let report = cycle.run(now).await.unwrap();
        fixture.executor.wait_idle().await;

        assert_eq!(report.buckets, 10);
        assert_eq!(report.filled, 0);
        assert!(report.backup_started);
        assert!(report.pruned.is_empty());
        assert_eq!(fixture.runner.runs(), vec![("web01".to_string(), now)]);
        assert!(fixture.backup_directory.removed().is_empty());
    }

    #[tokio::test]
    async fn filled_newest_bucket_prunes_without_backup() {
        let fixture = fixture(FakeBackupRunner::succeeding());
        fixture.backup_directory.insert(
            "web01",
            [
                time(2016, 4, 29, 3, 5),
                time(2016, 4, 28, 3, 5),
                time(2016, 4, 10, 3, 5),
            ],
        );
        let cycle = BackupCycle::new(april_machine(), fixture.executor.clone());

        let report = cycle.run(time(2016, 4, 29, 12, 0)).await.unwrap();
        fixture.executor.wait_idle().await;

        assert!(!report.backup_started);
        assert_eq!(report.filled, 2);
        assert_eq!(report.pruned, vec![time(2016, 4, 10, 3, 5)]);
        assert!(fixture.runner.runs().is_empty());
        assert_eq!(
            fixture.backup_directory.removed(),
            vec![("web01".to_string(), time(2016, 4, 10, 3, 5))]
        );
    }

    #[tokio::test]
    async fn running_backup_is_not_started_twice() {
        let fixture = fixture(FakeBackupRunner::gated());
        let cycle = BackupCycle::new(april_machine(), fixture.executor.clone());

        assert!(cycle.run(time(2016, 4, 29, 3, 0)).await.unwrap().backup_started);
        fixture.runner.wait_started(1).await;
        assert!(!cycle.run(time(2016, 4, 30, 3, 0)).await.unwrap().backup_started);

        fixture.runner.release();
        fixture.executor.wait_idle().await;
        assert_eq!(fixture.runner.runs().len(), 1);
    }

    #[tokio::test]
    async fn listing_failure_skips_the_cycle() {
        let fixture = fixture(FakeBackupRunner::succeeding());
        fixture.backup_directory.set_failing(true);
        let cycle = BackupCycle::new(april_machine(), fixture.executor.clone());

        assert!(cycle.run(time(2016, 4, 29, 3, 0)).await.is_err());
        cycle.fire(time(2016, 4, 29, 3, 0)).await;
        fixture.executor.wait_idle().await;
        assert!(fixture.runner.runs().is_empty());
    }

    #[tokio::test]
    async fn timer_stays_armed_after_listing_failure() {
        let fixture = fixture(FakeBackupRunner::succeeding());
        fixture.backup_directory.set_failing(true);
        let cycle = Arc::new(BackupCycle::new(april_machine(), fixture.executor.clone()));
        let timer = ScheduleTimer::new(cycle, Duration::from_millis(5))
            .with_clock(|| time(2016, 4, 29, 3, 0));
        let handle = Arc::new(timer).run();

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(!handle.is_finished());
        handle.stop().await.unwrap();
        assert!(fixture.runner.runs().is_empty());
    }
}
