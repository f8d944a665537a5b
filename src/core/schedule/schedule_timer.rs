use crate::core::retention::next_run::next_scheduled_time;
use crate::interface::core::runnable::Runnable;
use crate::interface::timer_job::TimerJob;
use crate::model::error::Error;
use crate::model::error::task::TaskError;
use crate::model::log::schedule::ScheduleLog;
use crate::model::schedule::Schedule;
use async_trait::async_trait;
use chrono::{Local, NaiveDateTime, TimeDelta};
use macros::log;
use std::sync::Arc;
use std::time::Duration;
use tokio::select;
use tokio::sync::oneshot::Receiver;
use tokio::time::sleep;

/// Wall clock time schedules are expressed in.
pub fn local_now() -> NaiveDateTime {
    Local::now().naive_local()
}

/// The instant `schedule` is next due at or after `now`. An instant already
/// served is never due again.
pub fn next_due(
    schedule: &Schedule,
    now: NaiveDateTime,
    served: Option<NaiveDateTime>,
) -> Result<NaiveDateTime, Error> {
    let from = match served {
        Some(served) => now.max(served + TimeDelta::seconds(1)),
        None => now,
    };
    next_scheduled_time(schedule, from)
}

/// Fires a job at every instant of its schedule until stopped.
pub struct ScheduleTimer<J: TimerJob> {
    job: Arc<J>,
    wakeup_interval: Duration,
    clock: fn() -> NaiveDateTime,
}

impl<J: TimerJob> ScheduleTimer<J> {
    /// `wakeup_interval` bounds a single sleep, after which the wall clock is
    /// read again.
    pub fn new(job: Arc<J>, wakeup_interval: Duration) -> Self {
        Self {
            job,
            wakeup_interval,
            clock: local_now,
        }
    }

    #[cfg(test)]
    pub fn with_clock(mut self, clock: fn() -> NaiveDateTime) -> Self {
        self.clock = clock;
        self
    }

    /// Sleeps until `due`. Returns false when shut down first.
    async fn wait_until(&self, due: NaiveDateTime, shutdown_rx: &mut Receiver<()>) -> bool {
        loop {
            let now = (self.clock)();
            if now >= due {
                return true;
            }
            let remaining = (due - now)
                .to_std()
                .unwrap_or_default()
                .min(self.wakeup_interval);
            select! {
                biased;
                _ = &mut *shutdown_rx => return false,
                _ = sleep(remaining) => {}
            }
        }
    }
}

#[async_trait]
impl<J: TimerJob> Runnable for ScheduleTimer<J> {
    fn task_name(&self) -> String {
        self.job.name().to_string()
    }

    async fn run_impl(self: Arc<Self>, mut shutdown_rx: Receiver<()>) {
        let name = self.job.name().to_string();
        let mut served = None;
        loop {
            let due = match next_due(self.job.schedule(), (self.clock)(), served) {
                Ok(due) => due,
                Err(err) => {
                    log!(err);
                    log!(TaskError::TimerHalted(name));
                    return;
                }
            };
            log!(ScheduleLog::TimerArmed {
                name: name.clone(),
                next: due
            });

            if !self.wait_until(due, &mut shutdown_rx).await {
                break;
            }
            let now = (self.clock)();
            self.job.fire(now.max(due)).await;
            served = Some(due);
        }
        log!(ScheduleLog::TimerStopped { name });
    }
}
