use crate::model::schedule::Schedule;
use async_trait::async_trait;
use chrono::NaiveDateTime;

/// Work a `ScheduleTimer` performs at every scheduled instant.
#[async_trait]
pub trait TimerJob: Send + Sync + 'static {
    fn name(&self) -> &str;

    fn schedule(&self) -> &Schedule;

    async fn fire(&self, now: NaiveDateTime);
}
