use crate::core::retention::weekday_of;
use crate::model::error::Error;
use crate::model::error::schedule::ScheduleError;
use crate::model::schedule::Schedule;
use chrono::{Days, NaiveDateTime};

/// The earliest scheduled instant at or after `now`.
pub fn next_scheduled_time(
    schedule: &Schedule,
    now: NaiveDateTime,
) -> Result<NaiveDateTime, Error> {
    let today = now.date();
    let first_offset = if now <= today.and_time(schedule.time()) { 0 } else { 1 };
    let today_weekday = weekday_of(today);

    let offset = schedule
        .day_sets()
        .iter()
        .filter_map(|day_set| {
            (first_offset..first_offset + 7)
                .find(|offset: &u8| day_set.contains((today_weekday + offset % 7) % 7))
        })
        .min()
        .ok_or(ScheduleError::EmptySchedule)?;

    Ok((today + Days::new(u64::from(offset))).and_time(schedule.time()))
}

/// The latest scheduled instant at or before `now`.
pub fn last_scheduled_time(
    schedule: &Schedule,
    now: NaiveDateTime,
) -> Result<NaiveDateTime, Error> {
    let today = now.date();
    let first_offset = if today.and_time(schedule.time()) <= now { 0 } else { 1 };
    let today_weekday = weekday_of(today);

    let offset = schedule
        .day_sets()
        .iter()
        .filter_map(|day_set| {
            (first_offset..first_offset + 7)
                .find(|offset: &u8| day_set.contains((today_weekday + 7 - offset % 7) % 7))
        })
        .min()
        .ok_or(ScheduleError::EmptySchedule)?;

    Ok((today - Days::new(u64::from(offset))).and_time(schedule.time()))
}
