use crate::model::error::schedule::ScheduleError;
use chrono::{NaiveTime, Timelike};
use std::fmt;

/// Upper bound of a day set's retention count.
pub const MAX_RETENTION_COUNT: u32 = 10_000;

/// A group of weekdays together with the number of most recent occurrences
/// of those weekdays to retain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DaySet {
    retention_count: u32,
    weekdays: Vec<u8>,
}

impl DaySet {
    /// Weekdays are 0-6 with 0 = Sunday. They are stored sorted ascending.
    pub fn new(
        retention_count: u32,
        weekdays: impl IntoIterator<Item = u8>,
    ) -> Result<Self, ScheduleError> {
        let mut sorted = Vec::new();
        for weekday in weekdays {
            if weekday > 6 {
                Err(ScheduleError::InvalidWeekday(weekday.to_string()))?
            }
            if sorted.contains(&weekday) {
                Err(ScheduleError::DuplicateWeekday(weekday))?
            }
            sorted.push(weekday);
        }
        if sorted.is_empty() {
            Err(ScheduleError::EmptyDaySet)?
        }
        sorted.sort_unstable();
        let day_set = Self {
            retention_count,
            weekdays: sorted,
        };
        if retention_count == 0 {
            Err(ScheduleError::InvalidRetentionCount(day_set.to_string()))?
        }
        if retention_count > MAX_RETENTION_COUNT {
            Err(ScheduleError::RetentionCountTooLarge(
                day_set.to_string(),
                MAX_RETENTION_COUNT,
            ))?
        }
        Ok(day_set)
    }

    pub fn retention_count(&self) -> u32 {
        self.retention_count
    }

    pub fn weekdays(&self) -> &[u8] {
        &self.weekdays
    }

    pub fn contains(&self, weekday: u8) -> bool {
        self.weekdays.binary_search(&weekday).is_ok()
    }
}

impl fmt::Display for DaySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let weekdays = self
            .weekdays
            .iter()
            .map(u8::to_string)
            .collect::<Vec<_>>()
            .join(",");
        write!(f, "{}({})", weekdays, self.retention_count)
    }
}

/// A parsed schedule: the daily time every bucket and run happens at, plus
/// the day sets defining which days are retained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schedule {
    time: NaiveTime,
    day_sets: Vec<DaySet>,
}

impl Schedule {
    pub fn new(hour: u32, minute: u32, day_sets: Vec<DaySet>) -> Result<Self, ScheduleError> {
        let time = NaiveTime::from_hms_opt(hour, minute, 0)
            .ok_or_else(|| ScheduleError::InvalidTime(format!("[{hour}:{minute:02}]")))?;
        if day_sets.is_empty() {
            Err(ScheduleError::EmptySchedule)?
        }
        Ok(Self { time, day_sets })
    }

    pub fn time(&self) -> NaiveTime {
        self.time
    }

    pub fn day_sets(&self) -> &[DaySet] {
        &self.day_sets
    }
}

impl fmt::Display for Schedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let day_sets = self
            .day_sets
            .iter()
            .map(DaySet::to_string)
            .collect::<Vec<_>>()
            .join("|");
        write!(
            f,
            "{};[{}:{:02}]",
            day_sets,
            self.time.hour(),
            self.time.minute()
        )
    }
}
