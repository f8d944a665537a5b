//! Parser of the schedule language.
//!
//! ```text
//! DAYLIST(N)(|DAYLIST(N))*;[H:MM]
//! ```
//!
//! `DAYLIST` is a comma separated list of weekdays (`0`-`6`, 0 = Sunday) or
//! inclusive ranges `d-d` that wrap forward through the week, so `5-1` is
//! Friday to Monday. `N` is the number of most recent occurrences of those
//! weekdays to retain and is mandatory.

use crate::model::error::Error;
use crate::model::error::schedule::ScheduleError;
use crate::model::schedule::{DaySet, Schedule};
use std::str::FromStr;

impl FromStr for Schedule {
    type Err = Error;

    fn from_str(schedule: &str) -> Result<Self, Self::Err> {
        parse_schedule(schedule)
    }
}

pub fn parse_schedule(schedule: &str) -> Result<Schedule, Error> {
    let schedule = schedule.trim();
    let (day_sets, time) = schedule
        .split_once(';')
        .filter(|(_, time)| !time.contains(';'))
        .ok_or_else(|| ScheduleError::Malformed(schedule))?;

    let (hour, minute) = parse_time(time)?;
    let day_sets = day_sets
        .split('|')
        .map(parse_day_set)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Schedule::new(hour, minute, day_sets)?)
}

fn parse_time(time: &str) -> Result<(u32, u32), ScheduleError> {
    let invalid = || ScheduleError::InvalidTime(time);

    let inner = time
        .strip_prefix('[')
        .and_then(|time| time.strip_suffix(']'))
        .ok_or_else(invalid)?;
    let (hour, minute) = inner.split_once(':').ok_or_else(invalid)?;

    if !(1..=2).contains(&hour.len()) || minute.len() != 2 {
        Err(invalid())?
    }
    let hour = parse_digits(hour).filter(|hour| *hour < 24).ok_or_else(invalid)?;
    let minute = parse_digits(minute)
        .filter(|minute| *minute < 60)
        .ok_or_else(invalid)?;
    Ok((hour, minute))
}

fn parse_day_set(day_set: &str) -> Result<DaySet, ScheduleError> {
    let (weekdays, count) = day_set
        .strip_suffix(')')
        .and_then(|day_set| day_set.split_once('('))
        .ok_or_else(|| ScheduleError::MissingRetentionCount(day_set))?;

    let retention_count = parse_digits(count)
        .filter(|count| *count > 0)
        .ok_or_else(|| ScheduleError::InvalidRetentionCount(day_set))?;

    let mut days = Vec::new();
    for token in weekdays.split(',') {
        days.extend(parse_weekday_token(token)?);
    }
    DaySet::new(retention_count, days)
}

/// Expands `d` or `d-d` into the weekdays it covers.
fn parse_weekday_token(token: &str) -> Result<Vec<u8>, ScheduleError> {
    let invalid = || ScheduleError::InvalidWeekday(token);

    match token.as_bytes() {
        [day] => Ok(vec![weekday(*day).ok_or_else(invalid)?]),
        [first, b'-', last] => {
            let first = weekday(*first).ok_or_else(invalid)?;
            let last = weekday(*last).ok_or_else(invalid)?;
            let span = (last + 7 - first) % 7;
            Ok((0..=span).map(|offset| (first + offset) % 7).collect())
        }
        _ => Err(invalid()),
    }
}

fn weekday(byte: u8) -> Option<u8> {
    matches!(byte, b'0'..=b'6').then(|| byte - b'0')
}

fn parse_digits(digits: &str) -> Option<u32> {
    if digits.is_empty() || !digits.bytes().all(|byte| byte.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}
