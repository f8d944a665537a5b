pub mod backup_matcher;
pub mod bucket_calculator;
pub mod next_run;
pub mod schedule_parser;

use chrono::{Datelike, NaiveDate};

/// Weekday number with 0 = Sunday, as used by schedules.
fn weekday_of(date: NaiveDate) -> u8 {
    // num_days_from_sunday is always below 7
    date.weekday().num_days_from_sunday() as u8
}
