use crate::core::retention::weekday_of;
use crate::model::bucket::Bucket;
use crate::model::schedule::{DaySet, Schedule};
use chrono::{Days, NaiveDate, NaiveDateTime, NaiveTime};
use std::collections::BTreeSet;

/// Computes the buckets that should hold a backup at `now`, ascending and
/// without duplicate dates.
pub fn compute_buckets(schedule: &Schedule, now: NaiveDateTime) -> Vec<Bucket> {
    let include_day = now.time() >= schedule.time();

    let dates = schedule
        .day_sets()
        .iter()
        .flat_map(|day_set| day_set_dates(day_set, now.date(), include_day, schedule.time()))
        .collect::<BTreeSet<_>>();

    dates.into_iter().map(Bucket::new).collect()
}

/// The `retention_count` most recent occurrences of the day set's weekdays,
/// newest first.
fn day_set_dates(
    day_set: &DaySet,
    today: NaiveDate,
    include_day: bool,
    time: NaiveTime,
) -> Vec<NaiveDateTime> {
    let weekdays = day_set.weekdays();
    let today_weekday = weekday_of(today);
    let first_offset = if include_day { 0 } else { 1 };

    let start = (first_offset..first_offset + 7).find_map(|offset: u8| {
        let weekday = (today_weekday + 7 - offset % 7) % 7;
        weekdays
            .iter()
            .position(|day| *day == weekday)
            .map(|index| (index, offset))
    });
    let Some((mut index, offset)) = start else {
        unreachable!("day set {day_set} matches no weekday within a week");
    };

    let mut date = today.checked_sub_days(Days::new(u64::from(offset)));
    let mut dates = Vec::new();
    for _ in 0..day_set.retention_count() {
        // Occurrences before the earliest representable date do not exist.
        let Some(current) = date else {
            break;
        };
        dates.push(current.and_time(time));
        let previous = (index + weekdays.len() - 1) % weekdays.len();
        let gap = match (weekdays[index] + 7 - weekdays[previous]) % 7 {
            0 => 7,
            gap => gap,
        };
        date = current.checked_sub_days(Days::new(u64::from(gap)));
        index = previous;
    }
    dates
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::retention::next_run::last_scheduled_time;
    use chrono::Duration;

    fn at(year: i32, month: u32, day: u32, hour: u32, minute: u32, second: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(year, month, day)
            .unwrap()
            .and_hms_opt(hour, minute, second)
            .unwrap()
    }

    fn dates(buckets: &[Bucket]) -> Vec<NaiveDateTime> {
        buckets.iter().map(|bucket| bucket.date).collect()
    }

    #[test]
    fn merges_overlapping_day_sets() {
        let schedule: Schedule = "1,3,5(12)|0-6(7);[0:00]".parse().unwrap();
        let buckets = compute_buckets(&schedule, at(2015, 1, 1, 0, 0, 0));

        let expected = [
            (2014, 12, 5),
            (2014, 12, 8),
            (2014, 12, 10),
            (2014, 12, 12),
            (2014, 12, 15),
            (2014, 12, 17),
            (2014, 12, 19),
            (2014, 12, 22),
            (2014, 12, 24),
            (2014, 12, 26),
            (2014, 12, 27),
            (2014, 12, 28),
            (2014, 12, 29),
            (2014, 12, 30),
            (2014, 12, 31),
            (2015, 1, 1),
        ]
        .map(|(year, month, day)| at(year, month, day, 0, 0, 0));
        assert_eq!(dates(&buckets), expected);
        assert!(buckets.iter().all(|bucket| bucket.backup.is_none()));
    }

    #[test]
    fn daily_and_weekly_sets_share_a_monday() {
        let schedule: Schedule = "0,1,2,3,4,5,6(7)|1(5);[0:00]".parse().unwrap();
        let buckets = compute_buckets(&schedule, at(2014, 12, 12, 0, 0, 0));

        let expected = [
            (11, 10),
            (11, 17),
            (11, 24),
            (12, 1),
            (12, 6),
            (12, 7),
            (12, 8),
            (12, 9),
            (12, 10),
            (12, 11),
            (12, 12),
        ]
        .map(|(month, day)| at(2014, month, day, 0, 0, 0));
        assert_eq!(dates(&buckets), expected);
    }

    #[test]
    fn today_counts_only_from_the_scheduled_time() {
        let schedule: Schedule = "1(2);[9:15]".parse().unwrap();

        let before = compute_buckets(&schedule, at(2018, 5, 21, 9, 14, 59));
        assert_eq!(
            dates(&before),
            [at(2018, 5, 7, 9, 15, 0), at(2018, 5, 14, 9, 15, 0)]
        );

        let on_time = compute_buckets(&schedule, at(2018, 5, 21, 9, 15, 0));
        assert_eq!(
            dates(&on_time),
            [at(2018, 5, 14, 9, 15, 0), at(2018, 5, 21, 9, 15, 0)]
        );
    }

    #[test]
    fn buckets_use_schedule_time_with_zero_seconds() {
        let schedule: Schedule = "0-6(3);[4:30]".parse().unwrap();
        let buckets = compute_buckets(&schedule, at(2020, 2, 29, 13, 45, 31));
        assert_eq!(
            dates(&buckets),
            [
                at(2020, 2, 27, 4, 30, 0),
                at(2020, 2, 28, 4, 30, 0),
                at(2020, 2, 29, 4, 30, 0),
            ]
        );
    }

    #[test]
    fn single_weekday_steps_back_whole_weeks() {
        let schedule: Schedule = "3(3);[12:00]".parse().unwrap();
        // 2016-04-29 is a Friday
        let buckets = compute_buckets(&schedule, at(2016, 4, 29, 8, 0, 0));
        assert_eq!(
            dates(&buckets),
            [
                at(2016, 4, 13, 12, 0, 0),
                at(2016, 4, 20, 12, 0, 0),
                at(2016, 4, 27, 12, 0, 0),
            ]
        );
    }

    #[test]
    fn reproduces_a_known_bucket_layout() {
        let schedule: Schedule = "1,3-5(8)|6(2);[3:00]".parse().unwrap();
        let buckets = compute_buckets(&schedule, at(2016, 4, 29, 3, 0, 0));
        let expected =
            [16, 18, 20, 21, 22, 23, 25, 27, 28, 29].map(|day| at(2016, 4, day, 3, 0, 0));
        assert_eq!(dates(&buckets), expected);
    }

    #[test]
    fn buckets_are_ascending_bounded_and_end_at_the_last_run() {
        let schedules = [
            "0,1,2,3,4,5,6(7)|1(5);[0:00]",
            "1,3,5(12)|0-6(7);[23:59]",
            "5-1(4)|2(3)|6(1);[9:15]",
            "0(1);[12:30]",
        ];
        let start = at(2019, 12, 28, 0, 0, 0);
        for text in schedules {
            let schedule: Schedule = text.parse().unwrap();
            for step in 0..(24 * 16) {
                let now = start + Duration::minutes(step * 37);
                let buckets = compute_buckets(&schedule, now);

                assert!(!buckets.is_empty());
                let retained: u32 = schedule.day_sets().iter().map(DaySet::retention_count).sum();
                assert!(buckets.len() <= retained as usize);
                assert!(buckets.windows(2).all(|pair| pair[0].date < pair[1].date));
                assert_eq!(
                    buckets.last().map(|bucket| bucket.date),
                    Some(last_scheduled_time(&schedule, now).unwrap()),
                    "{text} at {now}"
                );
            }
        }
    }

    #[test]
    fn disjoint_day_sets_yield_every_retention_point() {
        let schedule: Schedule = "1(4)|3(2)|5(3);[6:00]".parse().unwrap();
        let buckets = compute_buckets(&schedule, at(2021, 6, 15, 6, 0, 0));
        assert_eq!(buckets.len(), 9);
    }

    #[test]
    fn largest_retention_count_is_walked_in_full() {
        let schedule: Schedule = "0(10000);[0:00]".parse().unwrap();
        let buckets = compute_buckets(&schedule, at(2024, 1, 1, 0, 0, 0));
        assert_eq!(buckets.len(), 10_000);
        assert_eq!(buckets.last().map(|bucket| bucket.date), Some(at(2023, 12, 31, 0, 0, 0)));
    }

    #[test]
    fn walk_stops_at_the_earliest_date() {
        let schedule: Schedule = "0-6(10000);[0:00]".parse().unwrap();
        let now = NaiveDate::MIN
            .checked_add_days(Days::new(20))
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let buckets = compute_buckets(&schedule, now);

        assert_eq!(buckets.len(), 21);
        assert_eq!(buckets[0].date, NaiveDate::MIN.and_hms_opt(0, 0, 0).unwrap());
    }
}
