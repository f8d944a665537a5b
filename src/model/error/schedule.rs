use macros::traceable;

traceable! {
    ScheduleError {
        #[no_source]
        #[error("Schedule {schedule:?} is not of the form DAYS(N)|...;[H:MM]")]
        Malformed { schedule: String } => tracing::Level::ERROR,

        #[no_source]
        #[error("Invalid time {time:?}, expected [H:MM]")]
        InvalidTime { time: String } => tracing::Level::ERROR,

        #[no_source]
        #[error("Day set {day_set:?} has no (N) retention count")]
        MissingRetentionCount { day_set: String } => tracing::Level::ERROR,

        #[no_source]
        #[error("Day set {day_set:?} has an invalid retention count")]
        InvalidRetentionCount { day_set: String } => tracing::Level::ERROR,

        #[no_source]
        #[error("Day set {day_set:?} retains more than {max} occurrences")]
        RetentionCountTooLarge { day_set: String, max: u32 } => tracing::Level::ERROR,

        #[no_source]
        #[error("Invalid weekday {token:?}, expected d or d-d with d in 0-6")]
        InvalidWeekday { token: String } => tracing::Level::ERROR,

        #[no_source]
        #[error("Weekday {weekday} is listed more than once in a day set")]
        DuplicateWeekday { weekday: u8 } => tracing::Level::ERROR,

        #[no_source]
        #[error("Day set has no weekdays")]
        EmptyDaySet => tracing::Level::ERROR,

        #[no_source]
        #[error("Schedule has no day sets")]
        EmptySchedule => tracing::Level::ERROR,
    }
}
