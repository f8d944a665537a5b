use chrono::NaiveDateTime;
use macros::loggable;

loggable! {
    ScheduleLog {
        #[error("Timer of {name} armed for {next}")]
        TimerArmed { name: String, next: NaiveDateTime } => tracing::Level::INFO,

        #[error("Timer of {name} stopped")]
        TimerStopped { name: String } => tracing::Level::INFO,

        #[error("Cycle of {machine}: {filled}/{buckets} buckets filled, {unmatched} unmatched")]
        CycleEvaluated {
            machine: String,
            buckets: usize,
            filled: usize,
            unmatched: usize,
        } => tracing::Level::INFO,

        #[error("Cycle of {machine} skipped")]
        CycleSkipped { machine: String } => tracing::Level::WARN,

        #[error("Machine {machine} scheduled with {schedule}")]
        MachineStarted { machine: String, schedule: String } => tracing::Level::INFO,

        #[error("Machine {machine} unscheduled")]
        MachineStopped { machine: String } => tracing::Level::INFO,

        #[error("Summary dispatched for {machines} machines")]
        SummaryDispatched { machines: usize } => tracing::Level::INFO,
    }
}
