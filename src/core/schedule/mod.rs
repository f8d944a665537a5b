pub mod backup_cycle;
pub mod schedule_manager;
pub mod schedule_timer;
pub mod summary_report;
