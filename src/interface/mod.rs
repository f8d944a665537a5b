pub mod backup_directory;
pub mod backup_runner;
pub mod core;
pub mod notification_sink;
pub mod repository;
pub mod timer_job;
