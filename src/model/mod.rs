pub mod backup_record;
pub mod bucket;
pub mod config;
pub mod error;
pub mod log;
pub mod machine;
pub mod schedule;
pub mod task_handle;
