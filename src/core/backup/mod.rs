pub mod backup_directory;
pub mod backup_executor;
pub mod notifier;
pub mod rsync_runner;
