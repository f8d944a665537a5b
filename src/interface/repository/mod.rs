pub mod backup_event;
