use crate::interface::backup_directory::BackupDirectory;
use crate::model::backup_record::{BACKUP_NAME_FORMAT, PARTIAL_SUFFIX};
use crate::model::error::Error;
use crate::model::error::io::IOError;
use async_trait::async_trait;
use chrono::NaiveDateTime;
use std::io::ErrorKind;
use std::path::PathBuf;
use tokio::fs;

/// Backups stored as `<backup_root>/<machine>/<timestamp>` directories.
#[derive(Debug, Clone)]
pub struct FsBackupDirectory {
    backup_root: PathBuf,
}

impl FsBackupDirectory {
    pub fn new(backup_root: impl Into<PathBuf>) -> Self {
        Self {
            backup_root: backup_root.into(),
        }
    }

    pub fn machine_path(&self, machine: &str) -> PathBuf {
        self.backup_root.join(machine)
    }

    pub fn backup_path(&self, machine: &str, backup: NaiveDateTime) -> PathBuf {
        self.machine_path(machine)
            .join(backup.format(BACKUP_NAME_FORMAT).to_string())
    }

    pub fn partial_path(&self, machine: &str, backup: NaiveDateTime) -> PathBuf {
        self.machine_path(machine).join(format!(
            "{}{}",
            backup.format(BACKUP_NAME_FORMAT),
            PARTIAL_SUFFIX
        ))
    }
}

#[async_trait]
impl BackupDirectory for FsBackupDirectory {
    async fn list_backups(&self, machine: &str) -> Result<Vec<NaiveDateTime>, Error> {
        let path = self.machine_path(machine);
        let mut entries = match fs::read_dir(&path).await {
            Ok(entries) => entries,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => Err(IOError::ReadDirectoryFailed(path.clone(), err))?,
        };

        let mut backups = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|err| IOError::ReadDirectoryFailed(path.clone(), err))?
        {
            let is_dir = entry
                .file_type()
                .await
                .map(|file_type| file_type.is_dir())
                .unwrap_or(false);
            if !is_dir {
                continue;
            }
            let file_name = entry.file_name();
            let Some(name) = file_name.to_str() else {
                continue;
            };
            if let Ok(backup) = NaiveDateTime::parse_from_str(name, BACKUP_NAME_FORMAT) {
                backups.push(backup);
            }
        }
        backups.sort_unstable();
        Ok(backups)
    }

    async fn remove(&self, machine: &str, backup: NaiveDateTime) -> Result<(), Error> {
        let path = self.backup_path(machine, backup);
        match fs::remove_dir_all(&path).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(IOError::DeleteDirectoryFailed(path, err))?,
        }
    }
}
