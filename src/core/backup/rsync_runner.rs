use crate::core::backup::backup_directory::FsBackupDirectory;
use crate::interface::backup_directory::BackupDirectory;
use crate::interface::backup_runner::BackupRunner;
use crate::model::backup_record::BackupOutcome;
use crate::model::config::Config;
use crate::model::error::Error;
use crate::model::error::backup::BackupError;
use crate::model::error::io::IOError;
use crate::model::machine::Machine;
use async_trait::async_trait;
use chrono::NaiveDateTime;
use macros::log;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::{Duration, Instant};
use tokio::fs;
use tokio::process::Command;

const TRANSFERRED_SIZE_LABEL: &str = "Total transferred file size:";

/// Pulls `machine.source` into a fresh timestamped directory, hard linking
/// unchanged files against the newest finished backup.
pub struct RsyncRunner {
    rsync_binary: String,
    backup_directory: FsBackupDirectory,
    timeout: Duration,
}

impl RsyncRunner {
    pub fn new(config: &Config, backup_directory: FsBackupDirectory) -> Self {
        Self {
            rsync_binary: config.rsync_binary.clone(),
            backup_directory,
            timeout: Duration::from_secs(config.backup_timeout),
        }
    }

    fn command(&self, machine: &Machine, destination: &Path, link_dest: Option<&Path>) -> Command {
        let mut command = Command::new(&self.rsync_binary);
        command.args(rsync_arguments(machine, destination, link_dest));
        command
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        command
    }

    async fn newest_backup_path(&self, machine: &str) -> Result<Option<PathBuf>, Error> {
        let Some(newest) = self.backup_directory.list_backups(machine).await?.pop() else {
            return Ok(None);
        };
        // rsync resolves a relative --link-dest against the destination.
        let path = self.backup_directory.backup_path(machine, newest);
        Ok(fs::canonicalize(&path).await.ok())
    }

    async fn discard_partial(&self, partial: &Path) {
        match fs::remove_dir_all(partial).await {
            Ok(()) => {}
            Err(err) if err.kind() == ErrorKind::NotFound => {}
            Err(err) => log!(IOError::DeleteDirectoryFailed(partial, err)),
        }
    }
}

fn rsync_arguments(machine: &Machine, destination: &Path, link_dest: Option<&Path>) -> Vec<String> {
    let mut arguments = vec![
        "-a".to_string(),
        "--delete".to_string(),
        "--numeric-ids".to_string(),
        "--stats".to_string(),
    ];
    if let Some(link_dest) = link_dest {
        arguments.push(format!("--link-dest={}", link_dest.display()));
    }
    arguments.extend(
        machine
            .inclusion_patterns
            .iter()
            .map(|pattern| format!("--include={pattern}")),
    );
    arguments.extend(
        machine
            .exclusion_patterns
            .iter()
            .map(|pattern| format!("--exclude={pattern}")),
    );
    arguments.push(machine.source.clone());
    arguments.push(format!("{}/", destination.display()));
    arguments
}

/// Reads the `--stats` line `Total transferred file size: 1,234 bytes`.
fn parse_transfer_size(output: &str) -> u64 {
    output
        .lines()
        .find_map(|line| line.trim().strip_prefix(TRANSFERRED_SIZE_LABEL))
        .and_then(|value| value.split_whitespace().next())
        .and_then(|value| value.replace([',', '.'], "").parse().ok())
        .unwrap_or(0)
}

#[async_trait]
impl BackupRunner for RsyncRunner {
    async fn run(
        &self,
        machine: &Machine,
        started_at: NaiveDateTime,
    ) -> Result<BackupOutcome, Error> {
        let machine_path = self.backup_directory.machine_path(&machine.name);
        fs::create_dir_all(&machine_path)
            .await
            .map_err(|err| IOError::CreateDirectoryFailed(machine_path.clone(), err))?;

        let link_dest = self.newest_backup_path(&machine.name).await?;
        let partial = self.backup_directory.partial_path(&machine.name, started_at);

        let clock = Instant::now();
        let child = self
            .command(machine, &partial, link_dest.as_deref())
            .spawn()
            .map_err(|err| BackupError::SpawnFailed(machine.name.clone(), err))?;

        // Dropping the pending future on timeout kills the child.
        let output = match tokio::time::timeout(self.timeout, child.wait_with_output()).await {
            Ok(output) => {
                output.map_err(|err| BackupError::SpawnFailed(machine.name.clone(), err))?
            }
            Err(_) => {
                self.discard_partial(&partial).await;
                Err(BackupError::Timeout(machine.name.clone(), self.timeout.as_secs()))?
            }
        };
        let duration_ms = u64::try_from(clock.elapsed().as_millis()).unwrap_or(u64::MAX);

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);
        let exit_code = output.status.code();

        if exit_code == Some(0) {
            let finished = self.backup_directory.backup_path(&machine.name, started_at);
            fs::rename(&partial, &finished)
                .await
                .map_err(|err| BackupError::FinalizeFailed(machine.name.clone(), err))?;
        } else {
            self.discard_partial(&partial).await;
        }

        Ok(BackupOutcome {
            exit_code,
            transfer_size: parse_transfer_size(&stdout),
            output: format!("{stdout}{stderr}"),
            duration_ms,
        })
    }
}
