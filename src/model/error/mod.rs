pub mod backup;
pub mod database;
pub mod io;
pub mod schedule;
pub mod system;
pub mod task;

use crate::model::error::backup::BackupError;
use crate::model::error::database::DatabaseError;
use crate::model::error::io::IOError;
use crate::model::error::schedule::ScheduleError;
use crate::model::error::system::SystemError;
use crate::model::error::task::TaskError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, thiserror::Error, Serialize, Deserialize)]
pub enum Error {
    #[error(transparent)]
    Backup(BackupError),
    #[error(transparent)]
    Database(DatabaseError),
    #[error(transparent)]
    IO(IOError),
    #[error(transparent)]
    Schedule(ScheduleError),
    #[error(transparent)]
    System(SystemError),
    #[error(transparent)]
    Task(TaskError),
}

impl Error {
    pub fn level(&self) -> tracing::Level {
        match self {
            Self::Backup(error) => error.level(),
            Self::Database(error) => error.level(),
            Self::IO(error) => error.level(),
            Self::Schedule(error) => error.level(),
            Self::System(error) => error.level(),
            Self::Task(error) => error.level(),
        }
    }
}

impl From<BackupError> for Error {
    fn from(error: BackupError) -> Self {
        Self::Backup(error)
    }
}

impl From<DatabaseError> for Error {
    fn from(error: DatabaseError) -> Self {
        Self::Database(error)
    }
}

impl From<IOError> for Error {
    fn from(error: IOError) -> Self {
        Self::IO(error)
    }
}

impl From<ScheduleError> for Error {
    fn from(error: ScheduleError) -> Self {
        Self::Schedule(error)
    }
}

impl From<SystemError> for Error {
    fn from(error: SystemError) -> Self {
        Self::System(error)
    }
}

impl From<TaskError> for Error {
    fn from(error: TaskError) -> Self {
        Self::Task(error)
    }
}
