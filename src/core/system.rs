use crate::core::backup::backup_directory::FsBackupDirectory;
use crate::core::backup::backup_executor::BackupExecutor;
use crate::core::backup::notifier::LogNotifier;
use crate::core::backup::rsync_runner::RsyncRunner;
use crate::core::infrastructure::app_config::AppConfig;
use crate::core::infrastructure::database_manager::DatabaseManager;
use crate::core::schedule::schedule_manager::ScheduleManager;
use crate::model::error::Error;
use crate::model::error::system::SystemError;
use crate::model::log::system::SystemLog;
use crate::platform::ReloadSignal;
use macros::log;
use std::sync::Arc;
use tokio::select;

pub struct System {
    database_manager: Arc<DatabaseManager>,
    schedule_manager: Arc<ScheduleManager>,
}

impl System {
    pub async fn new() -> Result<Self, Error> {
        log!(SystemLog::Initializing);
        let app_config = AppConfig::load().await?;
        let database_manager = Arc::new(DatabaseManager::new(&app_config).await?);

        let backup_directory = FsBackupDirectory::new(&app_config.backup_root);
        let runner = RsyncRunner::new(&app_config, backup_directory.clone());
        let executor = BackupExecutor::new(
            Arc::new(runner),
            Arc::new(backup_directory),
            database_manager.clone(),
            Arc::new(LogNotifier),
        );

        let schedule_manager = Arc::new(ScheduleManager::new(
            Arc::new(executor),
            app_config.wakeup_interval(),
        ));
        schedule_manager.start(app_config.machines()).await;
        schedule_manager
            .start_summary(app_config.summary_schedule())
            .await;

        log!(SystemLog::InitializeComplete);
        Ok(Self {
            database_manager,
            schedule_manager,
        })
    }

    /// Serves until Ctrl-C, reloading the machine list on the reload signal.
    pub async fn run(&self) -> Result<(), Error> {
        let mut reload_signal = ReloadSignal::new()?;
        log!(SystemLog::Online);
        loop {
            select! {
                result = tokio::signal::ctrl_c() => {
                    result.map_err(SystemError::SignalHandlerFailed)?;
                    return Ok(());
                }
                Some(()) = reload_signal.recv() => self.reload().await,
            }
        }
    }

    // Storage paths and the rsync setup stay as loaded at startup.
    async fn reload(&self) {
        log!(SystemLog::Reloading);
        let app_config = match AppConfig::load().await {
            Ok(app_config) => app_config,
            Err(err) => {
                log!(err);
                return;
            }
        };
        self.schedule_manager
            .reconfigure(app_config.machines())
            .await;
        self.schedule_manager
            .start_summary(app_config.summary_schedule())
            .await;
        log!(SystemLog::ReloadComplete {
            machines: self.schedule_manager.machine_names().len()
        });
    }

    pub async fn terminate(&self) {
        log!(SystemLog::Terminating);
        self.schedule_manager.shutdown().await;
        self.database_manager.close().await;
        log!(SystemLog::TerminateComplete);
    }
}
