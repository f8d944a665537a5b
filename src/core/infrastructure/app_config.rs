use crate::model::config::{Config, ConfigTable, MachineConfig};
use crate::model::error::Error;
use crate::model::error::system::SystemError;
use crate::model::machine::Machine;
use crate::model::schedule::Schedule;
use crate::platform::CONFIG_PATH;
use macros::log;
use std::collections::HashSet;
use std::ops::Deref;
use std::time::Duration;

const MAX_WAKEUP_TIME: u64 = 24 * 60 * 60;

#[derive(Debug)]
pub struct AppConfig {
    config: Config,
    machines: Vec<MachineConfig>,
}

impl AppConfig {
    pub async fn load() -> Result<Self, Error> {
        let toml_string = tokio::fs::read_to_string(CONFIG_PATH)
            .await
            .map_err(SystemError::ConfigNotFound)?;
        Self::parse(&toml_string)
    }

    pub fn parse(toml_string: &str) -> Result<Self, Error> {
        let table = toml::from_str::<ConfigTable>(toml_string).map_err(SystemError::InvalidConfig)?;
        Self::validate(&table)?;
        Ok(Self {
            config: table.config,
            machines: table.machines,
        })
    }

    fn validate(table: &ConfigTable) -> Result<(), Error> {
        let config = &table.config;
        if config.backup_timeout == 0 {
            Err(SystemError::InvalidConfig("backup_timeout must be positive"))?
        }
        if !(1..=MAX_WAKEUP_TIME).contains(&config.default_wakeup_time) {
            Err(SystemError::InvalidConfig(
                "default_wakeup_time must be between 1 and 86400 seconds",
            ))?
        }
        if let Some(summary_schedule) = &config.summary_schedule {
            summary_schedule
                .parse::<Schedule>()
                .map_err(SystemError::InvalidConfig)?;
        }
        let mut names = HashSet::new();
        for machine in &table.machines {
            if !names.insert(machine.name.as_str()) {
                Err(SystemError::InvalidMachine(
                    machine.name.clone(),
                    "machine name is used more than once",
                ))?
            }
        }
        Ok(())
    }

    /// Machines whose definition is valid. Rejected ones are logged and left
    /// out so they do not prevent the others from running.
    pub fn machines(&self) -> Vec<Machine> {
        self.machines
            .iter()
            .cloned()
            .filter_map(|machine| match Machine::try_from(machine) {
                Ok(machine) => Some(machine),
                Err(err) => {
                    log!(err);
                    None
                }
            })
            .collect()
    }

    pub fn summary_schedule(&self) -> Option<Schedule> {
        // Validated on load.
        self.config
            .summary_schedule
            .as_ref()
            .and_then(|schedule| schedule.parse().ok())
    }

    pub fn wakeup_interval(&self) -> Duration {
        Duration::from_secs(self.config.default_wakeup_time)
    }
}

impl Deref for AppConfig {
    type Target = Config;

    fn deref(&self) -> &Self::Target {
        &self.config
    }
}
