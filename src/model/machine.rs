use crate::model::config::MachineConfig;
use crate::model::error::Error;
use crate::model::error::system::SystemError;
use crate::model::schedule::Schedule;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Machine {
    pub name: String,
    pub source: String,
    pub schedule: Schedule,
    pub inclusion_patterns: Vec<String>,
    pub exclusion_patterns: Vec<String>,
}

impl TryFrom<MachineConfig> for Machine {
    type Error = Error;

    fn try_from(config: MachineConfig) -> Result<Self, Self::Error> {
        if config.name.is_empty()
            || config.name.contains(['/', '\\'])
            || config.name.starts_with('.')
        {
            Err(SystemError::InvalidMachine(
                config.name.clone(),
                "name must be non-empty and usable as a directory name",
            ))?
        }
        let schedule = config
            .schedule
            .parse::<Schedule>()
            .map_err(|err| SystemError::InvalidMachine(config.name.clone(), err))?;
        Ok(Self {
            name: config.name,
            source: config.source,
            schedule,
            inclusion_patterns: config.include,
            exclusion_patterns: config.exclude,
        })
    }
}
