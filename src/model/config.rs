use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Deserialize)]
pub struct ConfigTable {
    #[serde(rename = "Config")]
    pub config: Config,
    #[serde(rename = "Machine", default)]
    pub machines: Vec<MachineConfig>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Config {
    pub backup_root: PathBuf,
    pub database_path: PathBuf,
    #[serde(default = "default_rsync_binary")]
    pub rsync_binary: String,
    pub backup_timeout: u64,      // second
    pub default_wakeup_time: u64, // second
    #[serde(default)]
    pub summary_schedule: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct MachineConfig {
    pub name: String,
    pub source: String,
    pub schedule: String,
    #[serde(default)]
    pub include: Vec<String>,
    #[serde(default)]
    pub exclude: Vec<String>,
}

fn default_rsync_binary() -> String {
    "rsync".to_string()
}
