pub const CONFIG_PATH: &str = "./config.toml";
pub const LOG_DIRECTORY: &str = "./logs";
pub const LOG_FILE_PREFIX: &str = "KeepSphere.log";
