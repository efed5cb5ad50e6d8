// src/constants.rs

/// The maximum number of parameters a command may declare.
pub const MAX_PARAMETERS: usize = 10;

/// The name of the directory holding the configuration (inside the system config dir).
pub const CONFIG_DIR_NAME: &str = "typeshell";

/// The name of the configuration file.
pub const CONFIG_FILENAME: &str = "config.toml";

/// Environment variable that overrides the configuration file location.
pub const CONFIG_PATH_ENV: &str = "TYPESHELL_CONFIG";
