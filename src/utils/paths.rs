use std::{env, path::PathBuf};

use cabin_config::Config;

/// Overrides the admin home directory (config and default data location).
pub const HOME_ENV: &str = "CABIN_ADMIN_HOME";

/// Directory holding `config.json`, and the store unless the config names
/// another data directory.
pub fn app_home() -> PathBuf {
    match env::var_os(HOME_ENV) {
        Some(value) if !value.is_empty() => PathBuf::from(value),
        _ => Config::default().resolve_data_dir(),
    }
}

/// Where `store.json` and its backups live for `config`.
pub fn data_dir(config: &Config, home: PathBuf) -> PathBuf {
    config.data_dir.clone().unwrap_or(home)
}
