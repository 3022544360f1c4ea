use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use directories_next::BaseDirs;

use crate::config::WorldsConfig;
use crate::core::error::{Result, WorldsError};
use crate::motion::Timeline;

pub const CONFIG_FILE_NAME: &str = "worlds.yaml";

pub fn config_dir() -> Option<PathBuf> {
    BaseDirs::new().map(|base| base.config_dir().join("Worlds"))
}

pub fn default_config_path() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join(CONFIG_FILE_NAME))
}

pub fn load_config(path: &Path) -> Result<WorldsConfig> {
    let yaml = fs::read_to_string(path).map_err(|err| {
        WorldsError::Configuration(format!(
            "unable to read {}: {}",
            path.display(),
            err
        ))
    })?;
    WorldsConfig::from_yaml(&yaml)
}

/// `Ok(None)` when there is no file at `path`; any other failure propagates.
pub fn load_config_if_exists(path: &Path) -> Result<Option<WorldsConfig>> {
    match fs::metadata(path) {
        Ok(_) => load_config(path).map(Some),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
        Err(err) => Err(WorldsError::Configuration(format!(
            "unable to stat {}: {}",
            path.display(),
            err
        ))),
    }
}

pub fn save_timeline(path: &Path, timeline: &Timeline) -> Result<()> {
    let json = serde_json::to_string_pretty(timeline)?;
    if let Some(parent_dir) = path.parent() {
        if !parent_dir.as_os_str().is_empty() {
            fs::create_dir_all(parent_dir).map_err(|err| {
                WorldsError::Configuration(format!(
                    "unable to create {}: {}",
                    parent_dir.display(),
                    err
                ))
            })?;
        }
    }
    fs::write(path, json).map_err(|err| {
        WorldsError::Configuration(format!(
            "unable to write {}: {}",
            path.display(),
            err
        ))
    })
}
