use crate::profile::ProfileStore;
use crate::sysfs::SysfsRoot;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::warn;

/// Top-level sensectl configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub device: DeviceConfig,
    pub profiles: ProfilesConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceConfig {
    /// Directory treated as `/` when locating the driver's attributes.
    pub sysfs_root: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfilesConfig {
    /// Where saved profiles live.
    pub dir: Option<PathBuf>,
}

impl Config {
    pub fn sysfs(&self) -> SysfsRoot {
        match &self.device.sysfs_root {
            Some(root) => SysfsRoot::new(root),
            None => SysfsRoot::system(),
        }
    }

    pub fn profile_store(&self) -> crate::error::Result<ProfileStore> {
        self.profiles
            .dir
            .clone()
            .or_else(ProfileStore::default_dir)
            .map(ProfileStore::new)
            .ok_or_else(|| {
                crate::error::Error::Config(
                    "no profile directory configured and no user config directory found"
                        .to_string(),
                )
            })
    }
}

const SYSTEM_CONFIG: &str = "/etc/linuwu-sense/config.toml";

/// Load the system config file if it exists.
fn load_system() -> Option<toml::Value> {
    read_value(Path::new(SYSTEM_CONFIG))
}

/// Load the user config file (~/.config/linuwu-sense/config.toml) if it exists.
fn load_user() -> Option<toml::Value> {
    let dir = dirs::config_dir()?;
    read_value(&dir.join("linuwu-sense").join("config.toml"))
}

fn read_value(path: &Path) -> Option<toml::Value> {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "ignoring unreadable config");
            return None;
        }
    };
    match toml::from_str(&content) {
        Ok(v) => Some(v),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "ignoring unparseable config");
            None
        }
    }
}

/// Recursively merge two TOML values. Tables are merged key-by-key;
/// all other types in `overlay` replace `base`.
fn merge_values(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_values(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load config from a specific path, ignoring system/user files.
fn load_from_path(path: &Path) -> Config {
    match std::fs::read_to_string(path) {
        Ok(content) => toml::from_str(&content).unwrap_or_else(|e| {
            warn!(path = %path.display(), error = %e, "failed to parse config");
            Config::default()
        }),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "failed to read config");
            Config::default()
        }
    }
}

/// Load the merged config: system defaults, then user overrides.
/// If `override_path` is provided, use only that file instead.
pub fn load(override_path: Option<&Path>) -> Config {
    if let Some(path) = override_path {
        return load_from_path(path);
    }

    let merged = match (load_system(), load_user()) {
        (Some(s), Some(u)) => Some(merge_values(s, u)),
        (Some(v), None) | (None, Some(v)) => Some(v),
        (None, None) => None,
    };

    match merged {
        Some(value) => value.try_into().unwrap_or_else(|e| {
            warn!(error = %e, "failed to deserialize config");
            Config::default()
        }),
        None => Config::default(),
    }
}
