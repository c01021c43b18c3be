use crate::error::{Error, Result};
use crate::snapshot::Snapshot;
use chrono::{DateTime, Local};
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const PROFILE_EXT: &str = "json";

/// Named snapshots stored as one JSON document each under a directory.
#[derive(Debug, Clone)]
pub struct ProfileStore {
    dir: PathBuf,
}

impl ProfileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// `$XDG_CONFIG_HOME/linuwu-sense/saved_profiles`, if a config dir exists.
    pub fn default_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("linuwu-sense").join("saved_profiles"))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File a profile name maps to. Names that could escape the directory are
    /// rejected.
    pub fn path_for(&self, name: &str) -> Result<PathBuf> {
        if name.is_empty() || name == "." || name == ".." || name.contains(['/', '\0']) {
            return Err(Error::invalid(
                "profile name",
                format!("'{}' is not usable as a file name", name),
            ));
        }
        Ok(self.dir.join(format!("{}.{}", name, PROFILE_EXT)))
    }

    /// Write the snapshot under `name`, replacing any existing profile.
    pub fn save(&self, name: &str, snapshot: &Snapshot) -> Result<PathBuf> {
        if let Some(reason) = snapshot.error() {
            debug!(name, reason, "refusing to save error snapshot");
            return Err(Error::SurfaceAbsent { surface: "sense" });
        }
        let path = self.path_for(name)?;

        fs::create_dir_all(&self.dir).map_err(|e| Error::ProfileIo {
            path: self.dir.clone(),
            source: e,
        })?;
        let data = serde_json::to_string_pretty(snapshot.values()).map_err(|e| {
            Error::ProfileFormat {
                path: path.clone(),
                detail: e.to_string(),
            }
        })?;
        fs::write(&path, data).map_err(|e| Error::ProfileIo {
            path: path.clone(),
            source: e,
        })?;

        info!(name, path = %path.display(), fields = snapshot.len(), "saved profile");
        Ok(path)
    }

    /// Read a profile back. Values are not validated here.
    pub fn load(&self, name: &str) -> Result<Snapshot> {
        let path = self.path_for(name)?;
        let data = match fs::read_to_string(&path) {
            Ok(d) => d,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(Error::ProfileNotFound {
                    name: name.to_string(),
                });
            }
            Err(e) => return Err(Error::ProfileIo { path, source: e }),
        };
        let values: BTreeMap<String, String> =
            serde_json::from_str(&data).map_err(|e| Error::ProfileFormat {
                path: path.clone(),
                detail: e.to_string(),
            })?;

        info!(name, fields = values.len(), "loaded profile");
        Ok(Snapshot::from_values(values))
    }

    /// Profile names, sorted. A missing directory has no profiles.
    pub fn list(&self) -> Result<Vec<String>> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(e) => e,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(Error::ProfileIo {
                    path: self.dir.clone(),
                    source: e,
                });
            }
        };

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| Error::ProfileIo {
                path: self.dir.clone(),
                source: e,
            })?;
            let path = entry.path();
            if !path.is_file() || path.extension().and_then(|e| e.to_str()) != Some(PROFILE_EXT)
            {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                names.push(stem.to_string());
            }
        }
        names.sort();
        Ok(names)
    }

    /// Last time the profile was saved.
    pub fn modified(&self, name: &str) -> Option<DateTime<Local>> {
        let path = self.path_for(name).ok()?;
        let mtime = fs::metadata(path).and_then(|m| m.modified()).ok()?;
        Some(DateTime::<Local>::from(mtime))
    }
}
