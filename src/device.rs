use crate::error::{Error, Result};
use crate::sysfs::SysfsRoot;
use serde::Serialize;
use std::io;
use std::path::PathBuf;
use tracing::{debug, trace};

const DRIVER_DIR: &str = "sys/module/linuwu_sense/drivers/platform:acer-wmi/acer-wmi";
const PREDATOR_SENSE_DIR: &str = "predator_sense";
const NITRO_SENSE_DIR: &str = "nitro_sense";
const FOUR_ZONED_KB_DIR: &str = "four_zoned_kb";

/// Product line whose attribute group the driver registered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BaseSurface {
    Predator,
    Nitro,
}

impl BaseSurface {
    fn dir_name(self) -> &'static str {
        match self {
            BaseSurface::Predator => PREDATOR_SENSE_DIR,
            BaseSurface::Nitro => NITRO_SENSE_DIR,
        }
    }
}

impl std::fmt::Display for BaseSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BaseSurface::Predator => write!(f, "Predator Sense"),
            BaseSurface::Nitro => write!(f, "Nitro Sense"),
        }
    }
}

/// Which attribute directory a field lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SurfaceGroup {
    Base,
    Rgb,
}

impl SurfaceGroup {
    pub fn label(self) -> &'static str {
        match self {
            SurfaceGroup::Base => "sense",
            SurfaceGroup::Rgb => "four-zone keyboard",
        }
    }
}

/// The control surfaces present on this machine, resolved once at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct DeviceSurface {
    pub base: Option<BaseSurface>,
    pub rgb: bool,
}

impl DeviceSurface {
    /// Detect surfaces by directory presence. Predator wins if both base
    /// directories exist.
    pub fn detect(sysfs: &SysfsRoot) -> Self {
        let base = [BaseSurface::Predator, BaseSurface::Nitro]
            .into_iter()
            .find(|b| sysfs.is_dir(format!("{}/{}", DRIVER_DIR, b.dir_name())));
        let rgb = sysfs.is_dir(format!("{}/{}", DRIVER_DIR, FOUR_ZONED_KB_DIR));
        debug!(?base, rgb, "detected device surfaces");
        Self { base, rgb }
    }

    pub fn has(&self, group: SurfaceGroup) -> bool {
        match group {
            SurfaceGroup::Base => self.base.is_some(),
            SurfaceGroup::Rgb => self.rgb,
        }
    }

    /// Relative directory for a group, if that surface is present.
    fn dir(&self, group: SurfaceGroup) -> Option<String> {
        match group {
            SurfaceGroup::Base => self
                .base
                .map(|b| format!("{}/{}", DRIVER_DIR, b.dir_name())),
            SurfaceGroup::Rgb => self
                .rgb
                .then(|| format!("{}/{}", DRIVER_DIR, FOUR_ZONED_KB_DIR)),
        }
    }
}

/// String key/value access to the driver's attributes.
///
/// `get` fails with `SurfaceAbsent` when the group was not detected and
/// `AttributeUnsupported` when the attribute cannot be read. `set` performs
/// exactly one write with no read-back.
pub trait AttributeStore {
    fn surface(&self) -> DeviceSurface;

    fn get(&self, group: SurfaceGroup, attribute: &str) -> Result<String>;

    fn set(&self, group: SurfaceGroup, attribute: &str, value: &str) -> Result<()>;
}

/// Attribute store backed by the driver's sysfs directories.
#[derive(Debug, Clone)]
pub struct SysfsStore {
    sysfs: SysfsRoot,
    surface: DeviceSurface,
}

impl SysfsStore {
    pub fn detect(sysfs: SysfsRoot) -> Self {
        let surface = DeviceSurface::detect(&sysfs);
        Self { sysfs, surface }
    }

    fn attribute_path(&self, group: SurfaceGroup, attribute: &str) -> Result<String> {
        self.surface
            .dir(group)
            .map(|dir| format!("{}/{}", dir, attribute))
            .ok_or(Error::SurfaceAbsent {
                surface: group.label(),
            })
    }

    fn full_path(&self, relative: &str) -> PathBuf {
        self.sysfs.path(relative)
    }
}

impl AttributeStore for SysfsStore {
    fn surface(&self) -> DeviceSurface {
        self.surface
    }

    fn get(&self, group: SurfaceGroup, attribute: &str) -> Result<String> {
        let relative = self.attribute_path(group, attribute)?;
        let value = self
            .sysfs
            .read(&relative)
            .map_err(|e| Error::AttributeUnsupported {
                attribute: attribute.to_string(),
                detail: e.to_string(),
            })?;
        trace!(attribute, %value, "read attribute");
        Ok(value)
    }

    fn set(&self, group: SurfaceGroup, attribute: &str, value: &str) -> Result<()> {
        let relative = self.attribute_path(group, attribute)?;
        debug!(attribute, value, "writing attribute");
        self.sysfs.write(&relative, value).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => Error::AttributeUnsupported {
                attribute: attribute.to_string(),
                detail: e.to_string(),
            },
            _ => Error::AdapterWriteFailed {
                path: self.full_path(&relative),
                source: e,
            },
        })
    }
}
