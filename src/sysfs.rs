use std::io;
use std::path::{Path, PathBuf};

/// Abstraction over the sysfs filesystem root.
/// Defaults to `/` in production, redirectable to a temp directory for testing.
#[derive(Debug, Clone)]
pub struct SysfsRoot {
    root: PathBuf,
}

impl Default for SysfsRoot {
    fn default() -> Self {
        Self {
            root: PathBuf::from("/"),
        }
    }
}

impl SysfsRoot {
    /// Create a SysfsRoot pointing at the real system.
    pub fn system() -> Self {
        Self::default()
    }

    /// Create a SysfsRoot pointing at a custom directory (for testing).
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Resolve a path relative to this root.
    pub fn path(&self, relative: impl AsRef<Path>) -> PathBuf {
        self.root.join(relative)
    }

    /// Read an attribute file, trimming the trailing newline the kernel appends.
    pub fn read(&self, relative: impl AsRef<Path>) -> io::Result<String> {
        std::fs::read_to_string(self.path(relative)).map(|s| s.trim().to_string())
    }

    /// Write a value to an attribute file. The file must already exist;
    /// sysfs attributes are never created from userspace.
    pub fn write(&self, relative: impl AsRef<Path>, value: &str) -> io::Result<()> {
        use std::io::Write;
        let mut file = std::fs::OpenOptions::new()
            .write(true)
            .truncate(true)
            .open(self.path(relative))?;
        file.write_all(value.as_bytes())
    }

    /// Check if a directory exists relative to this root.
    pub fn is_dir(&self, relative: impl AsRef<Path>) -> bool {
        self.path(relative).is_dir()
    }

    /// Get the root path.
    pub fn root(&self) -> &Path {
        &self.root
    }
}
