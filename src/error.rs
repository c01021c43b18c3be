use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("{surface} surface not detected (is the linuwu_sense module loaded?)")]
    SurfaceAbsent { surface: &'static str },

    #[error("attribute {attribute} is not supported by this device: {detail}")]
    AttributeUnsupported { attribute: String, detail: String },

    #[error("invalid {field}: {constraint}")]
    InvalidInput { field: String, constraint: String },

    #[error("write to {path} failed: {source}")]
    AdapterWriteFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("malformed value for {field} in profile: {detail}")]
    MalformedProfile { field: String, detail: String },

    #[error("profile '{name}' not found")]
    ProfileNotFound { name: String },

    #[error("profile file error: {path}: {source}")]
    ProfileIo {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("profile {path} is not a valid profile document: {detail}")]
    ProfileFormat { path: PathBuf, detail: String },

    #[error("config error: {0}")]
    Config(String),
}

impl Error {
    pub(crate) fn invalid(field: impl Into<String>, constraint: impl Into<String>) -> Self {
        Error::InvalidInput {
            field: field.into(),
            constraint: constraint.into(),
        }
    }

    pub(crate) fn malformed(field: impl Into<String>, detail: impl Into<String>) -> Self {
        Error::MalformedProfile {
            field: field.into(),
            detail: detail.into(),
        }
    }

    /// True when a write was refused by the kernel for lack of privileges.
    pub fn is_permission_denied(&self) -> bool {
        matches!(
            self,
            Error::AdapterWriteFailed { source, .. }
                if source.kind() == std::io::ErrorKind::PermissionDenied
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;
