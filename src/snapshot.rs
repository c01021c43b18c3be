use crate::device::AttributeStore;
use crate::field::FIELDS;
use std::collections::BTreeMap;
use tracing::debug;

const NOT_DETECTED: &str = "linuwu_sense module not detected or not loaded";

/// Field name → wire string for every attribute the device reported in one
/// capture pass.
///
/// A snapshot taken without a base surface carries an error marker instead of
/// values and can never be saved.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    values: BTreeMap<String, String>,
    error: Option<String>,
}

impl Snapshot {
    /// Query every known field through the store.
    pub fn capture<S: AttributeStore + ?Sized>(store: &S) -> Self {
        let surface = store.surface();
        if surface.base.is_none() {
            return Self {
                values: BTreeMap::new(),
                error: Some(NOT_DETECTED.to_string()),
            };
        }

        let mut values = BTreeMap::new();
        for field in FIELDS {
            if !surface.has(field.group) {
                continue;
            }
            match store.get(field.group, field.name) {
                Ok(value) if !value.is_empty() => {
                    values.insert(field.name.to_string(), value);
                }
                Ok(_) => debug!(field = field.name, "empty value, omitting"),
                Err(e) => debug!(field = field.name, error = %e, "not reported, omitting"),
            }
        }

        Self {
            values,
            error: None,
        }
    }

    /// Build a snapshot from stored values (e.g. a loaded profile).
    pub fn from_values(values: BTreeMap<String, String>) -> Self {
        Self {
            values,
            error: None,
        }
    }

    /// Reason the capture could not be taken, if any.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.values.get(field).map(String::as_str)
    }

    pub fn values(&self) -> &BTreeMap<String, String> {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
