use crate::device::{AttributeStore, SurfaceGroup};
use crate::error::Error;
use crate::field::{self, FIELDS};
use crate::snapshot::Snapshot;
use tracing::{debug, warn};

/// A field that could not be re-applied and why.
#[derive(Debug)]
pub struct FieldFailure {
    pub field: &'static str,
    pub error: Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplayOutcome {
    AllSucceeded,
    PartialFailure(Vec<String>),
}

/// Per-field results of one replay, in field declaration order.
#[derive(Debug, Default)]
pub struct ReplayReport {
    pub applied: Vec<&'static str>,
    /// RGB fields present in the profile while this machine has no RGB surface.
    pub skipped: Vec<&'static str>,
    /// Keys this version does not know about.
    pub ignored: Vec<String>,
    pub failures: Vec<FieldFailure>,
}

impl ReplayReport {
    pub fn outcome(&self) -> ReplayOutcome {
        if self.failures.is_empty() {
            ReplayOutcome::AllSucceeded
        } else {
            ReplayOutcome::PartialFailure(
                self.failures.iter().map(|f| f.field.to_string()).collect(),
            )
        }
    }

    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Write every known field in `snapshot` back through the store.
///
/// A failing field is recorded and the remaining fields are still applied.
pub fn apply<S: AttributeStore + ?Sized>(snapshot: &Snapshot, store: &S) -> ReplayReport {
    let surface = store.surface();
    let mut report = ReplayReport {
        ignored: snapshot
            .values()
            .keys()
            .filter(|k| field::descriptor(k).is_none())
            .cloned()
            .collect(),
        ..Default::default()
    };

    for field in FIELDS {
        let Some(stored) = snapshot.get(field.name) else {
            continue;
        };
        if field.group == SurfaceGroup::Rgb && !surface.has(SurfaceGroup::Rgb) {
            debug!(field = field.name, "no RGB surface, skipping");
            report.skipped.push(field.name);
            continue;
        }

        let result = field
            .decode(stored)
            .and_then(|value| field.encode(&value))
            .and_then(|wire| store.set(field.group, field.name, &wire));

        match result {
            Ok(()) => report.applied.push(field.name),
            Err(error) => {
                warn!(field = field.name, %error, "failed to apply field");
                report.failures.push(FieldFailure {
                    field: field.name,
                    error,
                });
            }
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::tests::RecordingStore;
    use crate::device::{BaseSurface, DeviceSurface};
    use std::collections::BTreeMap;

    fn snapshot(pairs: &[(&str, &str)]) -> Snapshot {
        Snapshot::from_values(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect::<BTreeMap<_, _>>(),
        )
    }

    #[test]
    fn test_all_succeeded() {
        let store = RecordingStore::predator_rgb();
        let snap = snapshot(&[
            ("fan_speed", "50,70"),
            ("battery_limiter", "1"),
            ("per_zone_mode", "4287f5,4287f5,4287f5,4287f5,100"),
        ]);

        let report = apply(&snap, &store);
        assert_eq!(report.outcome(), ReplayOutcome::AllSucceeded);
        assert_eq!(
            report.applied,
            vec!["fan_speed", "battery_limiter", "per_zone_mode"]
        );
        assert_eq!(
            store.writes.borrow().as_slice(),
            &[
                ("fan_speed".to_string(), "50,70".to_string()),
                ("battery_limiter".to_string(), "1".to_string()),
                (
                    "per_zone_mode".to_string(),
                    "4287f5,4287f5,4287f5,4287f5,100".to_string()
                ),
            ]
        );
    }

    #[test]
    fn test_continue_on_malformed_field() {
        let store = RecordingStore::predator_rgb();
        let snap = snapshot(&[
            ("fan_speed", "20,30"),
            ("battery_limiter", "0"),
            ("usb_charging", "10"),
            ("four_zone_mode", "1,2,3,4"),
            ("lcd_override", "1"),
        ]);

        let report = apply(&snap, &store);
        assert_eq!(
            report.outcome(),
            ReplayOutcome::PartialFailure(vec!["four_zone_mode".to_string()])
        );
        assert_eq!(report.applied.len(), 4);
        assert!(matches!(
            report.failures[0].error,
            Error::MalformedProfile { .. }
        ));
        let writes = store.writes.borrow();
        assert_eq!(writes.len(), 4);
        assert!(!writes.iter().any(|(a, _)| a == "four_zone_mode"));
    }

    #[test]
    fn test_continue_on_validation_and_write_failures() {
        let mut store = RecordingStore::predator_rgb();
        store.reject = vec!["battery_limiter"];
        let snap = snapshot(&[
            ("fan_speed", "120,0"),
            ("battery_limiter", "1"),
            ("usb_charging", "-1"),
            ("backlight_timeout", "1"),
        ]);

        let report = apply(&snap, &store);
        assert_eq!(
            report.outcome(),
            ReplayOutcome::PartialFailure(vec![
                "fan_speed".to_string(),
                "battery_limiter".to_string(),
                "usb_charging".to_string(),
            ])
        );
        assert!(matches!(report.failures[0].error, Error::InvalidInput { .. }));
        assert!(matches!(
            report.failures[1].error,
            Error::AdapterWriteFailed { .. }
        ));
        assert_eq!(report.applied, vec!["backlight_timeout"]);
        // rejected values never reach the store
        assert_eq!(store.writes.borrow().len(), 2);
    }

    #[test]
    fn test_rgb_fields_skipped_without_rgb_surface() {
        let store = RecordingStore::new(DeviceSurface {
            base: Some(BaseSurface::Nitro),
            rgb: false,
        });
        let snap = snapshot(&[
            ("fan_speed", "0,0"),
            ("four_zone_mode", "0,0,0,0,0,0,0"),
            ("per_zone_mode", "garbage"),
        ]);

        let report = apply(&snap, &store);
        assert_eq!(report.outcome(), ReplayOutcome::AllSucceeded);
        assert_eq!(report.skipped, vec!["four_zone_mode", "per_zone_mode"]);
        assert_eq!(store.writes.borrow().len(), 1);
    }

    #[test]
    fn test_unknown_keys_ignored() {
        let store = RecordingStore::predator_rgb();
        let snap = snapshot(&[("thermal_profile", "3"), ("lcd_override", "0")]);

        let report = apply(&snap, &store);
        assert!(report.is_success());
        assert_eq!(report.ignored, vec!["thermal_profile"]);
        assert_eq!(report.applied, vec!["lcd_override"]);
    }

    #[test]
    fn test_base_fields_fail_without_base_surface() {
        let store = RecordingStore::new(DeviceSurface {
            base: None,
            rgb: true,
        });
        let snap = snapshot(&[("fan_speed", "10,10"), ("four_zone_mode", "0,1,50,0,9,9,9")]);

        let report = apply(&snap, &store);
        assert_eq!(
            report.outcome(),
            ReplayOutcome::PartialFailure(vec!["fan_speed".to_string()])
        );
        assert!(matches!(report.failures[0].error, Error::SurfaceAbsent { .. }));
        assert_eq!(report.applied, vec!["four_zone_mode"]);
    }
}
