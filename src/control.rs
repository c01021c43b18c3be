use crate::device::{AttributeStore, DeviceSurface};
use crate::error::{Error, Result};
use crate::field::{self, FanSpeed, FieldDescriptor, FieldValue, FourZoneMode, PerZoneMode};
use crate::profile::ProfileStore;
use crate::replay::{self, ReplayReport};
use crate::snapshot::Snapshot;
use std::path::PathBuf;
use tracing::info;

/// Entry point for every user-facing operation. Holds the attribute store
/// for the lifetime of one invocation.
#[derive(Debug)]
pub struct Controller<S> {
    store: S,
}

impl<S: AttributeStore> Controller<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn surface(&self) -> DeviceSurface {
        self.store.surface()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Current configuration; fails when no base surface was detected.
    pub fn status(&self) -> Result<Snapshot> {
        let snapshot = Snapshot::capture(&self.store);
        if snapshot.error().is_some() {
            return Err(Error::SurfaceAbsent { surface: "sense" });
        }
        Ok(snapshot)
    }

    /// Validate, encode and write one field, returning the wire string that
    /// was written. Nothing is written if the value is out of range.
    pub fn set(&self, field: &FieldDescriptor, value: &FieldValue) -> Result<String> {
        let wire = field.encode(value)?;
        if !self.store.surface().has(field.group) {
            return Err(Error::SurfaceAbsent {
                surface: field.group.label(),
            });
        }
        self.store.set(field.group, field.name, &wire)?;
        info!(field = field.name, value = %wire, "applied");
        Ok(wire)
    }

    pub fn set_fan_speed(&self, cpu: i32, gpu: i32) -> Result<String> {
        self.set(
            &field::FAN_SPEED,
            &FieldValue::FanSpeed(FanSpeed { cpu, gpu }),
        )
    }

    pub fn set_battery_limiter(&self, enabled: bool) -> Result<String> {
        self.set(&field::BATTERY_LIMITER, &FieldValue::Toggle(enabled))
    }

    pub fn set_battery_calibration(&self, start: bool) -> Result<String> {
        self.set(&field::BATTERY_CALIBRATION, &FieldValue::Toggle(start))
    }

    pub fn set_backlight_timeout(&self, enabled: bool) -> Result<String> {
        self.set(&field::BACKLIGHT_TIMEOUT, &FieldValue::Toggle(enabled))
    }

    pub fn set_boot_animation_sound(&self, enabled: bool) -> Result<String> {
        self.set(&field::BOOT_ANIMATION_SOUND, &FieldValue::Toggle(enabled))
    }

    pub fn set_lcd_override(&self, enabled: bool) -> Result<String> {
        self.set(&field::LCD_OVERRIDE, &FieldValue::Toggle(enabled))
    }

    pub fn set_usb_charging(&self, level: i32) -> Result<String> {
        self.set(&field::USB_CHARGING, &FieldValue::UsbCharging(level))
    }

    pub fn set_four_zone_mode(&self, mode: FourZoneMode) -> Result<String> {
        self.set(&field::FOUR_ZONE_MODE, &FieldValue::FourZone(mode))
    }

    pub fn set_per_zone_mode(&self, mode: PerZoneMode) -> Result<String> {
        self.set(&field::PER_ZONE_MODE, &FieldValue::PerZone(mode))
    }

    /// Capture the current configuration and store it under `name`.
    pub fn save_profile(&self, profiles: &ProfileStore, name: &str) -> Result<PathBuf> {
        let snapshot = Snapshot::capture(&self.store);
        profiles.save(name, &snapshot)
    }

    /// Load `name` and replay it. Per-field failures are in the report; only
    /// a missing or unreadable profile is an error here.
    pub fn load_profile(&self, profiles: &ProfileStore, name: &str) -> Result<ReplayReport> {
        let snapshot = profiles.load(name)?;
        Ok(replay::apply(&snapshot, &self.store))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::tests::RecordingStore;
    use crate::device::{BaseSurface, DeviceSurface};

    #[test]
    fn test_usb_charging_rejects_before_io() {
        let ctl = Controller::new(RecordingStore::predator_rgb());
        assert!(matches!(
            ctl.set_usb_charging(15),
            Err(Error::InvalidInput { .. })
        ));
        assert_eq!(ctl.store().call_count(), 0);

        assert_eq!(ctl.set_usb_charging(20).unwrap(), "20");
        assert_eq!(
            ctl.store().writes.borrow().as_slice(),
            &[("usb_charging".to_string(), "20".to_string())]
        );
    }

    #[test]
    fn test_fan_speed_rejects_before_io() {
        let ctl = Controller::new(RecordingStore::predator_rgb());
        for (cpu, gpu) in [(101, 0), (0, -5)] {
            assert!(ctl.set_fan_speed(cpu, gpu).is_err());
        }
        assert_eq!(ctl.store().call_count(), 0);

        ctl.set_fan_speed(0, 100).unwrap();
        assert_eq!(ctl.store().writes.borrow()[0].1, "0,100");
    }

    #[test]
    fn test_toggles_write_wire_values() {
        let ctl = Controller::new(RecordingStore::predator_rgb());
        ctl.set_battery_limiter(true).unwrap();
        ctl.set_battery_calibration(false).unwrap();
        ctl.set_backlight_timeout(true).unwrap();
        ctl.set_boot_animation_sound(false).unwrap();
        ctl.set_lcd_override(true).unwrap();

        let writes = ctl.store().writes.borrow();
        let values: Vec<(&str, &str)> = writes
            .iter()
            .map(|(a, v)| (a.as_str(), v.as_str()))
            .collect();
        assert_eq!(
            values,
            vec![
                ("battery_limiter", "1"),
                ("battery_calibration", "0"),
                ("backlight_timeout", "1"),
                ("boot_animation_sound", "0"),
                ("lcd_override", "1"),
            ]
        );
    }

    #[test]
    fn test_rgb_write_without_rgb_surface() {
        let ctl = Controller::new(RecordingStore::new(DeviceSurface {
            base: Some(BaseSurface::Predator),
            rgb: false,
        }));
        let err = ctl
            .set_per_zone_mode(PerZoneMode {
                zones: ["ff0000", "00ff00", "0000ff", "ffffff"].map(str::to_string),
                brightness: 80,
            })
            .unwrap_err();
        assert!(matches!(err, Error::SurfaceAbsent { surface } if surface == "four-zone keyboard"));
        assert_eq!(ctl.store().call_count(), 0);
    }

    #[test]
    fn test_four_zone_write() {
        let ctl = Controller::new(RecordingStore::predator_rgb());
        ctl.set_four_zone_mode(FourZoneMode {
            mode: 1,
            speed: 4,
            brightness: 100,
            direction: 0,
            red: 255,
            green: 0,
            blue: 255,
        })
        .unwrap();
        assert_eq!(
            ctl.store().writes.borrow()[0],
            ("four_zone_mode".to_string(), "1,4,100,0,255,0,255".to_string())
        );
    }

    #[test]
    fn test_status_without_base_surface() {
        let ctl = Controller::new(RecordingStore::default());
        assert!(matches!(ctl.status(), Err(Error::SurfaceAbsent { .. })));
    }

    #[test]
    fn test_save_then_load_replays_captured_values() {
        let tmp = tempfile::TempDir::new().unwrap();
        let profiles = ProfileStore::new(tmp.path());
        let ctl = Controller::new(
            RecordingStore::predator_rgb()
                .with("fan_speed", "45,55")
                .with("usb_charging", "30")
                .with("per_zone_mode", "0a0b0c,0d0e0f,101112,131415,60"),
        );

        ctl.save_profile(&profiles, "desk").unwrap();
        let captured = ctl.status().unwrap();

        let report = ctl.load_profile(&profiles, "desk").unwrap();
        assert!(report.is_success());
        for (attribute, value) in ctl.store().writes.borrow().iter() {
            assert_eq!(captured.get(attribute), Some(value.as_str()));
        }
        assert_eq!(ctl.store().writes.borrow().len(), captured.len());
    }

    #[test]
    fn test_load_missing_profile() {
        let tmp = tempfile::TempDir::new().unwrap();
        let ctl = Controller::new(RecordingStore::predator_rgb());
        assert!(matches!(
            ctl.load_profile(&ProfileStore::new(tmp.path()), "ghost"),
            Err(Error::ProfileNotFound { .. })
        ));
    }
}
