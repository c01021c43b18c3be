//! Field descriptors and the codec between typed values and the driver's
//! wire strings.
//!
//! Every attribute the driver exposes is listed once in [`FIELDS`], in the
//! order capture and replay visit them. Encoding always validates first, so
//! an out-of-range value never reaches the attribute store.

use crate::device::SurfaceGroup;
use crate::error::{Error, Result};
use serde::Serialize;

/// Value domain of a field; selects the codec.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Domain {
    FanSpeed,
    Toggle,
    UsbCharging,
    FourZone,
    PerZone,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDescriptor {
    /// Attribute file name, also the profile key.
    pub name: &'static str,
    /// Human label for status output.
    pub label: &'static str,
    pub group: SurfaceGroup,
    pub domain: Domain,
    /// Status words for a toggle's on and off states.
    pub states: [&'static str; 2],
}

const ENABLED_DISABLED: [&str; 2] = ["Enabled", "Disabled"];

pub const FAN_SPEED: FieldDescriptor = FieldDescriptor {
    name: "fan_speed",
    label: "Fan Speed",
    group: SurfaceGroup::Base,
    domain: Domain::FanSpeed,
    states: ENABLED_DISABLED,
};

pub const BATTERY_LIMITER: FieldDescriptor = FieldDescriptor {
    name: "battery_limiter",
    label: "Battery Limiter",
    group: SurfaceGroup::Base,
    domain: Domain::Toggle,
    states: ENABLED_DISABLED,
};

pub const BATTERY_CALIBRATION: FieldDescriptor = FieldDescriptor {
    name: "battery_calibration",
    label: "Battery Calibration",
    group: SurfaceGroup::Base,
    domain: Domain::Toggle,
    states: ["Active", "Inactive"],
};

pub const BACKLIGHT_TIMEOUT: FieldDescriptor = FieldDescriptor {
    name: "backlight_timeout",
    label: "Backlight Timeout",
    group: SurfaceGroup::Base,
    domain: Domain::Toggle,
    states: ENABLED_DISABLED,
};

pub const BOOT_ANIMATION_SOUND: FieldDescriptor = FieldDescriptor {
    name: "boot_animation_sound",
    label: "Boot Animation",
    group: SurfaceGroup::Base,
    domain: Domain::Toggle,
    states: ENABLED_DISABLED,
};

pub const LCD_OVERRIDE: FieldDescriptor = FieldDescriptor {
    name: "lcd_override",
    label: "LCD Override",
    group: SurfaceGroup::Base,
    domain: Domain::Toggle,
    states: ENABLED_DISABLED,
};

pub const USB_CHARGING: FieldDescriptor = FieldDescriptor {
    name: "usb_charging",
    label: "USB Charging",
    group: SurfaceGroup::Base,
    domain: Domain::UsbCharging,
    states: ENABLED_DISABLED,
};

pub const FOUR_ZONE_MODE: FieldDescriptor = FieldDescriptor {
    name: "four_zone_mode",
    label: "Four-Zone Mode",
    group: SurfaceGroup::Rgb,
    domain: Domain::FourZone,
    states: ENABLED_DISABLED,
};

pub const PER_ZONE_MODE: FieldDescriptor = FieldDescriptor {
    name: "per_zone_mode",
    label: "Per-Zone Mode",
    group: SurfaceGroup::Rgb,
    domain: Domain::PerZone,
    states: ENABLED_DISABLED,
};

/// All known fields in declaration order.
pub const FIELDS: &[FieldDescriptor] = &[
    FAN_SPEED,
    BATTERY_LIMITER,
    BATTERY_CALIBRATION,
    BACKLIGHT_TIMEOUT,
    BOOT_ANIMATION_SOUND,
    LCD_OVERRIDE,
    USB_CHARGING,
    FOUR_ZONE_MODE,
    PER_ZONE_MODE,
];

/// Look up a field by attribute name.
pub fn descriptor(name: &str) -> Option<&'static FieldDescriptor> {
    FIELDS.iter().find(|f| f.name == name)
}

/// Accepted USB charging levels (battery percent until which USB stays powered).
pub const USB_CHARGING_LEVELS: [i32; 4] = [0, 10, 20, 30];

const FOUR_ZONE_MODE_NAMES: [&str; 8] = [
    "Static",
    "Breathing",
    "Neon",
    "Wave",
    "Shifting",
    "Zoom",
    "Meteor",
    "Twinkling",
];

/// CPU and GPU fan duty in percent; 0 hands the fan back to automatic control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FanSpeed {
    pub cpu: i32,
    pub gpu: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FourZoneMode {
    pub mode: i32,
    pub speed: i32,
    pub brightness: i32,
    /// 0 is accepted for every mode; modes without motion ignore it.
    pub direction: i32,
    pub red: i32,
    pub green: i32,
    pub blue: i32,
}

impl FourZoneMode {
    /// Effect name for the mode number, if it is a known one.
    pub fn mode_name(&self) -> Option<&'static str> {
        usize::try_from(self.mode)
            .ok()
            .and_then(|m| FOUR_ZONE_MODE_NAMES.get(m).copied())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PerZoneMode {
    /// Six hex digit RGB colour per zone, left to right.
    pub zones: [String; 4],
    pub brightness: i32,
}

/// A typed value for one field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    FanSpeed(FanSpeed),
    Toggle(bool),
    UsbCharging(i32),
    FourZone(FourZoneMode),
    PerZone(PerZoneMode),
}

impl FieldValue {
    fn domain(&self) -> Domain {
        match self {
            FieldValue::FanSpeed(_) => Domain::FanSpeed,
            FieldValue::Toggle(_) => Domain::Toggle,
            FieldValue::UsbCharging(_) => Domain::UsbCharging,
            FieldValue::FourZone(_) => Domain::FourZone,
            FieldValue::PerZone(_) => Domain::PerZone,
        }
    }
}

fn check_range(field: &str, part: &str, value: i32, min: i32, max: i32) -> Result<()> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(Error::invalid(
            field,
            format!("{} must be between {} and {} (got {})", part, min, max, value),
        ))
    }
}

fn is_hex_color(s: &str) -> bool {
    s.len() == 6 && s.chars().all(|c| c.is_ascii_hexdigit())
}

impl FieldDescriptor {
    /// Check a value against this field's domain without encoding it.
    pub fn validate(&self, value: &FieldValue) -> Result<()> {
        let name = self.name;
        if value.domain() != self.domain {
            return Err(Error::invalid(
                name,
                format!("expected a {:?} value, got {:?}", self.domain, value.domain()),
            ));
        }

        match value {
            FieldValue::FanSpeed(f) => {
                check_range(name, "cpu", f.cpu, 0, 100)?;
                check_range(name, "gpu", f.gpu, 0, 100)?;
            }
            FieldValue::Toggle(_) => {}
            FieldValue::UsbCharging(level) => {
                if !USB_CHARGING_LEVELS.contains(level) {
                    return Err(Error::invalid(
                        name,
                        format!("level must be one of 0, 10, 20, 30 (got {})", level),
                    ));
                }
            }
            FieldValue::FourZone(m) => {
                check_range(name, "mode", m.mode, 0, 7)?;
                check_range(name, "speed", m.speed, 0, 9)?;
                check_range(name, "brightness", m.brightness, 0, 100)?;
                check_range(name, "direction", m.direction, 0, 2)?;
                check_range(name, "red", m.red, 0, 255)?;
                check_range(name, "green", m.green, 0, 255)?;
                check_range(name, "blue", m.blue, 0, 255)?;
            }
            FieldValue::PerZone(p) => {
                for (i, zone) in p.zones.iter().enumerate() {
                    if !is_hex_color(zone) {
                        return Err(Error::invalid(
                            name,
                            format!(
                                "zone {} colour must be 6 hex digits, e.g. 4287f5 (got '{}')",
                                i + 1,
                                zone
                            ),
                        ));
                    }
                }
                check_range(name, "brightness", p.brightness, 0, 100)?;
            }
        }
        Ok(())
    }

    /// Validate and render the exact string the driver accepts.
    pub fn encode(&self, value: &FieldValue) -> Result<String> {
        self.validate(value)?;
        let wire = match value {
            FieldValue::FanSpeed(f) => format!("{},{}", f.cpu, f.gpu),
            FieldValue::Toggle(on) => (if *on { "1" } else { "0" }).to_string(),
            FieldValue::UsbCharging(level) => level.to_string(),
            FieldValue::FourZone(m) => format!(
                "{},{},{},{},{},{},{}",
                m.mode, m.speed, m.brightness, m.direction, m.red, m.green, m.blue
            ),
            FieldValue::PerZone(p) => format!("{},{}", p.zones.join(","), p.brightness),
        };
        Ok(wire)
    }

    /// Parse a stored wire string. Only the shape is checked here; ranges are
    /// enforced when the value is encoded again.
    pub fn decode(&self, wire: &str) -> Result<FieldValue> {
        let name = self.name;
        let wire = wire.trim();
        match self.domain {
            Domain::FanSpeed => {
                let [cpu, gpu] = parse_ints::<2>(name, wire)?;
                Ok(FieldValue::FanSpeed(FanSpeed { cpu, gpu }))
            }
            Domain::Toggle => match wire {
                "1" => Ok(FieldValue::Toggle(true)),
                "0" => Ok(FieldValue::Toggle(false)),
                other => Err(Error::malformed(
                    name,
                    format!("expected \"1\" or \"0\", got '{}'", other),
                )),
            },
            Domain::UsbCharging => {
                let [level] = parse_ints::<1>(name, wire)?;
                Ok(FieldValue::UsbCharging(level))
            }
            Domain::FourZone => {
                let [mode, speed, brightness, direction, red, green, blue] =
                    parse_ints::<7>(name, wire)?;
                Ok(FieldValue::FourZone(FourZoneMode {
                    mode,
                    speed,
                    brightness,
                    direction,
                    red,
                    green,
                    blue,
                }))
            }
            Domain::PerZone => {
                let parts = split_exact(name, wire, 5)?;
                let brightness = parse_int(name, parts[4])?;
                Ok(FieldValue::PerZone(PerZoneMode {
                    zones: [
                        parts[0].to_string(),
                        parts[1].to_string(),
                        parts[2].to_string(),
                        parts[3].to_string(),
                    ],
                    brightness,
                }))
            }
        }
    }
}

fn split_exact<'a>(field: &str, wire: &'a str, count: usize) -> Result<Vec<&'a str>> {
    let parts: Vec<&str> = wire.split(',').map(str::trim).collect();
    if parts.len() != count {
        return Err(Error::malformed(
            field,
            format!(
                "expected {} comma-separated values, got {} in '{}'",
                count,
                parts.len(),
                wire
            ),
        ));
    }
    Ok(parts)
}

fn parse_int(field: &str, part: &str) -> Result<i32> {
    part.parse::<i32>()
        .map_err(|e| Error::malformed(field, format!("'{}' is not an integer: {}", part, e)))
}

fn parse_ints<const N: usize>(field: &str, wire: &str) -> Result<[i32; N]> {
    let parts = split_exact(field, wire, N)?;
    let mut out = [0; N];
    for (slot, part) in out.iter_mut().zip(parts) {
        *slot = parse_int(field, part)?;
    }
    Ok(out)
}
