use crate::device::DeviceSurface;
use crate::field::{FIELDS, FieldDescriptor, FieldValue};
use crate::profile::ProfileStore;
use crate::replay::ReplayReport;
use crate::snapshot::Snapshot;
use colored::Colorize;

const LABEL_W: usize = 22;

/// Value the driver reports when firmware did not give it a reading.
const UNKNOWN_SENTINEL: &str = "-1";

/// Human-readable rendering of a stored wire value. Falls back to the raw
/// string when it does not decode.
pub fn describe(field: &FieldDescriptor, wire: &str) -> String {
    if wire.trim() == UNKNOWN_SENTINEL {
        return "Unknown".to_string();
    }
    match field.decode(wire) {
        Ok(FieldValue::FanSpeed(f)) => format!("CPU {} / GPU {}", fan(f.cpu), fan(f.gpu)),
        Ok(FieldValue::Toggle(on)) => field.states[usize::from(!on)].to_string(),
        Ok(FieldValue::UsbCharging(0)) => "Off".to_string(),
        Ok(FieldValue::UsbCharging(level)) => format!("until battery {}%", level),
        Ok(FieldValue::FourZone(m)) => format!(
            "{}, speed {}, brightness {}%, direction {}, #{:02x}{:02x}{:02x}",
            m.mode_name().unwrap_or("Unknown"),
            m.speed,
            m.brightness,
            m.direction,
            m.red.clamp(0, 255),
            m.green.clamp(0, 255),
            m.blue.clamp(0, 255),
        ),
        Ok(FieldValue::PerZone(p)) => format!(
            "#{}, brightness {}%",
            p.zones.join(" #"),
            p.brightness
        ),
        Err(_) => wire.to_string(),
    }
}

fn fan(percent: i32) -> String {
    if percent == 0 {
        "auto".to_string()
    } else {
        format!("{}%", percent)
    }
}

fn surface_title(surface: &DeviceSurface) -> String {
    let base = surface
        .base
        .map(|b| b.to_string())
        .unwrap_or_else(|| "No sense surface".to_string());
    if surface.rgb {
        format!("{} + Four-Zone RGB", base)
    } else {
        base
    }
}

pub fn print_status(surface: &DeviceSurface, snapshot: &Snapshot) {
    let rows: Vec<(&str, String)> = FIELDS
        .iter()
        .filter_map(|f| snapshot.get(f.name).map(|v| (f.label, describe(f, v))))
        .collect();

    let title = surface_title(surface);
    let inner_w = rows
        .iter()
        .map(|(l, v)| l.len().max(LABEL_W) + 2 + v.chars().count())
        .max()
        .unwrap_or(40)
        .max(title.len() + 2);

    let fill = inner_w.saturating_sub(1 + title.len());
    println!("╭─ {} {}╮", title.bold(), "─".repeat(fill));

    if rows.is_empty() {
        let msg = "No attributes reported";
        let pad = inner_w.saturating_sub(msg.len());
        println!("│ {}{} │", msg.dimmed(), " ".repeat(pad));
    }
    for (label, value) in &rows {
        let padded = format!("{:<w$}", label, w = LABEL_W);
        let pad = inner_w.saturating_sub(LABEL_W + 2 + value.chars().count());
        println!("│ {}  {}{} │", padded.dimmed(), value, " ".repeat(pad));
    }

    println!("╰{}╯", "─".repeat(inner_w + 2));
}

pub fn status_json(surface: &DeviceSurface, snapshot: &Snapshot) -> serde_json::Value {
    let decoded: serde_json::Map<String, serde_json::Value> = FIELDS
        .iter()
        .filter_map(|f| {
            let value = f.decode(snapshot.get(f.name)?).ok()?;
            Some((f.name.to_string(), serde_json::to_value(value).ok()?))
        })
        .collect();

    serde_json::json!({
        "surface": surface,
        "values": snapshot.values(),
        "decoded": decoded,
    })
}

/// Confirmation for a single-field write.
pub fn print_set(field: &FieldDescriptor, wire: &str) {
    println!(
        "{} {} {}",
        format!("{} set:", field.label).green().bold(),
        describe(field, wire),
        format!("({} = {})", field.name, wire).dimmed()
    );
}

pub fn set_json(field: &FieldDescriptor, wire: &str) -> serde_json::Value {
    serde_json::json!({
        "field": field.name,
        "value": wire,
    })
}

pub fn print_profiles(profiles: &ProfileStore, names: &[String]) {
    if names.is_empty() {
        println!(
            "{}",
            format!("  No saved profiles in {}", profiles.dir().display()).yellow()
        );
        return;
    }

    let title = format!("Profiles ({})", names.len());
    let divider_w: usize = 48;
    let fill = divider_w.saturating_sub(2 + title.len());
    println!("── {} {}", title.bold(), "─".repeat(fill));
    for name in names {
        let saved = profiles
            .modified(name)
            .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_default();
        println!("  {:<28} {}", name, saved.dimmed());
    }
    println!("{}", "─".repeat(divider_w));
}

pub fn profiles_json(profiles: &ProfileStore, names: &[String]) -> serde_json::Value {
    serde_json::json!({
        "dir": profiles.dir(),
        "profiles": names.iter().map(|n| serde_json::json!({
            "name": n,
            "modified": profiles.modified(n).map(|t| t.to_rfc3339()),
        })).collect::<Vec<_>>(),
    })
}

pub fn print_replay(name: &str, report: &ReplayReport) {
    for field in &report.applied {
        println!("  {} {}", "✓".green(), field);
    }
    for field in &report.skipped {
        println!("  {} {} {}", "-".dimmed(), field, "(no RGB keyboard)".dimmed());
    }
    for key in &report.ignored {
        println!("  {} {} {}", "?".dimmed(), key, "(unknown, ignored)".dimmed());
    }
    for failure in &report.failures {
        println!("  {} {}", "✗".red(), failure.field);
        println!("       {}", failure.error.to_string().dimmed());
    }

    if report.is_success() {
        println!(
            "{}",
            format!("Profile '{}' applied ({} fields).", name, report.applied.len())
                .green()
                .bold()
        );
    } else {
        println!(
            "{}",
            format!(
                "Profile '{}' partially applied: {} of {} fields failed.",
                name,
                report.failures.len(),
                report.failures.len() + report.applied.len()
            )
            .yellow()
            .bold()
        );
    }
}

pub fn replay_json(name: &str, report: &ReplayReport) -> serde_json::Value {
    serde_json::json!({
        "profile": name,
        "success": report.is_success(),
        "applied": report.applied,
        "skipped": report.skipped,
        "ignored": report.ignored,
        "failures": report.failures.iter().map(|f| serde_json::json!({
            "field": f.field,
            "error": f.error.to_string(),
        })).collect::<Vec<_>>(),
    })
}
