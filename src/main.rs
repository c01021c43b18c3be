use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use colored::Colorize;
use sensectl::cli::{Calibration, Cli, Command};
use sensectl::control::Controller;
use sensectl::device::SysfsStore;
use sensectl::field::{self, FieldDescriptor, FourZoneMode, PerZoneMode};
use sensectl::profile::ProfileStore;
use sensectl::replay::ReplayOutcome;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(());
    };

    sensectl::logging::init_logging(cli.verbose, cli.quiet);

    if let Command::Completions { shell } = &command {
        return sensectl::cli::print_completions(*shell);
    }

    let config = sensectl::config::load(cli.config.as_deref());
    let ctl = Controller::new(SysfsStore::detect(config.sysfs()));

    let result = match command {
        Command::Status => cmd_status(&ctl, cli.json),
        Command::Profiles => cmd_profiles(&config.profile_store()?, cli.json),
        Command::Save { name } => cmd_save(&ctl, &config.profile_store()?, &name, cli.json),
        Command::Load { name } => cmd_load(&ctl, &config.profile_store()?, &name, cli.json),
        Command::FanSpeed { cpu, gpu } => {
            cmd_set(&field::FAN_SPEED, ctl.set_fan_speed(cpu, gpu), cli.json)
        }
        Command::BatteryLimiter { state } => cmd_set(
            &field::BATTERY_LIMITER,
            ctl.set_battery_limiter(state.enabled()),
            cli.json,
        ),
        Command::BatteryCalibration { action } => cmd_set(
            &field::BATTERY_CALIBRATION,
            ctl.set_battery_calibration(action == Calibration::Start),
            cli.json,
        ),
        Command::BacklightTimeout { state } => cmd_set(
            &field::BACKLIGHT_TIMEOUT,
            ctl.set_backlight_timeout(state.enabled()),
            cli.json,
        ),
        Command::BootAnimation { state } => cmd_set(
            &field::BOOT_ANIMATION_SOUND,
            ctl.set_boot_animation_sound(state.enabled()),
            cli.json,
        ),
        Command::LcdOverride { state } => cmd_set(
            &field::LCD_OVERRIDE,
            ctl.set_lcd_override(state.enabled()),
            cli.json,
        ),
        Command::UsbCharging { level } => {
            cmd_set(&field::USB_CHARGING, ctl.set_usb_charging(level), cli.json)
        }
        Command::FourZone {
            mode,
            speed,
            brightness,
            direction,
            red,
            green,
            blue,
        } => cmd_set(
            &field::FOUR_ZONE_MODE,
            ctl.set_four_zone_mode(FourZoneMode {
                mode,
                speed,
                brightness,
                direction,
                red,
                green,
                blue,
            }),
            cli.json,
        ),
        Command::PerZone {
            zone1,
            zone2,
            zone3,
            zone4,
            brightness,
        } => cmd_set(
            &field::PER_ZONE_MODE,
            ctl.set_per_zone_mode(PerZoneMode {
                zones: [zone1, zone2, zone3, zone4],
                brightness,
            }),
            cli.json,
        ),
        Command::Completions { .. } => Ok(()),
    };

    if let Err(e) = &result
        && needs_root_hint(e)
    {
        eprintln!(
            "  {} writing driver attributes requires root; try {}",
            "Hint:".yellow(),
            "sudo sensectl ...".cyan()
        );
    }
    result
}

fn needs_root_hint(error: &anyhow::Error) -> bool {
    let denied = error
        .downcast_ref::<sensectl::Error>()
        .is_some_and(sensectl::Error::is_permission_denied);
    denied && !nix::unistd::geteuid().is_root()
}

fn print_json(value: &serde_json::Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn cmd_set(field: &FieldDescriptor, written: sensectl::Result<String>, json: bool) -> Result<()> {
    let wire = written.with_context(|| format!("setting {}", field.name))?;
    if json {
        print_json(&sensectl::output::set_json(field, &wire))
    } else {
        sensectl::output::print_set(field, &wire);
        Ok(())
    }
}

fn cmd_status(ctl: &Controller<SysfsStore>, json: bool) -> Result<()> {
    let snapshot = ctl.status()?;
    if json {
        print_json(&sensectl::output::status_json(&ctl.surface(), &snapshot))
    } else {
        sensectl::output::print_status(&ctl.surface(), &snapshot);
        Ok(())
    }
}

fn cmd_profiles(profiles: &ProfileStore, json: bool) -> Result<()> {
    let names = profiles.list()?;
    if json {
        print_json(&sensectl::output::profiles_json(profiles, &names))
    } else {
        sensectl::output::print_profiles(profiles, &names);
        Ok(())
    }
}

fn cmd_save(
    ctl: &Controller<SysfsStore>,
    profiles: &ProfileStore,
    name: &str,
    json: bool,
) -> Result<()> {
    let path = ctl
        .save_profile(profiles, name)
        .with_context(|| format!("saving profile '{}'", name))?;
    if json {
        print_json(&serde_json::json!({ "profile": name, "path": path }))
    } else {
        println!(
            "{} {}",
            format!("Saved profile '{}' to", name).green().bold(),
            path.display()
        );
        Ok(())
    }
}

fn cmd_load(
    ctl: &Controller<SysfsStore>,
    profiles: &ProfileStore,
    name: &str,
    json: bool,
) -> Result<()> {
    let report = ctl.load_profile(profiles, name)?;
    if json {
        print_json(&sensectl::output::replay_json(name, &report))?;
    } else {
        sensectl::output::print_replay(name, &report);
    }

    match report.outcome() {
        ReplayOutcome::AllSucceeded => Ok(()),
        ReplayOutcome::PartialFailure(fields) => {
            if report
                .failures
                .iter()
                .any(|f| f.error.is_permission_denied())
                && !nix::unistd::geteuid().is_root()
            {
                eprintln!(
                    "  {} writing driver attributes requires root; try {}",
                    "Hint:".yellow(),
                    format!("sudo sensectl load {}", name).cyan()
                );
            }
            anyhow::bail!(
                "profile '{}' partially applied; failed fields: {}",
                name,
                fields.join(", ")
            )
        }
    }
}
