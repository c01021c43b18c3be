use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "sensectl",
    about = "Control fans, battery, keyboard lighting and saved profiles on Acer Predator/Nitro laptops via the linuwu_sense driver",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Output as JSON instead of formatted tables
    #[arg(long, global = true)]
    pub json: bool,

    /// Read configuration from this file only, ignoring system and user config
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Toggle {
    On,
    Off,
}

impl Toggle {
    pub fn enabled(self) -> bool {
        self == Toggle::On
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Calibration {
    Start,
    Stop,
}

#[derive(Subcommand)]
pub enum Command {
    /// Show the current device configuration
    Status,

    /// List saved profiles
    Profiles,

    /// Capture the current configuration as a named profile
    Save {
        /// Profile name
        name: String,
    },

    /// Re-apply a saved profile
    Load {
        /// Profile name
        name: String,
    },

    /// Set CPU and GPU fan duty in percent (0 = automatic)
    FanSpeed {
        /// CPU fan percent, 0-100
        #[arg(allow_negative_numbers = true)]
        cpu: i32,
        /// GPU fan percent, 0-100
        #[arg(allow_negative_numbers = true)]
        gpu: i32,
    },

    /// Stop charging at 80% to preserve battery health
    BatteryLimiter {
        #[arg(value_enum)]
        state: Toggle,
    },

    /// Start or stop a battery calibration cycle
    BatteryCalibration {
        #[arg(value_enum)]
        action: Calibration,
    },

    /// Turn the keyboard backlight off after 30 seconds of inactivity
    BacklightTimeout {
        #[arg(value_enum)]
        state: Toggle,
    },

    /// Boot animation and sound
    BootAnimation {
        #[arg(value_enum)]
        state: Toggle,
    },

    /// LCD override (reduces panel latency and ghosting)
    LcdOverride {
        #[arg(value_enum)]
        state: Toggle,
    },

    /// Keep USB powered while off until the battery drops to this level (0, 10, 20, 30)
    UsbCharging {
        #[arg(allow_negative_numbers = true)]
        level: i32,
    },

    /// Set a four-zone keyboard lighting effect
    FourZone {
        /// Effect: 0 static, 1 breathing, 2 neon, 3 wave, 4 shifting, 5 zoom, 6 meteor, 7 twinkling
        #[arg(allow_negative_numbers = true)]
        mode: i32,
        /// Effect speed, 0-9
        #[arg(allow_negative_numbers = true)]
        speed: i32,
        /// Brightness percent, 0-100
        #[arg(allow_negative_numbers = true)]
        brightness: i32,
        /// Direction: 1 right to left, 2 left to right (0 when unused)
        #[arg(allow_negative_numbers = true)]
        direction: i32,
        #[arg(allow_negative_numbers = true)]
        red: i32,
        #[arg(allow_negative_numbers = true)]
        green: i32,
        #[arg(allow_negative_numbers = true)]
        blue: i32,
    },

    /// Set a static colour per keyboard zone
    PerZone {
        /// Zone 1 colour as six hex digits
        zone1: String,
        zone2: String,
        zone3: String,
        zone4: String,
        /// Brightness percent, 0-100
        #[arg(allow_negative_numbers = true)]
        brightness: i32,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for (auto-detected if omitted)
        shell: Option<Shell>,
    },
}

/// Print shell completions to stdout.
pub fn print_completions(shell: Option<Shell>) -> anyhow::Result<()> {
    let shell = shell.or_else(Shell::from_env).ok_or_else(|| {
        anyhow::anyhow!(
            "Could not detect shell. Specify one: sensectl completions bash|zsh|fish|elvish|powershell"
        )
    })?;
    clap_complete::generate(
        shell,
        &mut Cli::command(),
        "sensectl",
        &mut std::io::stdout(),
    );
    Ok(())
}
