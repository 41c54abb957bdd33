//! ctlrobot
//!
//! Sends a movement speed and LED pattern to a USB dancing robot.

use anyhow::{Context, Result};
use clap::Parser;
use clap::error::ErrorKind;
use common::setup_logging;
use ctlrobot::config::{self, RobotConfig};
use ctlrobot::diagnostics::Diagnostics;
use ctlrobot::usb::LibusbBus;
use protocol::RobotCommand;
use std::ffi::{OsStr, OsString};
use std::process::ExitCode;
use tracing::{debug, info};

const USAGE: &str = "\
Usage: ctlrobot [ slow | fast | off ] [ slow | fast | off ]
                [      movement     ] [         LEDs      ]";

#[derive(Parser, Debug)]
#[command(name = "ctlrobot")]
#[command(author, version, about = "Control a USB dancing robot")]
#[command(long_about = "
Finds the Dream Cheeky dancing robot (0x1941:0x8021) on the USB bus and sends
it one command. Values other than slow, fast or off (including ones that
start with '-' or are not UTF-8) mean off.

EXAMPLES:
    # Dance fast, single-flash LEDs
    ctlrobot fast slow

    # Stop everything
    ctlrobot off off

    # No device listing on stdout, debug logs on stderr
    ctlrobot --quiet --log-level debug slow off
")]
struct Args {
    /// Movement speed (slow, fast, off)
    #[arg(value_parser = clap::value_parser!(OsString), allow_hyphen_values = true)]
    movement: OsString,

    /// LED pattern (slow = single flash, fast = double flash, off)
    #[arg(value_parser = clap::value_parser!(OsString), allow_hyphen_values = true)]
    leds: OsString,

    /// Path to configuration file
    #[arg(short, long, value_name = "PATH")]
    config: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, value_name = "LEVEL")]
    log_level: Option<String>,

    /// Do not print checked devices and the command byte
    #[arg(short, long)]
    quiet: bool,

    /// Control transfer timeout in milliseconds
    #[arg(long, value_name = "MS")]
    timeout_ms: Option<u64>,
}

fn main() -> ExitCode {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            e.exit()
        }
        Err(e) => {
            eprint!("{}", e);
            println!("{}", USAGE);
            return ExitCode::FAILURE;
        }
    };

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<()> {
    let config = load_config(&args)?;

    setup_logging(&config.log_level).context("Failed to setup logging")?;
    debug!("Configuration: {:?}", config);

    let command = RobotCommand::from_args(arg_str(&args.movement), arg_str(&args.leds));
    info!("Command: {} (0x{:02x})", command, command.byte());

    let bus = LibusbBus::new().context("Failed to initialize libusb")?;
    let mut diagnostics = Diagnostics::stdout(config.debug);

    let summary = ctlrobot::run(&bus, command, &config, &mut diagnostics)?;
    info!(
        "Command delivered to bus {:03} device {:03}",
        summary.bus_number, summary.address
    );

    Ok(())
}

/// Arguments that are not valid UTF-8 cannot name a speed, so they mean off
fn arg_str(arg: &OsStr) -> &str {
    arg.to_str().unwrap_or("")
}

/// File (if given) first, then command line overrides
fn load_config(args: &Args) -> Result<RobotConfig> {
    let mut config = match args.config.as_deref() {
        Some(path) => RobotConfig::load(&config::expand_path(path))?,
        None => RobotConfig::default(),
    };

    if let Some(level) = &args.log_level {
        config.log_level = level.clone();
    }
    if args.quiet {
        config.debug = false;
    }
    if let Some(timeout_ms) = args.timeout_ms {
        config.timeout_ms = timeout_ms;
    }

    config.validate().context("Invalid configuration")?;
    Ok(config)
}
