//! ctlrobot
//!
//! Control the Dream Cheeky USB dancing robot: find it on the bus and send a
//! single movement/LED command.

pub mod config;
pub mod diagnostics;
pub mod usb;

use common::{DeviceSummary, Result, UsbBus, UsbDeviceId};
use config::RobotConfig;
use diagnostics::Diagnostics;
use protocol::RobotCommand;
use std::io::Write;

/// Locate the robot on `bus` and deliver `command` to it
pub fn run<B: UsbBus, W: Write>(
    bus: &B,
    command: RobotCommand,
    config: &RobotConfig,
    diagnostics: &mut Diagnostics<W>,
) -> Result<DeviceSummary> {
    let (device, summary) = usb::find_device(bus, UsbDeviceId::ROBOT, diagnostics)?;
    usb::send_command(bus, &device, command, &config.send_options(), diagnostics)?;
    Ok(summary)
}
