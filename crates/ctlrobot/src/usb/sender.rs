//! Command delivery
//!
//! [`ClaimedRobot`] owns the open handle from the moment setup starts. When
//! it goes out of scope, on success or on any error, it releases the claimed
//! interface and hands detached interfaces back to the kernel driver.

use crate::diagnostics::Diagnostics;
use common::{ControlHandle, Error, Result, SetupStage, UsbBus};
use protocol::{
    CONTROL_INTERFACE, ControlRequest, DEFAULT_TIMEOUT, DETACH_INTERFACES, ROBOT_CONFIGURATION,
    RobotCommand,
};
use std::io::Write;
use std::time::Duration;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SendOptions {
    pub timeout: Duration,
    pub reattach_kernel_driver: bool,
}

impl Default for SendOptions {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            reattach_kernel_driver: true,
        }
    }
}

/// An open robot with its control interface claimed
pub struct ClaimedRobot<H: ControlHandle> {
    handle: H,
    /// Interfaces we took from the kernel driver
    detached: Vec<u8>,
    claimed: bool,
    reattach_kernel_driver: bool,
}

impl<H: ControlHandle> ClaimedRobot<H> {
    /// Detach kernel drivers, select the configuration and claim the interface
    pub fn acquire(handle: H, reattach_kernel_driver: bool) -> Result<Self> {
        let mut robot = Self {
            handle,
            detached: Vec::new(),
            claimed: false,
            reattach_kernel_driver,
        };

        for interface in DETACH_INTERFACES {
            robot.detach_kernel_driver(interface);
        }

        robot
            .handle
            .set_active_configuration(ROBOT_CONFIGURATION)
            .map_err(|e| Error::setup(SetupStage::SetConfiguration, e))?;

        robot
            .handle
            .claim_interface(CONTROL_INTERFACE)
            .map_err(|e| Error::setup(SetupStage::ClaimInterface, e))?;
        robot.claimed = true;
        debug!("Claimed interface {}", CONTROL_INTERFACE);

        Ok(robot)
    }

    /// Best effort; a driver that stays bound shows up as a claim failure
    fn detach_kernel_driver(&mut self, interface: u8) {
        match self.handle.kernel_driver_active(interface) {
            Ok(true) => match self.handle.detach_kernel_driver(interface) {
                Ok(()) => {
                    debug!("Detached kernel driver from interface {}", interface);
                    self.detached.push(interface);
                }
                Err(e) => debug!(
                    "Failed to detach kernel driver from interface {}: {}",
                    interface, e
                ),
            },
            Ok(false) => debug!("No kernel driver active on interface {}", interface),
            Err(e) => debug!(
                "Could not check kernel driver status for interface {}: {}",
                interface, e
            ),
        }
    }

    /// Send one command and require the whole report to be acknowledged
    pub fn send(&mut self, command: &RobotCommand, timeout: Duration) -> Result<usize> {
        let payload = command.payload();
        let request = ControlRequest::robot_command();

        debug!(
            "Control transfer: request_type={:#x}, request={:#x}, value={:#x}, index={:#x}, data_len={}",
            request.request_type,
            request.request,
            request.value,
            request.index,
            payload.len()
        );

        let written = self
            .handle
            .write_control(request, payload.as_bytes(), timeout)
            .map_err(Error::Transfer)?;

        if written != payload.len() {
            return Err(Error::ShortTransfer {
                expected: payload.len(),
                actual: written,
            });
        }

        debug!("Control transfer succeeded: {} bytes", written);
        Ok(written)
    }
}

impl<H: ControlHandle> Drop for ClaimedRobot<H> {
    fn drop(&mut self) {
        if self.claimed {
            if let Err(e) = self.handle.release_interface(CONTROL_INTERFACE) {
                warn!("Failed to release interface {}: {}", CONTROL_INTERFACE, e);
            }
        }

        if self.reattach_kernel_driver {
            for interface in self.detached.drain(..).rev() {
                match self.handle.attach_kernel_driver(interface) {
                    Ok(()) => debug!("Reattached kernel driver to interface {}", interface),
                    Err(e) => debug!(
                        "Could not reattach kernel driver to interface {}: {}",
                        interface, e
                    ),
                }
            }
        }
    }
}

/// Open `device` and deliver `command`
///
/// Returns the number of bytes the device acknowledged.
pub fn send_command<B: UsbBus, W: Write>(
    bus: &B,
    device: &B::Device,
    command: RobotCommand,
    options: &SendOptions,
    diagnostics: &mut Diagnostics<W>,
) -> Result<usize> {
    let handle = bus
        .open(device)
        .map_err(|e| Error::setup(SetupStage::Open, e))?;

    let mut robot = ClaimedRobot::acquire(handle, options.reattach_kernel_driver)?;

    diagnostics.sending(command.byte());
    let written = robot.send(&command, options.timeout)?;

    info!("Sent {} (0x{:02x})", command, command.byte());
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::test_utils::{MockBus, MockCall, MockDevice};

    fn quiet() -> Diagnostics<Vec<u8>> {
        Diagnostics::new(false, Vec::new())
    }

    #[test]
    fn test_setup_sequence() {
        let device = MockDevice::robot(1, 2);
        let bus = MockBus::new(vec![device.clone()]);
        let cmd = RobotCommand::from_args("slow", "off");

        send_command(&bus, &device, cmd, &SendOptions::default(), &mut quiet()).unwrap();

        let calls = bus.log.calls();
        assert_eq!(
            &calls[..5],
            &[
                MockCall::Open {
                    bus_number: 1,
                    address: 2
                },
                MockCall::DetachKernelDriver(0),
                MockCall::DetachKernelDriver(1),
                MockCall::SetConfiguration(1),
                MockCall::ClaimInterface(0),
            ]
        );
        assert_eq!(
            &calls[6..],
            &[
                MockCall::ReleaseInterface(0),
                MockCall::AttachKernelDriver(1),
                MockCall::AttachKernelDriver(0),
                MockCall::Closed,
            ]
        );
    }

    #[test]
    fn test_only_detached_drivers_are_reattached() {
        let mut device = MockDevice::robot(1, 2);
        device.kernel_drivers = vec![1];
        let bus = MockBus::new(vec![device.clone()]);

        send_command(
            &bus,
            &device,
            RobotCommand::default(),
            &SendOptions::default(),
            &mut quiet(),
        )
        .unwrap();

        assert!(!bus.log.contains(&MockCall::DetachKernelDriver(0)));
        assert!(!bus.log.contains(&MockCall::AttachKernelDriver(0)));
        assert!(bus.log.contains(&MockCall::AttachKernelDriver(1)));
    }

    #[test]
    fn test_no_reattach_when_disabled() {
        let device = MockDevice::robot(1, 2);
        let bus = MockBus::new(vec![device.clone()]);
        let options = SendOptions {
            reattach_kernel_driver: false,
            ..SendOptions::default()
        };

        send_command(&bus, &device, RobotCommand::default(), &options, &mut quiet()).unwrap();

        assert!(bus.log.contains(&MockCall::ReleaseInterface(0)));
        assert!(!bus.log.contains(&MockCall::AttachKernelDriver(0)));
    }

    #[test]
    fn test_detach_failure_is_ignored() {
        let mut device = MockDevice::robot(1, 2);
        device.detach_error = Some(rusb::Error::Access);
        let bus = MockBus::new(vec![device.clone()]);

        let written = send_command(
            &bus,
            &device,
            RobotCommand::default(),
            &SendOptions::default(),
            &mut quiet(),
        )
        .unwrap();
        assert_eq!(written, 8);
    }

    #[test]
    fn test_claim_failure_releases_nothing_but_reattaches() {
        let mut device = MockDevice::robot(1, 2);
        device.claim_error = Some(rusb::Error::Busy);
        let bus = MockBus::new(vec![device.clone()]);

        let err = send_command(
            &bus,
            &device,
            RobotCommand::default(),
            &SendOptions::default(),
            &mut quiet(),
        )
        .unwrap_err();

        assert!(matches!(
            err,
            Error::DeviceSetup {
                stage: SetupStage::ClaimInterface,
                error: rusb::Error::Busy
            }
        ));
        assert!(!bus.log.contains(&MockCall::ReleaseInterface(0)));
        assert!(bus.log.contains(&MockCall::AttachKernelDriver(0)));
        assert!(bus.log.control_transfers().is_empty());
        assert_eq!(bus.log.calls().last(), Some(&MockCall::Closed));
    }

    #[test]
    fn test_configuration_failure() {
        let mut device = MockDevice::robot(1, 2);
        device.configuration_error = Some(rusb::Error::Pipe);
        let bus = MockBus::new(vec![device.clone()]);

        let err = send_command(
            &bus,
            &device,
            RobotCommand::default(),
            &SendOptions::default(),
            &mut quiet(),
        )
        .unwrap_err();

        assert!(matches!(
            err,
            Error::DeviceSetup {
                stage: SetupStage::SetConfiguration,
                ..
            }
        ));
        assert!(!bus.log.contains(&MockCall::ClaimInterface(0)));
    }

    #[test]
    fn test_open_failure() {
        let mut device = MockDevice::robot(1, 2);
        device.open_error = Some(rusb::Error::Access);
        let bus = MockBus::new(vec![device.clone()]);

        let err = send_command(
            &bus,
            &device,
            RobotCommand::default(),
            &SendOptions::default(),
            &mut quiet(),
        )
        .unwrap_err();

        assert!(matches!(
            err,
            Error::DeviceSetup {
                stage: SetupStage::Open,
                ..
            }
        ));
        assert!(!bus.log.opened());
    }

    #[test]
    fn test_short_transfer_still_releases() {
        let device = MockDevice::robot(1, 2).with_transfer_result(Ok(3));
        let bus = MockBus::new(vec![device.clone()]);

        let err = send_command(
            &bus,
            &device,
            RobotCommand::from_args("fast", "fast"),
            &SendOptions::default(),
            &mut quiet(),
        )
        .unwrap_err();

        assert!(matches!(
            err,
            Error::ShortTransfer {
                expected: 8,
                actual: 3
            }
        ));
        assert!(bus.log.contains(&MockCall::ReleaseInterface(0)));
    }

    #[test]
    fn test_transfer_error_still_releases() {
        let device = MockDevice::robot(1, 2).with_transfer_result(Err(rusb::Error::Timeout));
        let bus = MockBus::new(vec![device.clone()]);

        let err = send_command(
            &bus,
            &device,
            RobotCommand::default(),
            &SendOptions::default(),
            &mut quiet(),
        )
        .unwrap_err();

        assert!(matches!(err, Error::Transfer(rusb::Error::Timeout)));
        assert!(bus.log.contains(&MockCall::ReleaseInterface(0)));
        assert_eq!(bus.log.calls().last(), Some(&MockCall::Closed));
    }

    #[test]
    fn test_timeout_is_passed_through() {
        let device = MockDevice::robot(1, 2);
        let bus = MockBus::new(vec![device.clone()]);
        let options = SendOptions {
            timeout: Duration::from_millis(1234),
            ..SendOptions::default()
        };

        send_command(&bus, &device, RobotCommand::default(), &options, &mut quiet()).unwrap();

        let timeout = bus.log.calls().into_iter().find_map(|c| match c {
            MockCall::ControlOut { timeout, .. } => Some(timeout),
            _ => None,
        });
        assert_eq!(timeout, Some(Duration::from_millis(1234)));
    }
}
