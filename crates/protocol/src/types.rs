//! Device identity and control request definitions
//!
//! The robot enumerates as a low-speed HID device. Commands are delivered as
//! a class-specific SET_REPORT request on the default control pipe rather
//! than through the interrupt endpoint.

use std::time::Duration;

/// USB Vendor ID of the robot (Dream Cheeky)
pub const ROBOT_VENDOR_ID: u16 = 0x1941;

/// USB Product ID of the robot
pub const ROBOT_PRODUCT_ID: u16 = 0x8021;

/// Configuration value selected before claiming
pub const ROBOT_CONFIGURATION: u8 = 1;

/// Interface claimed for the control transfer
pub const CONTROL_INTERFACE: u8 = 0;

/// Interfaces whose kernel driver (usbhid) is detached before claiming
pub const DETACH_INTERFACES: [u8; 2] = [0, 1];

/// Default timeout for the command transfer (5 seconds)
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Setup packet fields for a host-to-device control transfer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlRequest {
    pub request_type: u8,
    pub request: u8,
    pub value: u16,
    pub index: u16,
}

impl ControlRequest {
    /// Host-to-device | class | interface
    pub const CLASS_INTERFACE_OUT: u8 = 0x21;

    /// HID SET_REPORT (shares its code with the standard SET_CONFIGURATION)
    pub const SET_REPORT: u8 = 0x09;

    /// Output report, report ID 0
    pub const OUTPUT_REPORT: u16 = 0x0200;

    /// The request carrying a robot command
    pub const fn robot_command() -> Self {
        Self {
            request_type: Self::CLASS_INTERFACE_OUT,
            request: Self::SET_REPORT,
            value: Self::OUTPUT_REPORT,
            index: CONTROL_INTERFACE as u16,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_robot_command_request() {
        let req = ControlRequest::robot_command();
        assert_eq!(req.request_type, 0x21);
        assert_eq!(req.request, 0x09);
        assert_eq!(req.value, 0x0200);
        assert_eq!(req.index, 0);
        assert_eq!(req.request_type & 0x80, 0, "must be host-to-device");
    }

    #[test]
    fn test_default_timeout() {
        assert_eq!(DEFAULT_TIMEOUT.as_millis(), 5000);
    }
}
