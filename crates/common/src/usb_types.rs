//! USB type abstractions
//!
//! The command path is written against [`UsbBus`] and [`ControlHandle`]
//! instead of rusb directly. The binary plugs in libusb; tests plug in the
//! doubles from [`crate::test_utils`].

use protocol::{ControlRequest, ROBOT_PRODUCT_ID, ROBOT_VENDOR_ID};
use std::fmt;
use std::time::Duration;

/// Vendor/product pair from a device descriptor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UsbDeviceId {
    pub vendor_id: u16,
    pub product_id: u16,
}

impl UsbDeviceId {
    /// The dancing robot
    pub const ROBOT: Self = Self::new(ROBOT_VENDOR_ID, ROBOT_PRODUCT_ID);

    pub const fn new(vendor_id: u16, product_id: u16) -> Self {
        Self {
            vendor_id,
            product_id,
        }
    }
}

impl fmt::Display for UsbDeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:04x}:0x{:04x}", self.vendor_id, self.product_id)
    }
}

/// What enumeration tells us about a device without opening it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceSummary {
    pub bus_number: u8,
    pub address: u8,
    pub id: UsbDeviceId,
}

/// A source of USB devices
pub trait UsbBus {
    /// Enumerated, unopened device
    type Device;
    /// Open handle to a device
    type Handle: ControlHandle;

    /// List every attached device in platform order
    fn devices(&self) -> Result<Vec<Self::Device>, rusb::Error>;

    /// Read the identifying fields of a device
    fn summary(&self, device: &Self::Device) -> Result<DeviceSummary, rusb::Error>;

    fn open(&self, device: &Self::Device) -> Result<Self::Handle, rusb::Error>;
}

/// The subset of a device handle needed to deliver a control transfer
pub trait ControlHandle {
    fn kernel_driver_active(&mut self, interface: u8) -> Result<bool, rusb::Error>;

    fn detach_kernel_driver(&mut self, interface: u8) -> Result<(), rusb::Error>;

    fn attach_kernel_driver(&mut self, interface: u8) -> Result<(), rusb::Error>;

    fn set_active_configuration(&mut self, config: u8) -> Result<(), rusb::Error>;

    fn claim_interface(&mut self, interface: u8) -> Result<(), rusb::Error>;

    fn release_interface(&mut self, interface: u8) -> Result<(), rusb::Error>;

    /// Host-to-device control transfer, returns the number of bytes written
    fn write_control(
        &mut self,
        request: ControlRequest,
        data: &[u8],
        timeout: Duration,
    ) -> Result<usize, rusb::Error>;
}
