//! libusb backend
//!
//! Thin adapters from rusb's context and handle onto the bus traits.

use common::{ControlHandle, DeviceSummary, UsbBus, UsbDeviceId};
use protocol::ControlRequest;
use rusb::{Context, Device, DeviceHandle, UsbContext};
use std::time::Duration;
use tracing::debug;

/// The system USB bus
pub struct LibusbBus {
    context: Context,
}

impl LibusbBus {
    pub fn new() -> Result<Self, rusb::Error> {
        let context = Context::new()?;
        debug!("libusb context initialized");
        Ok(Self { context })
    }
}

impl UsbBus for LibusbBus {
    type Device = Device<Context>;
    type Handle = LibusbHandle;

    fn devices(&self) -> Result<Vec<Device<Context>>, rusb::Error> {
        let devices = self.context.devices()?;
        Ok(devices.iter().collect())
    }

    fn summary(&self, device: &Device<Context>) -> Result<DeviceSummary, rusb::Error> {
        let descriptor = device.device_descriptor()?;

        Ok(DeviceSummary {
            bus_number: device.bus_number(),
            address: device.address(),
            id: UsbDeviceId::new(descriptor.vendor_id(), descriptor.product_id()),
        })
    }

    fn open(&self, device: &Device<Context>) -> Result<LibusbHandle, rusb::Error> {
        let handle = device.open()?;
        debug!(
            "Opened device: bus={}, addr={}",
            device.bus_number(),
            device.address()
        );
        Ok(LibusbHandle { handle })
    }
}

/// An open libusb device handle; closed on drop
pub struct LibusbHandle {
    handle: DeviceHandle<Context>,
}

impl ControlHandle for LibusbHandle {
    fn kernel_driver_active(&mut self, interface: u8) -> Result<bool, rusb::Error> {
        self.handle.kernel_driver_active(interface)
    }

    fn detach_kernel_driver(&mut self, interface: u8) -> Result<(), rusb::Error> {
        self.handle.detach_kernel_driver(interface)
    }

    fn attach_kernel_driver(&mut self, interface: u8) -> Result<(), rusb::Error> {
        self.handle.attach_kernel_driver(interface)
    }

    fn set_active_configuration(&mut self, config: u8) -> Result<(), rusb::Error> {
        self.handle.set_active_configuration(config)
    }

    fn claim_interface(&mut self, interface: u8) -> Result<(), rusb::Error> {
        self.handle.claim_interface(interface)
    }

    fn release_interface(&mut self, interface: u8) -> Result<(), rusb::Error> {
        self.handle.release_interface(interface)
    }

    fn write_control(
        &mut self,
        request: ControlRequest,
        data: &[u8],
        timeout: Duration,
    ) -> Result<usize, rusb::Error> {
        self.handle.write_control(
            request.request_type,
            request.request,
            request.value,
            request.index,
            data,
            timeout,
        )
    }
}
