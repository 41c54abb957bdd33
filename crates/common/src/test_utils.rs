//! Test utilities for ctlrobot
//!
//! Provides an in-memory [`UsbBus`] so the locate-and-send path can be
//! exercised without hardware. Every call made through a [`MockHandle`] is
//! appended to a shared [`CallLog`].
//!
//! # Example
//!
//! ```
//! use common::test_utils::{MockBus, MockDevice};
//! use common::{UsbBus, UsbDeviceId};
//!
//! let bus = MockBus::new(vec![
//!     MockDevice::new(1, 2, UsbDeviceId::new(0x1d6b, 0x0002)),
//!     MockDevice::robot(1, 5),
//! ]);
//! assert_eq!(bus.devices().unwrap().len(), 2);
//! ```

use crate::usb_types::{ControlHandle, DeviceSummary, UsbBus, UsbDeviceId};
use protocol::{ControlRequest, PAYLOAD_LEN};
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

/// A call observed by the mock
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockCall {
    Open { bus_number: u8, address: u8 },
    DetachKernelDriver(u8),
    AttachKernelDriver(u8),
    SetConfiguration(u8),
    ClaimInterface(u8),
    ReleaseInterface(u8),
    ControlOut {
        request: ControlRequest,
        data: Vec<u8>,
        timeout: Duration,
    },
    Closed,
}

/// Shared record of calls across the bus and its handles
#[derive(Debug, Clone, Default)]
pub struct CallLog(Rc<RefCell<Vec<MockCall>>>);

impl CallLog {
    pub fn push(&self, call: MockCall) {
        self.0.borrow_mut().push(call);
    }

    pub fn calls(&self) -> Vec<MockCall> {
        self.0.borrow().clone()
    }

    pub fn contains(&self, call: &MockCall) -> bool {
        self.0.borrow().contains(call)
    }

    /// Data stages of every control transfer issued
    pub fn control_transfers(&self) -> Vec<Vec<u8>> {
        self.0
            .borrow()
            .iter()
            .filter_map(|c| match c {
                MockCall::ControlOut { data, .. } => Some(data.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn opened(&self) -> bool {
        self.0
            .borrow()
            .iter()
            .any(|c| matches!(c, MockCall::Open { .. }))
    }
}

/// Scripted behaviour of one mock device
#[derive(Debug, Clone)]
pub struct MockDevice {
    pub summary: DeviceSummary,
    /// Descriptor read fails with this error
    pub descriptor_error: Option<rusb::Error>,
    pub open_error: Option<rusb::Error>,
    /// Interfaces that report an active kernel driver
    pub kernel_drivers: Vec<u8>,
    pub detach_error: Option<rusb::Error>,
    pub configuration_error: Option<rusb::Error>,
    pub claim_error: Option<rusb::Error>,
    /// Result of the control transfer; `None` acknowledges the full buffer
    pub transfer_result: Option<Result<usize, rusb::Error>>,
}

impl MockDevice {
    pub fn new(bus_number: u8, address: u8, id: UsbDeviceId) -> Self {
        Self {
            summary: DeviceSummary {
                bus_number,
                address,
                id,
            },
            descriptor_error: None,
            open_error: None,
            kernel_drivers: Vec::new(),
            detach_error: None,
            configuration_error: None,
            claim_error: None,
            transfer_result: None,
        }
    }

    /// A robot with usbhid bound to both interfaces, as a fresh plug-in looks
    pub fn robot(bus_number: u8, address: u8) -> Self {
        Self {
            kernel_drivers: vec![0, 1],
            ..Self::new(bus_number, address, UsbDeviceId::ROBOT)
        }
    }

    pub fn with_transfer_result(mut self, result: Result<usize, rusb::Error>) -> Self {
        self.transfer_result = Some(result);
        self
    }
}

/// In-memory USB bus
#[derive(Debug, Clone, Default)]
pub struct MockBus {
    pub devices: Vec<MockDevice>,
    /// Enumeration itself fails with this error
    pub list_error: Option<rusb::Error>,
    pub log: CallLog,
}

impl MockBus {
    pub fn new(devices: Vec<MockDevice>) -> Self {
        Self {
            devices,
            list_error: None,
            log: CallLog::default(),
        }
    }

    /// A bus with a hub and a keyboard but no robot
    pub fn without_robot() -> Self {
        Self::new(vec![
            MockDevice::new(1, 1, UsbDeviceId::new(0x1d6b, 0x0002)),
            MockDevice::new(1, 4, UsbDeviceId::new(0x046d, 0xc31c)),
        ])
    }
}

impl UsbBus for MockBus {
    type Device = MockDevice;
    type Handle = MockHandle;

    fn devices(&self) -> Result<Vec<MockDevice>, rusb::Error> {
        match self.list_error {
            Some(e) => Err(e),
            None => Ok(self.devices.clone()),
        }
    }

    fn summary(&self, device: &MockDevice) -> Result<DeviceSummary, rusb::Error> {
        match device.descriptor_error {
            Some(e) => Err(e),
            None => Ok(device.summary),
        }
    }

    fn open(&self, device: &MockDevice) -> Result<MockHandle, rusb::Error> {
        if let Some(e) = device.open_error {
            return Err(e);
        }
        self.log.push(MockCall::Open {
            bus_number: device.summary.bus_number,
            address: device.summary.address,
        });
        Ok(MockHandle {
            device: device.clone(),
            log: self.log.clone(),
        })
    }
}

/// Handle returned by [`MockBus::open`]
#[derive(Debug)]
pub struct MockHandle {
    device: MockDevice,
    log: CallLog,
}

impl ControlHandle for MockHandle {
    fn kernel_driver_active(&mut self, interface: u8) -> Result<bool, rusb::Error> {
        Ok(self.device.kernel_drivers.contains(&interface))
    }

    fn detach_kernel_driver(&mut self, interface: u8) -> Result<(), rusb::Error> {
        if let Some(e) = self.device.detach_error {
            return Err(e);
        }
        if !self.device.kernel_drivers.contains(&interface) {
            return Err(rusb::Error::NotFound);
        }
        self.device.kernel_drivers.retain(|&i| i != interface);
        self.log.push(MockCall::DetachKernelDriver(interface));
        Ok(())
    }

    fn attach_kernel_driver(&mut self, interface: u8) -> Result<(), rusb::Error> {
        self.device.kernel_drivers.push(interface);
        self.log.push(MockCall::AttachKernelDriver(interface));
        Ok(())
    }

    fn set_active_configuration(&mut self, config: u8) -> Result<(), rusb::Error> {
        if let Some(e) = self.device.configuration_error {
            return Err(e);
        }
        self.log.push(MockCall::SetConfiguration(config));
        Ok(())
    }

    fn claim_interface(&mut self, interface: u8) -> Result<(), rusb::Error> {
        if let Some(e) = self.device.claim_error {
            return Err(e);
        }
        self.log.push(MockCall::ClaimInterface(interface));
        Ok(())
    }

    fn release_interface(&mut self, interface: u8) -> Result<(), rusb::Error> {
        self.log.push(MockCall::ReleaseInterface(interface));
        Ok(())
    }

    fn write_control(
        &mut self,
        request: ControlRequest,
        data: &[u8],
        timeout: Duration,
    ) -> Result<usize, rusb::Error> {
        self.log.push(MockCall::ControlOut {
            request,
            data: data.to_vec(),
            timeout,
        });
        self.device.transfer_result.unwrap_or(Ok(data.len()))
    }
}

impl Drop for MockHandle {
    fn drop(&mut self) {
        self.log.push(MockCall::Closed);
    }
}

/// Payload the robot receives for `byte`
pub fn expected_payload(byte: u8) -> Vec<u8> {
    let mut data = vec![0u8; PAYLOAD_LEN];
    data[0] = byte;
    data
}
