//! Common utilities for ctlrobot
//!
//! Shared error type and logging setup, plus the USB abstractions the
//! command path is written against. In-memory doubles of those abstractions
//! live in [`test_utils`].

pub mod error;
pub mod logging;
pub mod test_utils;
pub mod usb_types;

pub use error::{Error, Result, SetupStage};
pub use logging::setup_logging;
pub use usb_types::{ControlHandle, DeviceSummary, UsbBus, UsbDeviceId};
