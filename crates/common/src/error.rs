//! Common error types

use crate::usb_types::UsbDeviceId;
use std::fmt;
use thiserror::Error;

/// Step of device setup that failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetupStage {
    Open,
    SetConfiguration,
    ClaimInterface,
}

impl fmt::Display for SetupStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SetupStage::Open => "Unable to open device",
            SetupStage::SetConfiguration => "Unable to set device configuration",
            SetupStage::ClaimInterface => "Unable to claim interface",
        })
    }
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("USB error: {0}")]
    Usb(String),

    #[error("Unable to find device {0}")]
    DeviceNotFound(UsbDeviceId),

    #[error("{stage}: {error}")]
    DeviceSetup {
        stage: SetupStage,
        error: rusb::Error,
    },

    #[error("USB send error: {0}")]
    Transfer(rusb::Error),

    #[error("USB send error: wrote {actual} of {expected} bytes")]
    ShortTransfer { expected: usize, actual: usize },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn setup(stage: SetupStage, error: rusb::Error) -> Self {
        Error::DeviceSetup { stage, error }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_display() {
        let err = Error::DeviceNotFound(UsbDeviceId::new(0x1941, 0x8021));
        assert_eq!(err.to_string(), "Unable to find device 0x1941:0x8021");
    }

    #[test]
    fn test_setup_display() {
        let err = Error::setup(SetupStage::ClaimInterface, rusb::Error::Busy);
        let msg = err.to_string();
        assert!(msg.starts_with("Unable to claim interface: "));
    }

    #[test]
    fn test_short_transfer_display() {
        let err = Error::ShortTransfer {
            expected: 8,
            actual: 2,
        };
        assert_eq!(err.to_string(), "USB send error: wrote 2 of 8 bytes");
    }
}
